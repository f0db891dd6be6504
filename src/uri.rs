//! Lenient URI splitting.
//!
//! This intentionally doesn't support authentication sections, breakdown of
//! the path/query, percent-decoding, or IPv6 bracket literals. Use a more
//! featureful URI crate if you need that.

use std::cell::OnceCell;
use std::fmt;
use std::num::ParseIntError;

use thiserror::Error;

/// The URI could not be decomposed.
///
/// The splitter is forgiving by design, so the only parse failure is a port
/// substring that is not a valid 16-bit integer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid port in uri: {0}")]
pub struct InvalidUri(#[from] ParseIntError);

/// A Uniform Resource Identifier, split very forgivingly.
///
/// The scheme recognized is `[protocol://]host[:port][/path]`:
///
/// - If `protocol` is omitted, it is assumed to be `http`.
/// - If `port` is omitted, [`port`][Uri::port] reports `None`; substituting
///   the protocol's default (80 for http, say) is the caller's job.
/// - If `path` is omitted, it is assumed to be `/`.
///
/// There is no query-string decomposition; a `?` is ordinary path text.
///
/// The decomposition is computed lazily on the first accessor call and
/// cached for all four accessors. Replacing the raw text with [`set`][Uri::set]
/// discards the cache.
///
/// A malformed port fails the whole parse: every accessor returns
/// [`InvalidUri`] until the raw text is replaced.
///
/// # Examples
///
/// ```
/// use cabane::Uri;
///
/// let mut uri = Uri::from("ftp://host/");
/// assert_eq!(uri.protocol().unwrap(), "ftp");
/// assert_eq!(uri.host().unwrap(), "host");
/// assert_eq!(uri.port().unwrap(), None);
/// assert_eq!(uri.path().unwrap(), "/");
///
/// uri.set("example.com:8080/a");
/// assert_eq!(uri.protocol().unwrap(), "http");
/// assert_eq!(uri.port().unwrap(), Some(8080));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Uri {
    raw: String,
    parsed: OnceCell<Result<Parts, InvalidUri>>,
}

/// The cached decomposition of the raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Parts {
    protocol: String,
    host: String,
    port: Option<u16>,
    path: String,
}

impl Parts {
    fn parse(raw: &str) -> Result<Self, InvalidUri> {
        // identify the protocol
        let (protocol, rest) = match raw.find("://") {
            None => ("http".to_owned(), raw),
            Some(idx) => (raw[..idx].to_owned(), &raw[idx + 3..]),
        };

        // the first / ends the host section and starts the path
        let (mut host, path) = match rest.find('/') {
            None => (rest.to_owned(), "/".to_owned()),
            Some(idx) => (rest[..idx].to_owned(), rest[idx..].to_owned()),
        };

        // break an explicit port out of the host
        let port = match host.find(':') {
            None => None,
            Some(idx) => {
                let port = host[idx + 1..].parse::<u16>()?;
                host.truncate(idx);
                Some(port)
            }
        };

        Ok(Parts {
            protocol,
            host,
            port,
            path,
        })
    }
}

impl Uri {
    /// Create a URI from raw text. No parsing happens until an accessor is
    /// called.
    pub fn new<S>(raw: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            raw: raw.into(),
            parsed: OnceCell::new(),
        }
    }

    /// Replace the raw text, discarding any cached decomposition.
    pub fn set<S>(&mut self, raw: S)
    where
        S: Into<String>,
    {
        self.raw = raw.into();
        self.parsed = OnceCell::new();
    }

    /// The untouched raw text, exactly as constructed or [`set`][Uri::set].
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    fn parts(&self) -> Result<&Parts, InvalidUri> {
        match self.parsed.get_or_init(|| Parts::parse(&self.raw)) {
            Ok(parts) => Ok(parts),
            Err(error) => Err(error.clone()),
        }
    }

    /// The protocol named by the URI, or `http` if none was given.
    pub fn protocol(&self) -> Result<&str, InvalidUri> {
        Ok(&self.parts()?.protocol)
    }

    /// The host (address) section of the URI.
    pub fn host(&self) -> Result<&str, InvalidUri> {
        Ok(&self.parts()?.host)
    }

    /// The port named by the URI, or `None` if unspecified.
    ///
    /// This layer does not substitute protocol defaults; a caller that needs
    /// a concrete port must supply one for `None`.
    pub fn port(&self) -> Result<Option<u16>, InvalidUri> {
        Ok(self.parts()?.port)
    }

    /// The path section of the URI, or `/` if none was given.
    pub fn path(&self) -> Result<&str, InvalidUri> {
        Ok(&self.parts()?.path)
    }
}

impl From<&str> for Uri {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for Uri {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl PartialEq for Uri {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for Uri {}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
