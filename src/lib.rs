//! # Cabane: blocking stream and URI primitives for HTTP clients
//!
//! Cabane provides the two leaf building blocks an HTTP client needs before
//! any message framing exists: a platform-neutral bidirectional byte stream
//! over TCP, and a lenient URI splitter.
//!
//! ## Architecture Overview
//!
//! The crate deliberately stays below the protocol layer. It does not frame
//! HTTP messages, negotiate TLS, pool connections, or follow redirects; it
//! gives a client implementation a portable transport contract and a way to
//! decompose the URI strings it is handed.
//!
//! ### Streams
//!
//! The [`Stream`] trait is the capability contract for a connected, blocking,
//! bidirectional byte transport: connect, close, read, peek, write, and a
//! last-error query. Implementations are expected to acquire their endpoint
//! details at construction time and defer all I/O to [`Stream::connect`].
//!
//! [`TcpStream`] is the concrete implementation over a native stream socket.
//! Its job is the unglamorous part of portability: folding the POSIX and
//! Winsock socket error domains into the single [`SocketError`] taxonomy, and
//! guaranteeing the socket handle is released on every exit path, including
//! the early-return failures inside `connect`.
//!
//! Every fallible stream operation records its outcome in the stream's error
//! slot, so a caller that just observed a failure can ask [`Stream::error`]
//! for the cause. The slot holds the outcome of the most recent attempt, not
//! an accumulated history.
//!
//! ```no_run
//! use cabane::stream::Stream;
//! use cabane::stream::tcp::TcpStream;
//!
//! let mut stream = TcpStream::new("example.com", 80);
//! stream.set_nodelay(true);
//! stream.connect()?;
//!
//! stream.write(b"GET / HTTP/1.0\r\n\r\n")?;
//! let mut buf = [0u8; 1024];
//! let n = stream.read(&mut buf)?;
//! # let _ = n;
//! # Ok::<_, cabane::stream::SocketError>(())
//! ```
//!
//! ### URIs
//!
//! [`Uri`] splits `[scheme://]host[:port][/path]` strings, defaulting the
//! scheme to `http` and the path to `/`. It is maximally forgiving by design:
//! no percent-decoding, no IPv6 bracket literals, no query decomposition. The
//! parse is lazy and memoized; replacing the raw text with [`Uri::set`]
//! discards the cached decomposition.
//!
//! ```
//! use cabane::Uri;
//!
//! let uri = Uri::from("http://example.com:8080/a/b");
//! assert_eq!(uri.protocol().unwrap(), "http");
//! assert_eq!(uri.host().unwrap(), "example.com");
//! assert_eq!(uri.port().unwrap(), Some(8080));
//! assert_eq!(uri.path().unwrap(), "/a/b");
//! ```
//!
//! The two components are independent; the usual pairing is a `Uri` feeding a
//! `TcpStream` constructor, with the caller substituting the protocol default
//! port when [`Uri::port`] reports none.

pub mod stream;
pub mod uri;

pub use self::stream::tcp::TcpStream;
pub use self::stream::{SocketError, Stream};
pub use self::uri::{InvalidUri, Uri};
