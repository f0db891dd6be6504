//! TCP implementation of the blocking [`Stream`] contract.
//!
//! This module provides a `TcpStream` type that owns a native blocking
//! stream socket and folds the platform's socket error domain into the
//! portable [`SocketError`] taxonomy. Construction performs no I/O; the
//! stream connects when [`Stream::connect`] is invoked and releases its
//! handle on [`Stream::close`] or drop.

use std::fmt;
use std::io::{self, Read as _, Write as _};
use std::net::{self, SocketAddr, ToSocketAddrs as _};

use socket2::{Domain, Protocol, Socket, Type};
use tracing::{trace, warn};

use super::{SocketError, Stream};

/// A blocking TCP stream, connecting to a hostname and port.
///
/// The stream is constructed unconnected and stays unconnected until
/// [`connect`][Stream::connect] succeeds. The native socket handle is owned
/// exclusively by this value: [`close`][Stream::close] releases it, drop
/// releases it if it is still held, and a failed connect never leaks the
/// partially constructed socket.
///
/// Reads, peeks, and writes use the platform's default blocking semantics.
/// No timeout is applied at this layer.
///
/// # Examples
///
/// ```rust,no_run
/// use cabane::stream::Stream;
/// use cabane::stream::tcp::TcpStream;
///
/// let mut stream = TcpStream::new("example.com", 80);
/// stream.connect()?;
/// assert!(!stream.closed());
/// # Ok::<_, cabane::stream::SocketError>(())
/// ```
pub struct TcpStream {
    hostname: String,
    port: u16,
    nodelay: bool,
    socket: Option<net::TcpStream>,
    state: SocketError,
}

impl fmt::Debug for TcpStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TcpStream")
            .field("hostname", &self.hostname)
            .field("port", &self.port)
            .field("connected", &self.socket.is_some())
            .finish()
    }
}

impl TcpStream {
    /// Create a stream for connecting to the nominated host and port.
    ///
    /// `hostname` may be a DNS name or a literal IP address. No I/O happens
    /// here; the stream starts unconnected with its error slot set to
    /// [`SocketError::Ok`].
    pub fn new<S>(hostname: S, port: u16) -> Self
    where
        S: Into<String>,
    {
        Self {
            hostname: hostname.into(),
            port,
            nodelay: false,
            socket: None,
            state: SocketError::Ok,
        }
    }

    /// The hostname this stream connects to.
    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// The port this stream connects to, in host byte order.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Whether the platform's write-coalescing delay (Nagle's algorithm)
    /// will be disabled on connect.
    pub fn nodelay(&self) -> bool {
        self.nodelay
    }

    /// Request that Nagle's algorithm be disabled on the connection.
    ///
    /// Takes effect on the next [`connect`][Stream::connect]; setting it on
    /// an already-open stream does not reconfigure the live socket.
    pub fn set_nodelay(&mut self, nodelay: bool) {
        self.nodelay = nodelay;
    }

    /// Remote address of the connection. See [`std::net::TcpStream::peer_addr`].
    pub fn peer_addr(&self) -> io::Result<SocketAddr> {
        match &self.socket {
            Some(socket) => socket.peer_addr(),
            None => Err(io::ErrorKind::NotConnected.into()),
        }
    }

    /// Local address of the connection. See [`std::net::TcpStream::local_addr`].
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        match &self.socket {
            Some(socket) => socket.local_addr(),
            None => Err(io::ErrorKind::NotConnected.into()),
        }
    }

    /// Record an outcome in the error slot, returning it for `Err` plumbing.
    fn record(&mut self, state: SocketError) -> SocketError {
        self.state = state;
        state
    }

    /// Map and record an I/O failure from a read/peek/write.
    fn record_io(&mut self, error: &io::Error) -> SocketError {
        let mapped = SocketError::from_io(error);
        trace!(%error, ?mapped, "socket i/o error");
        self.record(mapped)
    }

    /// Resolve the hostname to the first IPv4 stream endpoint.
    fn resolve(&self) -> Result<SocketAddr, SocketError> {
        let mut addrs = (self.hostname.as_str(), self.port)
            .to_socket_addrs()
            .map_err(|error| {
                trace!(%error, host = %self.hostname, "resolution failed");
                SocketError::HostnameNotFound
            })?;

        addrs
            .find(SocketAddr::is_ipv4)
            .ok_or(SocketError::HostnameNotFound)
    }
}

impl Stream for TcpStream {
    fn connect(&mut self) -> Result<(), SocketError> {
        if self.socket.is_some() {
            return Err(self.record(SocketError::AlreadyOpen));
        }

        let addr = match self.resolve() {
            Ok(addr) => addr,
            Err(state) => return Err(self.record(state)),
        };

        let socket = match Socket::new(Domain::for_address(addr), Type::STREAM, Some(Protocol::TCP))
        {
            Ok(socket) => socket,
            Err(error) => {
                trace!(%error, "tcp socket open error");
                return Err(self.record(SocketError::InitialisationFailure));
            }
        };
        trace!("tcp socket opened");

        // Nagle must be toggled before the connection is established;
        // failure to set the option is not a connection failure.
        if self.nodelay {
            if let Err(error) = socket.set_nodelay(true) {
                warn!("tcp set_nodelay error: {}", error);
            }
        }

        match socket.connect(&addr.into()) {
            Ok(()) => {
                trace!(remote.addr = %addr, "tcp connected");
                self.socket = Some(socket.into());
                self.record(SocketError::Ok);
                Ok(())
            }
            Err(error) => {
                // `socket` drops at the end of this arm, releasing the
                // native handle; the stream stays closed.
                let mapped = SocketError::from_connect_io(&error);
                trace!(%error, ?mapped, "tcp connect error");
                Err(self.record(mapped))
            }
        }
    }

    fn close(&mut self) {
        if let Some(socket) = self.socket.take() {
            trace!("tcp socket closed");
            drop(socket);
        }
    }

    fn closed(&self) -> bool {
        self.socket.is_none()
    }

    fn error(&self) -> SocketError {
        self.state
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, SocketError> {
        let Some(socket) = self.socket.as_mut() else {
            return Err(self.record(SocketError::NotOpen));
        };

        let result = socket.read(buf);
        match result {
            Ok(len) => {
                self.record(SocketError::Ok);
                Ok(len)
            }
            Err(error) => Err(self.record_io(&error)),
        }
    }

    fn peek(&mut self, buf: &mut [u8]) -> Result<usize, SocketError> {
        let Some(socket) = self.socket.as_ref() else {
            return Err(self.record(SocketError::NotOpen));
        };

        let result = socket.peek(buf);
        match result {
            Ok(len) => {
                self.record(SocketError::Ok);
                Ok(len)
            }
            Err(error) => Err(self.record_io(&error)),
        }
    }

    fn write(&mut self, buf: &[u8]) -> Result<usize, SocketError> {
        let Some(socket) = self.socket.as_mut() else {
            return Err(self.record(SocketError::NotOpen));
        };

        let result = socket.write(buf);
        match result {
            Ok(len) => {
                self.record(SocketError::Ok);
                Ok(len)
            }
            Err(error) => Err(self.record_io(&error)),
        }
    }
}

impl Drop for TcpStream {
    fn drop(&mut self) {
        if !self.closed() {
            self.close();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write as _;
    use std::net::TcpListener;
    use std::thread;

    use static_assertions::assert_impl_all;

    assert_impl_all!(TcpStream: Send, Sync);

    fn listener() -> (TcpListener, u16) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        (listener, port)
    }

    #[test]
    fn operations_before_connect_report_not_open() {
        crate::fixtures::subscribe();

        let mut stream = TcpStream::new("127.0.0.1", 80);
        assert!(stream.closed());
        assert_eq!(stream.error(), SocketError::Ok);

        let mut buf = [0u8; 8];
        assert_eq!(stream.read(&mut buf), Err(SocketError::NotOpen));
        assert_eq!(stream.error(), SocketError::NotOpen);

        assert_eq!(stream.peek(&mut buf), Err(SocketError::NotOpen));
        assert_eq!(stream.error(), SocketError::NotOpen);

        assert_eq!(stream.write(b"hello"), Err(SocketError::NotOpen));
        assert_eq!(stream.error(), SocketError::NotOpen);
    }

    #[test]
    fn connect_to_loopback_listener() {
        crate::fixtures::subscribe();

        let (_listener, port) = listener();

        let mut stream = TcpStream::new("127.0.0.1", port);
        stream.connect().unwrap();
        assert!(!stream.closed());
        assert_eq!(stream.error(), SocketError::Ok);
        assert!(stream.peer_addr().unwrap().ip().is_loopback());
    }

    #[test]
    fn connect_with_nodelay() {
        crate::fixtures::subscribe();

        let (_listener, port) = listener();

        let mut stream = TcpStream::new("127.0.0.1", port);
        stream.set_nodelay(true);
        assert!(stream.nodelay());
        stream.connect().unwrap();
        assert_eq!(stream.error(), SocketError::Ok);
    }

    #[test]
    fn connect_while_open_reports_already_open() {
        crate::fixtures::subscribe();

        let (_listener, port) = listener();

        let mut stream = TcpStream::new("127.0.0.1", port);
        stream.connect().unwrap();

        assert_eq!(stream.connect(), Err(SocketError::AlreadyOpen));
        assert_eq!(stream.error(), SocketError::AlreadyOpen);
        // the original connection is untouched
        assert!(!stream.closed());
    }

    #[test]
    fn close_is_idempotent() {
        crate::fixtures::subscribe();

        let (_listener, port) = listener();

        let mut stream = TcpStream::new("127.0.0.1", port);
        stream.connect().unwrap();

        stream.close();
        assert!(stream.closed());
        stream.close();
        assert!(stream.closed());
        assert_eq!(stream.error(), SocketError::Ok);
    }

    #[test]
    fn reconnect_after_close() {
        crate::fixtures::subscribe();

        let (_listener, port) = listener();

        let mut stream = TcpStream::new("127.0.0.1", port);
        stream.connect().unwrap();
        stream.close();

        stream.connect().unwrap();
        assert!(!stream.closed());
        assert_eq!(stream.error(), SocketError::Ok);
    }

    #[test]
    fn peek_does_not_consume() {
        crate::fixtures::subscribe();

        let (listener, port) = listener();
        const MESSAGE: &[u8] = b"hello";

        let server = thread::spawn(move || {
            let (mut conn, _) = listener.accept().unwrap();
            conn.write_all(MESSAGE).unwrap();
            conn
        });

        let mut stream = TcpStream::new("127.0.0.1", port);
        stream.connect().unwrap();

        // peek until the full message is buffered locally
        let mut peeked = [0u8; MESSAGE.len()];
        loop {
            let n = stream.peek(&mut peeked).unwrap();
            if n == MESSAGE.len() {
                break;
            }
        }
        assert_eq!(stream.error(), SocketError::Ok);

        let mut read = [0u8; MESSAGE.len()];
        let n = stream.read(&mut read).unwrap();
        assert_eq!(n, MESSAGE.len());
        assert_eq!(peeked, read);
        assert_eq!(&read, MESSAGE);

        drop(server.join().unwrap());
    }

    #[test]
    fn write_round_trip() {
        crate::fixtures::subscribe();

        let (listener, port) = listener();

        let server = thread::spawn(move || {
            let (mut conn, _) = listener.accept().unwrap();
            let mut buf = [0u8; 4];
            std::io::Read::read_exact(&mut conn, &mut buf).unwrap();
            conn.write_all(&buf).unwrap();
        });

        let mut stream = TcpStream::new("127.0.0.1", port);
        stream.connect().unwrap();

        let mut remaining: &[u8] = b"ping";
        while !remaining.is_empty() {
            let n = stream.write(remaining).unwrap();
            remaining = &remaining[n..];
        }

        let mut echoed = [0u8; 4];
        let mut filled = 0;
        while filled < echoed.len() {
            let n = stream.read(&mut echoed[filled..]).unwrap();
            filled += n;
        }
        assert_eq!(&echoed, b"ping");
        assert_eq!(stream.error(), SocketError::Ok);

        server.join().unwrap();
    }

    #[test]
    fn zero_length_read_is_not_an_error() {
        crate::fixtures::subscribe();

        let (_listener, port) = listener();

        let mut stream = TcpStream::new("127.0.0.1", port);
        stream.connect().unwrap();

        assert_eq!(stream.read(&mut []), Ok(0));
        assert_eq!(stream.error(), SocketError::Ok);
    }

    #[test]
    fn refused_connection_maps_to_connection_refused() {
        crate::fixtures::subscribe();

        // bind to get a free port, then drop the listener so nothing is
        // listening when we connect
        let (listener, port) = listener();
        drop(listener);

        let mut stream = TcpStream::new("127.0.0.1", port);
        assert_eq!(stream.connect(), Err(SocketError::ConnectionRefused));
        assert_eq!(stream.error(), SocketError::ConnectionRefused);
        assert!(stream.closed());
    }

    #[test]
    fn unresolvable_hostname_maps_to_hostname_not_found() {
        crate::fixtures::subscribe();

        // .invalid is reserved (RFC 2606) and never resolves
        let mut stream = TcpStream::new("does-not-exist.invalid", 80);
        assert_eq!(stream.connect(), Err(SocketError::HostnameNotFound));
        assert_eq!(stream.error(), SocketError::HostnameNotFound);
        assert!(stream.closed());
    }

    #[test]
    fn accessors() {
        let stream = TcpStream::new("example.com", 8080);
        assert_eq!(stream.hostname(), "example.com");
        assert_eq!(stream.port(), 8080);
        assert!(!stream.nodelay());
        assert!(stream.peer_addr().is_err());
        assert!(stream.local_addr().is_err());
    }

    #[test]
    fn debug_does_not_leak_the_handle() {
        let stream = TcpStream::new("example.com", 80);
        let rendered = format!("{stream:?}");
        assert!(rendered.contains("example.com"));
        assert!(rendered.contains("connected: false"));
    }
}
