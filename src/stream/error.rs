//! The portable socket error taxonomy and the native error mapping.

use std::io;

use thiserror::Error;

/// Error codes that can be produced by implementations of [`Stream`][super::Stream].
///
/// This is the portable taxonomy the native POSIX and Winsock error domains
/// are folded into. Not all platforms produce all values; see
/// [`from_io`][SocketError::from_io] for the canonical mapping.
///
/// A value of this type represents the outcome of a single operation
/// attempt, which is why [`Ok`][SocketError::Ok] is a member: the stream's
/// error slot holds exactly one current value, and a successful operation
/// records `Ok` there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Error)]
pub enum SocketError {
    /// No error condition.
    #[default]
    #[error("no error")]
    Ok,

    /// Attempted an operation that requires the socket to be open, when it's not.
    #[error("stream is not open")]
    NotOpen,

    /// Connection is already open.
    #[error("stream is already open")]
    AlreadyOpen,

    /// An error that wasn't identified as one of the standard ones.
    #[error("unidentified socket error")]
    OtherError,

    /// Hostname couldn't be resolved.
    #[error("hostname not found")]
    HostnameNotFound,

    /// Other initialisation failure during connect.
    #[error("socket initialisation failure")]
    InitialisationFailure,

    /// Failed to connect to the host.
    #[error("failed to connect to host")]
    ConnectFailure,

    /// Client is not connected to the host.
    #[error("not connected")]
    NotConnected,

    /// Connection was reset (remote-initiated).
    #[error("connection reset by peer")]
    ConnectionReset,

    /// Connection was lost (local-initiated).
    #[error("connection aborted")]
    ConnectionAborted,

    /// Network is down (local).
    #[error("network is down")]
    NetworkDown,

    /// Destination network is unreachable (remote).
    #[error("network unreachable")]
    NetworkUnreachable,

    /// Network was reset (local).
    ///
    /// The canonical mapping cannot currently produce this value:
    /// `std::io::ErrorKind` has no stable variant for `ENETRESET` /
    /// `WSAENETRESET`, so a local network reset reports as
    /// [`OtherError`][SocketError::OtherError].
    #[error("network reset")]
    NetworkReset,

    /// Connection was refused by the remote host.
    #[error("connection refused")]
    ConnectionRefused,

    /// Something timed out.
    #[error("operation timed out")]
    TimedOut,
}

impl SocketError {
    /// Map a native I/O error onto the portable taxonomy.
    ///
    /// This is the single canonical mapping for both the POSIX and Winsock
    /// error domains, expressed over [`io::ErrorKind`] so the platform
    /// divergence is already collapsed by the standard library.
    ///
    /// An interrupted operation maps to [`Ok`][SocketError::Ok]: the
    /// operation was deliberately stopped by local action, which is not a
    /// real error even though the operation itself did not complete.
    ///
    /// `WouldBlock` maps to [`TimedOut`][SocketError::TimedOut]; on a
    /// blocking socket it only surfaces when a read or write timeout
    /// elapses.
    pub fn from_io(err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::Interrupted => SocketError::Ok,
            io::ErrorKind::ConnectionRefused => SocketError::ConnectionRefused,
            io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => SocketError::TimedOut,
            io::ErrorKind::NetworkDown => SocketError::NetworkDown,
            io::ErrorKind::NetworkUnreachable | io::ErrorKind::HostUnreachable => {
                SocketError::NetworkUnreachable
            }
            io::ErrorKind::ConnectionReset => SocketError::ConnectionReset,
            io::ErrorKind::ConnectionAborted => SocketError::ConnectionAborted,
            io::ErrorKind::NotConnected => SocketError::NotConnected,
            _ => SocketError::OtherError,
        }
    }

    /// Map a native I/O error raised while establishing a connection.
    ///
    /// Identical to [`from_io`][SocketError::from_io], except that an error
    /// with no more specific mapping reports as
    /// [`ConnectFailure`][SocketError::ConnectFailure] rather than
    /// [`OtherError`][SocketError::OtherError].
    pub fn from_connect_io(err: &io::Error) -> Self {
        match Self::from_io(err) {
            SocketError::OtherError => SocketError::ConnectFailure,
            mapped => mapped,
        }
    }

    /// Whether this value represents an actual error condition.
    pub fn is_err(&self) -> bool {
        !matches!(self, SocketError::Ok)
    }
}
