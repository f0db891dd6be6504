//! Network stream abstractions and implementations.
//!
//! This module provides a unified abstraction for connected, blocking,
//! bidirectional byte transports. The [`Stream`] trait separates specifics
//! such as encryption or compression from the underlying socket, so that
//! higher layers (an HTTP client, say) can be written against one contract
//! and extended with new transports later.
//!
//! # Modules
//!
//! - [`tcp`] - the concrete [`TcpStream`][tcp::TcpStream] over a native
//!   blocking stream socket
//!
//! # Examples
//!
//! ```rust,no_run
//! use cabane::stream::Stream;
//! use cabane::stream::tcp::TcpStream;
//!
//! let mut stream = TcpStream::new("127.0.0.1", 8080);
//! if stream.connect().is_err() {
//!     // the error slot records the cause of the most recent failure
//!     eprintln!("connect failed: {}", stream.error());
//! }
//! ```

mod error;
pub mod tcp;

pub use self::error::SocketError;

/// A capability contract for a connected, blocking, bidirectional byte
/// transport.
///
/// Implementations should acquire everything they need to establish the
/// connection (hostname, port, options) at construction time; constructing a
/// stream performs no I/O, and [`connect`][Stream::connect] performs all of
/// it.
///
/// Every fallible operation reports failure through its return value *and*
/// records the outcome in the stream's error slot, queried with
/// [`error`][Stream::error]. The slot holds only the outcome of the most
/// recent attempt; a caller that wants the cause of a failure must read it
/// before issuing the next operation.
///
/// This layer implements no retry logic and no timeouts. One failed
/// operation is one failed operation; scheduling another attempt belongs to
/// the caller.
pub trait Stream {
    /// Connect the stream to its endpoint.
    ///
    /// On failure the error slot records the cause. Calling `connect` on a
    /// stream that is already open fails with [`SocketError::AlreadyOpen`]
    /// and leaves the existing connection untouched.
    fn connect(&mut self) -> Result<(), SocketError>;

    /// Close the stream, disconnecting from the endpoint.
    ///
    /// Idempotent; a no-op if the stream is not open.
    fn close(&mut self);

    /// Whether the stream is currently closed.
    fn closed(&self) -> bool;

    /// The outcome recorded by the most recently attempted operation.
    ///
    /// Returns [`SocketError::Ok`] when no operation has failed yet, or when
    /// the last attempt succeeded.
    fn error(&self) -> SocketError;

    /// Read bytes from the stream into `buf`, consuming them.
    ///
    /// Returns the number of bytes transferred, which may be less than the
    /// buffer size. `Ok(0)` means no bytes were available and is not an
    /// error or an end-of-stream signal at this layer.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, SocketError>;

    /// Read bytes from the stream into `buf` without consuming them.
    ///
    /// The same bytes remain available for a subsequent
    /// [`read`][Stream::read].
    fn peek(&mut self, buf: &mut [u8]) -> Result<usize, SocketError>;

    /// Write bytes from `buf` to the stream.
    ///
    /// Returns the number of bytes the transport accepted, which may be less
    /// than `buf.len()`, including zero.
    fn write(&mut self, buf: &[u8]) -> Result<usize, SocketError>;
}
