//! Protocol stack seam.
//!
//! The IP/ARP/TCP machinery (checksums, handshakes, retransmission)
//! lives behind this trait and is assumed correct; the dispatcher only
//! consumes its three operations.

use crate::error::Result;

/// Protocol stack interface.
pub trait ProtocolStack {
    /// Run the stack over a received frame and locate application data.
    ///
    /// ARP and ICMP are answered internally by the stack; for those
    /// frames (and for any frame without an application payload) this
    /// returns 0. A non-zero return is the byte offset of the
    /// application payload within `frame`.
    fn application_offset(&mut self, frame: &[u8], len: usize) -> usize;

    /// Frame a reply into the buffer.
    ///
    /// Writes an HTTP-style reply (`body` appended at the protocol's
    /// data position, starting `offset` bytes into the data region) and
    /// returns the new total data length to transmit.
    ///
    /// # Returns
    /// - `Ok(len)`: reply framed, `len` bytes ready to transmit
    /// - `Err(ServeError::ReplyTooLarge)`: body cannot fit
    fn write_reply(&mut self, frame: &mut [u8], offset: usize, body: &[u8]) -> Result<usize>;

    /// Transmit `len` bytes of the buffer.
    ///
    /// Ownership of the reply passes to the stack here; the dispatcher
    /// keeps nothing in flight.
    fn transmit(&mut self, frame: &[u8], len: usize);
}
