//! Ethernet controller seam.

/// One received frame, borrowed from the controller.
///
/// `data` is the controller's whole writable buffer; replies are
/// framed into it in place and may run past the received length.
/// `len` is the received frame length. The borrow ends with the poll
/// iteration; the dispatcher never retains it.
pub struct Frame<'a> {
    /// Full frame buffer (receive data plus writable tail).
    pub data: &'a mut [u8],
    /// Received frame length in bytes.
    pub len: usize,
}

/// Ethernet controller interface.
///
/// The controller owns the frame buffer and its internal queue
/// (interrupts may feed the queue independently); the dispatcher only
/// polls.
pub trait EthernetLink {
    /// Get link status.
    fn link_up(&self) -> bool {
        true
    }

    /// Take the next received frame, if one is ready.
    ///
    /// # Returns
    /// - `Some(frame)`: a frame is ready; the view is valid until the
    ///   next call
    /// - `None`: nothing received (normal)
    ///
    /// # Contract
    /// - MUST return immediately (no blocking); the dispatcher
    ///   supplies the busy-wait
    fn try_receive(&mut self) -> Option<Frame<'_>>;
}
