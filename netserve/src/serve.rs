//! Frame dispatch loop.
//!
//! The top-level driver of the responder: poll the Ethernet controller
//! for a received frame, let the protocol stack locate the application
//! payload, classify it against the request grammar, frame the reply
//! in place, and hand it back for transmission. One frame in, at most
//! one reply out, nothing carried across iterations.

use core::sync::atomic::{AtomicBool, Ordering};

use crate::console;
use crate::error::{Result, ServeError};
use crate::link::EthernetLink;
use crate::request::{Request, UNAUTHORIZED_PAGE};
use crate::stack::ProtocolStack;
use crate::types::{Ipv4Addr, MacAddress};

/// Largest reply body staged for echo, matching the usual Ethernet
/// frame buffer size.
const ECHO_SCRATCH_BYTES: usize = 1536;

/// Network identity for the responder.
///
/// One explicitly constructed value, built once at startup and passed
/// by reference into the loop and the bring-up collaborators; nothing
/// re-initializes it later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerContext {
    /// MAC address assigned to the Ethernet controller.
    pub mac: MacAddress,
    /// IPv4 address the stack answers on.
    pub ip: Ipv4Addr,
}

impl ServerContext {
    /// Create a context with the given identity.
    pub const fn new(mac: MacAddress, ip: Ipv4Addr) -> Self {
        Self { mac, ip }
    }
}

impl Default for ServerContext {
    fn default() -> Self {
        Self::new(
            MacAddress::new([0xC0, 0xFF, 0xEE, 0xC0, 0xFF, 0xEE]),
            Ipv4Addr::new(192, 168, 0, 66),
        )
    }
}

/// Cooperative cancellation handle.
///
/// The dispatch loop itself has no timeout: with no incoming traffic
/// it spins forever. The token lets a hosting environment (or a test)
/// bound execution; on hardware it is simply never fired.
#[derive(Debug, Default)]
pub struct CancelToken {
    cancelled: AtomicBool,
}

impl CancelToken {
    /// Create an unfired token.
    pub const fn new() -> Self {
        Self {
            cancelled: AtomicBool::new(false),
        }
    }

    /// Request cancellation. Safe from any context.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Check whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Why the dispatch loop returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServeExit {
    /// The cancel token fired.
    Cancelled,
}

/// Outcome of waiting for the link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkWait {
    /// Link negotiated.
    Up,
    /// The cancel token fired first.
    Cancelled,
}

/// Busy-wait until the controller reports link up.
///
/// No timeout: a cable that never comes up means this spins until the
/// token fires.
pub fn wait_link_up<L: EthernetLink>(link: &L, cancel: &CancelToken) -> LinkWait {
    console::print("Waiting for ifup... ");
    loop {
        if cancel.is_cancelled() {
            return LinkWait::Cancelled;
        }
        if link.link_up() {
            console::println("done.");
            return LinkWait::Up;
        }
        core::hint::spin_loop();
    }
}

/// Dispatch one received frame.
///
/// Returns `Ok(true)` if a reply was framed and transmitted,
/// `Ok(false)` if the frame carried no application payload (ARP and
/// ICMP are already answered inside the stack). This is the loop body
/// of [`serve`], split out so tests can drive single iterations.
pub fn serve_frame<S: ProtocolStack>(stack: &mut S, frame: &mut [u8], len: usize) -> Result<bool> {
    let offset = stack.application_offset(frame, len);
    if offset == 0 || offset >= len {
        return Ok(false);
    }

    console::print("Incoming web request... ");
    let request = Request::classify(&frame[offset..len]);

    let reply_len = match request {
        Request::Echo { body_start } => {
            // Source and destination alias the same frame buffer, so
            // the echo body is staged through a scratch copy first.
            let mut scratch = [0u8; ECHO_SCRATCH_BYTES];
            let body = &frame[offset + body_start..len];
            let staged = body.len().min(scratch.len());
            scratch[..staged].copy_from_slice(&body[..staged]);
            stack.write_reply(frame, 0, &scratch[..staged])?
        }
        _ => {
            match request {
                Request::Root => console::println("GET root"),
                Request::OtherPath => console::println("GET not root"),
                _ => console::println("not GET"),
            }
            let page = request.fixed_reply().unwrap_or(UNAUTHORIZED_PAGE);
            stack.write_reply(frame, 0, page)?
        }
    };

    stack.transmit(frame, reply_len);
    Ok(true)
}

/// Run the dispatch loop.
///
/// Polls for received frames forever: a busy-wait spin, not a
/// suspension point, since there is no timeout and no other work to yield
/// to. Returns only when `cancel` fires. Frame views are dropped at
/// the end of every iteration; a reply that cannot fit its buffer is
/// logged and dropped, and the loop continues.
pub fn serve<L, S>(
    link: &mut L,
    stack: &mut S,
    ctx: &ServerContext,
    cancel: &CancelToken,
) -> ServeExit
where
    L: EthernetLink,
    S: ProtocolStack,
{
    console::print("Serving on ");
    console::print_ipv4(&ctx.ip);
    console::print(" (");
    console::print_mac(&ctx.mac);
    console::println(")");

    loop {
        let frame = loop {
            if cancel.is_cancelled() {
                return ServeExit::Cancelled;
            }
            if let Some(frame) = link.try_receive() {
                break frame;
            }
            core::hint::spin_loop();
        };

        if let Err(ServeError::ReplyTooLarge { needed, .. }) =
            serve_frame(stack, frame.data, frame.len)
        {
            console::print("reply dropped: need ");
            console::print_hex32(needed as u32);
            console::println(" bytes, frame buffer too small");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServeError;
    use crate::link::Frame;
    use std::vec::Vec;

    /// Stack fake: fixed application offset, byte-for-byte reply
    /// framing at the start of the buffer.
    struct FakeStack {
        offset: usize,
        reply_bodies: Vec<Vec<u8>>,
        transmitted: Vec<Vec<u8>>,
    }

    impl FakeStack {
        fn new(offset: usize) -> Self {
            Self {
                offset,
                reply_bodies: Vec::new(),
                transmitted: Vec::new(),
            }
        }
    }

    impl ProtocolStack for FakeStack {
        fn application_offset(&mut self, _frame: &[u8], _len: usize) -> usize {
            self.offset
        }

        fn write_reply(&mut self, frame: &mut [u8], offset: usize, body: &[u8]) -> Result<usize> {
            assert_eq!(offset, 0);
            if body.len() > frame.len() {
                return Err(ServeError::ReplyTooLarge {
                    needed: body.len(),
                    capacity: frame.len(),
                });
            }
            frame[..body.len()].copy_from_slice(body);
            self.reply_bodies.push(body.to_vec());
            Ok(body.len())
        }

        fn transmit(&mut self, frame: &[u8], len: usize) {
            self.transmitted.push(frame[..len].to_vec());
        }
    }

    /// Link fake: hands out queued frames, then fires the shared
    /// cancel token so `serve` terminates.
    struct FakeLink<'a> {
        frames: Vec<Vec<u8>>,
        buffer: [u8; 1536],
        cancel: &'a CancelToken,
    }

    impl<'a> FakeLink<'a> {
        fn new(frames: Vec<Vec<u8>>, cancel: &'a CancelToken) -> Self {
            Self {
                frames,
                buffer: [0; 1536],
                cancel,
            }
        }
    }

    impl EthernetLink for FakeLink<'_> {
        fn try_receive(&mut self) -> Option<Frame<'_>> {
            if self.frames.is_empty() {
                self.cancel.cancel();
                return None;
            }
            let next = self.frames.remove(0);
            self.buffer[..next.len()].copy_from_slice(&next);
            Some(Frame {
                data: &mut self.buffer,
                len: next.len(),
            })
        }
    }

    const APP_OFFSET: usize = 54;

    fn frame_with_payload(payload: &[u8]) -> ([u8; 1536], usize) {
        let mut frame = [0u8; 1536];
        frame[APP_OFFSET..APP_OFFSET + payload.len()].copy_from_slice(payload);
        (frame, APP_OFFSET + payload.len())
    }

    #[test]
    fn test_offset_zero_produces_no_reply() {
        let mut stack = FakeStack::new(0);
        let (mut frame, len) = frame_with_payload(b"GET / HTTP/1.1");

        let replied = serve_frame(&mut stack, &mut frame, len).unwrap();

        assert!(!replied);
        assert!(stack.transmitted.is_empty());
    }

    #[test]
    fn test_get_root_replies_hello_world() {
        let mut stack = FakeStack::new(APP_OFFSET);
        let (mut frame, len) = frame_with_payload(b"GET / HTTP/1.1");

        assert!(serve_frame(&mut stack, &mut frame, len).unwrap());

        assert_eq!(stack.transmitted.len(), 1);
        let reply = &stack.transmitted[0];
        assert!(reply.starts_with(b"HTTP/1.0 200 OK"));
        assert!(reply.windows(12).any(|w| w == b"Hello world!"));
    }

    #[test]
    fn test_get_other_path_replies_goodbye() {
        let mut stack = FakeStack::new(APP_OFFSET);
        let (mut frame, len) = frame_with_payload(b"GET /foo HTTP/1.1");

        assert!(serve_frame(&mut stack, &mut frame, len).unwrap());

        let reply = &stack.transmitted[0];
        assert!(reply.starts_with(b"HTTP/1.0 200 OK"));
        assert!(reply.windows(20).any(|w| w == b"Goodbye cruel world."));
    }

    #[test]
    fn test_echo_replies_body_verbatim() {
        let mut stack = FakeStack::new(APP_OFFSET);
        let (mut frame, len) = frame_with_payload(b"echo hi there");

        assert!(serve_frame(&mut stack, &mut frame, len).unwrap());

        assert_eq!(stack.reply_bodies.len(), 1);
        assert_eq!(stack.reply_bodies[0], b"hi there");
        assert_eq!(stack.transmitted[0], b"hi there");
    }

    #[test]
    fn test_unknown_payload_replies_401() {
        let mut stack = FakeStack::new(APP_OFFSET);
        let (mut frame, len) = frame_with_payload(b"FLUSH all the things");

        assert!(serve_frame(&mut stack, &mut frame, len).unwrap());

        let reply = &stack.transmitted[0];
        assert!(reply.starts_with(b"HTTP/1.0 401 Unauthorized"));
    }

    #[test]
    fn test_reply_too_large_is_propagated_without_transmit() {
        let mut stack = FakeStack::new(4);
        // Tiny buffer: any canned page overflows it.
        let mut frame = [0u8; 16];
        frame[4..8].copy_from_slice(b"GET ");

        let err = serve_frame(&mut stack, &mut frame, 8).unwrap_err();

        assert!(matches!(err, ServeError::ReplyTooLarge { .. }));
        assert!(stack.transmitted.is_empty());
    }

    /// Link fake with a buffer too small for any canned page.
    struct TinyBufferLink<'a> {
        delivered: bool,
        buffer: [u8; 16],
        cancel: &'a CancelToken,
    }

    impl EthernetLink for TinyBufferLink<'_> {
        fn try_receive(&mut self) -> Option<Frame<'_>> {
            if self.delivered {
                self.cancel.cancel();
                return None;
            }
            self.delivered = true;
            self.buffer[4..8].copy_from_slice(b"GET ");
            Some(Frame {
                data: &mut self.buffer,
                len: 8,
            })
        }
    }

    #[test]
    fn test_serve_drops_oversized_reply_and_keeps_polling() {
        let cancel = CancelToken::new();
        let mut link = TinyBufferLink {
            delivered: false,
            buffer: [0; 16],
            cancel: &cancel,
        };
        let mut stack = FakeStack::new(4);

        let exit = serve(&mut link, &mut stack, &ServerContext::default(), &cancel);

        // The reply never fit, so nothing went out, and the loop kept
        // polling until the token fired.
        assert_eq!(exit, ServeExit::Cancelled);
        assert!(stack.transmitted.is_empty());
    }

    #[test]
    fn test_serve_returns_when_cancelled_immediately() {
        let cancel = CancelToken::new();
        cancel.cancel();
        let mut link = FakeLink::new(Vec::new(), &cancel);
        let mut stack = FakeStack::new(APP_OFFSET);

        let exit = serve(&mut link, &mut stack, &ServerContext::default(), &cancel);

        assert_eq!(exit, ServeExit::Cancelled);
        assert!(stack.transmitted.is_empty());
    }

    #[test]
    fn test_serve_processes_queued_frames_then_exits() {
        let cancel = CancelToken::new();
        let (root_frame, root_len) = frame_with_payload(b"GET / HTTP/1.1");
        let (other_frame, other_len) = frame_with_payload(b"GET /about HTTP/1.1");
        let mut link = FakeLink::new(
            std::vec![root_frame[..root_len].to_vec(), other_frame[..other_len].to_vec()],
            &cancel,
        );
        let mut stack = FakeStack::new(APP_OFFSET);

        let exit = serve(&mut link, &mut stack, &ServerContext::default(), &cancel);

        assert_eq!(exit, ServeExit::Cancelled);
        assert_eq!(stack.transmitted.len(), 2);
        assert!(stack.transmitted[0].windows(12).any(|w| w == b"Hello world!"));
        assert!(stack.transmitted[1]
            .windows(20)
            .any(|w| w == b"Goodbye cruel world."));
    }

    #[test]
    fn test_wait_link_up_when_link_ready() {
        let cancel = CancelToken::new();
        let link = FakeLink::new(Vec::new(), &cancel);
        assert_eq!(wait_link_up(&link, &cancel), LinkWait::Up);
    }
}
