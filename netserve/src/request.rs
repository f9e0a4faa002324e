//! Request grammar.
//!
//! The responder speaks a deliberately tiny, case-sensitive,
//! length-prefixed grammar over the application payload. Rules are
//! tried in order and the first match wins:
//!
//! 1. `GET ` prefix, then `/ `: the one page in the root directory;
//! 2. `GET ` prefix, any other path: the one page *not* in the root
//!    directory;
//! 3. `echo ` prefix: the rest of the payload becomes the reply body
//!    verbatim, no parsing, no escaping (a demonstration endpoint, not
//!    a security boundary);
//! 4. anything else: 401.

/// Fixed 401 reply for payloads matching no request form.
pub const UNAUTHORIZED_PAGE: &[u8] =
    b"HTTP/1.0 401 Unauthorized\r\nContent-Type: text/html\r\n\r\n<h1>ERROR</h1>";

/// Fixed 200 reply for `GET / `.
pub const ROOT_PAGE: &[u8] =
    b"HTTP/1.0 200 OK\r\nContent-Type: text/html\r\n\r\n<h1>Hello world!</h1>";

/// Fixed 200 reply for `GET` of any other path.
pub const OTHER_PAGE: &[u8] =
    b"HTTP/1.0 200 OK\r\nContent-Type: text/html\r\n\r\n<h1>Goodbye cruel world.</h1>";

const GET_PREFIX: &[u8] = b"GET ";
const ECHO_PREFIX: &[u8] = b"echo ";

/// A classified request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    /// `GET / `: the root page.
    Root,
    /// `GET ` with any other path.
    OtherPath,
    /// `echo `: reply body starts `body_start` bytes into the
    /// payload. The grammar carries no length field, so the received
    /// frame length is the only bound on the echoed bytes.
    Echo {
        /// Offset of the echo body within the payload.
        body_start: usize,
    },
    /// No rule matched.
    Unauthorized,
}

impl Request {
    /// Classify the application payload. First matching rule wins.
    pub fn classify(payload: &[u8]) -> Self {
        if payload.starts_with(GET_PREFIX) {
            if payload[GET_PREFIX.len()..].starts_with(b"/ ") {
                Self::Root
            } else {
                Self::OtherPath
            }
        } else if payload.starts_with(ECHO_PREFIX) {
            Self::Echo {
                body_start: ECHO_PREFIX.len(),
            }
        } else {
            Self::Unauthorized
        }
    }

    /// The canned reply for this request, if it has one.
    ///
    /// `Echo` has none; its body comes from the payload itself.
    pub fn fixed_reply(&self) -> Option<&'static [u8]> {
        match self {
            Self::Root => Some(ROOT_PAGE),
            Self::OtherPath => Some(OTHER_PAGE),
            Self::Echo { .. } => None,
            Self::Unauthorized => Some(UNAUTHORIZED_PAGE),
        }
    }
}
