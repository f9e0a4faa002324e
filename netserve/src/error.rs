//! Dispatcher error types.

use core::fmt;

pub type Result<T> = core::result::Result<T, ServeError>;

/// Errors surfaced while producing a reply.
///
/// Protocol mismatches are not errors (the grammar has a default
/// rule), and "no frame available" is the steady state between
/// network events, not a fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServeError {
    /// Reply body does not fit in the frame buffer.
    ReplyTooLarge {
        /// Bytes the framed reply would need.
        needed: usize,
        /// Bytes available in the buffer.
        capacity: usize,
    },
}

impl fmt::Display for ServeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReplyTooLarge { needed, capacity } => {
                write!(f, "reply too large: {} bytes into {}", needed, capacity)
            }
        }
    }
}
