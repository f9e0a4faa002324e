//! EmberPi Frame Dispatcher
//!
//! Polling network-frame dispatch loop for a bare-metal one-shot web
//! responder: spin until the Ethernet controller hands over a received
//! frame, ask the protocol stack where the application payload starts,
//! classify it against a tiny fixed grammar, and hand a framed reply
//! back for transmission.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Dispatcher Structure                        │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                                                                 │
//! │  ┌────────────┐  ┌────────────┐  ┌────────────┐                 │
//! │  │ Collabor-  │  │  Request   │  │   Serve    │                 │
//! │  │ ator seams │  │  Grammar   │  │   Loop     │                 │
//! │  │            │  │            │  │            │                 │
//! │  │EthernetLink│  │ classify   │  │ serve      │                 │
//! │  │ProtocolStk │  │ responses  │  │ serve_frame│                 │
//! │  └────────────┘  └────────────┘  └────────────┘                 │
//! │                                                                 │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use emberpi_netserve::{console, serve, CancelToken, ServerContext};
//!
//! console::init(uart_send);
//! let ctx = ServerContext::default();
//! let cancel = CancelToken::new();
//!
//! // Never returns unless `cancel` fires; this loop owns the core.
//! serve(&mut link, &mut stack, &ctx, &cancel);
//! ```
//!
//! The dispatcher is stateless across iterations: no sessions, no
//! queued replies, no retained pointers into the frame buffer.

#![no_std]
#![forbid(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod console;
mod error;
mod link;
mod request;
mod serve;
mod stack;
mod types;

pub use error::{Result, ServeError};
pub use link::{EthernetLink, Frame};
pub use request::{Request, OTHER_PAGE, ROOT_PAGE, UNAUTHORIZED_PAGE};
pub use serve::{
    serve, serve_frame, wait_link_up, CancelToken, LinkWait, ServeExit, ServerContext,
};
pub use stack::ProtocolStack;
pub use types::{Ipv4Addr, MacAddress};
