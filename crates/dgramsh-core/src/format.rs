//! Receive-side formatting
//!
//! The stack invokes the registered callback for every inbound datagram;
//! the formatter turns it into one human-readable line on the output sink.
//! Formatting is best-effort and never fails outward.

use std::sync::{Arc, Mutex, PoisonError};

use tracing::trace;

use crate::stack::{InboundMessage, ReceiveHandler};
use crate::types::Endpoint;

/// Largest unread window rendered from one inbound datagram
pub const RECEIVE_WINDOW: usize = 1500;

// ----------------------------------------------------------------------------
// Output Sink
// ----------------------------------------------------------------------------

/// Text sink the console writes command listings and receive reports to
pub trait OutputSink: Send {
    /// Write raw text; line terminators are the caller's responsibility
    fn output(&mut self, text: &str);
}

/// Shared handle to the console's sink
pub type SharedSink = Arc<Mutex<dyn OutputSink>>;

// ----------------------------------------------------------------------------
// Receive Formatter
// ----------------------------------------------------------------------------

/// Formats inbound datagrams onto the output sink
///
/// Registered as the stack's delivery callback at `open`; reads at most
/// [`RECEIVE_WINDOW`] unread bytes, truncates the displayed text at the
/// first NUL, and emits `"<n> bytes from <addr> <port> <text>\r\n"`.
pub struct ReceiveFormatter {
    sink: SharedSink,
}

impl ReceiveFormatter {
    /// Create a formatter writing to the given sink
    pub fn new(sink: SharedSink) -> Self {
        Self { sink }
    }

    /// Box this formatter up as a stack delivery callback
    pub fn into_handler(self) -> ReceiveHandler {
        Box::new(move |message, peer| self.handle(message, peer))
    }

    /// Report one inbound datagram
    pub fn handle(&self, message: &dyn InboundMessage, peer: Endpoint) {
        let unread = message.unread_len();
        let mut window = [0u8; RECEIVE_WINDOW];
        let count = message.read(message.offset(), &mut window);

        let text = &window[..count];
        let text = match text.iter().position(|&byte| byte == 0) {
            Some(nul) => &text[..nul],
            None => text,
        };
        let text = String::from_utf8_lossy(text);

        trace!(bytes = unread, peer = %peer, "inbound datagram");

        let line = format!("{} bytes from {} {} {}\r\n", unread, peer.addr, peer.port, text);
        self.sink
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .output(&line);
    }
}
