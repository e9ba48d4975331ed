//! dgramsh console core
//!
//! Command dispatch, payload synthesis, and receive-side formatting for an
//! interactive UDP diagnostic console. The network stack itself stays
//! behind the [`DatagramStack`] trait; this crate only orchestrates socket
//! lifecycle calls and encodes/decodes payload bytes.

// ----------------------------------------------------------------------------
// Module Declarations
// ----------------------------------------------------------------------------

pub mod commands;
pub mod errors;
pub mod format;
pub mod payload;
pub mod stack;
pub mod types;

// ----------------------------------------------------------------------------
// Public API
// ----------------------------------------------------------------------------

pub use commands::UdpCommands;
pub use errors::{CommandError, Result, StackError};
pub use format::{OutputSink, ReceiveFormatter, SharedSink, RECEIVE_WINDOW};
pub use payload::{Payload, FILL_ALPHABET, HEX_CHUNK_BYTES};
pub use stack::{Datagram, DatagramStack, InboundMessage, OutboundMessage, ReceiveHandler};
pub use types::Endpoint;
