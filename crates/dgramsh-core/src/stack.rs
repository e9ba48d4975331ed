//! Datagram stack abstraction
//!
//! The console never manages sockets itself; it orchestrates calls into a
//! collaborator stack behind the [`DatagramStack`] trait. Inbound delivery
//! happens through a boxed callback registered at `open`, which captures the
//! receive formatter directly instead of threading an untyped context
//! pointer.

use crate::errors::StackError;
use crate::types::Endpoint;

// ----------------------------------------------------------------------------
// Message Traits
// ----------------------------------------------------------------------------

/// A growable outbound message buffer allocated by the stack
///
/// Payload synthesis appends into one of these; ownership transfers to the
/// stack on send, and dropping a partially built message releases it.
pub trait OutboundMessage {
    /// Append bytes to the end of the message
    fn append(&mut self, bytes: &[u8]) -> Result<(), StackError>;

    /// Current message length in bytes
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl OutboundMessage for Vec<u8> {
    fn append(&mut self, bytes: &[u8]) -> Result<(), StackError> {
        self.extend_from_slice(bytes);
        Ok(())
    }

    fn len(&self) -> usize {
        Vec::len(self)
    }
}

/// An inbound message delivered by the stack
///
/// The stack owns the message; callbacks read from it and must not retain
/// it past their own return.
pub trait InboundMessage {
    /// Total message length in bytes
    fn len(&self) -> usize;

    /// Read offset where the payload starts
    fn offset(&self) -> usize;

    /// Copy bytes starting at `offset` into `buf`, returning the count copied
    fn read(&self, offset: usize, buf: &mut [u8]) -> usize;

    /// Bytes remaining past the read offset
    fn unread_len(&self) -> usize {
        self.len().saturating_sub(self.offset())
    }
}

// ----------------------------------------------------------------------------
// Inbound Datagram
// ----------------------------------------------------------------------------

/// A plain buffer-backed inbound message
///
/// Stacks that hold whole datagrams in memory deliver these; the offset is
/// nonzero only when the buffer still carries headers ahead of the payload.
#[derive(Debug, Clone)]
pub struct Datagram {
    data: Vec<u8>,
    offset: usize,
}

impl Datagram {
    /// Create a datagram whose payload starts at the beginning of the buffer
    pub fn new(data: Vec<u8>) -> Self {
        Self { data, offset: 0 }
    }

    /// Create a datagram whose payload starts at `offset`
    pub fn with_offset(data: Vec<u8>, offset: usize) -> Self {
        Self { data, offset }
    }
}

impl InboundMessage for Datagram {
    fn len(&self) -> usize {
        self.data.len()
    }

    fn offset(&self) -> usize {
        self.offset
    }

    fn read(&self, offset: usize, buf: &mut [u8]) -> usize {
        let Some(available) = self.data.get(offset..) else {
            return 0;
        };
        let count = available.len().min(buf.len());
        buf[..count].copy_from_slice(&available[..count]);
        count
    }
}

// ----------------------------------------------------------------------------
// Stack Trait
// ----------------------------------------------------------------------------

/// Callback invoked by the stack for each inbound datagram
pub type ReceiveHandler = Box<dyn FnMut(&dyn InboundMessage, Endpoint) + Send>;

/// The collaborator network stack behind one datagram socket
///
/// The console owns exactly one `Socket` per dispatcher instance, created in
/// the unopened state via `Default`. The console does not pre-validate
/// socket state: operating on an unopened handle surfaces whatever error
/// the stack defines for that case.
pub trait DatagramStack {
    /// Socket handle; `Default` is the unopened state
    type Socket: Default;

    /// Outbound message buffer type
    type Message: OutboundMessage;

    /// Open the socket, registering the inbound delivery callback
    fn open(&mut self, socket: &mut Self::Socket, handler: ReceiveHandler)
        -> Result<(), StackError>;

    /// Bind the socket to a local endpoint
    fn bind(&mut self, socket: &mut Self::Socket, local: Endpoint) -> Result<(), StackError>;

    /// Connect the socket to a default peer for subsequent sends
    fn connect(&mut self, socket: &mut Self::Socket, peer: Endpoint) -> Result<(), StackError>;

    /// Release the socket
    fn close(&mut self, socket: &mut Self::Socket) -> Result<(), StackError>;

    /// Allocate a fresh outbound message, or `None` on exhaustion
    fn new_message(&mut self) -> Option<Self::Message>;

    /// Send a message to `peer`, or to the connected default when `None`
    ///
    /// Ownership of the message transfers to the stack.
    fn send(
        &mut self,
        socket: &mut Self::Socket,
        message: Self::Message,
        peer: Option<Endpoint>,
    ) -> Result<(), StackError>;
}
