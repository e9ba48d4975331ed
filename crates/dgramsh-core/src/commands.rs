//! Command dispatch for the dgramsh console
//!
//! One `UdpCommands` instance owns one socket handle for its whole life.
//! Commands run synchronously to completion; the only asynchronous path is
//! the receive callback registered at `open`, which touches the sink and
//! never the socket handle.

use std::sync::PoisonError;

use tracing::debug;

use crate::errors::{CommandError, Result};
use crate::format::{ReceiveFormatter, SharedSink};
use crate::payload::Payload;
use crate::stack::DatagramStack;
use crate::types::Endpoint;

type Handler<S> = fn(&mut UdpCommands<S>, &[&str]) -> Result<()>;

// ----------------------------------------------------------------------------
// Command Dispatcher
// ----------------------------------------------------------------------------

/// Dispatches console commands against one datagram socket
pub struct UdpCommands<S: DatagramStack> {
    stack: S,
    socket: S::Socket,
    sink: SharedSink,
}

impl<S: DatagramStack> UdpCommands<S> {
    /// Registration order defines the `help` listing order.
    const COMMANDS: [(&'static str, Handler<S>); 6] = [
        ("help", Self::process_help),
        ("bind", Self::process_bind),
        ("close", Self::process_close),
        ("connect", Self::process_connect),
        ("open", Self::process_open),
        ("send", Self::process_send),
    ];

    /// Create a dispatcher with an unopened socket handle
    pub fn new(stack: S, sink: SharedSink) -> Self {
        Self {
            stack,
            socket: S::Socket::default(),
            sink,
        }
    }

    /// Process one tokenized command line
    ///
    /// Empty input prints the command list and fails with invalid
    /// arguments; an unrecognized keyword is a parse failure.
    pub fn process(&mut self, args: &[&str]) -> Result<()> {
        let Some((&keyword, rest)) = args.split_first() else {
            self.process_help(&[])?;
            return Err(CommandError::invalid_args("missing command"));
        };

        for (name, handler) in Self::COMMANDS {
            if name == keyword {
                debug!(command = keyword, "dispatching");
                return handler(self, rest);
            }
        }
        Err(CommandError::unknown_command(keyword))
    }

    fn process_help(&mut self, _args: &[&str]) -> Result<()> {
        let mut sink = self.sink.lock().unwrap_or_else(PoisonError::into_inner);
        for (name, _) in Self::COMMANDS {
            sink.output(&format!("{name}\r\n"));
        }
        Ok(())
    }

    fn process_bind(&mut self, args: &[&str]) -> Result<()> {
        let local = parse_endpoint_args(args)?;
        self.stack.bind(&mut self.socket, local)?;
        Ok(())
    }

    fn process_connect(&mut self, args: &[&str]) -> Result<()> {
        let peer = parse_endpoint_args(args)?;
        self.stack.connect(&mut self.socket, peer)?;
        Ok(())
    }

    fn process_close(&mut self, _args: &[&str]) -> Result<()> {
        self.stack.close(&mut self.socket)?;
        Ok(())
    }

    fn process_open(&mut self, _args: &[&str]) -> Result<()> {
        let formatter = ReceiveFormatter::new(self.sink.clone());
        self.stack.open(&mut self.socket, formatter.into_handler())?;
        Ok(())
    }

    fn process_send(&mut self, args: &[&str]) -> Result<()> {
        if args.is_empty() || args.len() > 4 {
            return Err(CommandError::invalid_args("expected 1 to 4 arguments"));
        }

        let mut cursor = 0;
        let mut destination = None;
        if args.len() > 2 {
            destination = Some(Endpoint::parse(args[0], args[1])?);
            cursor = 2;
        }

        let payload = if args.len() == 2 || args.len() == 4 {
            let value = args[cursor + 1];
            match args[cursor] {
                "-s" => Payload::AutoSize(parse_count(value)?),
                "-x" => Payload::Hex(value),
                "-t" => Payload::Text(value),
                // An unrecognized flag falls through as plain text.
                _ => Payload::Text(value),
            }
        } else {
            Payload::Text(args[cursor])
        };

        let mut message = self
            .stack
            .new_message()
            .ok_or_else(|| CommandError::exhausted("no outbound message buffers"))?;
        payload.encode_into(&mut message)?;
        self.stack.send(&mut self.socket, message, destination)?;
        Ok(())
    }
}

fn parse_endpoint_args(args: &[&str]) -> Result<Endpoint> {
    match *args {
        [addr, port] => Endpoint::parse(addr, port),
        _ => Err(CommandError::invalid_args("expected <address> <port>")),
    }
}

fn parse_count(value: &str) -> Result<u16> {
    value
        .parse::<u16>()
        .map_err(|_| CommandError::invalid_args(format!("malformed length `{value}`")))
}
