//! Error types for the dgramsh console core
//!
//! Two layers: `StackError` is the collaborator stack's own taxonomy,
//! reported verbatim through command results; `CommandError` adds the
//! failures the console itself detects (argument validation, unknown
//! keywords, buffer exhaustion).

use thiserror::Error;

// ----------------------------------------------------------------------------
// Stack Errors
// ----------------------------------------------------------------------------

/// Failures reported by the datagram stack collaborator
///
/// The dispatcher never reinterprets these; they pass through command
/// results unchanged.
#[derive(Debug, Error)]
pub enum StackError {
    #[error("socket is not open")]
    NotOpen,

    #[error("socket is already open")]
    AlreadyOpen,

    #[error("socket has no connected peer")]
    NoPeer,

    #[error("out of message buffers")]
    NoBufs,

    #[error("network I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// ----------------------------------------------------------------------------
// Command Errors
// ----------------------------------------------------------------------------

/// Error type returned by console command processing
#[derive(Debug, Error)]
pub enum CommandError {
    /// Wrong argument count, or an argument that failed to parse
    #[error("invalid arguments: {reason}")]
    InvalidArgs { reason: String },

    /// First token did not match any registered command keyword
    #[error("unknown command: {keyword}")]
    UnknownCommand { keyword: String },

    /// The stack could not allocate a socket or message buffer
    #[error("resource exhausted: {reason}")]
    Exhausted { reason: String },

    /// Collaborator failure, reported verbatim
    #[error(transparent)]
    Stack(#[from] StackError),
}

impl CommandError {
    /// Create an invalid-arguments error with a reason
    pub fn invalid_args<T: Into<String>>(reason: T) -> Self {
        CommandError::InvalidArgs {
            reason: reason.into(),
        }
    }

    /// Create an unknown-command error for a keyword
    pub fn unknown_command<T: Into<String>>(keyword: T) -> Self {
        CommandError::UnknownCommand {
            keyword: keyword.into(),
        }
    }

    /// Create a resource-exhaustion error with a reason
    pub fn exhausted<T: Into<String>>(reason: T) -> Self {
        CommandError::Exhausted {
            reason: reason.into(),
        }
    }
}

// ----------------------------------------------------------------------------
// Type Aliases
// ----------------------------------------------------------------------------

pub type Result<T> = core::result::Result<T, CommandError>;
