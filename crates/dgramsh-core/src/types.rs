//! Core value types for the dgramsh console
//!
//! Endpoints are parsed fresh from argument strings on every command
//! invocation and never retained between commands.

use core::fmt;
use std::net::Ipv6Addr;

use serde::{Deserialize, Serialize};

use crate::errors::CommandError;

// ----------------------------------------------------------------------------
// Endpoint
// ----------------------------------------------------------------------------

/// An (address, port) pair naming one datagram endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Endpoint {
    pub addr: Ipv6Addr,
    pub port: u16,
}

impl Endpoint {
    /// Create a new endpoint from an address and port
    pub fn new(addr: Ipv6Addr, port: u16) -> Self {
        Self { addr, port }
    }

    /// Parse an endpoint from two argument strings
    ///
    /// The port is mapped through `u16` faithfully: values outside
    /// `0..=65535` are rejected rather than truncated.
    pub fn parse(addr: &str, port: &str) -> Result<Self, CommandError> {
        let addr = addr
            .parse::<Ipv6Addr>()
            .map_err(|_| CommandError::invalid_args(format!("malformed address `{addr}`")))?;
        let port = port
            .parse::<u16>()
            .map_err(|_| CommandError::invalid_args(format!("malformed port `{port}`")))?;
        Ok(Self { addr, port })
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.addr, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_parse_valid() {
        let endpoint = Endpoint::parse("fe80::1", "1234").unwrap();
        assert_eq!(endpoint.addr, "fe80::1".parse::<Ipv6Addr>().unwrap());
        assert_eq!(endpoint.port, 1234);
    }

    #[test]
    fn test_endpoint_parse_port_bounds() {
        assert!(Endpoint::parse("::1", "0").is_ok());
        assert!(Endpoint::parse("::1", "65535").is_ok());
        assert!(matches!(
            Endpoint::parse("::1", "65536"),
            Err(CommandError::InvalidArgs { .. })
        ));
        assert!(matches!(
            Endpoint::parse("::1", "-1"),
            Err(CommandError::InvalidArgs { .. })
        ));
    }

    #[test]
    fn test_endpoint_parse_malformed_address() {
        assert!(matches!(
            Endpoint::parse("not-an-address", "1"),
            Err(CommandError::InvalidArgs { .. })
        ));
    }

    #[test]
    fn test_endpoint_display() {
        let endpoint = Endpoint::parse("fe80::1", "1234").unwrap();
        assert_eq!(endpoint.to_string(), "fe80::1:1234");
    }
}
