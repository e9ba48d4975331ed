//! Interactive line shell
//!
//! Reads one line at a time from stdin, tokenizes it on whitespace, and
//! hands the argument vector to the console. Results render as `Done` or
//! `Error: ...`; inbound datagram reports arrive on the shared stdout sink
//! from the stack's receive thread.

use std::io::{self, BufRead, Write};

use tracing::info;

use dgramsh_core::{OutputSink, UdpCommands};

use crate::stack::NetStack;

// ----------------------------------------------------------------------------
// Stdout Sink
// ----------------------------------------------------------------------------

/// Sink writing console output straight to stdout
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn output(&mut self, text: &str) {
        let mut stdout = io::stdout().lock();
        let _ = stdout.write_all(text.as_bytes());
        let _ = stdout.flush();
    }
}

// ----------------------------------------------------------------------------
// Shell
// ----------------------------------------------------------------------------

/// The interactive console loop
pub struct Shell {
    console: UdpCommands<NetStack>,
    prompt: String,
}

impl Shell {
    pub fn new(console: UdpCommands<NetStack>, prompt: String) -> Self {
        Self { console, prompt }
    }

    /// Run until EOF or an explicit `exit`/`quit`
    pub fn run(&mut self) -> io::Result<()> {
        info!("console ready; `help` lists commands, `exit` leaves");

        let stdin = io::stdin();
        let mut line = String::new();
        loop {
            self.print_prompt()?;
            line.clear();
            if stdin.lock().read_line(&mut line)? == 0 {
                break;
            }

            let args = tokenize(&line);
            if is_exit(&args) {
                break;
            }
            match self.console.process(&args) {
                Ok(()) => println!("Done"),
                Err(error) => println!("Error: {error}"),
            }
        }
        Ok(())
    }

    fn print_prompt(&self) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(self.prompt.as_bytes())?;
        stdout.flush()
    }
}

/// Split a raw input line into its argument vector
pub fn tokenize(line: &str) -> Vec<&str> {
    line.split_whitespace().collect()
}

fn is_exit(args: &[&str]) -> bool {
    matches!(args.first(), Some(&"exit" | &"quit"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_splits_on_whitespace() {
        assert_eq!(
            tokenize("send fe80::1 1234 hello"),
            vec!["send", "fe80::1", "1234", "hello"]
        );
        assert_eq!(tokenize("  bind\t::1   80 \r\n"), vec!["bind", "::1", "80"]);
    }

    #[test]
    fn test_tokenize_empty_line_yields_empty_argv() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \t \n").is_empty());
    }

    #[test]
    fn test_exit_detection() {
        assert!(is_exit(&["exit"]));
        assert!(is_exit(&["quit"]));
        assert!(!is_exit(&["send", "exit"]));
        assert!(!is_exit(&[]));
    }
}
