//! dgramsh - interactive UDP diagnostic console

use std::sync::{Arc, Mutex};

use clap::Parser;
use tracing::info;

use dgramsh_cli::{
    cli::Cli,
    config::AppConfig,
    error::Result,
    shell::{Shell, StdoutSink},
    stack::NetStack,
};
use dgramsh_core::{SharedSink, UdpCommands};

fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Load configuration
    let config = AppConfig::load(cli.config.as_deref())?;

    // Initialize logging
    setup_logging(cli.verbose || config.verbose);

    // Wire the console to the host network stack
    let sink: SharedSink = Arc::new(Mutex::new(StdoutSink));
    let console = UdpCommands::new(NetStack::new(), sink);

    let mut shell = Shell::new(console, config.prompt.clone());
    shell.run()?;

    info!("dgramsh exited");
    Ok(())
}

/// Setup logging based on verbosity level
fn setup_logging(verbose: bool) {
    let log_level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}
