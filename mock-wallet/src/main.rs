//! Mock Wallet server
//!
//! Serves a scriptable EIP-1193 wallet over HTTP so end-to-end suites can
//! drive dapps without a real browser extension.
//!
//! ```sh
//! mock-wallet init            # Generate default config.toml
//! mock-wallet serve           # Start the server
//! ```

mod cmd;
mod signal;
#[cfg(feature = "telemetry")]
mod telemetry;

use clap::Parser;
use cmd::{Cli, Commands};

#[tokio::main]
#[allow(clippy::print_stderr)]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { output, force } => cmd::init::run(&output, force),
        Commands::Serve { config } => cmd::serve::run(&config).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
