//! CLI definitions and command implementations.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod init;
pub mod serve;

/// Mock Wallet — scriptable wallet provider for dapp end-to-end tests.
#[derive(Debug, Parser)]
#[command(name = "mock-wallet")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate a default TOML configuration file.
    Init {
        /// Output path for the configuration file.
        #[arg(short, long, default_value = "config.toml")]
        output: PathBuf,

        /// Overwrite the file if it already exists.
        #[arg(long, default_value_t = false)]
        force: bool,
    },

    /// Start the wallet HTTP server.
    Serve {
        /// Path to the TOML configuration file.
        #[arg(short, long, env = "CONFIG", default_value = "config.toml")]
        config: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn init_defaults_to_config_toml() {
        let cli = Cli::try_parse_from(["mock-wallet", "init"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Init { ref output, force: false } if output.as_os_str() == "config.toml"
        ));
    }

    #[test]
    fn serve_takes_config_path() {
        let cli = Cli::try_parse_from(["mock-wallet", "serve", "-c", "wallet.toml"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Serve { ref config } if config.as_os_str() == "wallet.toml"
        ));
    }
}
