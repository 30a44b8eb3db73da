//! Volley Server Binary
//!
//! Self-hosted console supervising the `hey` load generator.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use volley_config::{ConfigLoader, VolleyConfig};
use volley_server::Server;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Server bind address
    #[arg(short, long)]
    bind: Option<String>,

    /// Server port
    #[arg(short, long)]
    port: Option<u16>,

    /// Load-generator binary
    #[arg(long)]
    binary: Option<String>,

    /// Results directory
    #[arg(long)]
    results_dir: Option<String>,

    /// Print a sample configuration and exit
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Environment from a local .env file, if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if cli.print_config {
        print!("{}", VolleyConfig::generate_sample());
        return Ok(());
    }

    let loader = ConfigLoader::new();
    let mut config = loader.load(cli.config.as_deref())?;
    apply_cli_overrides(&mut config, &cli);
    config.validate_all()?;

    let server = Server::new(config)?;
    server.start().await
}

/// Apply CLI argument overrides to configuration
fn apply_cli_overrides(config: &mut VolleyConfig, cli: &Cli) {
    if let Some(bind) = &cli.bind {
        config.server.bind_address = bind.clone();
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(binary) = &cli.binary {
        config.runner.binary = binary.clone();
    }
    if let Some(results_dir) = &cli.results_dir {
        config.storage.results_dir = results_dir.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_win_over_loaded_config() {
        let mut config = VolleyConfig::default();
        let cli = Cli {
            config: None,
            bind: Some("0.0.0.0".to_string()),
            port: Some(9000),
            binary: Some("/opt/hey".to_string()),
            results_dir: Some("/srv/volley".to_string()),
            print_config: false,
        };

        apply_cli_overrides(&mut config, &cli);

        assert_eq!(config.server.bind_address, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.runner.binary, "/opt/hey");
        assert_eq!(config.storage.results_dir, "/srv/volley");
    }

    #[test]
    fn test_absent_cli_flags_leave_config_untouched() {
        let mut config = VolleyConfig::default();
        let defaults = config.clone();
        let cli = Cli {
            config: None,
            bind: None,
            port: None,
            binary: None,
            results_dir: None,
            print_config: false,
        };

        apply_cli_overrides(&mut config, &cli);

        assert_eq!(config.server.bind_address, defaults.server.bind_address);
        assert_eq!(config.server.port, defaults.server.port);
        assert_eq!(config.runner.binary, defaults.runner.binary);
        assert_eq!(config.storage.results_dir, defaults.storage.results_dir);
    }
}
