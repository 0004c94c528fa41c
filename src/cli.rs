//! Command-line interface definitions using clap
//!
//! This module defines the CLI structure for geominder using clap's derive macros.
//! Flags override values loaded from the config file and `GEOMINDER__*`
//! environment variables.

use clap::{Parser, Subcommand};

use crate::config::StaticConfig;

/// Geominder - IP geolocation lookup service
#[derive(Parser, Debug)]
#[command(name = "geominder")]
#[command(version)]
#[command(about = "Resolve IP addresses to country and coordinates over HTTP", long_about = None)]
pub struct Cli {
    /// Config file path (default: geominder.toml, optional)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    /// MaxMind City database path
    #[arg(long)]
    pub db: Option<String>,

    /// Listen address
    #[arg(long)]
    pub host: Option<String>,

    /// Listen port
    #[arg(long, short = 'p')]
    pub port: Option<u16>,

    /// Disable the response cache
    #[arg(long)]
    pub no_cache: bool,

    /// Response cache capacity in megabytes
    #[arg(long)]
    pub cache_size: Option<u64>,

    /// Response cache entry lifetime in seconds
    #[arg(long)]
    pub cache_ttl: Option<u64>,

    /// Access-Control-Allow-Origin value (empty string omits the header)
    #[arg(long)]
    pub origin: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

/// Configuration management commands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Generate {
        /// Output path (default: stdout)
        output_path: Option<String>,
    },
}

impl Cli {
    /// Apply command-line overrides on top of the loaded configuration.
    pub fn apply_overrides(&self, config: &mut StaticConfig) {
        if let Some(db) = &self.db {
            config.database.path = db.clone();
        }
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if self.no_cache {
            config.cache.enabled = false;
        }
        if let Some(size) = self.cache_size {
            config.cache.max_size_mb = size;
        }
        if let Some(ttl) = self.cache_ttl {
            config.cache.ttl_secs = ttl;
        }
        if let Some(origin) = &self.origin {
            config.cors.origin_policy = origin.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_args_defaults_to_serve() {
        let cli = Cli::try_parse_from(["geominder"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.no_cache);

        let mut config = StaticConfig::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config, StaticConfig::default());
    }

    #[test]
    fn test_overrides_applied() {
        let cli = Cli::try_parse_from([
            "geominder",
            "--db",
            "/data/city.mmdb",
            "--host",
            "127.0.0.1",
            "-p",
            "9000",
            "--no-cache",
            "--cache-size",
            "64",
            "--cache-ttl",
            "60",
            "--origin",
            "",
        ])
        .unwrap();

        let mut config = StaticConfig::default();
        cli.apply_overrides(&mut config);

        assert_eq!(config.database.path, "/data/city.mmdb");
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9000);
        assert!(!config.cache.enabled);
        assert_eq!(config.cache.max_size_mb, 64);
        assert_eq!(config.cache.ttl_secs, 60);
        assert_eq!(config.cors.origin_policy, "");
    }

    #[test]
    fn test_config_generate_subcommand() {
        let cli = Cli::try_parse_from(["geominder", "config", "generate", "out.toml"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::Config {
                action: ConfigCommands::Generate {
                    output_path: Some("out.toml".to_string())
                }
            })
        );
    }

    #[test]
    fn test_global_config_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["geominder", "serve", "-c", "custom.toml"]).unwrap();
        assert_eq!(cli.command, Some(Commands::Serve));
        assert_eq!(cli.config.as_deref(), Some("custom.toml"));
    }

    #[test]
    fn test_invalid_port_rejected() {
        assert!(Cli::try_parse_from(["geominder", "--port", "70000"]).is_err());
    }
}
