// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! CLI argument parsing and command definitions.
//!
//! - `serve`: start the HTTP server (default)
//! - `validate`: check the account seed file
//! - `hash-password`: print an Argon2 hash for a seed file

use std::net::IpAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

// =============================================================================
// Main CLI Structure
// =============================================================================

/// Estate access authentication service.
#[derive(Parser, Debug)]
#[command(
    name = "estate",
    author = "Sylvex <contact@sylvex.io>",
    version = estate_api::VERSION,
    about = "Authentication and role-based access service for estate management",
    long_about = None,
    propagate_version = true
)]
pub struct Cli {
    /// Server and token settings.
    #[command(flatten)]
    pub server: ServerArgs,

    /// Log level (trace, debug, info, warn, error)
    #[arg(
        short,
        long,
        default_value = "info",
        env = "ESTATE_LOG_LEVEL",
        global = true
    )]
    pub log_level: String,

    /// Log format (text, json, compact)
    #[arg(long, default_value = "text", env = "ESTATE_LOG_FORMAT", global = true)]
    pub log_format: LogFormat,

    /// Enable quiet mode (warnings and errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Settings shared by every command that touches the server or accounts.
#[derive(Args, Debug, Clone)]
pub struct ServerArgs {
    /// Address to bind
    #[arg(long, default_value = "0.0.0.0", env = "ESTATE_HOST", global = true)]
    pub host: IpAddr,

    /// Port to bind
    #[arg(short, long, default_value_t = 5000, env = "ESTATE_PORT", global = true)]
    pub port: u16,

    /// Token signing secret
    #[arg(long, env = "JWT_SECRET", hide_env_values = true, global = true)]
    pub jwt_secret: Option<String>,

    /// Refuse to start without JWT_SECRET instead of using the fallback secret
    #[arg(long, env = "ESTATE_REQUIRE_SECRET", global = true)]
    pub require_secret: bool,

    /// Token lifetime in days
    #[arg(long, default_value_t = 14, env = "ESTATE_TOKEN_TTL_DAYS", global = true)]
    pub token_ttl_days: i64,

    /// YAML file with seed accounts
    #[arg(short = 'u', long, env = "ESTATE_USERS_FILE", global = true)]
    pub users_file: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30, env = "ESTATE_REQUEST_TIMEOUT", global = true)]
    pub request_timeout: u64,
}

// =============================================================================
// Subcommands
// =============================================================================

/// Available subcommands for the estate CLI.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the HTTP server
    ///
    /// This is the default command when no subcommand is specified.
    Serve,

    /// Validate the account seed file
    ///
    /// Loads the seed file, hashes plaintext passwords and checks for
    /// duplicates without starting the server.
    Validate(ValidateArgs),

    /// Hash a password for use in a seed file
    #[command(name = "hash-password")]
    HashPassword(HashPasswordArgs),
}

/// Arguments for the `validate` command.
#[derive(Args, Debug, Clone, Default)]
pub struct ValidateArgs {
    /// Output format for validation results
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the `hash-password` command.
#[derive(Args, Debug, Clone)]
pub struct HashPasswordArgs {
    /// Password to hash
    #[arg(required_unless_present = "stdin")]
    pub password: Option<String>,

    /// Read the password from stdin
    #[arg(long)]
    pub stdin: bool,
}

// =============================================================================
// Enums
// =============================================================================

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON format for structured logging
    Json,
    /// Compact format for minimal output
    Compact,
}

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON format for programmatic parsing
    Json,
}

// =============================================================================
// Helper Methods
// =============================================================================

impl Cli {
    /// Parse CLI arguments from the command line.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective command, defaulting to `Serve` if none specified.
    pub fn effective_command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Serve)
    }

    /// Get the effective log level based on flags.
    pub fn effective_log_level(&self) -> &str {
        if self.quiet {
            "warn"
        } else if self.verbose {
            "debug"
        } else {
            &self.log_level
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command() {
        let cli = Cli::parse_from(["estate"]);
        assert!(cli.command.is_none());
        assert!(matches!(cli.effective_command(), Commands::Serve));
    }

    #[test]
    fn test_server_args_after_subcommand() {
        let cli = Cli::parse_from(["estate", "serve", "--port", "8081", "--token-ttl-days", "7"]);
        assert!(matches!(cli.command, Some(Commands::Serve)));
        assert_eq!(cli.server.port, 8081);
        assert_eq!(cli.server.token_ttl_days, 7);
    }

    #[test]
    fn test_secret_flags() {
        let cli = Cli::parse_from(["estate", "--jwt-secret", "s3cret", "--require-secret"]);
        assert_eq!(cli.server.jwt_secret.as_deref(), Some("s3cret"));
        assert!(cli.server.require_secret);
    }

    #[test]
    fn test_validate_command() {
        let cli = Cli::parse_from(["estate", "validate", "-f", "json", "-u", "users.yaml"]);
        match cli.command {
            Some(Commands::Validate(args)) => assert_eq!(args.format, OutputFormat::Json),
            other => panic!("Expected Validate command, got {:?}", other),
        }
        assert_eq!(cli.server.users_file, Some(PathBuf::from("users.yaml")));
    }

    #[test]
    fn test_hash_password_command() {
        let cli = Cli::parse_from(["estate", "hash-password", "hunter2"]);
        match cli.command {
            Some(Commands::HashPassword(args)) => {
                assert_eq!(args.password.as_deref(), Some("hunter2"));
                assert!(!args.stdin);
            }
            other => panic!("Expected HashPassword command, got {:?}", other),
        }
    }

    #[test]
    fn test_quiet_and_verbose() {
        assert_eq!(Cli::parse_from(["estate", "-q"]).effective_log_level(), "warn");
        assert_eq!(Cli::parse_from(["estate", "-v"]).effective_log_level(), "debug");
        assert_eq!(Cli::parse_from(["estate", "-l", "trace"]).effective_log_level(), "trace");
    }
}
