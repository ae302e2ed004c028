//! Command-line / environment configuration.
//!
//! Every option can come from a flag or an environment variable. Resolving
//! the parsed [`Args`] into a [`Config`] is pure so it can be tested without
//! touching the process environment.

use std::{path::PathBuf, time::Duration};

use chrono::NaiveTime;
use clap::{ArgAction, Parser, builder::BoolishValueParser};
use thiserror::Error;

/// Port used when none is given and the port is not required
pub const DEFAULT_PORT: u16 = 5679;

#[derive(Parser, Debug, Clone)]
#[command(name = "donation-relay-server")]
#[command(about = "Relay hub for donation alerts over WebSocket", long_about = None)]
pub struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PORT")]
    pub port: Option<u16>,

    /// Fail to start when no port is given instead of using the default
    /// (true/false, 1/0, yes/no, on/off)
    #[arg(
        long,
        env = "DONATION_RELAY_REQUIRE_PORT",
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value = "false",
        default_missing_value = "true",
        value_parser = BoolishValueParser::new(),
    )]
    pub require_port: bool,

    /// Directory holding the snapshot file and the audit log
    #[arg(short = 'd', long, env = "DONATION_RELAY_DATA_DIR", default_value = ".")]
    pub data_dir: PathBuf,

    /// Local time of the daily automatic reset (HH:MM)
    #[arg(long, env = "DONATION_RELAY_RESET_AT", default_value = "03:00")]
    pub reset_at: String,

    /// Seconds between channel status log lines (0 disables)
    #[arg(long, env = "DONATION_RELAY_STATUS_INTERVAL_SECS", default_value_t = 60)]
    pub status_interval_secs: u64,
}

/// What to do when no port is configured
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortPolicy {
    DefaultTo(u16),
    Required,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("no port configured (set PORT or pass --port)")]
    MissingPort,

    #[error("invalid reset time '{0}', expected HH:MM")]
    InvalidResetTime(String),
}

/// Validated server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub reset_at: NaiveTime,
    /// `None` disables the status reporter
    pub status_interval: Option<Duration>,
}

impl Config {
    pub fn from_args(args: Args) -> Result<Self, ConfigError> {
        let policy = if args.require_port {
            PortPolicy::Required
        } else {
            PortPolicy::DefaultTo(DEFAULT_PORT)
        };

        Ok(Self {
            port: resolve_port(args.port, policy)?,
            reset_at: parse_reset_time(&args.reset_at)?,
            status_interval: (args.status_interval_secs > 0)
                .then(|| Duration::from_secs(args.status_interval_secs)),
            host: args.host,
            data_dir: args.data_dir,
        })
    }
}

pub fn resolve_port(port: Option<u16>, policy: PortPolicy) -> Result<u16, ConfigError> {
    match (port, policy) {
        (Some(port), _) => Ok(port),
        (None, PortPolicy::DefaultTo(default)) => Ok(default),
        (None, PortPolicy::Required) => Err(ConfigError::MissingPort),
    }
}

fn parse_reset_time(text: &str) -> Result<NaiveTime, ConfigError> {
    NaiveTime::parse_from_str(text.trim(), "%H:%M")
        .map_err(|_| ConfigError::InvalidResetTime(text.to_string()))
}
