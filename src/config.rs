//! Configuration and CLI argument handling

use std::time::Duration;
use chrono::format::{Item, StrftimeItems};
use clap::Parser;

use crate::state::BoundaryPolicy;

/// CLI argument parsing structure
#[derive(Debug, Clone, Parser)]
#[command(name = "countdown-widget")]
#[command(about = "A countdown timer with a live clock, controlled over a local HTTP API")]
#[command(version = "1.0.0")]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Countdown tick interval in milliseconds
    #[arg(long, default_value = "1000", value_parser = clap::value_parser!(u64).range(1..))]
    pub tick_ms: u64,

    /// How the countdown treats reaching zero
    #[arg(long, value_enum, default_value_t = BoundaryPolicy::Strict)]
    pub boundary: BoundaryPolicy,

    /// strftime format of the live clock label
    #[arg(long, default_value = "%H:%M:%S", value_parser = parse_clock_format)]
    pub clock_format: String,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Get the countdown tick interval
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

fn parse_clock_format(format: &str) -> Result<String, String> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(format!("invalid clock format: {:?}", format));
    }
    Ok(format.to_string())
}
