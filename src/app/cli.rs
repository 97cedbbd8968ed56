//! Command-line arguments and their merge with the configuration file

use crate::app::config::{validate_identity, AppConfig, ConfigResult};
use crate::core::logging::LogFormat;
use clap::{ArgAction, Parser};
use std::io::IsTerminal;
use std::path::PathBuf;

/// Identity used when neither the command line nor the config file names one
pub const DEFAULT_IDENTITY: &str = "msgbridge";

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "msgbridge")]
#[command(about = "Bridge broker deliveries onto a single ordered event loop")]
#[command(version = crate::core::version::long_version())]
pub struct Args {
    /// Configuration file path
    #[arg(short = 'c', long = "config-file", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Identity tag; names the queue and prefixes the consumer tag
    #[arg(short = 'i', long = "identity", value_name = "TAG")]
    pub identity: Option<String>,

    /// Log level
    #[arg(
        short = 'l',
        long = "log-level",
        value_name = "LEVEL",
        value_parser = ["trace", "debug", "info", "warn", "error", "off"]
    )]
    pub log_level: Option<String>,

    /// Log output format
    #[arg(
        short = 'o',
        long = "log-format",
        value_name = "FORMAT",
        value_parser = ["text", "ext", "json"]
    )]
    pub log_format: Option<String>,

    /// Log file path
    #[arg(short = 'f', long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Disable colored output
    #[arg(long = "no-color", action = ArgAction::SetTrue)]
    pub no_color: bool,

    /// Cancel the consumer (soft shutdown) instead of closing the connection
    #[arg(long = "soft", action = ArgAction::SetTrue)]
    pub soft: bool,

    /// Payloads to publish, one delivery each
    #[arg(value_name = "PAYLOAD")]
    pub payloads: Vec<String>,
}

/// Effective settings after merging CLI arguments over the config file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub identity: String,
    pub log_level: String,
    pub log_format: LogFormat,
    pub log_file: Option<PathBuf>,
    pub color: bool,
    pub high_water_mark: usize,
    pub soft: bool,
    pub payloads: Vec<String>,
}

impl Args {
    /// Merge with `config`; command-line values take precedence
    ///
    /// Color defaults to whether stdout is a terminal.
    pub fn resolve(self, config: AppConfig) -> ConfigResult<Settings> {
        let identity = self
            .identity
            .or(config.identity)
            .unwrap_or_else(|| DEFAULT_IDENTITY.to_string());
        validate_identity(&identity)?;

        let log_format = match self.log_format.as_deref() {
            Some(name) => LogFormat::parse_or_default(Some(name)),
            None => config.logging.format.unwrap_or_default(),
        };

        let color = !self.no_color
            && config
                .logging
                .color
                .unwrap_or_else(|| std::io::stdout().is_terminal());

        Ok(Settings {
            identity,
            log_level: self
                .log_level
                .or(config.logging.level)
                .unwrap_or_else(|| "info".to_string()),
            log_format,
            log_file: self.log_file.or(config.logging.file),
            color,
            high_water_mark: config.dispatch.high_water_mark,
            soft: self.soft,
            payloads: self.payloads,
        })
    }
}
