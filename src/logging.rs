use std::str::FromStr;

use color_eyre::eyre::{Result, eyre};
use tracing::Level;

use crate::config::LoggingConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Plain,
    Json,
}

impl FromStr for LogFormat {
    type Err = color_eyre::eyre::Report;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "plain" | "text" => Ok(LogFormat::Plain),
            "json" => Ok(LogFormat::Json),
            other => Err(eyre!("unknown log format `{other}`, expected plain or json")),
        }
    }
}

pub fn parse_level(level: &str) -> Result<Level> {
    Level::from_str(level).map_err(|e| eyre!("invalid log level `{level}`: {e}"))
}

/// Install the global tracing subscriber. Call once, before the server starts.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let level = parse_level(&config.level)?;
    let format: LogFormat = config.format.parse()?;

    let builder = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false);

    let installed = match format {
        LogFormat::Plain => tracing::subscriber::set_global_default(builder.finish()),
        LogFormat::Json => {
            tracing::subscriber::set_global_default(builder.json().with_ansi(false).finish())
        }
    };
    installed.map_err(|e| eyre!("failed to set tracing subscriber: {e}"))
}
