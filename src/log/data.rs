use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Severity of a log record, ordered from least to most severe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    #[default]
    Info,
    Warning,
    Error,
}

impl LogLevel {
    /// Tag written between brackets in the log files.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARN",
            Self::Error => "ERROR",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for LogLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            other => anyhow::bail!("Unknown log level '{other}'"),
        }
    }
}

/// A single log record, stamped when it is created rather than when the
/// actor gets around to writing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogMessage {
    pub at: DateTime<Utc>,
    pub level: LogLevel,
    /// Dotted name of the component that logged it, e.g. `app.article`
    pub scope: &'static str,
    pub message: String,
}

impl LogMessage {
    pub fn now(level: LogLevel, scope: &'static str, message: String) -> Self {
        Self {
            at: Utc::now(),
            level,
            scope,
            message,
        }
    }
}

impl fmt::Display for LogMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] [{}] [{}] {}",
            self.at.format("%Y-%m-%d %H:%M:%S%.3f UTC"),
            self.level,
            self.scope,
            self.message
        )
    }
}
