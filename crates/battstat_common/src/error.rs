//! Error types for battstat.

use thiserror::Error;

/// Environment failures while obtaining the registry dump. All are fatal.
#[derive(Error, Debug)]
pub enum CollectError {
    #[error("Unsupported system or could not execute ioreg.")]
    Unsupported {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not get battery information from ioreg.")]
    EmptyOutput { command: String },

    #[error("Could not read battery dump {path}: {source}")]
    DumpUnreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl CollectError {
    /// The command or file the failure relates to.
    pub fn origin(&self) -> &str {
        match self {
            CollectError::Unsupported { command, .. } => command,
            CollectError::EmptyOutput { command } => command,
            CollectError::DumpUnreadable { path, .. } => path,
        }
    }
}
