//! Error types for keypanel

use thiserror::Error;

/// Result type alias for keypanel operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in keypanel
///
/// The panel itself never fails; these cover the configuration file and
/// terminal plumbing around it.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration file error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Terminal/TUI error
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}
