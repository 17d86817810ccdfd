//! Typed error enum for loading client configuration.
//!
//! The CLI converts these to `anyhow::Error` at the binary boundary.

use restgen::DescriptorError;

/// Errors produced while loading configuration or building a client.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// YAML parsing failure.
    #[error(transparent)]
    Yaml(#[from] serde_yaml_ng::Error),

    /// The HTTP client could not be built from the configuration.
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    /// An interface file declares an invalid method.
    #[error(transparent)]
    Descriptor(#[from] DescriptorError),
}

/// Convenience alias used throughout the crate's public API.
pub type Result<T> = std::result::Result<T, ConfigError>;
