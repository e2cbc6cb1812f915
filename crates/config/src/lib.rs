//! Configuration for the pagekit page-object model.
//!
//! Config file: `pagekit.toml`, searched in `./`. The `PAGEKIT_CONFIG`
//! environment variable overrides the search with an explicit path.

pub mod loader;
pub mod schema;

pub use {
    loader::{discover_and_load, load_config},
    schema::ModelConfig,
};

use thiserror::Error;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
