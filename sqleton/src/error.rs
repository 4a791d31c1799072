//! Error types for sqleton

use thiserror::Error;

/// Result type for sqleton operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for sqleton
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Unable to open database {path}: {source}")]
    ConnectionError {
        path: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("Failed to read schema metadata{}: {source}", table_context(.table))]
    MetadataFetchError {
        table: Option<String>,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Unsupported option: {0}")]
    UnsupportedOptionError(String),

    #[error("Render error: {0}")]
    RenderError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl Error {
    /// Wrap a failed metadata query, optionally naming the table it was issued for
    pub fn metadata<E>(table: Option<&str>, source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Error::MetadataFetchError {
            table: table.map(str::to_string),
            source: source.into(),
        }
    }
}

fn table_context(table: &Option<String>) -> String {
    match table {
        Some(name) => format!(" for table '{}'", name),
        None => String::new(),
    }
}

/// Convert TOML deserialization errors to sqleton errors
impl From<toml::de::Error> for Error {
    fn from(error: toml::de::Error) -> Self {
        Error::ConfigError(error.to_string())
    }
}
