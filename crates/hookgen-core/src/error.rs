use std::path::PathBuf;

/// Error type for every stage of a generation run.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    /// The external build toolchain could not be run or exited non-zero.
    #[error("Build failed: `{command}`: {reason}")]
    Build { command: String, reason: String },

    /// Nothing matched: no build directory, or no artifact passed the filters.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A build artifact was present but malformed.
    #[error("Failed to parse artifact {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// A pipeline stage failed. Carries the identity of the failing plugin.
    #[error("Plugin `{plugin}` failed: {cause}")]
    Plugin {
        plugin: &'static str,
        cause: Box<Error>,
    },

    /// Generated output could not be persisted.
    #[error("Failed to write {}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Wrap an error with the identity of the plugin that raised it.
    pub fn plugin(plugin: &'static str, cause: Error) -> Self {
        Error::Plugin {
            plugin,
            cause: Box::new(cause),
        }
    }

    /// The underlying error with any plugin wrapping removed.
    pub fn root_cause(&self) -> &Error {
        match self {
            Error::Plugin { cause, .. } => cause.root_cause(),
            other => other,
        }
    }

    /// Identity of the outermost plugin that failed, if any.
    pub fn plugin_name(&self) -> Option<&'static str> {
        match self {
            Error::Plugin { plugin, .. } => Some(plugin),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

/// Result type alias using the hookgen [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
