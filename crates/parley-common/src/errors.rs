use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no config at {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("invalid config: {0}")]
    ParseError(String),

    #[error("config value out of range: {0}")]
    ValidationError(String),
}

/// OS integration failures: clipboard, directories, image files.
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("clipboard unavailable: {0}")]
    ClipboardError(String),

    #[error("{0}")]
    PathError(String),

    #[error("cannot attach image: {0}")]
    AttachmentError(String),
}

/// Failures of the key-value persistence layer.
///
/// These never reach the user: the store logs them and degrades to
/// empty reads or skipped writes.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage io error on '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt record '{key}': {reason}")]
    Corrupt { key: String, reason: String },

    #[error("failed to encode record '{key}': {reason}")]
    Encode { key: String, reason: String },

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}
