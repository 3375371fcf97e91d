use std::path::PathBuf;

pub type Result<T, E = StoreError> = std::result::Result<T, E>;

/// Failures at the persistence boundary. Conflicting observations are never errors;
/// see [`PlainOutcome`](crate::PlainOutcome) and [`TaggedOutcome`](crate::TaggedOutcome).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode partition '{path}': {message}")]
    Encode { path: PathBuf, message: String },

    #[error("failed to decode partition '{path}': {message}")]
    Decode { path: PathBuf, message: String },

    #[error("partition '{path}' has format version {found}, expected {expected}")]
    Version { path: PathBuf, found: u32, expected: u32 },

    #[error("corrupt entry for '{word}': {reason}")]
    Corrupt { word: String, reason: &'static str },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io { path: path.into(), source }
    }

    pub(crate) fn corrupt(word: impl Into<String>, reason: &'static str) -> Self {
        StoreError::Corrupt { word: word.into(), reason }
    }
}
