use std::path::PathBuf;

/// Common error type for snapshot and session-config loading.
///
/// Per-frame simulation paths never construct these; out-of-range values are
/// clamped at derivation time instead. Errors only surface at the file
/// boundaries where a caller can fall back to defaults.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid snapshot {path}: {source}")]
    Snapshot {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid session config {path}: {source}")]
    SessionConfig {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("unknown {field}: {value}")]
    UnknownChoice { field: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, Error>;
