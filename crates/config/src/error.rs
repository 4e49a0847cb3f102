use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("settings JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("settings TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("unsupported settings file extension: {0}")]
    UnsupportedFormat(String),
    #[error("invalid settings: {0}")]
    Invalid(String),
}
