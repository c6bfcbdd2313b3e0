use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config file read error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Settings error: {0}")]
    Settings(#[from] config::ConfigError),

    #[error("Config file {} has no entries", .0.display())]
    EmptyConfig(PathBuf),

    #[error("Invalid config entry #{index}: {reason}")]
    InvalidEntry { index: usize, reason: String },
}
