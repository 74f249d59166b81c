//! Error types for the sampling workflow.

use std::path::PathBuf;

/// All errors that can end a workflow run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("settings error: {0}")]
    Settings(String),

    #[error("failed to read settings file {path}: {source}")]
    SettingsRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse settings: {0}")]
    SettingsParse(#[from] toml::de::Error),

    #[error(transparent)]
    Sampling(#[from] gcam_sampling::Error),

    #[error("logging setup failed: {0}")]
    Logging(String),

    #[error("audit log error: {0}")]
    Audit(#[from] std::io::Error),

    #[error("audit event encoding failed: {0}")]
    AuditEncode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
