//! Error types for parameter spaces, sampling, and scenario generation.

/// All errors produced by the sampling library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("parameter '{0}' not found in parameter space")]
    NotFound(String),

    #[error("unsupported sampling method: {0}")]
    UnsupportedMethod(String),

    #[error("dimension mismatch: expected {expected} values, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("invalid sample request: {0}")]
    InvalidSampleRequest(String),

    #[error("{requested} dimensions requested, generator supports at most {max}")]
    DimensionLimit { requested: usize, max: usize },

    #[error("failed to load parameter configuration: {0}")]
    ConfigLoad(String),

    #[error("xml error: {0}")]
    Xml(String),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("plot error: {0}")]
    Plot(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
