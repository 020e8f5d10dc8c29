use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Degenerate input: {0}")]
    DegenerateInput(String),

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),
}
