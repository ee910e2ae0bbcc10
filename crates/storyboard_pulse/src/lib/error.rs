use crate::validator::Finding;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Service error: {status} - {message}")]
    Service { status: u16, message: String },
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Extraction error: {0}")]
    Extraction(&'static str),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Duplicate slide id: {0:?}")]
    DuplicateSlideId(String),
    #[error("Slide id {0:?} cannot be used as a file name")]
    InvalidSlideId(String),
    #[error("Validation produced {} finding(s) and findings are configured to fail the run", .0.len())]
    FindingsEscalated(Vec<Finding>),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Artifact error: {0:#}")]
    Artifact(anyhow::Error),
}
