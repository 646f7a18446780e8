//! Error types for the wireframe pipeline

use thiserror::Error;

use crate::pipeline::Stage;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while running the pipeline
#[derive(Error, Debug)]
pub enum Error {
    /// A required input file is missing (image, JSON artifact, key or prompt file)
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// A detected element carries malformed data
    #[error("Invalid element '{id}': {reason}")]
    Validation { id: String, reason: String },

    /// The hosted model call failed; never retried
    #[error("External service error: {0}")]
    ExternalService(String),

    /// JSON encode/decode failure or unwritable output path
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// Wrapper naming the pipeline stage a failure occurred in
    #[error("Stage '{stage}' failed: {source}")]
    Stage {
        stage: Stage,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Attach a pipeline stage to this error. Already-staged errors are left
    /// alone so nested calls do not stack wrappers.
    pub fn at_stage(self, stage: Stage) -> Self {
        match self {
            Error::Stage { .. } => self,
            other => Error::Stage {
                stage,
                source: Box::new(other),
            },
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
