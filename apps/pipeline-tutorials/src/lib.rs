pub mod config;
pub mod gst_utils;
pub mod pipeline;
pub mod router;
pub mod tutorials;

// Re-export commonly used types
pub use config::Config;
pub use pipeline::{Pipeline, PipelineError, RunOutcome};
pub use router::{MediaKind, PadRouter, RouteOutcome};

// Common error types
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TutorialError {
    #[error("Not all elements could be created, missing: {0:?}")]
    MissingElements(Vec<String>),

    #[error("Elements could not be linked: {0}")]
    LinkError(String),

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

pub type Result<T> = std::result::Result<T, TutorialError>;
