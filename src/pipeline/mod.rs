pub mod classify;
pub mod gemini;
pub mod orchestrator;
pub mod parser;
pub mod prompt;
pub mod resolver;
pub mod sanitize;
pub mod types;

pub use classify::*;
pub use gemini::*;
pub use orchestrator::*;
pub use parser::*;
pub use prompt::*;
pub use resolver::*;
pub use sanitize::*;
pub use types::*;

use thiserror::Error;

/// Failures from the content-generation backend (identification,
/// record synthesis, media discovery, essays).
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Generation backend unreachable at {0}")]
    Connection(String),

    #[error("Generation backend returned error (status {status}): {body}")]
    ApiError { status: u16, body: String },

    #[error("Malformed generation response: {0}")]
    MalformedResponse(String),

    #[error("JSON parsing error: {0}")]
    JsonParsing(String),

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),
}

/// Failures of the identification-to-record resolution flow.
///
/// `StoreError::Conflict` never appears here: unique-key races are
/// recovered locally by re-fetching the winner.
#[derive(Error, Debug)]
pub enum ResolutionError {
    #[error("The input could not be identified as a plant")]
    NotIdentifiable,

    #[error("Generated record was mostly fallback content; refusing to persist")]
    GenerationUnreliable,

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("Record not found: {0}")]
    RecordNotFound(uuid::Uuid),

    #[error("Record store unavailable: {0}")]
    StoreUnavailable(String),
}
