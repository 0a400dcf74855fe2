//! Error types for the `lexrag` crate.

use thiserror::Error;

/// Errors that can occur in the retrieval-augmented generation core.
#[derive(Debug, Error)]
pub enum RagError {
    /// The source document could not be split into chunks.
    #[error("Chunking error: {0}")]
    Chunking(String),

    /// An embedding backend was unreachable or returned malformed output.
    #[error("Embedding error ({provider}): {message}")]
    Embedding {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// The embedded-chunk set was empty or dimensionally inconsistent.
    #[error("Index build error: {0}")]
    IndexBuild(String),

    /// The generation backend failed or timed out.
    #[error("Generation error ({provider}): {message}")]
    Generation {
        /// The generation provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// The source document could not be loaded.
    #[error("Document source error: {0}")]
    Source(String),

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// A convenience result type for RAG operations.
pub type Result<T> = std::result::Result<T, RagError>;
