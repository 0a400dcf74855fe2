//! Document sources supplying the raw text to index.
//!
//! The core consumes pre-extracted plain text; PDF or other binary
//! extraction happens in the calling layer. The [`DocumentSource`] trait
//! lets the retriever defer loading until the first query, matching the
//! lazy build of the cached index.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::{RagError, Result};

/// A supplier of the raw document text the index is built from.
///
/// `load` is called at most once per successful index build.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Load the full document text.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Source`] if the text cannot be produced.
    async fn load(&self) -> Result<String>;
}

/// A document source backed by text already held in memory.
#[derive(Debug, Clone)]
pub struct StaticDocument {
    text: String,
}

impl StaticDocument {
    /// Create a source from pre-extracted document text.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[async_trait]
impl DocumentSource for StaticDocument {
    async fn load(&self) -> Result<String> {
        Ok(self.text.clone())
    }
}

/// A document source that reads a UTF-8 text file at first build.
#[derive(Debug, Clone)]
pub struct TextFileSource {
    path: PathBuf,
}

impl TextFileSource {
    /// Create a source that will read `path` when the index is first built.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DocumentSource for TextFileSource {
    async fn load(&self) -> Result<String> {
        tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            RagError::Source(format!("failed to read {}: {e}", self.path.display()))
        })
    }
}
