//! Document chunking.
//!
//! This module provides the [`Chunker`] trait and [`FixedSizeChunker`], which
//! splits text by character count with configurable overlap, preferring to
//! break at whitespace near the window edge.

use crate::document::Chunk;
use crate::error::{RagError, Result};

/// A strategy for splitting raw document text into chunks.
///
/// Implementations produce [`Chunk`]s carrying text and a byte offset into
/// the source document. Embeddings are attached later by the retriever.
pub trait Chunker: Send + Sync {
    /// Split document text into chunks.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Chunking`] if the text contains no usable content.
    fn split(&self, text: &str) -> Result<Vec<Chunk>>;
}

/// Splits text into fixed-size character windows with configurable overlap.
///
/// The window advances by `chunk_size - chunk_overlap` characters per step.
/// When a window would end mid-word, the split point is pulled back to the
/// nearest whitespace within the last fifth of the window, so chunks tend to
/// end on word or paragraph boundaries. The final chunk may be shorter than
/// `chunk_size`. Each chunk records the byte offset of its start in the
/// source text.
///
/// Sizes are counted in characters, not bytes; splits always fall on UTF-8
/// character boundaries.
///
/// # Example
///
/// ```rust,ignore
/// use lexrag::FixedSizeChunker;
///
/// let chunker = FixedSizeChunker::new(500, 50)?;
/// let chunks = chunker.split(&document_text)?;
/// ```
#[derive(Debug, Clone)]
pub struct FixedSizeChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl FixedSizeChunker {
    /// Create a new `FixedSizeChunker`.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if `chunk_size` is zero or
    /// `chunk_overlap >= chunk_size`.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(RagError::Config("chunk_size must be greater than zero".to_string()));
        }
        if chunk_overlap >= chunk_size {
            return Err(RagError::Config(format!(
                "chunk_overlap ({chunk_overlap}) must be less than chunk_size ({chunk_size})"
            )));
        }
        Ok(Self { chunk_size, chunk_overlap })
    }
}

impl Chunker for FixedSizeChunker {
    fn split(&self, text: &str) -> Result<Vec<Chunk>> {
        if text.trim().is_empty() {
            return Err(RagError::Chunking("document text is empty".to_string()));
        }

        // Character positions paired with their byte offsets, so windows are
        // counted in characters but offsets stay byte-accurate.
        let chars: Vec<(usize, char)> = text.char_indices().collect();
        let total = chars.len();

        let mut chunks = Vec::new();
        let mut start = 0;

        while start < total {
            let hard_end = (start + self.chunk_size).min(total);
            let mut end = hard_end;

            if hard_end < total {
                // Prefer a whitespace break within the last fifth of the window.
                let floor = hard_end.saturating_sub(self.chunk_size / 5).max(start + 1);
                if let Some(ws) = (floor..hard_end).rev().find(|&i| chars[i].1.is_whitespace()) {
                    end = ws + 1;
                }
            }

            let byte_start = chars[start].0;
            let byte_end = if end == total { text.len() } else { chars[end].0 };
            chunks.push(Chunk {
                text: text[byte_start..byte_end].to_string(),
                source_offset: byte_start,
            });

            if end == total {
                break;
            }
            start = end.saturating_sub(self.chunk_overlap).max(start + 1);
        }

        Ok(chunks)
    }
}
