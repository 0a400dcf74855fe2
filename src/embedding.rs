//! Embedding provider trait for generating vector embeddings from text.

use async_trait::async_trait;

use crate::error::{RagError, Result};

/// A provider that generates fixed-dimension vector embeddings from text.
///
/// Implementations wrap specific embedding backends (Ollama, OpenAI, a test
/// fake) behind a unified async interface. Embeddings must be stable for a
/// fixed model configuration: repeated calls with the same text within one
/// process must yield near-identical similarity rankings.
///
/// The default [`embed_batch`](EmbeddingProvider::embed_batch) implementation
/// calls [`embed`](EmbeddingProvider::embed) sequentially; backends with
/// native batching should override it. Overrides must be semantically
/// equivalent to the per-item loop: same ordering, same values.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// A short name identifying the backend, used in error and log output.
    fn name(&self) -> &str;

    /// Generate an embedding vector for a single text input.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Embedding`] if the backend is unreachable or
    /// returns malformed output.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embedding vectors for a batch of text inputs.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Embedding`] on the first input that fails.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.embed(text).await?);
        }
        Ok(results)
    }

    /// Return the dimensionality of embeddings produced by this provider.
    fn dimensions(&self) -> usize;
}

/// Validate an embedding returned by `provider` against the expected
/// dimensionality, rejecting wrong-dimension vectors and non-finite
/// components.
///
/// Malformed backend output must abort the operation that requested it,
/// never feed a silently-wrong vector into search.
pub(crate) fn validate_embedding(
    provider: &str,
    expected_dimensions: usize,
    embedding: &[f32],
) -> Result<()> {
    if embedding.len() != expected_dimensions {
        return Err(RagError::Embedding {
            provider: provider.to_string(),
            message: format!(
                "expected {expected_dimensions}-dimensional embedding, got {}",
                embedding.len()
            ),
        });
    }
    if let Some(pos) = embedding.iter().position(|v| !v.is_finite()) {
        return Err(RagError::Embedding {
            provider: provider.to_string(),
            message: format!("embedding component {pos} is not finite"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_wrong_dimension() {
        let err = validate_embedding("test", 4, &[1.0, 2.0, 3.0]).unwrap_err();
        assert!(matches!(err, RagError::Embedding { .. }));
    }

    #[test]
    fn rejects_non_finite_components() {
        assert!(validate_embedding("test", 3, &[1.0, f32::NAN, 0.0]).is_err());
        assert!(validate_embedding("test", 3, &[1.0, f32::INFINITY, 0.0]).is_err());
    }

    #[test]
    fn accepts_well_formed_embedding() {
        assert!(validate_embedding("test", 3, &[0.0, -1.5, 2.0]).is_ok());
    }
}
