//! Immutable in-memory vector index with cosine similarity search.
//!
//! The [`VectorIndex`] holds the embedded chunks of one document. It is
//! built once, validated up front, and read-only afterward, so concurrent
//! searches need no synchronization. Search is a brute-force linear scan:
//! at single-document scale (hundreds of chunks) that is the simplest
//! correct choice, and ranking behavior is fully specified here.

use tracing::debug;

use crate::document::{EmbeddedChunk, RetrievalResult, ScoredChunk};
use crate::error::{RagError, Result};

/// Scores closer than this are treated as ties; ties keep original chunk order.
const SCORE_EPSILON: f32 = 1e-6;

/// An immutable set of embedded chunks supporting top-k cosine search.
#[derive(Debug)]
pub struct VectorIndex {
    chunks: Vec<EmbeddedChunk>,
    dimensions: usize,
}

impl VectorIndex {
    /// Build an index from a non-empty set of embedded chunks.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::IndexBuild`] if `chunks` is empty or any
    /// embedding's dimensionality differs from the first chunk's.
    pub fn build(chunks: Vec<EmbeddedChunk>) -> Result<Self> {
        let Some(first) = chunks.first() else {
            return Err(RagError::IndexBuild("no embedded chunks to index".to_string()));
        };
        let dimensions = first.embedding.len();
        if dimensions == 0 {
            return Err(RagError::IndexBuild("embeddings are zero-dimensional".to_string()));
        }
        for (i, chunk) in chunks.iter().enumerate() {
            if chunk.embedding.len() != dimensions {
                return Err(RagError::IndexBuild(format!(
                    "chunk {i} has dimension {}, expected {dimensions}",
                    chunk.embedding.len()
                )));
            }
        }
        Ok(Self { chunks, dimensions })
    }

    /// The number of chunks in the index.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Whether the index is empty. Always `false` for a built index.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// The shared dimensionality of all embeddings in the index.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Return the `min(k, len)` chunks most similar to `query`, ordered by
    /// descending cosine similarity.
    ///
    /// Chunks whose scores differ by less than an epsilon keep their original
    /// document order, so results are deterministic for a fixed index and
    /// query. A stored zero-magnitude embedding scores the minimum (-1.0)
    /// rather than dividing by zero and sorts strictly below every
    /// non-degenerate chunk, including one exactly antipodal to the query.
    ///
    /// The caller must supply a query of dimensionality
    /// [`dimensions()`](VectorIndex::dimensions); the retriever validates
    /// this before delegating here.
    pub fn search(&self, query: &[f32], k: usize) -> RetrievalResult {
        debug_assert_eq!(
            query.len(),
            self.dimensions,
            "query dimensionality does not match the index"
        );

        let mut scored: Vec<(usize, f32, i64)> = self
            .chunks
            .iter()
            .enumerate()
            .map(|(i, chunk)| {
                let score = cosine_similarity(&chunk.embedding, query);
                // Degenerate embeddings sort below every reachable bucket so
                // they can never tie with a real chunk scoring -1.
                let key = if chunk.embedding.iter().all(|v| *v == 0.0) {
                    i64::MIN
                } else {
                    rank_key(score)
                };
                (i, score, key)
            })
            .collect();

        // Quantizing to epsilon buckets gives a total order, and the stable
        // sort keeps original chunk order within a bucket.
        scored.sort_by(|a, b| b.2.cmp(&a.2));
        scored.truncate(k);

        debug!(k, returned = scored.len(), index_len = self.chunks.len(), "vector search");

        scored
            .into_iter()
            .map(|(i, score, _)| ScoredChunk { chunk: self.chunks[i].chunk.clone(), score })
            .collect()
    }
}

fn rank_key(score: f32) -> i64 {
    (f64::from(score) / f64::from(SCORE_EPSILON)).round() as i64
}

/// Compute cosine similarity between two vectors, clamped to `[-1.0, 1.0]`.
///
/// Returns -1.0 if either vector has zero magnitude, so degenerate vectors
/// always rank below every non-degenerate one.
pub(crate) fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return -1.0;
    }
    (dot / (norm_a * norm_b)).clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Chunk;

    fn embedded(text: &str, offset: usize, embedding: Vec<f32>) -> EmbeddedChunk {
        EmbeddedChunk { chunk: Chunk { text: text.to_string(), source_offset: offset }, embedding }
    }

    #[test]
    fn build_rejects_empty_input() {
        assert!(matches!(VectorIndex::build(Vec::new()), Err(RagError::IndexBuild(_))));
    }

    #[test]
    fn build_rejects_inconsistent_dimensions() {
        let chunks =
            vec![embedded("a", 0, vec![1.0, 0.0]), embedded("b", 1, vec![1.0, 0.0, 0.0])];
        assert!(matches!(VectorIndex::build(chunks), Err(RagError::IndexBuild(_))));
    }

    #[test]
    fn self_similarity_is_one() {
        let v = vec![0.3, -0.4, 0.5];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn opposite_vectors_score_minus_one() {
        let a = vec![1.0, 2.0];
        let b = vec![-1.0, -2.0];
        assert!((cosine_similarity(&a, &b) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn equal_scores_keep_original_chunk_order() {
        // Two identical embeddings tie exactly; the earlier chunk must come first.
        let chunks = vec![
            embedded("first", 0, vec![1.0, 0.0]),
            embedded("second", 10, vec![1.0, 0.0]),
            embedded("third", 20, vec![0.0, 1.0]),
        ];
        let index = VectorIndex::build(chunks).unwrap();
        let results = index.search(&[1.0, 0.0], 3);
        assert_eq!(results[0].chunk.text, "first");
        assert_eq!(results[1].chunk.text, "second");
        assert_eq!(results[2].chunk.text, "third");
    }

    #[test]
    fn zero_vector_ranks_last() {
        let chunks = vec![
            embedded("degenerate", 0, vec![0.0, 0.0]),
            embedded("orthogonal", 10, vec![0.0, 1.0]),
        ];
        let index = VectorIndex::build(chunks).unwrap();
        let results = index.search(&[1.0, 0.0], 2);
        // Even an orthogonal chunk (score 0) beats the zero vector (score -1).
        assert_eq!(results[0].chunk.text, "orthogonal");
        assert_eq!(results[1].chunk.text, "degenerate");
        assert!((results[1].score + 1.0).abs() < 1e-6);
    }

    #[test]
    fn zero_vector_ranks_below_an_antipodal_chunk() {
        // An antipodal embedding scores exactly -1, the same raw score as a
        // degenerate one; the real chunk must still win even when the zero
        // vector comes first in document order.
        let chunks = vec![
            embedded("degenerate", 0, vec![0.0, 0.0]),
            embedded("antipodal", 10, vec![-1.0, 0.0]),
        ];
        let index = VectorIndex::build(chunks).unwrap();
        let results = index.search(&[1.0, 0.0], 2);
        assert_eq!(results[0].chunk.text, "antipodal");
        assert_eq!(results[1].chunk.text, "degenerate");
    }

    #[test]
    #[should_panic(expected = "query dimensionality")]
    fn search_asserts_on_query_dimension_mismatch() {
        let index = VectorIndex::build(vec![embedded("a", 0, vec![1.0, 0.0])]).unwrap();
        index.search(&[1.0, 0.0, 0.0], 1);
    }

    #[test]
    fn returns_at_most_k_results() {
        let chunks = vec![
            embedded("a", 0, vec![1.0, 0.0]),
            embedded("b", 1, vec![0.9, 0.1]),
            embedded("c", 2, vec![0.0, 1.0]),
        ];
        let index = VectorIndex::build(chunks).unwrap();
        assert_eq!(index.search(&[1.0, 0.0], 2).len(), 2);
        assert_eq!(index.search(&[1.0, 0.0], 10).len(), 3);
    }
}
