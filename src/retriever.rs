//! Retrieval orchestration with a build-once cached index.
//!
//! The [`Retriever`] owns the document source, chunker, and embedding
//! provider, and lazily builds one [`VectorIndex`] on first use. The index
//! is cached for the retriever's lifetime; a process restart rebuilds from
//! scratch. There is no TTL and no hot-update path: the source corpus is
//! static by design.

use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{error, info};

use crate::chunking::{Chunker, FixedSizeChunker};
use crate::config::RagConfig;
use crate::document::{EmbeddedChunk, RetrievalResult};
use crate::embedding::{EmbeddingProvider, validate_embedding};
use crate::error::{RagError, Result};
use crate::index::VectorIndex;
use crate::source::DocumentSource;

/// Orchestrates chunking, embedding, index caching, and top-k retrieval.
///
/// The cached index goes through an explicit empty → building → ready
/// lifecycle via [`tokio::sync::OnceCell`]: concurrent first queries share a
/// single in-flight build, and a failed build caches nothing, so the next
/// caller retries from "not yet built". After a successful build the index
/// is read-only and searches proceed fully in parallel.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use lexrag::{RagConfig, Retriever, StaticDocument};
///
/// let retriever = Retriever::builder()
///     .config(RagConfig::default())
///     .source(Arc::new(StaticDocument::new(document_text)))
///     .embedding_provider(Arc::new(embedder))
///     .build()?;
///
/// let hits = retriever.retrieve("What does the lease say about notice?", 3).await?;
/// ```
pub struct Retriever {
    config: RagConfig,
    source: Arc<dyn DocumentSource>,
    chunker: Arc<dyn Chunker>,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    index: OnceCell<Arc<VectorIndex>>,
}

impl std::fmt::Debug for Retriever {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Retriever").field("config", &self.config).finish_non_exhaustive()
    }
}

impl Retriever {
    /// Create a new [`RetrieverBuilder`].
    pub fn builder() -> RetrieverBuilder {
        RetrieverBuilder::default()
    }

    /// Return a reference to the retriever configuration.
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Return the cached index, building it on first call.
    ///
    /// The build loads the document, chunks it, embeds every chunk, validates
    /// each embedding against the provider's declared dimensionality, and
    /// constructs the index. Concurrent callers during a cold start await the
    /// same in-flight build rather than duplicating the embedding pass.
    ///
    /// # Errors
    ///
    /// Propagates [`RagError::Source`], [`RagError::Chunking`],
    /// [`RagError::Embedding`], and [`RagError::IndexBuild`] from the build.
    /// On error nothing is cached.
    pub async fn get_or_build_index(&self) -> Result<Arc<VectorIndex>> {
        self.index.get_or_try_init(|| self.build_index()).await.cloned()
    }

    async fn build_index(&self) -> Result<Arc<VectorIndex>> {
        let text = self.source.load().await?;
        let chunks = self.chunker.split(&text)?;

        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        let embeddings = self.embedding_provider.embed_batch(&texts).await.inspect_err(|e| {
            error!(error = %e, "embedding failed during index build");
        })?;

        let provider = self.embedding_provider.name();
        if embeddings.len() != chunks.len() {
            return Err(RagError::Embedding {
                provider: provider.to_string(),
                message: format!(
                    "batch returned {} embeddings for {} chunks",
                    embeddings.len(),
                    chunks.len()
                ),
            });
        }
        let dimensions = self.embedding_provider.dimensions();
        for embedding in &embeddings {
            validate_embedding(provider, dimensions, embedding)?;
        }

        let embedded: Vec<EmbeddedChunk> = chunks
            .into_iter()
            .zip(embeddings)
            .map(|(chunk, embedding)| EmbeddedChunk { chunk, embedding })
            .collect();

        let index = VectorIndex::build(embedded)?;
        info!(chunk_count = index.len(), dimensions = index.dimensions(), "built vector index");
        Ok(Arc::new(index))
    }

    /// Retrieve the `k` chunks most relevant to `query`.
    ///
    /// Builds the index if this is the first query, embeds the query,
    /// validates the query embedding, and searches the index. Embedding must
    /// complete before search; the stages never reorder.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if `k` is zero. Propagates the underlying
    /// [`RagError::Embedding`] or build error unmasked. A wrong-dimension or
    /// non-finite query embedding is an [`RagError::Embedding`], never a
    /// silently-wrong result.
    pub async fn retrieve(&self, query: &str, k: usize) -> Result<RetrievalResult> {
        if k == 0 {
            return Err(RagError::Config("k must be greater than zero".to_string()));
        }
        let index = self.get_or_build_index().await?;

        let query_embedding = self.embedding_provider.embed(query).await.inspect_err(|e| {
            error!(error = %e, "embedding failed during query");
        })?;
        validate_embedding(self.embedding_provider.name(), index.dimensions(), &query_embedding)?;

        let results = index.search(&query_embedding, k);
        info!(result_count = results.len(), k, "retrieval completed");
        Ok(results)
    }

    /// Retrieve using the configured `top_k`.
    pub async fn retrieve_top(&self, query: &str) -> Result<RetrievalResult> {
        self.retrieve(query, self.config.top_k).await
    }

    /// Drop the cached index so the next query rebuilds from scratch.
    ///
    /// Exists for deterministic test resets; production deployments rebuild
    /// only on process restart.
    pub fn reset(&mut self) {
        self.index = OnceCell::new();
    }
}

/// Builder for constructing a [`Retriever`].
///
/// `config`, `source`, and `embedding_provider` are required. The chunker
/// defaults to a [`FixedSizeChunker`] derived from the config.
#[derive(Default)]
pub struct RetrieverBuilder {
    config: Option<RagConfig>,
    source: Option<Arc<dyn DocumentSource>>,
    chunker: Option<Arc<dyn Chunker>>,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
}

impl RetrieverBuilder {
    /// Set the retriever configuration.
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the document source.
    pub fn source(mut self, source: Arc<dyn DocumentSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Override the default chunker.
    pub fn chunker(mut self, chunker: Arc<dyn Chunker>) -> Self {
        self.chunker = Some(chunker);
        self
    }

    /// Set the embedding provider.
    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    /// Build the [`Retriever`], validating that all required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if a required field is missing or the
    /// config's chunking parameters are inconsistent.
    pub fn build(self) -> Result<Retriever> {
        let config =
            self.config.ok_or_else(|| RagError::Config("config is required".to_string()))?;
        let source =
            self.source.ok_or_else(|| RagError::Config("source is required".to_string()))?;
        let embedding_provider = self
            .embedding_provider
            .ok_or_else(|| RagError::Config("embedding_provider is required".to_string()))?;
        let chunker = match self.chunker {
            Some(chunker) => chunker,
            None => Arc::new(FixedSizeChunker::new(config.chunk_size, config.chunk_overlap)?),
        };

        Ok(Retriever { config, source, chunker, embedding_provider, index: OnceCell::new() })
    }
}
