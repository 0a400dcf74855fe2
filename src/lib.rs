//! # lexrag
//!
//! Retrieval-augmented generation core for a legal research assistant.
//!
//! ## Overview
//!
//! The crate answers questions about a single static document (for example a
//! pre-extracted statute or constitution PDF) by retrieving the most relevant
//! passages and grounding a language-model answer in them. It is a library
//! invoked in-process by a web-route layer; routing, sessions, persistence,
//! and UI all live outside.
//!
//! The pipeline has five stages with explicit contracts between them:
//!
//! 1. [`Chunker`] — splits the document into overlapping character windows
//! 2. [`EmbeddingProvider`] — maps chunk or query text to a fixed-dimension vector
//! 3. [`VectorIndex`] — immutable in-memory index with cosine top-k search
//! 4. [`Retriever`] — builds the index once (shared by concurrent cold-start
//!    queries), then embeds queries and searches
//! 5. [`AnswerGenerator`] — assembles a grounded prompt and invokes a
//!    [`Generator`] backend
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use lexrag::{
//!     AnswerGenerator, RagConfig, Retriever, StaticDocument,
//!     ollama::{OllamaEmbeddingProvider, OllamaGenerator},
//! };
//!
//! let config = RagConfig::default(); // chunk 500 / overlap 50 / top-3
//! let retriever = Retriever::builder()
//!     .config(config.clone())
//!     .source(Arc::new(StaticDocument::new(document_text)))
//!     .embedding_provider(Arc::new(OllamaEmbeddingProvider::new()))
//!     .build()?;
//! let answerer = AnswerGenerator::new(Arc::new(OllamaGenerator::new()), &config);
//!
//! let hits = retriever.retrieve_top("What does the first amendment say about speech?").await?;
//! let reply = answerer.answer("What does the first amendment say about speech?", &hits, None, None).await?;
//! ```
//!
//! ## Failure semantics
//!
//! Every error is propagated to the immediate caller as a [`RagError`]; the
//! core never retries and never fabricates an answer on failure. A failed
//! index build caches nothing, so the next query retries from scratch.

pub mod chunking;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod generation;
pub mod index;
pub mod ollama;
pub mod openai;
pub mod retriever;
pub mod source;

pub use chunking::{Chunker, FixedSizeChunker};
pub use config::{RagConfig, RagConfigBuilder};
pub use document::{
    CaseContext, Chunk, ConversationTurn, EmbeddedChunk, RetrievalResult, Role, ScoredChunk,
};
pub use embedding::EmbeddingProvider;
pub use error::{RagError, Result};
pub use generation::{AnswerGenerator, Generator};
pub use index::VectorIndex;
pub use retriever::{Retriever, RetrieverBuilder};
pub use source::{DocumentSource, StaticDocument, TextFileSource};
