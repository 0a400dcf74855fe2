//! Data types for chunks, retrieval results, and prompt context.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A contiguous slice of source document text used as a retrieval unit.
///
/// Chunks are created once during index build and never modified afterward.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// The text content of the chunk. Never empty.
    pub text: String,
    /// Byte offset of the chunk's start in the original document text.
    pub source_offset: usize,
}

/// A [`Chunk`] paired with its vector embedding.
///
/// Owned exclusively by the [`VectorIndex`](crate::index::VectorIndex)
/// that was built from it. All embeddings in one index share the same
/// dimensionality.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedChunk {
    /// The source chunk.
    pub chunk: Chunk,
    /// The embedding vector for the chunk's text.
    pub embedding: Vec<f32>,
}

/// A retrieved [`Chunk`] paired with its cosine similarity score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredChunk {
    /// The retrieved chunk.
    pub chunk: Chunk,
    /// Cosine similarity to the query, in `[-1.0, 1.0]`. Higher is more relevant.
    pub score: f32,
}

/// The ordered result of one retrieval: at most `k` chunks, descending score.
///
/// Constructed fresh per query and never cached.
pub type RetrievalResult = Vec<ScoredChunk>;

/// The speaker of a [`ConversationTurn`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The end user asking questions.
    User,
    /// The assistant's prior replies.
    Assistant,
    /// Out-of-band instructions from the calling layer.
    System,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
            Role::System => write!(f, "system"),
        }
    }
}

/// One turn of prior conversation, supplied by the calling route layer.
///
/// The core formats a bounded trailing window of these into the prompt;
/// it never persists them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConversationTurn {
    /// Who produced this turn.
    pub role: Role,
    /// The turn's text content.
    pub content: String,
}

/// Structured metadata about the legal case a research query concerns.
///
/// Supplied by the calling layer when the user has selected a case; formatted
/// into the prompt as a labeled context block.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CaseContext {
    /// The case's numeric identifier.
    pub id: i64,
    /// The case name.
    pub name: String,
    /// Free-form case description.
    pub description: String,
    /// Name of the user the case is assigned to, if any.
    pub assigned_user_name: Option<String>,
    /// Email of the user the case is assigned to, if any.
    pub assigned_user_email: Option<String>,
    /// Case priority label.
    pub priority: String,
    /// Case status label.
    pub status: String,
    /// Human-readable creation date.
    pub created: String,
    /// Human-readable last-update date.
    pub updated: String,
}

impl fmt::Display for CaseContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Context: You are assisting with the following case:")?;
        writeln!(f, "- Case ID: #{}", self.id)?;
        writeln!(f, "- Name: {}", self.name)?;
        writeln!(f, "- Description: {}", self.description)?;
        match (&self.assigned_user_name, &self.assigned_user_email) {
            (Some(name), Some(email)) => writeln!(f, "- Assigned User: {name} ({email})")?,
            (Some(name), None) => writeln!(f, "- Assigned User: {name}")?,
            _ => {}
        }
        writeln!(f, "- Priority: {}", self.priority)?;
        writeln!(f, "- Status: {}", self.status)?;
        writeln!(f, "- Created: {}", self.created)?;
        write!(f, "- Last Updated: {}", self.updated)
    }
}
