//! Grounded answer generation.
//!
//! [`AnswerGenerator`] assembles a single prompt from the retrieved chunks,
//! optional case metadata, and a bounded window of prior conversation, then
//! invokes a [`Generator`] backend and returns its raw text output. Retries
//! and user-facing fallback messages belong to the calling layer.

use std::fmt::Write as _;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

use crate::config::RagConfig;
use crate::document::{CaseContext, ConversationTurn, RetrievalResult};
use crate::error::Result;

/// A generative language model backend: prompt text in, response text out.
#[async_trait]
pub trait Generator: Send + Sync {
    /// A short name identifying the backend, used in error and log output.
    fn name(&self) -> &str;

    /// Generate a completion for `prompt`.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Generation`](crate::RagError::Generation) if the
    /// backend call fails or times out.
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Fixed instruction constraining the model to the supplied context.
const SYSTEM_INSTRUCTION: &str = "You are a professional legal research assistant. \
Answer the question using only the context passages provided below. \
If the context does not contain the information needed, say that you do not know \
rather than guessing. Always remind users that this is for informational purposes \
only and they should consult with qualified legal counsel for specific legal advice.";

/// Delimiter separating retrieved passages in the prompt.
const PASSAGE_DELIMITER: &str = "\n---\n";

/// Builds grounded prompts and invokes the generation backend.
pub struct AnswerGenerator {
    generator: Arc<dyn Generator>,
    history_window: usize,
}

impl AnswerGenerator {
    /// Create an `AnswerGenerator` over the given backend.
    ///
    /// The config's `history_window` bounds how many trailing conversation
    /// turns are included in the prompt.
    pub fn new(generator: Arc<dyn Generator>, config: &RagConfig) -> Self {
        Self { generator, history_window: config.history_window }
    }

    /// Answer `query` grounded in the retrieved chunks.
    ///
    /// Constructs the prompt via [`build_prompt`](AnswerGenerator::build_prompt)
    /// and returns the model's raw text output unmodified.
    ///
    /// # Errors
    ///
    /// Propagates [`RagError::Generation`](crate::RagError::Generation) from
    /// the backend. No retry is performed here.
    pub async fn answer(
        &self,
        query: &str,
        retrieved: &RetrievalResult,
        case_context: Option<&CaseContext>,
        history: Option<&[ConversationTurn]>,
    ) -> Result<String> {
        let prompt = self.build_prompt(query, retrieved, case_context, history);
        let answer = self.generator.generate(&prompt).await.inspect_err(|e| {
            error!(provider = self.generator.name(), error = %e, "answer generation failed");
        })?;
        info!(
            provider = self.generator.name(),
            prompt_len = prompt.len(),
            answer_len = answer.len(),
            "generated answer"
        );
        Ok(answer)
    }

    /// Assemble the full prompt: system instruction, retrieved passages in
    /// ranked order, optional case context, the last `history_window`
    /// conversation turns, and the question.
    pub fn build_prompt(
        &self,
        query: &str,
        retrieved: &RetrievalResult,
        case_context: Option<&CaseContext>,
        history: Option<&[ConversationTurn]>,
    ) -> String {
        let mut prompt = String::new();
        prompt.push_str(SYSTEM_INSTRUCTION);
        prompt.push_str("\n\nContext passages:\n");

        for hit in retrieved {
            prompt.push_str(PASSAGE_DELIMITER);
            prompt.push_str(hit.chunk.text.trim());
        }
        prompt.push_str(PASSAGE_DELIMITER);

        if let Some(case) = case_context {
            let _ = write!(prompt, "\n{case}\n");
            prompt.push_str(
                "\nPlease provide research and assistance specifically related to this case.\n",
            );
        }

        if let Some(turns) = history {
            let window_start = turns.len().saturating_sub(self.history_window);
            let window = &turns[window_start..];
            if !window.is_empty() {
                prompt.push_str("\nPrevious conversation:\n");
                for turn in window {
                    let _ = writeln!(prompt, "{}: {}", turn.role, turn.content);
                }
            }
        }

        let _ = write!(prompt, "\nQuestion: {query}");
        prompt
    }
}
