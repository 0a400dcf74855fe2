//! Tests for grounded prompt assembly and answer generation.

use std::sync::Arc;

use async_trait::async_trait;
use lexrag::error::{RagError, Result};
use lexrag::generation::{AnswerGenerator, Generator};
use lexrag::{CaseContext, Chunk, ConversationTurn, RagConfig, Role, ScoredChunk};

/// A generator that returns its prompt verbatim, prefixed so tests can tell
/// the output really came from the backend.
struct EchoGenerator;

#[async_trait]
impl Generator for EchoGenerator {
    fn name(&self) -> &str {
        "echo-fake"
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        Ok(format!("ECHO:{prompt}"))
    }
}

/// A generator that always fails, standing in for a timed-out backend.
struct FailingGenerator;

#[async_trait]
impl Generator for FailingGenerator {
    fn name(&self) -> &str {
        "failing-fake"
    }

    async fn generate(&self, _prompt: &str) -> Result<String> {
        Err(RagError::Generation {
            provider: "failing-fake".into(),
            message: "request timed out".into(),
        })
    }
}

fn scored(text: &str, offset: usize, score: f32) -> ScoredChunk {
    ScoredChunk { chunk: Chunk { text: text.to_string(), source_offset: offset }, score }
}

fn sample_hits() -> Vec<ScoredChunk> {
    vec![
        scored("Congress shall make no law abridging the freedom of speech.", 0, 0.91),
        scored("The press shall remain free from prior restraint.", 120, 0.62),
        scored("Peaceable assembly is protected.", 300, 0.40),
    ]
}

fn answerer(generator: Arc<dyn Generator>) -> AnswerGenerator {
    AnswerGenerator::new(generator, &RagConfig::default())
}

#[test]
fn prompt_contains_instruction_passages_and_question() {
    let answer_gen = answerer(Arc::new(EchoGenerator));
    let prompt =
        answer_gen.build_prompt("What protects speech?", &sample_hits(), None, None);

    assert!(prompt.contains("legal research assistant"));
    assert!(prompt.contains("say that you do not know"));
    assert!(prompt.contains("informational purposes"));
    assert!(prompt.ends_with("Question: What protects speech?"));
}

#[test]
fn passages_appear_in_ranked_order_separated_by_delimiter() {
    let answer_gen = answerer(Arc::new(EchoGenerator));
    let prompt = answer_gen.build_prompt("q", &sample_hits(), None, None);

    let first = prompt.find("Congress shall make no law").unwrap();
    let second = prompt.find("The press shall remain free").unwrap();
    let third = prompt.find("Peaceable assembly").unwrap();
    assert!(first < second && second < third);
    assert!(prompt.matches("\n---\n").count() >= 3);
}

#[test]
fn case_context_is_rendered_as_a_labeled_block() {
    let case = CaseContext {
        id: 42,
        name: "Smith v. Jones".to_string(),
        description: "Breach of a commercial lease".to_string(),
        assigned_user_name: Some("Dana Ortiz".to_string()),
        assigned_user_email: Some("dana@example.com".to_string()),
        priority: "High".to_string(),
        status: "Open".to_string(),
        created: "1/15/2026".to_string(),
        updated: "2/3/2026".to_string(),
    };

    let answer_gen = answerer(Arc::new(EchoGenerator));
    let prompt = answer_gen.build_prompt("q", &sample_hits(), Some(&case), None);

    assert!(prompt.contains("Context: You are assisting with the following case:"));
    assert!(prompt.contains("- Case ID: #42"));
    assert!(prompt.contains("- Name: Smith v. Jones"));
    assert!(prompt.contains("- Assigned User: Dana Ortiz (dana@example.com)"));
    assert!(prompt.contains("- Priority: High"));
    assert!(prompt.contains("- Last Updated: 2/3/2026"));
    assert!(prompt.contains("specifically related to this case"));
}

#[test]
fn case_block_is_absent_without_case_context() {
    let answer_gen = answerer(Arc::new(EchoGenerator));
    let prompt = answer_gen.build_prompt("q", &sample_hits(), None, None);
    assert!(!prompt.contains("You are assisting with the following case"));
}

#[test]
fn history_is_bounded_to_the_configured_window() {
    let turns: Vec<ConversationTurn> = (0..14)
        .map(|i| ConversationTurn {
            role: if i % 2 == 0 { Role::User } else { Role::Assistant },
            content: format!("turn number {i}"),
        })
        .collect();

    // Default window is 10: turns 0-3 fall outside, 4-13 stay.
    let answer_gen = answerer(Arc::new(EchoGenerator));
    let prompt = answer_gen.build_prompt("q", &sample_hits(), None, Some(&turns));

    assert!(prompt.contains("Previous conversation:"));
    assert!(!prompt.contains("turn number 3"));
    assert!(prompt.contains("turn number 4"));
    assert!(prompt.contains("user: turn number 4"));
    assert!(prompt.contains("assistant: turn number 13"));
}

#[test]
fn empty_history_adds_no_conversation_section() {
    let answer_gen = answerer(Arc::new(EchoGenerator));
    let prompt = answer_gen.build_prompt("q", &sample_hits(), None, Some(&[]));
    assert!(!prompt.contains("Previous conversation:"));
}

#[tokio::test]
async fn answer_returns_the_backend_output_unmodified() {
    let answer_gen = answerer(Arc::new(EchoGenerator));
    let reply = answer_gen.answer("What protects speech?", &sample_hits(), None, None).await.unwrap();
    assert!(reply.starts_with("ECHO:"));
    assert!(reply.ends_with("Question: What protects speech?"));
}

#[tokio::test]
async fn generation_failure_propagates_unmasked() {
    let answer_gen = answerer(Arc::new(FailingGenerator));
    let err = answer_gen.answer("q", &sample_hits(), None, None).await.unwrap_err();
    assert!(matches!(err, RagError::Generation { .. }), "got {err:?}");
}
