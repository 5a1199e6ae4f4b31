//! Collaborator contracts: the three external calls a resume passes through.
//!
//! `ResumeProcessor` holds each as an `Arc<dyn ...>`, so the hosted-model
//! implementations below can be swapped for fakes in tests or another backend
//! without touching the pipeline. Failures are returned as-is; nothing here
//! retries beyond what `LlmClient` already does per request.

use async_trait::async_trait;
use tracing::debug;

use crate::errors::AppError;
use crate::llm_client::prompts::{system_prompt, FIDELITY_INSTRUCTION};
use crate::llm_client::LlmClient;
use crate::models::resume::{
    JsonMap, OptimizationResult, ScoringWeights, ScreeningResult, StructuredResume,
};
use crate::pipeline::prompts::{
    fill_template, DEFAULT_WEIGHTS_NOTE, OPTIMIZE_PROMPT_TEMPLATE, OPTIMIZE_ROLE,
    PARSE_PROMPT_TEMPLATE, PARSE_ROLE, SCREEN_PROMPT_TEMPLATE, SCREEN_ROLE,
};

/// Turns extracted resume text into structured fields.
#[async_trait]
pub trait ResumeInterpreter: Send + Sync {
    async fn interpret(&self, resume_text: &str) -> Result<StructuredResume, AppError>;
}

/// Scores a structured resume against a job. Output should carry
/// `overall_score` (0–10) and per-category match fields.
#[async_trait]
pub trait ResumeScorer: Send + Sync {
    async fn score(
        &self,
        resume: &StructuredResume,
        job_title: &str,
        job_description: &str,
        weights: Option<&ScoringWeights>,
    ) -> Result<ScreeningResult, AppError>;
}

/// Produces improvement suggestions from a resume and its screening.
#[async_trait]
pub trait SuggestionGenerator: Send + Sync {
    async fn suggest(
        &self,
        resume: &StructuredResume,
        job_title: &str,
        job_description: &str,
        screening: &ScreeningResult,
    ) -> Result<OptimizationResult, AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Hosted-model implementations
// ────────────────────────────────────────────────────────────────────────────

pub struct LlmResumeInterpreter {
    llm: LlmClient,
}

impl LlmResumeInterpreter {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl ResumeInterpreter for LlmResumeInterpreter {
    async fn interpret(&self, resume_text: &str) -> Result<StructuredResume, AppError> {
        let prompt = fill_template(
            PARSE_PROMPT_TEMPLATE,
            &[
                ("fidelity", FIDELITY_INSTRUCTION.trim()),
                ("resume_text", resume_text),
            ],
        );

        let fields: JsonMap = self
            .llm
            .call_json(&prompt, &system_prompt(PARSE_ROLE))
            .await?;
        debug!("Interpreter returned {} top-level fields", fields.len());

        Ok(StructuredResume(fields))
    }
}

pub struct LlmResumeScorer {
    llm: LlmClient,
}

impl LlmResumeScorer {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl ResumeScorer for LlmResumeScorer {
    async fn score(
        &self,
        resume: &StructuredResume,
        job_title: &str,
        job_description: &str,
        weights: Option<&ScoringWeights>,
    ) -> Result<ScreeningResult, AppError> {
        let weights = match weights {
            Some(w) => to_pretty_json(w)?,
            None => DEFAULT_WEIGHTS_NOTE.to_string(),
        };

        let prompt = fill_template(
            SCREEN_PROMPT_TEMPLATE,
            &[
                ("job_title", job_title),
                ("job_description", job_description),
                ("resume_json", &to_pretty_json(resume)?),
                ("weights", &weights),
            ],
        );

        let fields: JsonMap = self
            .llm
            .call_json(&prompt, &system_prompt(SCREEN_ROLE))
            .await?;

        Ok(ScreeningResult(fields))
    }
}

pub struct LlmSuggestionGenerator {
    llm: LlmClient,
}

impl LlmSuggestionGenerator {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl SuggestionGenerator for LlmSuggestionGenerator {
    async fn suggest(
        &self,
        resume: &StructuredResume,
        job_title: &str,
        job_description: &str,
        screening: &ScreeningResult,
    ) -> Result<OptimizationResult, AppError> {
        let prompt = fill_template(
            OPTIMIZE_PROMPT_TEMPLATE,
            &[
                ("job_title", job_title),
                ("job_description", job_description),
                ("resume_json", &to_pretty_json(resume)?),
                ("screening_json", &to_pretty_json(screening)?),
            ],
        );

        let mut result: OptimizationResult = self
            .llm
            .call_json(&prompt, &system_prompt(OPTIMIZE_ROLE))
            .await?;
        result.priority_actions.truncate(3);

        Ok(result)
    }
}

fn to_pretty_json<T: serde::Serialize>(value: &T) -> Result<String, AppError> {
    serde_json::to_string_pretty(value).map_err(|e| AppError::Internal(e.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use wiremock::matchers::{body_string_contains, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn reply(value: Value) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({
            "content": [{"type": "text", "text": value.to_string()}],
            "usage": {"input_tokens": 100, "output_tokens": 50}
        }))
    }

    fn llm(server: &MockServer) -> LlmClient {
        LlmClient::new(
            "test-key".to_string(),
            format!("{}/v1/messages", server.uri()),
            "test-model".to_string(),
        )
        .unwrap()
    }

    fn resume() -> StructuredResume {
        serde_json::from_value(json!({"name": "Jane", "skills": ["sql"]})).unwrap()
    }

    #[tokio::test]
    async fn test_interpreter_sends_resume_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_string_contains("Jane Doe, Rust engineer"))
            .respond_with(reply(json!({"name": "Jane Doe", "skills": ["Rust"]})))
            .expect(1)
            .mount(&server)
            .await;

        let parsed = LlmResumeInterpreter::new(llm(&server))
            .interpret("Jane Doe, Rust engineer")
            .await
            .unwrap();
        assert_eq!(parsed.skills(), Some(vec!["Rust".to_string()]));
    }

    #[tokio::test]
    async fn test_scorer_forwards_weights() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_string_contains("0.6"))
            .and(body_string_contains("Data Engineer"))
            .respond_with(reply(json!({"overall_score": 8, "skill_match": "good"})))
            .expect(1)
            .mount(&server)
            .await;

        let weights: ScoringWeights = [("experience".to_string(), 0.6)].into_iter().collect();
        let screening = LlmResumeScorer::new(llm(&server))
            .score(&resume(), "Data Engineer", "SQL heavy role", Some(&weights))
            .await
            .unwrap();
        assert_eq!(screening.overall_score(), Some(8.0));
    }

    #[tokio::test]
    async fn test_scorer_keeps_placeholder_text_in_user_input() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_string_contains("wants {job_title} roles"))
            .and(body_string_contains("Reports to the {job_title} lead"))
            .respond_with(reply(json!({"overall_score": 5})))
            .expect(1)
            .mount(&server)
            .await;

        let resume: StructuredResume =
            serde_json::from_value(json!({"summary": "wants {job_title} roles"})).unwrap();
        LlmResumeScorer::new(llm(&server))
            .score(&resume, "Data Engineer", "Reports to the {job_title} lead", None)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_suggestions_keep_top_three_actions() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(reply(json!({
                "summary": "Good base",
                "missing_skills": ["kafka"],
                "priority_actions": ["a", "b", "c", "d"]
            })))
            .mount(&server)
            .await;

        let result = LlmSuggestionGenerator::new(llm(&server))
            .suggest(&resume(), "Data Engineer", "SQL", &ScreeningResult::default())
            .await
            .unwrap();
        assert_eq!(result.missing_skills, vec!["kafka"]);
        assert_eq!(result.priority_actions, vec!["a", "b", "c"]);
        assert!(result.content_gaps.is_empty());
    }

    #[tokio::test]
    async fn test_non_object_reply_is_collaborator_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(reply(json!(["not", "an", "object"])))
            .mount(&server)
            .await;

        let err = LlmResumeInterpreter::new(llm(&server))
            .interpret("text")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Collaborator(_)));
    }

    #[tokio::test]
    async fn test_upstream_failure_is_collaborator_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("nope"))
            .mount(&server)
            .await;

        let err = LlmResumeScorer::new(llm(&server))
            .score(&resume(), "t", "d", None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Collaborator(_)));
    }
}
