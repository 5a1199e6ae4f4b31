// Resume pipeline: extraction → interpretation → skill reconciliation → scoring → suggestions.
// Decision logic lives in `skills`, `extraction` and `shape`; the processor only sequences calls.

pub mod collaborators;
pub mod handlers;
pub mod prompts;
pub mod shape;

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::extraction::{DocumentExtractor, ExtractedText, ExtractionError};
use crate::models::resume::{OptimizationResult, ScoringWeights, ScreeningResult, StructuredResume};
use crate::skills::expander::SkillExpander;
use crate::skills::normalizer::SkillNormalizer;
use crate::skills::synonyms::SynonymTable;
use crate::skills::SkillSet;

use self::collaborators::{ResumeInterpreter, ResumeScorer, SuggestionGenerator};
use self::shape::normalize_screening_result;

/// The external calls a [`ResumeProcessor`] delegates to.
#[derive(Clone)]
pub struct Collaborators {
    pub interpreter: Arc<dyn ResumeInterpreter>,
    pub scorer: Arc<dyn ResumeScorer>,
    pub suggester: Arc<dyn SuggestionGenerator>,
}

/// Output of the full parse → screen → optimize workflow.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessedResume {
    pub parsed: StructuredResume,
    pub screened: ScreeningResult,
    pub optimization: OptimizationResult,
}

/// Stateless between calls; share one instance behind an `Arc`.
pub struct ResumeProcessor {
    extractor: DocumentExtractor,
    normalizer: SkillNormalizer,
    expander: SkillExpander,
    collaborators: Collaborators,
}

impl ResumeProcessor {
    pub fn new(
        extractor: DocumentExtractor,
        synonyms: Arc<SynonymTable>,
        match_threshold: f64,
        collaborators: Collaborators,
    ) -> Self {
        Self {
            extractor,
            normalizer: SkillNormalizer::new(Arc::clone(&synonyms)),
            expander: SkillExpander::new(synonyms).with_threshold(match_threshold),
            collaborators,
        }
    }

    pub async fn parse_bytes(
        &self,
        bytes: &[u8],
        filename: &str,
    ) -> Result<StructuredResume, AppError> {
        let extractor = self.extractor.clone();
        let (owned_bytes, owned_name) = (bytes.to_vec(), filename.to_string());
        let text =
            off_runtime(move || extractor.extract_from_bytes(&owned_bytes, &owned_name)).await?;
        self.interpret(text, filename).await
    }

    // Local-file entry point; the HTTP routes only take uploads.
    #[allow(dead_code)]
    pub async fn parse_path(&self, path: &Path) -> Result<StructuredResume, AppError> {
        let extractor = self.extractor.clone();
        let owned_path = path.to_path_buf();
        let text = off_runtime(move || extractor.extract_from_path(&owned_path)).await?;
        self.interpret(text, &path.display().to_string()).await
    }

    async fn interpret(
        &self,
        text: ExtractedText,
        source: &str,
    ) -> Result<StructuredResume, AppError> {
        let rendered = text.render();
        info!(
            "Extracted {} characters from {source}",
            rendered.chars().count()
        );

        let parsed = self.collaborators.interpreter.interpret(&rendered).await?;
        info!("Resume parsed successfully");
        Ok(parsed)
    }

    /// Normalizes the resume's skills, adds JD terms they imply, and writes the
    /// result back into `resume["skills"]` as a flat list. A `skills` value that
    /// holds no skill names is left untouched and `None` is returned.
    pub fn reconcile_skills(
        &self,
        resume: &mut StructuredResume,
        job_description: &str,
    ) -> Option<SkillSet> {
        let Some(raw) = resume.skills() else {
            warn!(
                "Leaving unreadable skills field untouched: {}",
                resume.0.get("skills").map(|v| v.to_string()).unwrap_or_default()
            );
            return None;
        };

        let normalized = self.normalizer.normalize(raw);
        let expanded = self.expander.expand(&normalized, job_description);
        resume.set_skills(&expanded);
        Some(expanded)
    }

    /// Reconciles skills in place, then scores and shape-normalizes the result.
    pub async fn screen(
        &self,
        resume: &mut StructuredResume,
        job_title: &str,
        job_description: &str,
        weights: Option<&ScoringWeights>,
    ) -> Result<ScreeningResult, AppError> {
        self.reconcile_skills(resume, job_description);

        let raw = self
            .collaborators
            .scorer
            .score(resume, job_title, job_description, weights)
            .await?;
        let screened = normalize_screening_result(raw);

        match screened.overall_score() {
            Some(score) => info!("Resume screened. Overall score: {score}/10"),
            None => info!("Resume screened. No numeric overall score"),
        }
        Ok(screened)
    }

    pub async fn optimize(
        &self,
        resume: &StructuredResume,
        job_title: &str,
        job_description: &str,
        screening: &ScreeningResult,
    ) -> Result<OptimizationResult, AppError> {
        let optimization = self
            .collaborators
            .suggester
            .suggest(resume, job_title, job_description, screening)
            .await?;
        info!("Resume optimization suggestions generated");
        Ok(optimization)
    }

    pub async fn process_bytes(
        &self,
        bytes: &[u8],
        filename: &str,
        job_title: &str,
        job_description: &str,
        weights: Option<&ScoringWeights>,
    ) -> Result<ProcessedResume, AppError> {
        info!("Processing uploaded resume: {filename}");
        let parsed = self.parse_bytes(bytes, filename).await?;
        self.screen_and_optimize(parsed, job_title, job_description, weights)
            .await
    }

    // Local-file entry point; the HTTP routes only take uploads.
    #[allow(dead_code)]
    pub async fn process_path(
        &self,
        path: &Path,
        job_title: &str,
        job_description: &str,
        weights: Option<&ScoringWeights>,
    ) -> Result<ProcessedResume, AppError> {
        info!("Processing resume from path: {}", path.display());
        let parsed = self.parse_path(path).await?;
        self.screen_and_optimize(parsed, job_title, job_description, weights)
            .await
    }

    async fn screen_and_optimize(
        &self,
        mut parsed: StructuredResume,
        job_title: &str,
        job_description: &str,
        weights: Option<&ScoringWeights>,
    ) -> Result<ProcessedResume, AppError> {
        let screened = self
            .screen(&mut parsed, job_title, job_description, weights)
            .await?;
        let optimization = self
            .optimize(&parsed, job_title, job_description, &screened)
            .await?;

        Ok(ProcessedResume {
            parsed,
            screened,
            optimization,
        })
    }
}

/// Document parsing is CPU-bound and stages temp files, so it runs on the
/// blocking pool rather than a runtime worker.
async fn off_runtime<F>(job: F) -> Result<ExtractedText, AppError>
where
    F: FnOnce() -> Result<ExtractedText, ExtractionError> + Send + 'static,
{
    let extracted = tokio::task::spawn_blocking(job).await.map_err(|e| {
        AppError::Internal(anyhow::anyhow!("spawn_blocking failed in extraction: {e}"))
    })??;
    Ok(extracted)
}


#[cfg(test)]
mod tests {
    use std::io::Write;

    use serde_json::json;

    use super::testing::*;
    use super::*;
    use crate::extraction::docx::tests::docx_package;

    fn resume(value: serde_json::Value) -> StructuredResume {
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn test_parse_bytes_forwards_rendered_text() {
        let interp = interpreter(json!({"name": "Jane"}));
        let processor = processor(interp.clone(), scorer(json!({})));
        let doc = docx_package(&["Jane Doe", "Rust engineer"], &["https://github.com/jane"]);

        let parsed = processor.parse_bytes(&doc, "cv.docx").await.unwrap();

        assert_eq!(parsed, resume(json!({"name": "Jane"})));
        let seen = interp.seen.lock().unwrap();
        assert_eq!(
            seen[0],
            "Jane Doe\nRust engineer\n\nEXTRACTED URLS/LINKS:\n- https://github.com/jane\n"
        );
    }

    #[tokio::test]
    async fn test_parse_rejects_unsupported_extension_before_interpreting() {
        let interp = interpreter(json!({}));
        let processor = processor(interp.clone(), scorer(json!({})));

        let err = processor.parse_bytes(b"hello", "cv.txt").await.unwrap_err();

        assert!(matches!(err, AppError::UnsupportedFormat(_)));
        assert!(interp.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_parse_path_missing_file_is_not_found() {
        let err = default_processor()
            .parse_path(Path::new("/definitely/not/here.pdf"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_interpreter_failure_propagates() {
        let processor = processor(Arc::new(FailingInterpreter), scorer(json!({})));
        let doc = docx_package(&["text"], &[]);
        let err = processor.parse_bytes(&doc, "cv.docx").await.unwrap_err();
        assert!(matches!(err, AppError::Collaborator(_)));
    }

    #[tokio::test]
    async fn test_screen_reconciles_skills_before_scoring() {
        let score = scorer(json!({"overall_score": 8}));
        let processor = processor(interpreter(json!({})), score.clone());
        let mut parsed = resume(json!({"name": "Jane", "skills": ["MySQL", " python "]}));

        processor
            .screen(&mut parsed, "Data Engineer", "Requires strong SQL/MySQL experience", None)
            .await
            .unwrap();

        let seen = score.seen_skills.lock().unwrap();
        assert_eq!(seen[0], vec!["python", "sql"]);
        assert_eq!(parsed.0["skills"], json!(["python", "sql"]));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_extraction_runs_off_the_runtime_thread() {
        let runtime_thread = std::thread::current().id();
        let extracted = off_runtime(move || {
            assert_ne!(std::thread::current().id(), runtime_thread);
            Ok(ExtractedText::new("body".to_string(), Vec::new()))
        })
        .await
        .unwrap();
        assert_eq!(extracted.body, "body");
    }

    #[tokio::test]
    async fn test_extraction_panic_is_internal_error() {
        let err = off_runtime(|| panic!("lopdf blew up")).await.unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_parse_bytes_on_single_threaded_runtime() {
        let doc = docx_package(&["Jane Doe"], &[]);
        let parsed = default_processor().parse_bytes(&doc, "cv.docx").await.unwrap();
        assert_eq!(parsed.0["name"], json!("Jane"));
    }

    #[tokio::test]
    async fn test_screen_splits_comma_separated_skills() {
        let score = scorer(json!({"overall_score": 6}));
        let processor = processor(interpreter(json!({})), score.clone());
        let mut parsed = resume(json!({"skills": "Python, MySQL, Docker"}));

        processor.screen(&mut parsed, "t", "d", None).await.unwrap();

        assert_eq!(score.seen_skills.lock().unwrap()[0], vec!["docker", "python", "sql"]);
        assert_eq!(parsed.0["skills"], json!(["docker", "python", "sql"]));
    }

    #[tokio::test]
    async fn test_screen_flattens_grouped_skills() {
        let score = scorer(json!({"overall_score": 6}));
        let processor = processor(interpreter(json!({})), score.clone());
        let mut parsed = resume(json!({"skills": {
            "technical": ["Rust", "MySQL"],
            "soft": ["Mentoring"]
        }}));

        processor.screen(&mut parsed, "t", "d", None).await.unwrap();

        assert_eq!(parsed.0["skills"], json!(["mentoring", "rust", "sql"]));
    }

    #[tokio::test]
    async fn test_screen_leaves_unreadable_skills_untouched() {
        let processor = default_processor();
        let mut parsed = resume(json!({"skills": 42}));

        processor.screen(&mut parsed, "t", "d", None).await.unwrap();

        assert_eq!(parsed.0["skills"], json!(42));
    }

    #[tokio::test]
    async fn test_screen_writes_empty_skills_when_missing() {
        let processor = default_processor();
        let mut parsed = resume(json!({"name": "Jane"}));

        processor.screen(&mut parsed, "t", "d", None).await.unwrap();

        assert_eq!(parsed.0["skills"], json!([]));
    }

    #[tokio::test]
    async fn test_screen_normalizes_result_shape() {
        let processor = processor(
            interpreter(json!({})),
            scorer(json!({
                "overall_score": "7.5",
                "skill_match": "strong fit",
                "project_match": ["compiler"],
                "cultural_fit": null
            })),
        );
        let mut parsed = resume(json!({"skills": []}));

        let screened = processor.screen(&mut parsed, "t", "d", None).await.unwrap();

        assert_eq!(
            serde_json::to_value(&screened).unwrap(),
            json!({
                "overall_score": 7.5,
                "skill_match": {"text": "strong fit"},
                "project_match": {"items": ["compiler"]},
                "cultural_fit": {}
            })
        );
    }

    #[tokio::test]
    async fn test_optimize_passes_screening_through() {
        let processor = default_processor();
        let screening: ScreeningResult =
            serde_json::from_value(json!({"overall_score": 6.0})).unwrap();

        let result = processor
            .optimize(&resume(json!({})), "t", "d", &screening)
            .await
            .unwrap();

        assert_eq!(result.summary, "score was Some(6.0)");
    }

    #[tokio::test]
    async fn test_process_bytes_runs_full_workflow() {
        let processor = default_processor();
        let doc = docx_package(&["Jane Doe"], &[]);

        let processed = processor
            .process_bytes(&doc, "cv.docx", "Data Engineer", "Requires SQL", None)
            .await
            .unwrap();

        assert_eq!(processed.parsed.0["skills"], json!(["python", "sql"]));
        assert_eq!(processed.screened.overall_score(), Some(7.5));
        assert_eq!(processed.optimization.summary, "score was Some(7.5)");
    }

    #[tokio::test]
    async fn test_process_path_reads_from_disk() {
        let mut file = tempfile::Builder::new().suffix(".docx").tempfile().unwrap();
        file.write_all(&docx_package(&["Jane Doe"], &[])).unwrap();

        let processed = default_processor()
            .process_path(file.path(), "Data Engineer", "SQL", None)
            .await
            .unwrap();

        assert_eq!(processed.parsed.0["name"], json!("Jane"));
        assert!(processed.screened.0.contains_key("skill_match"));
    }
}
