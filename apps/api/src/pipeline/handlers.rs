//! Axum route handlers for the resume API.
//!
//! Every endpoint takes a multipart upload with a `file` part; screening and
//! optimization also need `job_title`, `job_description` and optionally a
//! `weights` JSON object. No caching, no upload validation beyond what the
//! pipeline enforces.

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    Json,
};
use bytes::Bytes;
use serde::Serialize;

use crate::errors::AppError;
use crate::models::resume::{ScoringWeights, ScreeningResult, StructuredResume};
use crate::pipeline::ProcessedResume;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ScreenResponse {
    pub parsed: StructuredResume,
    pub screened: ScreeningResult,
}

#[derive(Debug)]
struct UploadedFile {
    filename: String,
    content: Bytes,
}

/// Fields collected from one multipart body. Unknown parts are ignored.
#[derive(Debug, Default)]
struct ResumeUpload {
    file: Option<UploadedFile>,
    job_title: Option<String>,
    job_description: Option<String>,
    weights: Option<String>,
}

impl ResumeUpload {
    async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut upload = ResumeUpload::default();

        while let Some(field) = multipart.next_field().await.map_err(malformed)? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "file" => {
                    let filename = field.file_name().unwrap_or_default().trim().to_string();
                    let content = field.bytes().await.map_err(malformed)?;
                    upload.file = Some(UploadedFile { filename, content });
                }
                "job_title" => upload.job_title = Some(field.text().await.map_err(malformed)?),
                "job_description" => {
                    upload.job_description = Some(field.text().await.map_err(malformed)?)
                }
                "weights" => upload.weights = Some(field.text().await.map_err(malformed)?),
                _ => {}
            }
        }

        Ok(upload)
    }

    fn file(&self) -> Result<&UploadedFile, AppError> {
        let file = self
            .file
            .as_ref()
            .ok_or_else(|| AppError::Validation("No file provided".to_string()))?;
        if file.filename.is_empty() {
            return Err(AppError::Validation("No file selected".to_string()));
        }
        Ok(file)
    }

    fn job(&self) -> Result<(&str, &str), AppError> {
        let title = self.job_title.as_deref().map(str::trim).unwrap_or_default();
        let description = self
            .job_description
            .as_deref()
            .map(str::trim)
            .unwrap_or_default();
        if title.is_empty() || description.is_empty() {
            return Err(AppError::Validation(
                "job_title and job_description are required".to_string(),
            ));
        }
        Ok((title, description))
    }

    /// A blank `weights` part is treated as absent.
    fn weights(&self) -> Result<Option<ScoringWeights>, AppError> {
        match self.weights.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => serde_json::from_str(raw).map(Some).map_err(|e| {
                AppError::Validation(format!("Invalid JSON format for weights: {e}"))
            }),
        }
    }
}

fn malformed(err: MultipartError) -> AppError {
    AppError::Validation(format!("Malformed multipart body: {err}"))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/parse
pub async fn handle_parse(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<StructuredResume>>, AppError> {
    let upload = ResumeUpload::read(multipart).await?;
    let file = upload.file()?;

    let parsed = state
        .processor
        .parse_bytes(&file.content, &file.filename)
        .await?;

    Ok(ApiResponse::ok(parsed))
}

/// POST /api/screen
///
/// Parses and screens in one call. The returned `parsed.skills` is the
/// reconciled set the scorer actually saw.
pub async fn handle_screen(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<ScreenResponse>>, AppError> {
    let upload = ResumeUpload::read(multipart).await?;
    let file = upload.file()?;
    let (job_title, job_description) = upload.job()?;
    let weights = upload.weights()?;

    let mut parsed = state
        .processor
        .parse_bytes(&file.content, &file.filename)
        .await?;
    let screened = state
        .processor
        .screen(&mut parsed, job_title, job_description, weights.as_ref())
        .await?;

    Ok(ApiResponse::ok(ScreenResponse { parsed, screened }))
}

/// POST /api/optimize
pub async fn handle_optimize(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<ProcessedResume>>, AppError> {
    let upload = ResumeUpload::read(multipart).await?;
    let file = upload.file()?;
    let (job_title, job_description) = upload.job()?;
    let weights = upload.weights()?;

    let processed = state
        .processor
        .process_bytes(
            &file.content,
            &file.filename,
            job_title,
            job_description,
            weights.as_ref(),
        )
        .await?;

    Ok(ApiResponse::ok(processed))
}
