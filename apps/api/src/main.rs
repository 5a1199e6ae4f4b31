mod config;
mod errors;
mod extraction;
mod llm_client;
mod models;
mod pipeline;
mod routes;
mod skills;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::extraction::pdf::PdfExtractor;
use crate::extraction::DocumentExtractor;
use crate::llm_client::LlmClient;
use crate::pipeline::collaborators::{
    LlmResumeInterpreter, LlmResumeScorer, LlmSuggestionGenerator,
};
use crate::pipeline::{Collaborators, ResumeProcessor};
use crate::routes::build_router;
use crate::skills::synonyms::SynonymTable;
use crate::state::AppState;

/// Suggestion generation runs warmer than parsing and scoring.
const OPTIMIZER_TEMPERATURE: f32 = 0.5;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume screener v{}", env!("CARGO_PKG_VERSION"));

    // Synonym table shared by the normalizer and expander
    let synonyms = Arc::new(load_synonyms(&config)?);
    info!("Synonym table loaded ({} families)", synonyms.len());

    // One connection pool, one client per collaborator model
    let llm = LlmClient::new(
        config.llm_api_key.clone(),
        config.llm_api_url.clone(),
        config.parser_model.clone(),
    )?;
    let collaborators = Collaborators {
        interpreter: Arc::new(LlmResumeInterpreter::new(llm.clone())),
        scorer: Arc::new(LlmResumeScorer::new(
            llm.with_model(config.screener_model.clone()),
        )),
        suggester: Arc::new(LlmSuggestionGenerator::new(
            llm.with_model(config.optimizer_model.clone())
                .with_temperature(OPTIMIZER_TEMPERATURE),
        )),
    };
    info!(
        "LLM collaborators initialized (parser: {}, screener: {}, optimizer: {})",
        config.parser_model, config.screener_model, config.optimizer_model
    );

    let processor = ResumeProcessor::new(
        build_extractor(&config),
        synonyms,
        config.skill_match_threshold,
        collaborators,
    );
    info!(
        "Skill expansion threshold: {}",
        config.skill_match_threshold
    );

    let state = AppState {
        processor: Arc::new(processor),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_extractor(config: &Config) -> DocumentExtractor {
    let pdf = match &config.pdf_staging_dir {
        Some(dir) => {
            info!("Staging PDF uploads in {}", dir.display());
            PdfExtractor::default().with_staging_dir(dir.clone())
        }
        None => PdfExtractor::default(),
    };
    DocumentExtractor::new(pdf)
}

fn load_synonyms(config: &Config) -> Result<SynonymTable> {
    match &config.skill_synonyms_path {
        Some(path) => SynonymTable::from_toml_file(path)
            .with_context(|| format!("Failed to load skill synonyms from {}", path.display())),
        None => Ok(SynonymTable::default()),
    }
}
