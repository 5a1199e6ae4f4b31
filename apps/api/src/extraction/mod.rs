//! Document Text Extractor: recovers body text and hyperlink targets from resume files.
//!
//! Dispatches on file extension (`.pdf`, `.docx`, `.doc`). The output is the body
//! text followed, when any links were found, by a delimited URL block:
//!
//! ```text
//! <body>
//!
//! EXTRACTED URLS/LINKS:
//! - https://first.example
//! - https://second.example
//! ```

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

pub mod docx;
pub mod pdf;

pub use pdf::PdfExtractor;

pub const URL_BLOCK_HEADER: &str = "EXTRACTED URLS/LINKS:";
pub const SUPPORTED_EXTENSIONS: &str = ".pdf, .docx, .doc";

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Unsupported file format: {extension}. Supported formats: {}", SUPPORTED_EXTENSIONS)]
    UnsupportedFormat { extension: String },

    #[error("Unreadable document: {0}")]
    CorruptDocument(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Word,
}

impl DocumentFormat {
    /// Selects a handler from the filename's extension (case-insensitive).
    pub fn from_filename(filename: &str) -> Result<Self, ExtractionError> {
        let extension = Path::new(filename)
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
            .unwrap_or_default();

        match extension.as_str() {
            ".pdf" => Ok(DocumentFormat::Pdf),
            ".docx" | ".doc" => Ok(DocumentFormat::Word),
            _ => Err(ExtractionError::UnsupportedFormat { extension }),
        }
    }
}

/// Outcome of recovering a single page or link. Skips carry a reason for logging
/// and never fail the surrounding document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recovered<T> {
    Found(T),
    Skipped(String),
}

/// Insertion-ordered, deduplicated URL list.
#[derive(Debug, Default)]
pub struct LinkSet {
    urls: Vec<String>,
    seen: HashSet<String>,
}

impl LinkSet {
    /// Returns false when the URL was already present.
    pub fn insert(&mut self, url: String) -> bool {
        if self.seen.contains(&url) {
            return false;
        }
        self.seen.insert(url.clone());
        self.urls.push(url);
        true
    }

    pub fn into_vec(self) -> Vec<String> {
        self.urls
    }
}

/// Body text plus discovered hyperlink URLs (deduplicated, first-seen order).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    pub body: String,
    pub urls: Vec<String>,
}

impl ExtractedText {
    pub fn new(body: String, urls: Vec<String>) -> Self {
        Self { body, urls }
    }

    /// Body text with the URL block appended; the block is omitted when there are no URLs.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ExtractedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.body)?;
        if self.urls.is_empty() {
            return Ok(());
        }
        write!(f, "\n\n{URL_BLOCK_HEADER}\n")?;
        for url in &self.urls {
            writeln!(f, "- {url}")?;
        }
        Ok(())
    }
}

/// Stateless entry point; safe to share between concurrent requests.
#[derive(Debug, Clone, Default)]
pub struct DocumentExtractor {
    pdf: PdfExtractor,
}

impl DocumentExtractor {
    pub fn new(pdf: PdfExtractor) -> Self {
        Self { pdf }
    }

    /// Extracts from an uploaded byte stream; `filename` only selects the format.
    pub fn extract_from_bytes(
        &self,
        bytes: &[u8],
        filename: &str,
    ) -> Result<ExtractedText, ExtractionError> {
        let format = DocumentFormat::from_filename(filename)?;
        info!("Extracting text from uploaded {format:?} document: {filename}");

        match format {
            DocumentFormat::Pdf => self.pdf.extract_bytes(bytes),
            DocumentFormat::Word => docx::extract(bytes),
        }
    }

    pub fn extract_from_path(&self, path: &Path) -> Result<ExtractedText, ExtractionError> {
        if !path.exists() {
            return Err(ExtractionError::NotFound(path.to_path_buf()));
        }
        let format = DocumentFormat::from_filename(&path.to_string_lossy())?;
        info!("Extracting text from {format:?} document: {}", path.display());

        match format {
            DocumentFormat::Pdf => self.pdf.extract_path(path),
            DocumentFormat::Word => docx::extract(&std::fs::read(path)?),
        }
    }
}
