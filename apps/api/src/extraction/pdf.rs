//! PDF extraction via `lopdf`.
//!
//! Page text is read from memory. Link URIs come from a second pass over a
//! file-backed copy: byte uploads are staged to a named temporary file that is
//! removed when the pass ends, whether it succeeds, fails or unwinds.

use std::io::Write;
use std::path::{Path, PathBuf};

use lopdf::{Document, Object, ObjectId};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::extraction::{ExtractedText, ExtractionError, LinkSet, Recovered};

#[derive(Debug, Clone, Default)]
pub struct PdfExtractor {
    /// Where byte uploads are staged for the link pass. `None` = system temp dir.
    staging_dir: Option<PathBuf>,
}

impl PdfExtractor {
    pub fn with_staging_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.staging_dir = Some(dir.into());
        self
    }

    pub fn extract_bytes(&self, bytes: &[u8]) -> Result<ExtractedText, ExtractionError> {
        let document = load(bytes)?;
        let body = page_texts(&document);

        let urls = match self.stage(bytes) {
            Ok(staged) => {
                let urls = links_from_file(staged.path());
                if let Err(e) = staged.close() {
                    warn!("Could not remove staged PDF: {e}");
                }
                urls
            }
            Err(e) => {
                warn!("Could not stage PDF for link extraction: {e}");
                Vec::new()
            }
        };

        Ok(ExtractedText::new(body, urls))
    }

    pub fn extract_path(&self, path: &Path) -> Result<ExtractedText, ExtractionError> {
        let document = load(&std::fs::read(path)?)?;
        let body = page_texts(&document);
        Ok(ExtractedText::new(body, links_from_file(path)))
    }

    fn stage(&self, bytes: &[u8]) -> std::io::Result<NamedTempFile> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("resume-").suffix(".pdf");
        let mut file = match &self.staging_dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };
        file.write_all(bytes)?;
        file.flush()?;
        Ok(file)
    }
}

fn load(bytes: &[u8]) -> Result<Document, ExtractionError> {
    Document::load_mem(bytes)
        .map_err(|e| ExtractionError::CorruptDocument(format!("invalid PDF: {e}")))
}

/// Page texts in document order joined by newlines. A page that fails to
/// extract contributes an empty string.
fn page_texts(document: &Document) -> String {
    document
        .get_pages()
        .keys()
        .map(|&page_number| match document.extract_text(&[page_number]) {
            Ok(text) => Recovered::Found(text),
            Err(e) => Recovered::Skipped(format!("page {page_number}: {e}")),
        })
        .map(|page| match page {
            Recovered::Found(text) => text.trim_end_matches('\n').to_string(),
            Recovered::Skipped(reason) => {
                debug!("Text extraction failed, using empty page: {reason}");
                String::new()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Best-effort: an unreadable file yields no links rather than an error.
fn links_from_file(path: &Path) -> Vec<String> {
    match Document::load(path) {
        Ok(document) => link_targets(&document),
        Err(e) => {
            warn!("Could not extract URLs from PDF: {e}");
            Vec::new()
        }
    }
}

/// URI targets of every link annotation, deduplicated in first-seen order.
pub fn link_targets(document: &Document) -> Vec<String> {
    let mut links = LinkSet::default();
    for (page_number, page_id) in document.get_pages() {
        for outcome in page_links(document, page_id) {
            match outcome {
                Recovered::Found(url) => {
                    links.insert(url);
                }
                Recovered::Skipped(reason) => {
                    debug!("Page {page_number}: skipped annotation ({reason})");
                }
            }
        }
    }
    links.into_vec()
}

fn page_links(document: &Document, page_id: ObjectId) -> Vec<Recovered<String>> {
    let Ok(annots) = document
        .get_dictionary(page_id)
        .and_then(|page| page.get(b"Annots"))
    else {
        return Vec::new();
    };

    match resolve(document, annots) {
        Ok(Object::Array(entries)) => entries.iter().map(|e| link_uri(document, e)).collect(),
        Ok(single) => vec![link_uri(document, single)],
        Err(e) => vec![Recovered::Skipped(format!("unresolvable /Annots: {e}"))],
    }
}

fn link_uri(document: &Document, entry: &Object) -> Recovered<String> {
    let annotation = match resolve(document, entry).and_then(|o| o.as_dict()) {
        Ok(dict) => dict,
        Err(e) => return Recovered::Skipped(format!("bad annotation reference: {e}")),
    };

    match annotation.get(b"Subtype").and_then(|o| o.as_name()) {
        Ok(name) if name == b"Link" => {}
        _ => return Recovered::Skipped("not a link".to_string()),
    }

    let action = match annotation
        .get(b"A")
        .and_then(|a| resolve(document, a))
        .and_then(|a| a.as_dict())
    {
        Ok(dict) => dict,
        Err(e) => return Recovered::Skipped(format!("no usable action: {e}")),
    };

    let uri = match action.get(b"URI").and_then(|u| resolve(document, u)) {
        Ok(uri) => uri,
        Err(_) => return Recovered::Skipped("action has no URI".to_string()),
    };

    match pdf_string(uri) {
        Some(url) if !url.is_empty() => Recovered::Found(url),
        _ => Recovered::Skipped("empty or non-string URI".to_string()),
    }
}

fn resolve<'a>(document: &'a Document, object: &'a Object) -> Result<&'a Object, lopdf::Error> {
    match object {
        Object::Reference(id) => document.get_object(*id),
        other => Ok(other),
    }
}

/// Decodes a PDF string (UTF-16BE with BOM, otherwise byte-wise) or name.
fn pdf_string(object: &Object) -> Option<String> {
    let bytes = match object {
        Object::String(bytes, _) | Object::Name(bytes) => bytes,
        _ => return None,
    };
    let text = match bytes.strip_prefix(&[0xFE, 0xFF]) {
        Some(utf16) => {
            let units: Vec<u16> = utf16
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16_lossy(&units)
        }
        None => String::from_utf8_lossy(bytes).into_owned(),
    };
    Some(text.trim().to_string())
}
