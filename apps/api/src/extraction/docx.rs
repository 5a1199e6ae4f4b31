//! Word (OOXML) extraction: paragraph text from `word/document.xml`, hyperlink
//! targets from `word/_rels/document.xml.rels`. Works entirely in memory.

use std::io::{Cursor, Read};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::warn;
use zip::result::ZipError;
use zip::ZipArchive;

use crate::extraction::{ExtractedText, ExtractionError, LinkSet};

const DOCUMENT_PART: &str = "word/document.xml";
const RELATIONSHIPS_PART: &str = "word/_rels/document.xml.rels";

pub fn extract(bytes: &[u8]) -> Result<ExtractedText, ExtractionError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| corrupt(format!("not a Word package: {e}")))?;

    let document_xml = read_part(&mut archive, DOCUMENT_PART)?
        .ok_or_else(|| corrupt(format!("missing {DOCUMENT_PART}")))?;
    let body = paragraphs(&document_xml)?.join("\n");

    let urls = match read_part(&mut archive, RELATIONSHIPS_PART) {
        Ok(Some(rels)) => hyperlink_targets(&rels),
        Ok(None) => Vec::new(),
        Err(e) => {
            warn!("Could not extract URLs from DOCX: {e}");
            Vec::new()
        }
    };

    Ok(ExtractedText::new(body, urls))
}

fn read_part<R: Read + std::io::Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Result<Option<String>, ExtractionError> {
    let mut file = match archive.by_name(name) {
        Ok(file) => file,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(corrupt(format!("{name}: {e}"))),
    };
    let mut xml = String::new();
    file.read_to_string(&mut xml)
        .map_err(|e| corrupt(format!("{name}: {e}")))?;
    Ok(Some(xml))
}

/// Text of every `<w:p>` in document order. Run text comes from `<w:t>`;
/// `<w:tab/>` and `<w:br/>`/`<w:cr/>` inside runs become `\t` and `\n`.
/// Only the `mc:Choice` branch of `mc:AlternateContent` is read; its
/// `mc:Fallback` repeats the same content for older readers.
fn paragraphs(xml: &str) -> Result<Vec<String>, ExtractionError> {
    let mut reader = Reader::from_reader(xml.as_bytes());
    reader.config_mut().trim_text(false);

    let mut buf = Vec::new();
    let mut out = Vec::new();
    // Text boxes nest paragraphs inside runs, hence a stack.
    let mut open: Vec<String> = Vec::new();
    let mut run_depth = 0usize;
    let mut in_text = false;
    let mut fallback_depth = 0usize;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) if e.local_name().as_ref() == b"Fallback" => {
                fallback_depth += 1
            }
            Ok(Event::End(ref e)) if e.local_name().as_ref() == b"Fallback" => {
                fallback_depth = fallback_depth.saturating_sub(1)
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(corrupt(format!(
                    "{DOCUMENT_PART} at byte {}: {e}",
                    reader.buffer_position()
                )))
            }
            Ok(_) if fallback_depth > 0 => {}
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"p" => open.push(String::new()),
                b"r" => run_depth += 1,
                b"t" => in_text = true,
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match e.local_name().as_ref() {
                b"p" => out.push(String::new()),
                b"tab" if run_depth > 0 => push_char(&mut open, '\t'),
                b"br" | b"cr" if run_depth > 0 => push_char(&mut open, '\n'),
                _ => {}
            },
            Ok(Event::Text(ref e)) if in_text => {
                let text = e
                    .unescape()
                    .map_err(|err| corrupt(format!("{DOCUMENT_PART}: {err}")))?;
                if let Some(paragraph) = open.last_mut() {
                    paragraph.push_str(&text);
                }
            }
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"p" => {
                    if let Some(paragraph) = open.pop() {
                        out.push(paragraph);
                    }
                }
                b"r" => run_depth = run_depth.saturating_sub(1),
                b"t" => in_text = false,
                _ => {}
            },
            _ => {}
        }
        buf.clear();
    }

    Ok(out)
}

fn push_char(open: &mut [String], c: char) {
    if let Some(paragraph) = open.last_mut() {
        paragraph.push(c);
    }
}

/// External hyperlink targets in relationship order, excluding `#anchor` targets.
/// Malformed XML stops the scan and keeps what was already found.
fn hyperlink_targets(xml: &str) -> Vec<String> {
    let mut reader = Reader::from_reader(xml.as_bytes());
    let mut buf = Vec::new();
    let mut links = LinkSet::default();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e))
                if e.local_name().as_ref() == b"Relationship" =>
            {
                if let Some(target) = hyperlink_target(e) {
                    links.insert(target);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                warn!("Malformed DOCX relationships, keeping partial links: {e}");
                break;
            }
            _ => {}
        }
        buf.clear();
    }

    links.into_vec()
}

fn hyperlink_target(relationship: &BytesStart) -> Option<String> {
    let mut rel_type = None;
    let mut target = None;
    for attr in relationship.attributes().flatten() {
        let value = attr
            .unescape_value()
            .map(|v| v.into_owned())
            .unwrap_or_else(|_| String::from_utf8_lossy(&attr.value).into_owned());
        match attr.key.as_ref() {
            b"Type" => rel_type = Some(value),
            b"Target" => target = Some(value),
            _ => {}
        }
    }

    let target = target?.trim().to_string();
    let is_hyperlink = rel_type.is_some_and(|t| t.contains("hyperlink"));
    (is_hyperlink && !target.is_empty() && !target.starts_with('#')).then_some(target)
}

fn corrupt(detail: String) -> ExtractionError {
    ExtractionError::CorruptDocument(detail)
}
