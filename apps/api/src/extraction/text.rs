//! Raw text extraction from uploaded binaries (PDF, DOCX, plain text).
//!
//! Extraction is CPU-bound; callers run it inside `tokio::task::spawn_blocking`.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    PlainText,
}

impl DocumentKind {
    /// Detects the document kind from the filename extension, falling back to the
    /// declared content type.
    pub fn detect(filename: &str, content_type: Option<&str>) -> Option<Self> {
        let extension = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase());
        let by_extension = match extension.as_deref() {
            Some("pdf") => Some(DocumentKind::Pdf),
            Some("docx") => Some(DocumentKind::Docx),
            Some("txt") | Some("md") => Some(DocumentKind::PlainText),
            _ => None,
        };

        by_extension.or_else(|| {
            let mime = content_type?.split(';').next()?.trim().to_ascii_lowercase();
            match mime.as_str() {
                "application/pdf" => Some(DocumentKind::Pdf),
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => {
                    Some(DocumentKind::Docx)
                }
                m if m.starts_with("text/") => Some(DocumentKind::PlainText),
                _ => None,
            }
        })
    }
}

#[derive(Debug, Error)]
pub enum TextExtractionError {
    #[error("unsupported document type")]
    Unsupported,

    #[error("PDF text extraction failed: {0}")]
    Pdf(String),

    #[error("DOCX archive unreadable: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("DOCX XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("document is not valid UTF-8 text")]
    Encoding,

    #[error("document contains no extractable text")]
    NoText,
}

/// Turns an uploaded binary into plain text.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, bytes: &[u8], kind: DocumentKind) -> Result<String, TextExtractionError>;
}

/// Default extractor: pdf-extract for PDF, zip + quick-xml for DOCX.
pub struct DocumentTextExtractor;

impl TextExtractor for DocumentTextExtractor {
    fn extract(&self, bytes: &[u8], kind: DocumentKind) -> Result<String, TextExtractionError> {
        let text = match kind {
            DocumentKind::Pdf => pdf_extract::extract_text_from_mem(bytes)
                .map_err(|e| TextExtractionError::Pdf(e.to_string()))?,
            DocumentKind::Docx => docx_paragraphs(bytes)?.join("\n"),
            DocumentKind::PlainText => String::from_utf8(bytes.to_vec())
                .map_err(|_| TextExtractionError::Encoding)?,
        };

        if text.trim().is_empty() {
            return Err(TextExtractionError::NoText);
        }
        Ok(text)
    }
}

/// Non-empty paragraphs of `word/document.xml`, runs concatenated in order.
pub fn docx_paragraphs(bytes: &[u8]) -> Result<Vec<String>, TextExtractionError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
    let mut xml = String::new();
    archive.by_name("word/document.xml")?.read_to_string(&mut xml)?;

    let mut reader = Reader::from_str(&xml);
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_text = false;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"p" => current.clear(),
                b"t" => in_text = true,
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"tab" => current.push('\t'),
                b"br" => current.push('\n'),
                _ => {}
            },
            Event::End(e) => match e.local_name().as_ref() {
                b"p" => {
                    if !current.trim().is_empty() {
                        paragraphs.push(std::mem::take(&mut current));
                    }
                }
                b"t" => in_text = false,
                _ => {}
            },
            Event::Text(e) if in_text => {
                current.push_str(&e.unescape()?);
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(paragraphs)
}
