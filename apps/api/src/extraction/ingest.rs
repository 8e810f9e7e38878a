//! Upload batch ingestion: admission, text extraction, structuring, registration.
//!
//! Each file is processed in order with its own failure isolation. A file that fails
//! extraction still becomes a record, with an empty payload and a note for the reviewer.
//! Files the registry will not admit (capacity, duplicate name) create nothing.

use std::sync::Arc;

use bytes::Bytes;
use serde::Serialize;
use tracing::{info, warn};

use crate::extraction::structured::{ExtractionResult, StructuredExtractor};
use crate::extraction::text::{DocumentKind, TextExtractionError, TextExtractor};
use crate::lifecycle::registry::{IngestRejection, RecordSummary};
use crate::lifecycle::Registry;
use crate::record::normalize::{normalize_payload, KEY_PERSONAL};
use crate::record::Payload;

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkippedUpload {
    pub filename: String,
    pub reason: IngestRejection,
    pub message: String,
}

#[derive(Debug, Default, Serialize)]
pub struct IngestReport {
    pub created: Vec<RecordSummary>,
    pub skipped: Vec<SkippedUpload>,
}

pub async fn ingest_batch(
    registry: &mut Registry,
    files: Vec<UploadedFile>,
    text_extractor: Arc<dyn TextExtractor>,
    extractor: &dyn StructuredExtractor,
) -> IngestReport {
    let mut report = IngestReport::default();

    for file in files {
        if let Err(rejection) = registry.admit(&file.filename) {
            warn!("Skipping upload '{}': {rejection}", file.filename);
            report.skipped.push(skipped(file.filename, rejection));
            continue;
        }

        let (payload, note) = extract_payload(&file, text_extractor.clone(), extractor).await;
        match registry.register(&file.filename, payload, note) {
            Ok(record) => report.created.push(record.summary()),
            Err(rejection) => {
                warn!("Skipping upload '{}': {rejection}", file.filename);
                report.skipped.push(skipped(file.filename, rejection));
            }
        }
    }

    info!(
        "Upload batch processed: {} created, {} skipped",
        report.created.len(),
        report.skipped.len()
    );
    report
}

fn skipped(filename: String, reason: IngestRejection) -> SkippedUpload {
    SkippedUpload {
        filename,
        message: reason.to_string(),
        reason,
    }
}

/// Runs both extraction stages. Any failure yields an empty payload plus the reason.
async fn extract_payload(
    file: &UploadedFile,
    text_extractor: Arc<dyn TextExtractor>,
    extractor: &dyn StructuredExtractor,
) -> (Payload, Option<String>) {
    let text = match extract_text(file, text_extractor).await {
        Ok(text) => text,
        Err(e) => {
            warn!("Text extraction failed for '{}': {e}", file.filename);
            return (Payload::Empty, Some(format!("needs manual review: {e}")));
        }
    };

    match extractor.extract(&text).await {
        ExtractionResult::Success(raw) => match normalize_payload(&raw) {
            Payload::Empty => (
                Payload::Empty,
                Some(format!(
                    "needs manual review: extraction result lacked '{KEY_PERSONAL}'"
                )),
            ),
            payload => (payload, None),
        },
        ExtractionResult::Failure(reason) => {
            warn!("Structured extraction failed for '{}': {reason}", file.filename);
            (Payload::Empty, Some(format!("needs manual review: {reason}")))
        }
    }
}

async fn extract_text(
    file: &UploadedFile,
    text_extractor: Arc<dyn TextExtractor>,
) -> Result<String, TextExtractionError> {
    let kind = DocumentKind::detect(&file.filename, file.content_type.as_deref())
        .ok_or(TextExtractionError::Unsupported)?;
    let bytes = file.bytes.clone();

    tokio::task::spawn_blocking(move || text_extractor.extract(&bytes, kind))
        .await
        .map_err(|e| {
            TextExtractionError::Io(std::io::Error::other(format!(
                "text extraction task failed: {e}"
            )))
        })?
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::lifecycle::registry::RecordStatus;
    use crate::lifecycle::RegistrySettings;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Treats every upload as UTF-8 text regardless of kind.
    pub(crate) struct Utf8Extractor;

    impl TextExtractor for Utf8Extractor {
        fn extract(&self, bytes: &[u8], _kind: DocumentKind) -> Result<String, TextExtractionError> {
            String::from_utf8(bytes.to_vec()).map_err(|_| TextExtractionError::Encoding)
        }
    }

    /// Returns a payload naming the uploaded text as the candidate's full name, or a
    /// failure when the text contains "FAIL".
    pub(crate) struct EchoExtractor {
        pub calls: AtomicUsize,
    }

    impl EchoExtractor {
        pub(crate) fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }
    }

    pub(crate) fn sample_extraction(full_name: &str) -> Value {
        json!({
            "Personal Information": {
                "Full Name": full_name,
                "Email": "jane@example.com",
                "Phone": "+34 600 000 000",
                "Location": "Madrid",
                "Age": "34",
                "Marital Status": "--"
            },
            "Education": [{"Degree": "BSc", "Field": "Physics", "Institution": "UCM", "Graduation Year": "2012"}],
            "Languages": ["Spanish", "English"],
            "Professional Experience": [{
                "Company": "Acme", "Position": "Engineer", "Total Years in Company": "5",
                "Years in Position": "3", "Achievements and Responsibilities": "Built things",
                "Internal Rotation": "--"
            }],
            "Other Achievements": [{"Type": "Award", "Title": "MVP", "Institution": "Acme", "Year": "2020"}],
            "Current Compensation": {"Gross Salary": "60000", "Net Salary": "--", "Compensation Type": "Gross"}
        })
    }

    #[async_trait]
    impl StructuredExtractor for EchoExtractor {
        async fn extract(&self, text: &str) -> ExtractionResult {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if text.contains("FAIL") {
                ExtractionResult::Failure("upstream timeout".to_string())
            } else if text.contains("NOPERSONAL") {
                ExtractionResult::Success(json!({"Education": []}))
            } else {
                ExtractionResult::Success(sample_extraction(text.trim()))
            }
        }
    }

    fn upload(name: &str, body: &str) -> UploadedFile {
        UploadedFile {
            filename: name.to_string(),
            content_type: Some("text/plain".to_string()),
            bytes: Bytes::from(body.to_string()),
        }
    }

    fn registry() -> Registry {
        Registry::new(RegistrySettings::default())
    }

    #[tokio::test]
    async fn test_six_uploads_create_five_records() {
        let mut reg = registry();
        let extractor = EchoExtractor::new();
        let files = (0..6).map(|i| upload(&format!("cv{i}.txt"), "Jane")).collect();

        let report = ingest_batch(&mut reg, files, Arc::new(Utf8Extractor), &extractor).await;

        assert_eq!(report.created.len(), 5);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].filename, "cv5.txt");
        assert_eq!(
            report.skipped[0].reason,
            IngestRejection::CapacityReached { max: 5 }
        );
        assert_eq!(reg.list().len(), 5);
        assert_eq!(extractor.calls.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn test_duplicate_filename_is_skipped() {
        let mut reg = registry();
        let extractor = EchoExtractor::new();
        ingest_batch(
            &mut reg,
            vec![upload("cv.txt", "Jane")],
            Arc::new(Utf8Extractor),
            &extractor,
        )
        .await;

        let report = ingest_batch(
            &mut reg,
            vec![upload("cv.txt", "Other"), upload("cv2.txt", "John")],
            Arc::new(Utf8Extractor),
            &extractor,
        )
        .await;

        assert_eq!(report.created.len(), 1);
        assert_eq!(report.skipped[0].reason, IngestRejection::DuplicateFilename);
        assert_eq!(reg.list().len(), 2);
    }

    #[tokio::test]
    async fn test_extraction_failure_creates_empty_record() {
        let mut reg = registry();
        let report = ingest_batch(
            &mut reg,
            vec![upload("bad.txt", "FAIL"), upload("good.txt", "Jane")],
            Arc::new(Utf8Extractor),
            &EchoExtractor::new(),
        )
        .await;

        assert_eq!(report.created.len(), 2);
        let bad = reg.get(report.created[0].id).unwrap();
        assert_eq!(bad.status, RecordStatus::Unreviewed);
        assert!(bad.payload.is_empty());
        assert!(bad.extraction_note.as_deref().unwrap().contains("upstream timeout"));

        let good = reg.get(report.created[1].id).unwrap();
        assert_eq!(good.payload.fields().unwrap().personal.full_name, "Jane");
        assert!(good.extraction_note.is_none());
    }

    #[tokio::test]
    async fn test_missing_personal_information_yields_empty_payload() {
        let mut reg = registry();
        let report = ingest_batch(
            &mut reg,
            vec![upload("np.txt", "NOPERSONAL")],
            Arc::new(Utf8Extractor),
            &EchoExtractor::new(),
        )
        .await;
        let record = reg.get(report.created[0].id).unwrap();
        assert!(record.payload.is_empty());
        assert!(report.created[0].needs_manual_entry);
    }

    #[tokio::test]
    async fn test_unsupported_type_still_registers() {
        let mut reg = registry();
        let extractor = EchoExtractor::new();
        let file = UploadedFile {
            filename: "photo.png".to_string(),
            content_type: Some("image/png".to_string()),
            bytes: Bytes::from_static(b"\x89PNG"),
        };
        let report = ingest_batch(&mut reg, vec![file], Arc::new(Utf8Extractor), &extractor).await;

        assert_eq!(report.created.len(), 1);
        assert!(report.created[0].needs_manual_entry);
        assert_eq!(extractor.calls.load(Ordering::SeqCst), 0);
    }
}
