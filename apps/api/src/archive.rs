//! Bulk export: every Ready record rendered in all formats, bundled into one ZIP.

use tracing::info;

use crate::lifecycle::registry::ResumeRecord;
use crate::record::Payload;
use crate::render::package::PackageWriter;
use crate::render::{render, ExportFormat, RenderError, RenderOptions};

pub const ARCHIVE_FILENAME: &str = "ready_cvs.zip";

#[derive(Debug)]
pub enum ArchiveOutcome {
    /// No record was Ready; there is nothing to bundle.
    Empty,
    Built { bytes: Vec<u8>, entries: Vec<String> },
}

/// Replaces every character outside `[A-Za-z0-9._-]` with `_`.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

pub fn build_archive(
    records: &[&ResumeRecord],
    options: &RenderOptions,
) -> Result<ArchiveOutcome, RenderError> {
    let mut pkg = PackageWriter::new();
    let mut entries = Vec::new();

    for record in records.iter().filter(|r| r.is_ready()) {
        let Payload::Structured(fields) = &record.payload else {
            continue;
        };
        let stem = sanitize_filename(&record.source_filename);
        for format in ExportFormat::ALL {
            let name = format!("{stem}_{}.{}", record.id, format.extension());
            pkg.add(&name, &render(fields, format, options)?)?;
            entries.push(name);
        }
    }

    if entries.is_empty() {
        return Ok(ArchiveOutcome::Empty);
    }

    let bytes = pkg.finish()?;
    info!(
        "Built archive with {} entries ({} bytes)",
        entries.len(),
        bytes.len()
    );
    Ok(ArchiveOutcome::Built { bytes, entries })
}
