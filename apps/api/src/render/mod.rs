// Render pipeline: one canonical content traversal, three output encodings.
// Rendering is pure and deterministic; callers re-render on every download.

pub mod content;
pub mod document;
pub mod fonts;
pub mod metrics;
pub mod package;
pub mod pdf;
pub mod spreadsheet;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::record::ResumeFields;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("ZIP packaging failed: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("I/O error while packaging: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF serialization failed: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("bundled font could not be parsed: {0}")]
    Font(#[from] ttf_parser::FaceParsingError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Xlsx,
    Docx,
    Pdf,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Xlsx, ExportFormat::Docx, ExportFormat::Pdf];

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Docx => "docx",
            ExportFormat::Pdf => "pdf",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            ExportFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            ExportFormat::Pdf => "application/pdf",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[derive(Debug, Error)]
#[error("unsupported export format '{0}' (expected xlsx, docx or pdf)")]
pub struct UnknownFormat(pub String);

impl FromStr for ExportFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExportFormat::ALL
            .into_iter()
            .find(|f| f.extension().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownFormat(s.to_string()))
    }
}

/// Presentation settings shared by every format.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub brand_name: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            brand_name: "TalentWise HR".to_string(),
        }
    }
}

/// Renders `fields` into `format`. Identical input always yields identical bytes.
pub fn render(
    fields: &ResumeFields,
    format: ExportFormat,
    options: &RenderOptions,
) -> Result<Vec<u8>, RenderError> {
    match format {
        ExportFormat::Xlsx => spreadsheet::render_xlsx(fields),
        ExportFormat::Docx => document::render_docx(fields, options),
        ExportFormat::Pdf => pdf::render_pdf(fields, options),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::text::docx_paragraphs;
    use crate::record::schema::{AchievementEntry, EducationEntry, Language};
    use crate::record::validation::tests::complete_fields;
    use crate::render::content::canonical_lines;

    fn rich_fields() -> ResumeFields {
        let mut fields = complete_fields();
        fields.education.push(EducationEntry {
            degree: "MSc".into(),
            field: "Data Science".into(),
            institution: "UPM".into(),
            graduation_year: "2015".into(),
        });
        fields.languages.push(Language::French);
        fields.achievements.push(AchievementEntry {
            kind: "Award".into(),
            title: "Engineer of the Year".into(),
            institution: "Acme Corp".into(),
            year: "2021".into(),
        });
        fields
    }

    /// Names and prose outside ASCII: cp1252 punctuation and Latin Extended letters.
    fn international_fields() -> ResumeFields {
        let mut fields = rich_fields();
        fields.personal.full_name = "Łukasz Nowak".into();
        fields.personal.location = "Şişli, İstanbul".into();
        fields.education[0].institution = "Eötvös Loránd University".into();
        fields.experience[0].achievements = "Led 2019–2021 “core” migration €2M".into();
        fields
    }

    #[test]
    fn test_render_is_idempotent() {
        let fields = rich_fields();
        let options = RenderOptions::default();
        for format in ExportFormat::ALL {
            let first = render(&fields, format, &options).unwrap();
            let second = render(&fields, format, &options).unwrap();
            assert_eq!(first, second, "{format} output differs between renders");
        }
    }

    fn assert_equivalent_content(fields: &ResumeFields) {
        let options = RenderOptions::default();
        let expected: Vec<(String, String)> = canonical_lines(fields)
            .into_iter()
            .map(|l| (l.label.to_string(), l.value))
            .collect();

        let xlsx = render(fields, ExportFormat::Xlsx, &options).unwrap();
        assert_eq!(spreadsheet::tests::read_rows(xlsx), expected);

        let docx = render(fields, ExportFormat::Docx, &options).unwrap();
        let docx_pairs: Vec<(String, String)> = docx_paragraphs(&docx)
            .unwrap()
            .into_iter()
            .filter_map(|p| {
                p.split_once(": ")
                    .map(|(label, value)| (label.to_string(), value.to_string()))
            })
            .collect();
        assert_eq!(docx_pairs, expected);

        let pdf = render(fields, ExportFormat::Pdf, &options).unwrap();
        assert_eq!(pdf::tests::field_pairs(&pdf), expected);
    }

    #[test]
    fn test_formats_carry_equivalent_content() {
        assert_equivalent_content(&rich_fields());
    }

    #[test]
    fn test_formats_carry_equivalent_non_ascii_content() {
        assert_equivalent_content(&international_fields());
    }

    #[test]
    fn test_edit_changes_output() {
        let options = RenderOptions::default();
        let mut fields = rich_fields();
        let before = render(&fields, ExportFormat::Pdf, &options).unwrap();
        fields.personal.location = "Barcelona".into();
        let after = render(&fields, ExportFormat::Pdf, &options).unwrap();
        assert_ne!(before, after);
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("PDF".parse::<ExportFormat>().unwrap(), ExportFormat::Pdf);
        assert_eq!("xlsx".parse::<ExportFormat>().unwrap(), ExportFormat::Xlsx);
        assert!("csv".parse::<ExportFormat>().is_err());
        assert_eq!(ExportFormat::Docx.to_string(), "docx");
    }
}
