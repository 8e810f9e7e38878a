//! Canonical structured shape of a standardized resume.
//!
//! Every scalar slot is always present. A value that has not been supplied yet holds the
//! unset sentinel [`UNSET`] rather than being absent, so validation and rendering never have
//! to distinguish "missing key" from "empty value".

use serde::{Deserialize, Serialize};

/// Reserved value meaning "field present but not yet supplied".
pub const UNSET: &str = "--";

/// True when a text slot holds nothing or only the sentinel. Used to spot template rows the
/// extractor emits for empty sections; completeness checks do not treat the sentinel as blank.
pub fn is_blank(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || trimmed == UNSET
}

fn unset() -> String {
    UNSET.to_string()
}

// ────────────────────────────────────────────────────────────────────────────
// Enumerated slots
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaritalStatus {
    #[default]
    #[serde(rename = "--")]
    Unset,
    Single,
    Married,
    Divorced,
    Widowed,
}

impl MaritalStatus {
    pub const ALL: [MaritalStatus; 5] = [
        MaritalStatus::Unset,
        MaritalStatus::Single,
        MaritalStatus::Married,
        MaritalStatus::Divorced,
        MaritalStatus::Widowed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MaritalStatus::Unset => UNSET,
            MaritalStatus::Single => "Single",
            MaritalStatus::Married => "Married",
            MaritalStatus::Divorced => "Divorced",
            MaritalStatus::Widowed => "Widowed",
        }
    }

    /// Case-insensitive lookup. Unknown values yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(value))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompensationType {
    #[default]
    #[serde(rename = "--")]
    Unset,
    Gross,
    Net,
    Hybrid,
}

impl CompensationType {
    pub const ALL: [CompensationType; 4] = [
        CompensationType::Unset,
        CompensationType::Gross,
        CompensationType::Net,
        CompensationType::Hybrid,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CompensationType::Unset => UNSET,
            CompensationType::Gross => "Gross",
            CompensationType::Net => "Net",
            CompensationType::Hybrid => "Hybrid",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(value))
    }
}

/// Fixed language catalog. Free-text languages are not representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Language {
    English,
    Spanish,
    Mandarin,
    Hindi,
    Arabic,
    Bengali,
    Portuguese,
    Russian,
    Japanese,
    German,
    French,
    Italian,
    Urdu,
    Turkish,
    Korean,
    Vietnamese,
    Persian,
    Polish,
    Dutch,
    Thai,
}

impl Language {
    pub const CATALOG: [Language; 20] = [
        Language::English,
        Language::Spanish,
        Language::Mandarin,
        Language::Hindi,
        Language::Arabic,
        Language::Bengali,
        Language::Portuguese,
        Language::Russian,
        Language::Japanese,
        Language::German,
        Language::French,
        Language::Italian,
        Language::Urdu,
        Language::Turkish,
        Language::Korean,
        Language::Vietnamese,
        Language::Persian,
        Language::Polish,
        Language::Dutch,
        Language::Thai,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Spanish => "Spanish",
            Language::Mandarin => "Mandarin",
            Language::Hindi => "Hindi",
            Language::Arabic => "Arabic",
            Language::Bengali => "Bengali",
            Language::Portuguese => "Portuguese",
            Language::Russian => "Russian",
            Language::Japanese => "Japanese",
            Language::German => "German",
            Language::French => "French",
            Language::Italian => "Italian",
            Language::Urdu => "Urdu",
            Language::Turkish => "Turkish",
            Language::Korean => "Korean",
            Language::Vietnamese => "Vietnamese",
            Language::Persian => "Persian",
            Language::Polish => "Polish",
            Language::Dutch => "Dutch",
            Language::Thai => "Thai",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::CATALOG
            .into_iter()
            .find(|lang| lang.as_str().eq_ignore_ascii_case(value))
    }
}

/// Collapses duplicates while keeping first-seen order.
pub fn dedup_languages(languages: impl IntoIterator<Item = Language>) -> Vec<Language> {
    let mut out: Vec<Language> = Vec::new();
    for lang in languages {
        if !out.contains(&lang) {
            out.push(lang);
        }
    }
    out
}

// ────────────────────────────────────────────────────────────────────────────
// Structured payload
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalInfo {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub age: String,
    pub marital_status: MaritalStatus,
}

impl Default for PersonalInfo {
    fn default() -> Self {
        Self {
            full_name: unset(),
            email: unset(),
            phone: unset(),
            location: unset(),
            age: unset(),
            marital_status: MaritalStatus::Unset,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub degree: String,
    pub field: String,
    pub institution: String,
    pub graduation_year: String,
}

impl Default for EducationEntry {
    fn default() -> Self {
        Self {
            degree: unset(),
            field: unset(),
            institution: unset(),
            graduation_year: unset(),
        }
    }
}

impl EducationEntry {
    pub fn is_placeholder(&self) -> bool {
        [
            &self.degree,
            &self.field,
            &self.institution,
            &self.graduation_year,
        ]
        .iter()
        .all(|v| is_blank(v))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub company: String,
    pub position: String,
    pub total_years_in_company: String,
    pub years_in_position: String,
    pub internal_rotation: String,
    pub achievements: String,
}

impl Default for ExperienceEntry {
    fn default() -> Self {
        Self {
            company: unset(),
            position: unset(),
            total_years_in_company: unset(),
            years_in_position: unset(),
            internal_rotation: unset(),
            achievements: unset(),
        }
    }
}

impl ExperienceEntry {
    pub fn is_placeholder(&self) -> bool {
        [
            &self.company,
            &self.position,
            &self.total_years_in_company,
            &self.years_in_position,
            &self.internal_rotation,
            &self.achievements,
        ]
        .iter()
        .all(|v| is_blank(v))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AchievementEntry {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub institution: String,
    pub year: String,
}

impl Default for AchievementEntry {
    fn default() -> Self {
        Self {
            kind: unset(),
            title: unset(),
            institution: unset(),
            year: unset(),
        }
    }
}

impl AchievementEntry {
    pub fn is_placeholder(&self) -> bool {
        [&self.kind, &self.title, &self.institution, &self.year]
            .iter()
            .all(|v| is_blank(v))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Compensation {
    pub gross_salary: String,
    pub net_salary: String,
    pub compensation_type: CompensationType,
}

impl Default for Compensation {
    fn default() -> Self {
        Self {
            gross_salary: unset(),
            net_salary: unset(),
            compensation_type: CompensationType::Unset,
        }
    }
}

/// Fully populated resume fields. Every slot exists; lists may be empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeFields {
    pub personal: PersonalInfo,
    pub education: Vec<EducationEntry>,
    pub languages: Vec<Language>,
    pub experience: Vec<ExperienceEntry>,
    pub achievements: Vec<AchievementEntry>,
    pub compensation: Compensation,
}

/// The record payload. `Empty` means extraction produced nothing usable and the reviewer
/// has not started manual entry yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "fields", rename_all = "snake_case")]
pub enum Payload {
    Empty,
    Structured(ResumeFields),
}

impl Payload {
    pub fn fields(&self) -> Option<&ResumeFields> {
        match self {
            Payload::Empty => None,
            Payload::Structured(fields) => Some(fields),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Payload::Empty)
    }

    /// Returns the structured fields, or a fully-unset set when the payload is empty.
    pub fn to_fields_or_default(&self) -> ResumeFields {
        self.fields().cloned().unwrap_or_default()
    }
}
