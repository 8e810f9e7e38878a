//! Converts the extraction service's loosely-shaped JSON into a typed [`Payload`].
//!
//! This is the only place that reads the raw key names emitted by the extraction prompt.
//! Missing keys, wrong scalar types, and unknown enum values all collapse to the unset
//! sentinel so nothing downstream branches on presence.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::record::schema::{
    dedup_languages, AchievementEntry, Compensation, CompensationType, EducationEntry,
    ExperienceEntry, Language, MaritalStatus, Payload, PersonalInfo, ResumeFields, UNSET,
};

pub const KEY_PERSONAL: &str = "Personal Information";
const KEY_EDUCATION: &str = "Education";
const KEY_LANGUAGES: &str = "Languages";
const KEY_EXPERIENCE: &str = "Professional Experience";
const KEY_ACHIEVEMENTS: &str = "Other Achievements";
const KEY_COMPENSATION: &str = "Current Compensation";

/// Normalizes a raw structured payload.
///
/// Without a "Personal Information" object the whole payload is treated as unusable and
/// [`Payload::Empty`] is returned, never a partially populated record.
pub fn normalize_payload(raw: &Value) -> Payload {
    let Some(personal) = raw.get(KEY_PERSONAL).and_then(Value::as_object) else {
        debug!("Extraction payload lacks '{KEY_PERSONAL}', treating as empty");
        return Payload::Empty;
    };

    let fields = ResumeFields {
        personal: normalize_personal(personal),
        education: objects(raw, KEY_EDUCATION)
            .map(|o| EducationEntry {
                degree: text(o, "Degree"),
                field: text(o, "Field"),
                institution: text(o, "Institution"),
                graduation_year: text(o, "Graduation Year"),
            })
            .filter(|e| !e.is_placeholder())
            .collect(),
        languages: normalize_languages(raw.get(KEY_LANGUAGES)),
        experience: objects(raw, KEY_EXPERIENCE)
            .map(|o| ExperienceEntry {
                company: text(o, "Company"),
                position: text(o, "Position"),
                total_years_in_company: text(o, "Total Years in Company"),
                years_in_position: text(o, "Years in Position"),
                internal_rotation: text(o, "Internal Rotation"),
                achievements: text(o, "Achievements and Responsibilities"),
            })
            .filter(|e| !e.is_placeholder())
            .collect(),
        achievements: objects(raw, KEY_ACHIEVEMENTS)
            .map(|o| AchievementEntry {
                kind: text(o, "Type"),
                title: text(o, "Title"),
                institution: text(o, "Institution"),
                year: text(o, "Year"),
            })
            .filter(|e| !e.is_placeholder())
            .collect(),
        compensation: normalize_compensation(raw.get(KEY_COMPENSATION).and_then(Value::as_object)),
    };

    Payload::Structured(fields)
}

fn normalize_personal(obj: &Map<String, Value>) -> PersonalInfo {
    let marital_raw = text(obj, "Marital Status");
    let marital_status = MaritalStatus::parse(&marital_raw).unwrap_or_else(|| {
        debug!("Unrecognized marital status '{marital_raw}', leaving unset");
        MaritalStatus::Unset
    });

    PersonalInfo {
        full_name: text(obj, "Full Name"),
        email: text(obj, "Email"),
        phone: text(obj, "Phone"),
        location: text(obj, "Location"),
        age: text(obj, "Age"),
        marital_status,
    }
}

fn normalize_compensation(obj: Option<&Map<String, Value>>) -> Compensation {
    let Some(obj) = obj else {
        return Compensation::default();
    };
    let kind_raw = text(obj, "Compensation Type");
    Compensation {
        gross_salary: text(obj, "Gross Salary"),
        net_salary: text(obj, "Net Salary"),
        compensation_type: CompensationType::parse(&kind_raw).unwrap_or(CompensationType::Unset),
    }
}

fn normalize_languages(value: Option<&Value>) -> Vec<Language> {
    let Some(items) = value.and_then(Value::as_array) else {
        return Vec::new();
    };
    let parsed = items.iter().filter_map(Value::as_str).filter_map(|name| {
        let lang = Language::parse(name);
        if lang.is_none() {
            warn!("Dropping language outside the catalog: '{name}'");
        }
        lang
    });
    dedup_languages(parsed)
}

/// Iterates the objects of a list-valued key. Non-object items are skipped.
fn objects<'a>(raw: &'a Value, key: &str) -> impl Iterator<Item = &'a Map<String, Value>> {
    raw.get(key)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
}

/// Reads a scalar slot. Strings are trimmed, numbers are stringified, and anything else
/// (missing, null, nested, blank) becomes the sentinel.
fn text(obj: &Map<String, Value>, key: &str) -> String {
    match obj.get(key) {
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => UNSET.to_string(),
    }
}
