use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::record::schema::{MaritalStatus, Payload, ResumeFields};

/// A single failed completeness check. Serializes as its display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldErrorKind {
    #[serde(rename = "Full Name")]
    FullName,
    Email,
    Phone,
    Location,
    Age,
    #[serde(rename = "Marital Status")]
    MaritalStatus,
    Education,
    Languages,
    #[serde(rename = "Professional Experience")]
    ProfessionalExperience,
    #[serde(rename = "Other Achievements")]
    OtherAchievements,
    Salary,
    /// The payload has no structured fields at all.
    #[serde(rename = "Invalid structure")]
    InvalidStructure,
}

impl FieldErrorKind {
    pub fn label(&self) -> &'static str {
        match self {
            FieldErrorKind::FullName => "Full Name",
            FieldErrorKind::Email => "Email",
            FieldErrorKind::Phone => "Phone",
            FieldErrorKind::Location => "Location",
            FieldErrorKind::Age => "Age",
            FieldErrorKind::MaritalStatus => "Marital Status",
            FieldErrorKind::Education => "Education",
            FieldErrorKind::Languages => "Languages",
            FieldErrorKind::ProfessionalExperience => "Professional Experience",
            FieldErrorKind::OtherAchievements => "Other Achievements",
            FieldErrorKind::Salary => "Salary",
            FieldErrorKind::InvalidStructure => "Invalid structure",
        }
    }
}

impl fmt::Display for FieldErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[^@]+@[^@]+\.[^@]+$").expect("valid email regex"))
}

fn phone_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[\d+\-() ]+$").expect("valid phone regex"))
}

/// `local@domain.tld` shape: one `@`, a dot somewhere after it, no `@` in the domain.
pub fn is_valid_email(email: &str) -> bool {
    email_pattern().is_match(email.trim())
}

/// One or more of: digits, `+`, `-`, parentheses, spaces.
pub fn is_valid_phone(phone: &str) -> bool {
    phone_pattern().is_match(phone)
}

/// Empty or whitespace-only. The unset sentinel is text like any other here; only
/// Marital Status is checked against it.
fn is_empty_text(value: &str) -> bool {
    value.trim().is_empty()
}

/// Computes every failing completeness check for a payload.
///
/// Checks run independently and all failures are collected in a fixed order. An empty
/// payload reports a single [`FieldErrorKind::InvalidStructure`] instead of per-field noise.
/// The payload is never modified.
pub fn compute_completion_errors(payload: &Payload) -> Vec<FieldErrorKind> {
    match payload {
        Payload::Empty => vec![FieldErrorKind::InvalidStructure],
        Payload::Structured(fields) => check_fields(fields),
    }
}

pub fn check_fields(fields: &ResumeFields) -> Vec<FieldErrorKind> {
    let pi = &fields.personal;
    let cc = &fields.compensation;

    let checks = [
        (is_empty_text(&pi.full_name), FieldErrorKind::FullName),
        (!is_valid_email(&pi.email), FieldErrorKind::Email),
        (!is_valid_phone(&pi.phone), FieldErrorKind::Phone),
        (is_empty_text(&pi.location), FieldErrorKind::Location),
        (is_empty_text(&pi.age), FieldErrorKind::Age),
        (
            pi.marital_status == MaritalStatus::Unset,
            FieldErrorKind::MaritalStatus,
        ),
        (fields.education.is_empty(), FieldErrorKind::Education),
        (fields.languages.is_empty(), FieldErrorKind::Languages),
        (
            fields.experience.is_empty(),
            FieldErrorKind::ProfessionalExperience,
        ),
        (
            fields.achievements.is_empty(),
            FieldErrorKind::OtherAchievements,
        ),
        (
            is_empty_text(&cc.gross_salary) && is_empty_text(&cc.net_salary),
            FieldErrorKind::Salary,
        ),
    ];

    checks
        .into_iter()
        .filter_map(|(failed, kind)| failed.then_some(kind))
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::record::schema::{
        AchievementEntry, Compensation, CompensationType, EducationEntry, ExperienceEntry,
        Language, PersonalInfo, UNSET,
    };

    /// A payload that passes every check.
    pub(crate) fn complete_fields() -> ResumeFields {
        ResumeFields {
            personal: PersonalInfo {
                full_name: "Jane Doe".to_string(),
                email: "jane@example.com".to_string(),
                phone: "+34 (91) 555-0101".to_string(),
                location: "Madrid".to_string(),
                age: "34".to_string(),
                marital_status: MaritalStatus::Single,
            },
            education: vec![EducationEntry {
                degree: "BSc".to_string(),
                field: "Physics".to_string(),
                institution: "Complutense University".to_string(),
                graduation_year: "2012".to_string(),
            }],
            languages: vec![Language::Spanish, Language::English],
            experience: vec![ExperienceEntry {
                company: "Acme Corp".to_string(),
                position: "Senior Engineer".to_string(),
                total_years_in_company: "5".to_string(),
                years_in_position: "3".to_string(),
                internal_rotation: "Platform to Data".to_string(),
                achievements: "Led migration of billing to a new ledger".to_string(),
            }],
            achievements: vec![AchievementEntry {
                kind: "Certification".to_string(),
                title: "AWS Solutions Architect".to_string(),
                institution: "Amazon".to_string(),
                year: "2020".to_string(),
            }],
            compensation: Compensation {
                gross_salary: "60000".to_string(),
                net_salary: UNSET.to_string(),
                compensation_type: CompensationType::Gross,
            },
        }
    }

    fn errors_after(mutate: impl FnOnce(&mut ResumeFields)) -> Vec<FieldErrorKind> {
        let mut fields = complete_fields();
        mutate(&mut fields);
        check_fields(&fields)
    }

    #[test]
    fn test_complete_fields_pass() {
        assert!(check_fields(&complete_fields()).is_empty());
    }

    #[test]
    fn test_empty_payload_is_invalid_structure() {
        assert_eq!(
            compute_completion_errors(&Payload::Empty),
            vec![FieldErrorKind::InvalidStructure]
        );
    }

    #[test]
    fn test_default_fields_fail_unfilled_checks() {
        // Scalars default to the sentinel, which is non-empty text.
        assert_eq!(
            check_fields(&ResumeFields::default()),
            vec![
                FieldErrorKind::Email,
                FieldErrorKind::MaritalStatus,
                FieldErrorKind::Education,
                FieldErrorKind::Languages,
                FieldErrorKind::ProfessionalExperience,
                FieldErrorKind::OtherAchievements,
            ]
        );
    }

    #[test]
    fn test_sentinel_text_is_not_blank() {
        assert!(errors_after(|f| {
            f.personal.full_name = UNSET.into();
            f.personal.phone = UNSET.into();
            f.personal.location = UNSET.into();
            f.personal.age = UNSET.into();
            f.compensation.gross_salary = UNSET.into();
            f.compensation.net_salary = UNSET.into();
        })
        .is_empty());
    }

    #[test]
    fn test_each_check_triggers_alone() {
        use FieldErrorKind::{
            Age, Education, Email, FullName, Languages, Location, OtherAchievements, Phone,
            ProfessionalExperience, Salary,
        };

        let only = |kind: FieldErrorKind| vec![kind];
        assert_eq!(errors_after(|f| f.personal.full_name = "  ".into()), only(FullName));
        assert_eq!(errors_after(|f| f.personal.email = "jane".into()), only(Email));
        assert_eq!(errors_after(|f| f.personal.phone = "call me".into()), only(Phone));
        assert_eq!(errors_after(|f| f.personal.location = "".into()), only(Location));
        assert_eq!(errors_after(|f| f.personal.age = "\t".into()), only(Age));
        assert_eq!(
            errors_after(|f| f.personal.marital_status = MaritalStatus::Unset),
            only(FieldErrorKind::MaritalStatus)
        );
        assert_eq!(errors_after(|f| f.education.clear()), only(Education));
        assert_eq!(errors_after(|f| f.languages.clear()), only(Languages));
        assert_eq!(
            errors_after(|f| f.experience.clear()),
            only(ProfessionalExperience)
        );
        assert_eq!(
            errors_after(|f| f.achievements.clear()),
            only(OtherAchievements)
        );
        assert_eq!(
            errors_after(|f| {
                f.compensation.gross_salary = " ".into();
                f.compensation.net_salary = String::new();
            }),
            only(Salary)
        );
    }

    #[test]
    fn test_email_without_tld_fails() {
        assert_eq!(
            errors_after(|f| f.personal.email = "jane@example".into()),
            vec![FieldErrorKind::Email]
        );
        assert!(errors_after(|f| f.personal.email = "jane@example.com".into()).is_empty());
    }

    #[test]
    fn test_email_rejects_second_at_in_domain() {
        assert!(!is_valid_email("jane@exa@mple.com"));
        assert!(!is_valid_email("@example.com"));
        assert!(is_valid_email(" jane.doe@mail.example.org "));
    }

    #[test]
    fn test_phone_charset() {
        assert!(is_valid_phone("+1 (555) 010-2000"));
        assert!(is_valid_phone("5550102000"));
        assert!(!is_valid_phone("555-CALL"));
        assert!(!is_valid_phone(""));
        assert!(is_valid_phone(UNSET));
    }

    #[test]
    fn test_salary_needs_only_one_amount() {
        assert!(errors_after(|f| {
            f.compensation.gross_salary = "".into();
            f.compensation.net_salary = "42000".into();
        })
        .is_empty());
    }

    #[test]
    fn test_compensation_type_not_checked() {
        assert!(errors_after(|f| f.compensation.compensation_type = CompensationType::Unset)
            .is_empty());
    }

    #[test]
    fn test_errors_keep_fixed_order() {
        let errors = errors_after(|f| {
            f.compensation.gross_salary = "".into();
            f.compensation.net_salary = " ".into();
            f.personal.full_name = "".into();
            f.languages.clear();
        });
        assert_eq!(
            errors,
            vec![
                FieldErrorKind::FullName,
                FieldErrorKind::Languages,
                FieldErrorKind::Salary
            ]
        );
    }

    #[test]
    fn test_error_labels_serialize_as_display() {
        let json = serde_json::to_value(vec![
            FieldErrorKind::MaritalStatus,
            FieldErrorKind::InvalidStructure,
        ])
        .unwrap();
        assert_eq!(json, serde_json::json!(["Marital Status", "Invalid structure"]));
        assert_eq!(FieldErrorKind::OtherAchievements.to_string(), "Other Achievements");
    }
}
