//! Canonical traversal of a record. Every output format renders exactly these lines in
//! exactly this order; only the markup around them differs.

use crate::record::ResumeFields;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    PersonalInformation,
    Education,
    Languages,
    ProfessionalExperience,
    OtherAchievements,
    CurrentCompensation,
}

impl Section {
    pub fn title(&self) -> &'static str {
        match self {
            Section::PersonalInformation => "Personal Information",
            Section::Education => "Education",
            Section::Languages => "Languages",
            Section::ProfessionalExperience => "Professional Experience",
            Section::OtherAchievements => "Other Achievements",
            Section::CurrentCompensation => "Current Compensation",
        }
    }
}

/// One label/value pair of rendered content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentLine {
    pub label: &'static str,
    pub value: String,
}

impl ContentLine {
    fn new(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentBlock {
    pub section: Section,
    pub lines: Vec<ContentLine>,
}

/// Projects the fields into the six canonical sections.
pub fn canonical_blocks(fields: &ResumeFields) -> Vec<ContentBlock> {
    let pi = &fields.personal;
    let cc = &fields.compensation;

    let personal = vec![
        ContentLine::new("Full Name", pi.full_name.as_str()),
        ContentLine::new("Email", pi.email.as_str()),
        ContentLine::new("Phone", pi.phone.as_str()),
        ContentLine::new("Location", pi.location.as_str()),
        ContentLine::new("Age", pi.age.as_str()),
        ContentLine::new("Marital Status", pi.marital_status.as_str()),
    ];

    let education = fields
        .education
        .iter()
        .map(|e| {
            ContentLine::new(
                "Education",
                format!(
                    "{} in {} - {} ({})",
                    e.degree, e.field, e.institution, e.graduation_year
                ),
            )
        })
        .collect();

    let languages = vec![ContentLine::new(
        "Languages",
        fields
            .languages
            .iter()
            .map(|l| l.as_str())
            .collect::<Vec<_>>()
            .join(", "),
    )];

    let experience = fields
        .experience
        .iter()
        .flat_map(|e| {
            [
                ContentLine::new(
                    "Experience",
                    format!(
                        "{} at {} ({} yrs)",
                        e.position, e.company, e.total_years_in_company
                    ),
                ),
                ContentLine::new("Responsibilities", e.achievements.as_str()),
            ]
        })
        .collect();

    let achievements = fields
        .achievements
        .iter()
        .map(|a| {
            ContentLine::new(
                "Achievement",
                format!("{}: {} - {} ({})", a.kind, a.title, a.institution, a.year),
            )
        })
        .collect();

    let compensation = vec![
        ContentLine::new("Gross Salary", cc.gross_salary.as_str()),
        ContentLine::new("Net Salary", cc.net_salary.as_str()),
        ContentLine::new("Compensation Type", cc.compensation_type.as_str()),
    ];

    vec![
        ContentBlock {
            section: Section::PersonalInformation,
            lines: personal,
        },
        ContentBlock {
            section: Section::Education,
            lines: education,
        },
        ContentBlock {
            section: Section::Languages,
            lines: languages,
        },
        ContentBlock {
            section: Section::ProfessionalExperience,
            lines: experience,
        },
        ContentBlock {
            section: Section::OtherAchievements,
            lines: achievements,
        },
        ContentBlock {
            section: Section::CurrentCompensation,
            lines: compensation,
        },
    ]
}

/// All lines flattened in canonical order.
pub fn canonical_lines(fields: &ResumeFields) -> Vec<ContentLine> {
    canonical_blocks(fields)
        .into_iter()
        .flat_map(|block| block.lines)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::validation::tests::complete_fields;

    #[test]
    fn test_templates_match_canonical_text() {
        let lines = canonical_lines(&complete_fields());
        let find = |label: &str| {
            lines
                .iter()
                .find(|l| l.label == label)
                .map(|l| l.value.clone())
                .unwrap()
        };
        assert_eq!(
            find("Education"),
            "BSc in Physics - Complutense University (2012)"
        );
        assert_eq!(find("Languages"), "Spanish, English");
        assert_eq!(find("Experience"), "Senior Engineer at Acme Corp (5 yrs)");
        assert_eq!(
            find("Responsibilities"),
            "Led migration of billing to a new ledger"
        );
        assert_eq!(
            find("Achievement"),
            "Certification: AWS Solutions Architect - Amazon (2020)"
        );
        assert_eq!(find("Compensation Type"), "Gross");
    }

    #[test]
    fn test_line_order_is_fixed() {
        let labels: Vec<&str> = canonical_lines(&complete_fields())
            .iter()
            .map(|l| l.label)
            .collect();
        assert_eq!(
            labels,
            vec![
                "Full Name",
                "Email",
                "Phone",
                "Location",
                "Age",
                "Marital Status",
                "Education",
                "Languages",
                "Experience",
                "Responsibilities",
                "Achievement",
                "Gross Salary",
                "Net Salary",
                "Compensation Type",
            ]
        );
    }

    #[test]
    fn test_empty_lists_still_emit_languages_line() {
        let lines = canonical_lines(&ResumeFields::default());
        assert_eq!(lines.len(), 6 + 1 + 3);
        assert!(lines.iter().any(|l| l.label == "Languages" && l.value.is_empty()));
    }
}
