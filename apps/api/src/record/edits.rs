//! Typed reviewer edits. List sections only support append and in-place replacement;
//! there is no removal.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::record::schema::{
    dedup_languages, AchievementEntry, CompensationType, EducationEntry, ExperienceEntry,
    Language, MaritalStatus, ResumeFields,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonalField {
    FullName,
    Email,
    Phone,
    Location,
    Age,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SalaryField {
    GrossSalary,
    NetSalary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum FieldEdit {
    SetPersonal { field: PersonalField, value: String },
    SetMaritalStatus { value: MaritalStatus },
    AddEducation,
    SetEducation { index: usize, entry: EducationEntry },
    SetLanguages { languages: Vec<Language> },
    AddExperience,
    SetExperience { index: usize, entry: ExperienceEntry },
    AddAchievement,
    SetAchievement { index: usize, entry: AchievementEntry },
    SetSalary { field: SalaryField, value: String },
    SetCompensationType { value: CompensationType },
}

#[derive(Debug, Error, PartialEq)]
pub enum EditError {
    #[error("{section} entry #{index} does not exist ({len} entries)")]
    IndexOutOfRange {
        section: &'static str,
        index: usize,
        len: usize,
    },
}

impl FieldEdit {
    pub fn apply(&self, fields: &mut ResumeFields) -> Result<(), EditError> {
        match self {
            FieldEdit::SetPersonal { field, value } => {
                let pi = &mut fields.personal;
                let slot = match field {
                    PersonalField::FullName => &mut pi.full_name,
                    PersonalField::Email => &mut pi.email,
                    PersonalField::Phone => &mut pi.phone,
                    PersonalField::Location => &mut pi.location,
                    PersonalField::Age => &mut pi.age,
                };
                slot.clone_from(value);
            }
            FieldEdit::SetMaritalStatus { value } => fields.personal.marital_status = *value,
            FieldEdit::AddEducation => fields.education.push(EducationEntry::default()),
            FieldEdit::SetEducation { index, entry } => {
                *slot_at(&mut fields.education, "Education", *index)? = entry.clone();
            }
            FieldEdit::SetLanguages { languages } => {
                fields.languages = dedup_languages(languages.iter().copied());
            }
            FieldEdit::AddExperience => fields.experience.push(ExperienceEntry::default()),
            FieldEdit::SetExperience { index, entry } => {
                *slot_at(&mut fields.experience, "Experience", *index)? = entry.clone();
            }
            FieldEdit::AddAchievement => fields.achievements.push(AchievementEntry::default()),
            FieldEdit::SetAchievement { index, entry } => {
                *slot_at(&mut fields.achievements, "Achievement", *index)? = entry.clone();
            }
            FieldEdit::SetSalary { field, value } => {
                let cc = &mut fields.compensation;
                match field {
                    SalaryField::GrossSalary => cc.gross_salary.clone_from(value),
                    SalaryField::NetSalary => cc.net_salary.clone_from(value),
                }
            }
            FieldEdit::SetCompensationType { value } => {
                fields.compensation.compensation_type = *value;
            }
        }
        Ok(())
    }
}

/// Applies a batch of edits in order, stopping at the first failure.
pub fn apply_all(edits: &[FieldEdit], fields: &mut ResumeFields) -> Result<(), EditError> {
    edits.iter().try_for_each(|edit| edit.apply(fields))
}

fn slot_at<'a, T>(
    items: &'a mut [T],
    section: &'static str,
    index: usize,
) -> Result<&'a mut T, EditError> {
    let len = items.len();
    items
        .get_mut(index)
        .ok_or(EditError::IndexOutOfRange { section, index, len })
}
