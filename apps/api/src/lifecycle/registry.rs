//! In-memory record registry and the per-record review state machine.
//!
//! ```text
//!   register ──► Unreviewed ──attempt_complete──► Ready
//!                    │                              ▲
//!                    └──attempt_complete (errors)──►Incomplete
//! ```
//!
//! Edits are allowed in every state. Whether an edit on a `Ready` record demotes it is
//! decided by [`EditPolicy`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::record::edits::EditError;
use crate::record::validation::{compute_completion_errors, FieldErrorKind};
use crate::record::{Payload, ResumeFields};

pub const DEFAULT_MAX_RECORDS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    /// No completion attempt yet.
    Unreviewed,
    /// The last completion attempt failed validation.
    Incomplete,
    /// Passed every completeness check; exportable.
    Ready,
}

/// What happens to a `Ready` record when a reviewer edits it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditPolicy {
    /// Status is untouched by edits.
    #[default]
    KeepStatus,
    /// A `Ready` record drops back to `Incomplete` and must be completed again.
    RevertReadyToIncomplete,
}

#[derive(Debug, Clone, Copy)]
pub struct RegistrySettings {
    pub max_records: usize,
    pub edit_policy: EditPolicy,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            max_records: DEFAULT_MAX_RECORDS,
            edit_policy: EditPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ResumeRecord {
    pub id: Uuid,
    pub source_filename: String,
    pub status: RecordStatus,
    pub completion_attempts: u32,
    pub payload: Payload,
    /// Why the payload is empty, when extraction failed.
    pub extraction_note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ResumeRecord {
    pub fn is_ready(&self) -> bool {
        self.status == RecordStatus::Ready
    }

    pub fn summary(&self) -> RecordSummary {
        RecordSummary {
            id: self.id,
            source_filename: self.source_filename.clone(),
            status: self.status,
            needs_manual_entry: self.payload.is_empty(),
        }
    }
}

/// Board-card view of a record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordSummary {
    pub id: Uuid,
    pub source_filename: String,
    pub status: RecordStatus,
    pub needs_manual_entry: bool,
}

/// Why an upload did not produce a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(rename_all = "snake_case")]
pub enum IngestRejection {
    #[error("registry already holds the maximum of {max} records")]
    CapacityReached { max: usize },
    #[error("a record for this filename already exists")]
    DuplicateFilename,
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Record {0} not found")]
    NotFound(Uuid),
    #[error("Record {0} is not ready for export")]
    NotReady(Uuid),
    #[error(transparent)]
    Edit(#[from] EditError),
}

/// Result of a "mark complete" action.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CompletionOutcome {
    Ready,
    Incomplete { errors: Vec<FieldErrorKind> },
}

/// Session-owned record registry. Never shrinks; there is no delete.
#[derive(Debug, Default)]
pub struct Registry {
    records: Vec<ResumeRecord>,
    settings: RegistrySettings,
}

impl Registry {
    pub fn new(settings: RegistrySettings) -> Self {
        Self {
            records: Vec::new(),
            settings,
        }
    }

    /// Checks whether an upload with this filename would be accepted.
    pub fn admit(&self, filename: &str) -> Result<(), IngestRejection> {
        if self.records.len() >= self.settings.max_records {
            return Err(IngestRejection::CapacityReached {
                max: self.settings.max_records,
            });
        }
        if self.records.iter().any(|r| r.source_filename == filename) {
            return Err(IngestRejection::DuplicateFilename);
        }
        Ok(())
    }

    /// Creates a record in `Unreviewed`.
    pub fn register(
        &mut self,
        filename: &str,
        payload: Payload,
        extraction_note: Option<String>,
    ) -> Result<&ResumeRecord, IngestRejection> {
        self.admit(filename)?;

        let now = Utc::now();
        let record = ResumeRecord {
            id: Uuid::new_v4(),
            source_filename: filename.to_string(),
            status: RecordStatus::Unreviewed,
            completion_attempts: 0,
            payload,
            extraction_note,
            created_at: now,
            updated_at: now,
        };
        info!(
            "Registered record {} for '{}' (empty payload: {})",
            record.id,
            filename,
            record.payload.is_empty()
        );
        self.records.push(record);
        Ok(&self.records[self.records.len() - 1])
    }

    pub fn get(&self, id: Uuid) -> Result<&ResumeRecord, RegistryError> {
        self.records
            .iter()
            .find(|r| r.id == id)
            .ok_or(RegistryError::NotFound(id))
    }

    fn get_mut(&mut self, id: Uuid) -> Result<&mut ResumeRecord, RegistryError> {
        self.records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(RegistryError::NotFound(id))
    }

    /// Applies a field mutation transactionally: on error the record is left untouched.
    ///
    /// An empty payload is first materialized as fully-unset fields so a reviewer can enter
    /// a failed extraction by hand.
    pub fn edit<F>(&mut self, id: Uuid, mutate: F) -> Result<&ResumeRecord, RegistryError>
    where
        F: FnOnce(&mut ResumeFields) -> Result<(), EditError>,
    {
        let policy = self.settings.edit_policy;
        let record = self.get_mut(id)?;

        let mut draft = record.payload.to_fields_or_default();
        mutate(&mut draft)?;
        record.payload = Payload::Structured(draft);
        record.updated_at = Utc::now();

        if record.is_ready() && policy == EditPolicy::RevertReadyToIncomplete {
            record.status = RecordStatus::Incomplete;
            info!("Record {id} edited while ready, reverted to incomplete");
        }
        Ok(record)
    }

    /// Live advisory validation; does not change status.
    pub fn completion_errors(&self, id: Uuid) -> Result<Vec<FieldErrorKind>, RegistryError> {
        Ok(compute_completion_errors(&self.get(id)?.payload))
    }

    /// Runs validation and moves the record to `Ready` or `Incomplete`.
    pub fn attempt_complete(&mut self, id: Uuid) -> Result<CompletionOutcome, RegistryError> {
        let record = self.get_mut(id)?;
        record.completion_attempts += 1;
        record.updated_at = Utc::now();

        let errors = compute_completion_errors(&record.payload);
        if errors.is_empty() {
            record.status = RecordStatus::Ready;
            info!("Record {id} ('{}') is ready", record.source_filename);
            Ok(CompletionOutcome::Ready)
        } else {
            record.status = RecordStatus::Incomplete;
            warn!(
                "Record {id} failed completion with {} error(s): {:?}",
                errors.len(),
                errors
            );
            Ok(CompletionOutcome::Incomplete { errors })
        }
    }

    /// Fields of a record that may be exported.
    pub fn ready_fields(&self, id: Uuid) -> Result<(&ResumeRecord, &ResumeFields), RegistryError> {
        let record = self.get(id)?;
        match (&record.status, &record.payload) {
            (RecordStatus::Ready, Payload::Structured(fields)) => Ok((record, fields)),
            _ => Err(RegistryError::NotReady(id)),
        }
    }

    /// Board ordering: ready records first, then by source filename.
    pub fn list(&self) -> Vec<&ResumeRecord> {
        let mut listed: Vec<&ResumeRecord> = self.records.iter().collect();
        listed.sort_by(|a, b| {
            (!a.is_ready(), &a.source_filename).cmp(&(!b.is_ready(), &b.source_filename))
        });
        listed
    }

    /// Ready records in board order.
    pub fn ready_records(&self) -> Vec<&ResumeRecord> {
        self.list().into_iter().filter(|r| r.is_ready()).collect()
    }
}
