// Record schema, normalization of extraction output, validation, and reviewer edits.

pub mod edits;
pub mod normalize;
pub mod schema;
pub mod validation;

pub use schema::{Payload, ResumeFields};
pub use validation::{compute_completion_errors, FieldErrorKind};
