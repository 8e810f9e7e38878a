// Record lifecycle: registry + state machine, per-session ownership, and HTTP handlers.

pub mod handlers;
pub mod registry;
pub mod sessions;

pub use registry::{CompletionOutcome, EditPolicy, Registry, RegistryError, RegistrySettings};
pub use sessions::SessionStore;
