// Upload ingestion: document text extraction, LLM structuring, and batch registration.
// Text extraction is CPU-bound and must run inside tokio::task::spawn_blocking.

pub mod handlers;
pub mod ingest;
pub mod prompts;
pub mod structured;
pub mod text;

pub use structured::{LlmExtractor, StructuredExtractor};
pub use text::{DocumentTextExtractor, TextExtractor};
