//! Quill Domain Layer
//!
//! Value types and collaborator traits shared by every other crate in the
//! workspace. Nothing in here performs I/O; infrastructure implementations
//! live in `quill-llm` (generative backends) and `quill-store` (persistence).
//!
//! ## Key Concepts
//!
//! - **ResearchResult**: facts and a summary extracted from one research URL
//! - **DataSource**: a user-declared data point, used only to annotate prompts
//! - **GraphicRequest**: a free-text graphic description plus optional type
//!   override and chart data
//! - **Submission**: the reviewable record aggregating draft, graphic and
//!   research
//! - **MediaPayload**: generated image/video bytes, rendered as a data URI

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod data_source;
pub mod error;
pub mod graphic;
pub mod media;
pub mod research;
pub mod submission;
pub mod traits;

// Re-exports for convenience
pub use data_source::{DataSource, SourceType};
pub use error::ProviderError;
pub use graphic::{GraphicKind, GraphicRequest, RequestedType};
pub use media::MediaPayload;
pub use research::{Fact, FactType, ResearchResult};
pub use submission::{NewSubmission, Submission, SubmissionId, SubmissionPatch, SubmissionStatus};
pub use traits::{GenerationOptions, ImageGenerator, LlmProvider, SubmissionStore, VideoGenerator};
