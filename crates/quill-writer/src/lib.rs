//! Quill Writer
//!
//! Drafts LinkedIn posts from a raw idea, optional research results and
//! declared data sources, then checks the draft against a banned-phrase
//! list. A draft containing a banned phrase is regenerated once with a
//! corrective prompt at a higher temperature; the regeneration is final.
//!
//! # Example Usage
//!
//! ```no_run
//! use quill_writer::{WriterConfig, WritingComposer};
//! use quill_llm::MockProvider;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let composer = WritingComposer::new(Arc::new(MockProvider::default()), WriterConfig::default())?;
//! let post = composer
//!     .draft_post("Most safety stock hides forecast error", "Dana Reyes", &[], &[])
//!     .await?;
//! println!("{}", post.text);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod banned;
pub mod composer;
pub mod config;
pub mod error;
pub mod prompt;

pub use banned::{find_banned, BANNED_PHRASES};
pub use composer::{ComposedPost, WritingComposer};
pub use config::WriterConfig;
pub use error::WriterError;
pub use prompt::{data_sources_section, regeneration_prompt, research_section, DraftPromptBuilder};
