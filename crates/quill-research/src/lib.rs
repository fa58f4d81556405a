//! Quill Research
//!
//! Turns research URLs into structured facts for the writing and graphics
//! stages.
//!
//! # Architecture
//!
//! ```text
//! URL → PageFetcher (retry) → ContentExtractor (DOM heuristics)
//!     → FactExtractor (LLM + tolerant JSON) → ResearchResult
//! ```
//!
//! Failures never escape as errors: an unreachable page becomes a
//! failed-fetch record and an unusable model response degrades to an empty
//! fact list.
//!
//! # Example Usage
//!
//! ```no_run
//! use quill_research::{ContentExtractor, FactExtractor, Researcher, ResearchConfig};
//! use quill_llm::MockProvider;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ResearchConfig::default();
//! let llm = Arc::new(MockProvider::new("{\"extracted_facts\": [], \"summary\": \"\", \"relevance_score\": 1}"));
//! let researcher = Researcher::new(
//!     ContentExtractor::new(config.clone())?,
//!     FactExtractor::new(llm, &config),
//! );
//!
//! let results = researcher
//!     .process_research_urls(&["https://example.com/report"], "inventory accuracy")
//!     .await;
//! println!("{} results", results.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod content;
pub mod error;
pub mod facts;
pub mod fetch;
pub mod parser;
pub mod pipeline;
pub mod prompt;
pub mod source;

pub use config::ResearchConfig;
pub use content::{extract_page, ContentExtractor, ExtractedPage, ExtractionMethod};
pub use error::ResearchError;
pub use facts::FactExtractor;
pub use fetch::PageFetcher;
pub use parser::{parse_fact_response, ParsedFacts};
pub use pipeline::Researcher;
pub use source::source_name;
