//! Quill Graphics
//!
//! Classification and generation of post graphics.
//!
//! # Architecture
//!
//! ```text
//! GraphicRequest → resolve_kind (classifier or explicit type)
//!                → GraphicRouter → chart backend (LLM spec → SVG)
//!                                → infographic / creative image backend
//!                                → video backend
//!                → GenerationOutcome (data URI or FailureReason)
//! ```
//!
//! Research facts reach the chart and infographic backends only. Chart and
//! infographic failures fall back to the creative image backend; video has
//! no fallback.
//!
//! # Example Usage
//!
//! ```no_run
//! use quill_graphics::{GraphicRouter, GraphicsConfig};
//! use quill_domain::GraphicRequest;
//! use quill_llm::{MockImageGenerator, MockProvider, MockVideoGenerator};
//! use std::sync::Arc;
//!
//! # async fn example() {
//! let router = GraphicRouter::new(
//!     Arc::new(MockProvider::default()),
//!     Arc::new(MockImageGenerator::succeeding("creative")),
//!     Arc::new(MockImageGenerator::succeeding("infographic")),
//!     Arc::new(MockVideoGenerator::succeeding()),
//!     GraphicsConfig::default(),
//! );
//!
//! let request = GraphicRequest::new("Bar chart of forecast accuracy by quarter");
//! let outcome = router.generate(&request, &[]).await;
//! println!("{:?}", outcome.graphic().map(|g| g.backend.clone()));
//! # }
//! ```

#![warn(missing_docs)]

pub mod chart;
pub mod classifier;
pub mod config;
pub mod error;
pub mod prompts;
pub mod router;

pub use chart::{ChartBackend, ChartSpec, ChartType, DataProvenance, RenderedChart};
pub use classifier::{classify, classify_with_reason, Classification, CLASSIFICATION_RULES, RULES_VERSION};
pub use config::{BrandPalette, GraphicsConfig};
pub use error::GraphicsError;
pub use router::{resolve_kind, FailureReason, GeneratedGraphic, GenerationOutcome, GraphicRouter};
