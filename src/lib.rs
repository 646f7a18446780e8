//! Wiregen
//!
//! A pipeline that turns a photo of a hand-drawn wireframe sketch into an
//! HTML prototype. Detection and code generation are delegated to a hosted
//! vision model; the piece of the pipeline that is computed locally is the
//! hierarchy builder, which nests the flat detected element list into a
//! containment tree and derives a relative-geometry layout document for the
//! generator.
//!
//! # Stages
//!
//! - **detect**: image → flat element list (`raw_wireframe.json`)
//! - **hierarchy**: element list → containment tree → layout document
//!   (`hierarchy_wireframe.json`), pure Rust
//! - **codegen**: layout document → HTML (`index.html`)
//! - **feedback**: existing HTML + instruction → revised HTML
//!
//! Stages run synchronously and fail fast: a failing stage aborts the run
//! and its name is attached to the error.
//!
//! # Example
//!
//! ```no_run
//! use wiregen::PipelineConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PipelineConfig {
//!     image_path: "files/sketch.jpg".into(),
//!     tolerance: 3.0,
//!     ..Default::default()
//! };
//!
//! let html = wiregen::run(&config)?;
//! println!("prototype written to {}", html.display());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub use error::{Error, Result};

pub mod geometry;
pub use geometry::Rect;

pub mod element;
pub use element::{Element, ElementKind, RawDetection};

// The containment-tree core and its model-facing projection
pub mod hierarchy;
pub use hierarchy::{build_tree, HierarchyNode, ROOT_ID};

pub mod layout;
pub use layout::{LayoutDocument, LayoutNode};

// External collaborators: hosted-model client and the stages built on it
pub mod gemini;
pub use gemini::GeminiClient;

pub mod detect;
pub mod codegen;
pub mod feedback;

pub mod prompt;

pub mod pipeline;
pub use pipeline::{run, run_feedback, run_hierarchy, PipelineConfig, Stage};
