//! Resume templating and rendering core.
//!
//! A [`ResumeDocument`] binds a [`ResumeRecord`] to a template preset, resolves the layered
//! settings, composes a page tree and renders it to PDF with genpdf.
//!
//! ```no_run
//! use resume_render::{ResumeDocument, ResumeRecord};
//!
//! let resume: ResumeRecord = serde_json::from_str(r#"{"basics": {"name": "Ada"}}"#)?;
//! let document = ResumeDocument::from_template_id("modern", resume)
//!     .with_overrides(serde_json::json!({"accentColor": "#0f766e"}));
//! let pdf = document.export()?;
//! std::fs::write("resume.pdf", pdf.bytes)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod builder;
pub mod color;
pub mod composer;
pub mod document;
pub mod error;
pub mod fonts;
pub mod layout;
pub mod render;
pub mod resume;
pub mod richtext;
pub mod sections;
pub mod settings;
pub mod template;

#[cfg(feature = "metadata")]
pub mod metadata;

pub use color::{ColorResolver, ColorTarget};
pub use document::{ExportedPdf, ResumeDocument};
pub use error::ExportError;
pub use layout::{ComposedDocument, LayoutNode};
pub use resume::ResumeRecord;
pub use settings::{EffectiveSettings, LayoutSettings};
pub use template::{LayoutType, TemplateConfig};
