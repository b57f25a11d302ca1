//! Narrative generation seam.
//!
//! An external generator (typically an LLM) turns insights and charts into
//! prose. Tabsight works fully without one; [`TemplateNarrator`] is the
//! built-in deterministic fallback.

mod generator;
mod template;

pub use generator::{Narrative, NarrativeGenerator, NarrativeRequest};
pub use template::TemplateNarrator;
