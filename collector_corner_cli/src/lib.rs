//! Collector's Corner newsletter builder.
//!
//! Raw shop notes or a product page go in, a four-section draft comes back
//! from a completion service, and the draft is split into editable fields and
//! rendered as a markdown preview.

pub mod config;
pub mod error;
pub mod fetcher;
pub mod generator;
pub mod month;
pub mod pipeline;
pub mod render;
pub mod sections;
pub mod session;
pub mod utils;

pub use config::Config;
pub use error::{AssembleError, ConfigError, FetchError, GenerationError};
pub use fetcher::{extract_excerpt, fetch_excerpt, Fetcher};
pub use generator::{build_prompt, CompletionService, NarrativeGenerator, OpenAiCompletion};
pub use month::EditionMonth;
pub use pipeline::{Assembler, RawSource};
pub use render::render_preview;
pub use sections::{extract, GeneratedDocument, ParsedDocument, SectionLabel};
pub use session::{Field, FieldValues, Session};

