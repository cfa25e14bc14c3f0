//! Supported FAQ languages.
//!
//! English is the canonical language every FAQ is written in. Every other
//! enabled language is a translation target whose content is derived from the
//! English source.
//!
//! - `registry`: single source of truth for the supported languages
//! - `language`: validated, `Copy` language handle used throughout the crate
//!
//! # Example
//!
//! ```rust,ignore
//! use crate::i18n::Language;
//!
//! let hindi = Language::from_code("hi")?;
//! for target in Language::targets() {
//!     // translate into `target`
//! }
//! ```

mod language;
mod registry;

pub use language::Language;
pub use registry::{LanguageConfig, LanguageRegistry};
