//! FAQ entries: English source content, per-language shadow fields and the
//! caches in front of them.

pub mod invalidation;
mod listing;
mod model;
pub(crate) mod service;
mod views;

pub use invalidation::Invalidation;
pub use listing::FaqListing;
pub use model::{Faq, FaqField, FaqUpdate, FieldKind, FieldValue, NewFaq, RichText};
pub use service::{FaqService, DEFAULT_READ_TTL};
pub use views::{AdminFaq, PublicFaq};
