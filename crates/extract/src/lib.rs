// ABOUTME: Main library entry point for the Pressbox field-extraction engine.
// ABOUTME: Re-exports the rule types, outcome vocabularies, configuration model, and RuleError.

//! Pressbox extraction engine - declarative field-extraction rules for web pages.
//!
//! This crate compiles user-authored configuration (selector expressions,
//! regex filters and conditions, date patterns, case rules) into immutable
//! rule objects, then applies them to parsed HTML documents to pull out named
//! values: title, author, dates, body, images, URLs. Rules are compiled once
//! at configuration load and are safe to share across crawl workers; the
//! engine performs no I/O and holds no per-evaluation state.
//!
//! # Example
//!
//! ```
//! use pressbox_extract::{Fields, PageOutcome};
//! use scraper::Html;
//!
//! # fn main() -> Result<(), pressbox_extract::RuleError> {
//! let fields = Fields::from_json(
//!     r#"{
//!         "root": "article",
//!         "title": "h1.headline",
//!         "published-date": {"selector": "time", "date-pattern": "%Y-%m-%d"}
//!     }"#,
//! )?;
//!
//! let doc = Html::parse_document(
//!     "<article><h1 class=\"headline\">Hello</h1><time>2024-01-15</time></article>",
//! );
//! match fields.extract(&doc)? {
//!     PageOutcome::Extracted(extraction) => {
//!         assert_eq!(extraction.title.as_deref(), Some("Hello"));
//!         assert!(extraction.published_date.is_some());
//!     }
//!     PageOutcome::Rejected => unreachable!("page matches the root selector"),
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod output;
pub mod rules;

pub use crate::config::{
    ConditionSpec, ExcludeSpec, ExtractorSpec, FieldDef, FieldSpec, FieldsDef, FilterSpec,
    RuleValue, SelectorDef, SelectorSpec,
};
pub use crate::error::RuleError;
pub use crate::output::{ConditionAction, ElementOutput, FilterResult, FilterScope, TextCase};
pub use crate::rules::condition::FieldCondition;
pub use crate::rules::exclude::FieldExclude;
pub use crate::rules::extractor::FieldExtractor;
pub use crate::rules::field::{Field, FieldOutcome};
pub use crate::rules::fields::{Extraction, Fields, PageOutcome};
pub use crate::rules::filter::FieldFilter;
pub use crate::rules::selector::FieldSelector;
