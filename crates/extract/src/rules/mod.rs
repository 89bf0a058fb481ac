// ABOUTME: Extraction rule types compiled from configuration.
// ABOUTME: Hosts the leaf rules, the Field aggregate, and shared regex compilation helpers.

//! Extraction rules.
//!
//! Each rule shape is compiled once from its configuration form into an
//! immutable value: invalid selector or regex syntax fails here, at
//! construction time, never mid-crawl. Evaluation functions take `&self` and
//! hold no mutable state, so compiled rules are safe to share across crawl
//! workers.
//!
//! Submodules:
//! - `selector`: locates candidate sub-trees/text within a parsed document.
//! - `extractor`: regex narrowing of a selector's raw output.
//! - `filter`: SKIP/STOP suppression of unwanted candidates.
//! - `condition`: accept/reject gating of whole pages or nodes.
//! - `exclude`: tag/class/id stripping of unwanted sub-trees.
//! - `field`: one named field's full rule pipeline.
//! - `fields`: the named field slots for one content type.

pub mod condition;
pub mod exclude;
pub mod extractor;
pub mod field;
pub mod fields;
pub mod filter;
pub mod selector;

use regex::{Regex, RegexBuilder};

use crate::error::RuleError;

/// Compiles a whole-string-match regex with dot-matches-newline semantics.
///
/// Returns `None` for an empty expression: empty filters and conditions are
/// inert rather than errors. The raw expression is kept by the caller so the
/// anchoring wrapper never leaks into accessors.
pub(crate) fn compile_anchored(expr: &str) -> Result<Option<Regex>, RuleError> {
    if expr.is_empty() {
        return Ok(None);
    }
    RegexBuilder::new(&format!(r"\A(?:{})\z", expr))
        .dot_matches_new_line(true)
        .build()
        .map(Some)
        .map_err(|e| RuleError::invalid_regex(expr, e))
}

/// Compiles a search regex with dot-matches-newline semantics.
pub(crate) fn compile_search(expr: &str) -> Result<Regex, RuleError> {
    RegexBuilder::new(expr)
        .dot_matches_new_line(true)
        .build()
        .map_err(|e| RuleError::invalid_regex(expr, e))
}
