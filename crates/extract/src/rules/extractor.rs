// ABOUTME: FieldExtractor rule for regex narrowing of selector output.
// ABOUTME: Applies a capture expression to each raw candidate; no match drops the candidate.

//! Extractor rules.
//!
//! An extractor is a secondary transform applied to each raw string a
//! selector produced, typically a capture-group regex pulling a sub-string
//! out of a larger fragment ("By Jane Doe" -> "Jane Doe").

use regex::Regex;

use crate::config::ExtractorSpec;
use crate::error::RuleError;
use crate::rules::compile_search;

/// One compiled extractor rule.
#[derive(Debug, Clone)]
pub struct FieldExtractor {
    expr: String,
    compiled: Regex,
}

impl FieldExtractor {
    /// Compiles an extractor rule from its configuration form.
    pub fn from_spec(spec: ExtractorSpec) -> Result<Self, RuleError> {
        let expr = spec.into_expr();
        let compiled = compile_search(&expr)?;
        Ok(Self { expr, compiled })
    }

    /// The raw extractor expression as supplied in configuration.
    pub fn expr(&self) -> &str {
        &self.expr
    }

    /// The compiled pattern.
    pub fn pattern(&self) -> &Regex {
        &self.compiled
    }

    /// Applies the expression to a candidate string.
    ///
    /// Returns the first capture group when the pattern declares one, the
    /// whole match otherwise, and `None` when nothing matches (the candidate
    /// is then dropped).
    pub fn extract(&self, text: &str) -> Option<String> {
        let captures = self.compiled.captures(text)?;
        let matched = captures.get(1).or_else(|| captures.get(0))?;
        Some(matched.as_str().to_string())
    }
}
