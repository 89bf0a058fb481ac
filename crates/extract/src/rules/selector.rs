// ABOUTME: FieldSelector rule for locating candidate text within a parsed document.
// ABOUTME: Compiles a CSS expression once and yields markup, text, own text, or attribute values.

//! Selector rules.
//!
//! A selector is a pure function of (DOM node, expression): it yields an
//! ordered sequence of raw string candidates from a scoped element. The CSS
//! expression is compiled eagerly so bad rules fail during configuration
//! load, not mid-crawl.
//!
//! Key behaviors:
//! - Text output joins inner text with spaces and normalizes whitespace.
//! - Own-text output takes direct text children only, skipping descendants.
//! - Attribute extraction returns the attribute value trimmed.
//! - Empty strings are never candidates.
//! - `all=false` keeps only the first non-empty candidate.

use scraper::{ElementRef, Selector};

use crate::config::SelectorSpec;
use crate::error::RuleError;
use crate::output::ElementOutput;

/// Normalizes whitespace in a string by collapsing runs of whitespace into single spaces.
pub(crate) fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// One compiled extraction rule: a selector expression plus output mode and
/// extraction parameters.
#[derive(Debug, Clone)]
pub struct FieldSelector {
    expr: String,
    compiled: Selector,
    output: ElementOutput,
    attribute: Option<String>,
    all: bool,
}

impl FieldSelector {
    /// Compiles a selector rule from its configuration form.
    pub fn from_spec(spec: SelectorSpec) -> Result<Self, RuleError> {
        let def = spec.into_def();
        let compiled = Selector::parse(&def.expr)
            .map_err(|e| RuleError::invalid_selector(def.expr.as_str(), e))?;
        Ok(Self {
            expr: def.expr,
            compiled,
            output: def.output,
            attribute: def.attribute,
            all: def.all,
        })
    }

    /// The raw selector expression as supplied in configuration.
    pub fn expr(&self) -> &str {
        &self.expr
    }

    /// The output mode this selector yields.
    pub fn output(&self) -> ElementOutput {
        self.output
    }

    /// The attribute extracted instead of element content, if any.
    pub fn attribute(&self) -> Option<&str> {
        self.attribute.as_deref()
    }

    /// Whether every match is returned rather than only the first.
    pub fn all(&self) -> bool {
        self.all
    }

    /// Evaluates this selector against a scoped element, yielding ordered raw
    /// string candidates.
    pub fn select(&self, scope: ElementRef<'_>) -> Vec<String> {
        let mut results = Vec::new();
        for el in scope.select(&self.compiled) {
            let value = match &self.attribute {
                Some(attr) => el
                    .value()
                    .attr(attr)
                    .map(|v| v.trim().to_string())
                    .unwrap_or_default(),
                None => self.element_output(el),
            };
            if value.is_empty() {
                continue;
            }
            results.push(value);
            if !self.all {
                break;
            }
        }
        results
    }

    fn element_output(&self, el: ElementRef<'_>) -> String {
        match self.output {
            ElementOutput::Html => el.html(),
            ElementOutput::Text => {
                normalize_whitespace(&el.text().collect::<Vec<_>>().join(" "))
            }
            ElementOutput::OwnText => {
                let own: String = el
                    .children()
                    .filter_map(|child| child.value().as_text().map(|t| t.to_string()))
                    .collect::<Vec<_>>()
                    .join(" ");
                normalize_whitespace(&own)
            }
        }
    }
}
