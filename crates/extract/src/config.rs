// ABOUTME: Serde configuration model for extraction rules.
// ABOUTME: Decodes single-or-list rule values and the per-field/per-page key sets.

//! Configuration model for the extraction rules.
//!
//! Rule configuration arrives as a nested mapping (parsed from a
//! human-authored document, typically JSON). Every rule shape accepts either
//! a compact string form or a detailed mapping; the distinction is resolved
//! once, at decode time, via untagged enums. Unrecognized keys are ignored;
//! malformed values fail decoding.

use serde::{Deserialize, Serialize};

use crate::output::{ConditionAction, ElementOutput, FilterScope, TextCase};

/// A configuration value that is either a single rule definition or a
/// sequence of them.
///
/// This backs the singular/plural key pairs (`selector`/`selectors`,
/// `filter`/`filters`, ...): both spellings decode into the same field, and a
/// bare definition is treated as a one-element list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleValue<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> RuleValue<T> {
    /// Flattens into an ordered list of definitions.
    pub fn into_vec(self) -> Vec<T> {
        match self {
            RuleValue::One(value) => vec![value],
            RuleValue::Many(values) => values,
        }
    }

    /// Returns true if no definitions were supplied.
    pub fn is_empty(&self) -> bool {
        match self {
            RuleValue::One(_) => false,
            RuleValue::Many(values) => values.is_empty(),
        }
    }
}

impl<T> Default for RuleValue<T> {
    fn default() -> Self {
        RuleValue::Many(Vec::new())
    }
}

/// One selector rule: either a bare expression (text output, first match) or
/// a detailed mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SelectorSpec {
    Simple(String),
    Detailed(SelectorDef),
}

/// Detailed selector definition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectorDef {
    /// Selection expression in the DOM library's query syntax.
    pub expr: String,
    /// What to yield from each matched element.
    #[serde(default)]
    pub output: ElementOutput,
    /// Extract this attribute's value instead of the element content.
    #[serde(default)]
    pub attribute: Option<String>,
    /// Return every match instead of only the first.
    #[serde(default)]
    pub all: bool,
}

impl SelectorSpec {
    /// Resolves the compact form into a full definition.
    pub fn into_def(self) -> SelectorDef {
        match self {
            SelectorSpec::Simple(expr) => SelectorDef {
                expr,
                ..SelectorDef::default()
            },
            SelectorSpec::Detailed(def) => def,
        }
    }
}

/// One extractor rule: a capture regex, bare or under an `expr` key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExtractorSpec {
    Simple(String),
    Detailed(ExtractorDef),
}

/// Detailed extractor definition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractorDef {
    pub expr: String,
}

impl ExtractorSpec {
    /// Returns the extractor expression.
    pub fn into_expr(self) -> String {
        match self {
            ExtractorSpec::Simple(expr) => expr,
            ExtractorSpec::Detailed(def) => def.expr,
        }
    }
}

/// One filter rule definition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterSpec {
    /// Regex tested as a whole-string match. Empty means the filter is inert.
    #[serde(default)]
    pub expr: String,
    /// Extraction phase this filter applies to.
    #[serde(default)]
    pub scope: FilterScope,
    /// When true, a match vetoes the whole field instead of one candidate.
    #[serde(default)]
    pub stop: bool,
}

/// One condition rule definition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConditionSpec {
    /// Regex tested as a whole-string match. Empty means the condition is inert.
    #[serde(default)]
    pub expr: String,
    /// What a match decides.
    #[serde(default)]
    pub action: ConditionAction,
}

/// One exclude rule: a compact `tag`, `tag.class`, or `tag#id` expression,
/// bare or under an `expr` key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExcludeSpec {
    Simple(String),
    Detailed(ExcludeDef),
}

/// Detailed exclude definition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExcludeDef {
    pub expr: String,
}

impl ExcludeSpec {
    /// Returns the exclude expression.
    pub fn into_expr(self) -> String {
        match self {
            ExcludeSpec::Simple(expr) => expr,
            ExcludeSpec::Detailed(def) => def.expr,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Full definition of one named field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FieldDef {
    /// Selector rules, tried in declaration order.
    #[serde(default, alias = "selector")]
    pub selectors: RuleValue<SelectorSpec>,
    /// Extractor rules, applied in declaration order to each candidate.
    #[serde(default, alias = "extractor")]
    pub extractors: RuleValue<ExtractorSpec>,
    /// Text-case transform for surviving candidates.
    #[serde(default)]
    pub text_case: TextCase,
    /// Date patterns, tried in declaration order; first successful parse wins.
    #[serde(default, alias = "date-pattern")]
    pub date_patterns: RuleValue<String>,
    /// Filter rules, evaluated in declaration order.
    #[serde(default, alias = "filter")]
    pub filters: RuleValue<FilterSpec>,
    /// Base used to resolve relative URL candidates.
    #[serde(default)]
    pub base_path: String,
    /// Strip the query string from normalized URLs.
    #[serde(default = "default_true")]
    pub remove_parameters: bool,
    /// Enforce a trailing slash on the normalized URL path.
    #[serde(default)]
    pub trailing_slash: bool,
    /// Suppress the missing-value warning when nothing is extracted.
    #[serde(default)]
    pub optional: bool,
}

impl Default for FieldDef {
    fn default() -> Self {
        Self {
            selectors: RuleValue::default(),
            extractors: RuleValue::default(),
            text_case: TextCase::default(),
            date_patterns: RuleValue::default(),
            filters: RuleValue::default(),
            base_path: String::new(),
            // Matches the serde default: query parameters are stripped unless
            // the configuration says otherwise.
            remove_parameters: true,
            trailing_slash: false,
            optional: false,
        }
    }
}

/// One field slot: either a bare selector expression or a full definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldSpec {
    Simple(String),
    Detailed(FieldDef),
}

impl FieldSpec {
    /// Resolves the compact form into a full definition with one text selector.
    pub fn into_def(self) -> FieldDef {
        match self {
            FieldSpec::Simple(expr) => FieldDef {
                selectors: RuleValue::One(SelectorSpec::Simple(expr)),
                ..FieldDef::default()
            },
            FieldSpec::Detailed(def) => def,
        }
    }
}

/// The full rule set recognized for one content type: a root selector plus
/// the named field slots.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FieldsDef {
    /// Scopes all field evaluation to a sub-tree of the document.
    #[serde(default)]
    pub root: String,
    #[serde(default)]
    pub validator: Option<FieldSpec>,
    #[serde(default)]
    pub title: Option<FieldSpec>,
    #[serde(default)]
    pub author: Option<FieldSpec>,
    #[serde(default)]
    pub author_link: Option<FieldSpec>,
    #[serde(default)]
    pub published_date: Option<FieldSpec>,
    #[serde(default)]
    pub start_date: Option<FieldSpec>,
    #[serde(default)]
    pub start_time: Option<FieldSpec>,
    #[serde(default)]
    pub end_date: Option<FieldSpec>,
    #[serde(default)]
    pub end_time: Option<FieldSpec>,
    #[serde(default)]
    pub timezone: Option<FieldSpec>,
    #[serde(default)]
    pub body: Option<FieldSpec>,
    #[serde(default)]
    pub url: Option<FieldSpec>,
    #[serde(default)]
    pub image: Option<FieldSpec>,
    #[serde(default)]
    pub background_image: Option<FieldSpec>,
}
