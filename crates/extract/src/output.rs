// ABOUTME: Closed vocabularies shared by the extraction rules.
// ABOUTME: Defines ElementOutput, FilterScope, FilterResult, ConditionAction, and TextCase.

//! Result and action vocabularies used by the rule evaluators.
//!
//! These are small closed sets of named values. Behavior is never attached to
//! a variant; the evaluation functions in `rules` match on them centrally.

use std::fmt;

use serde::{Deserialize, Serialize};

/// What a selector yields from a matched element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ElementOutput {
    /// Serialized markup of the matched sub-tree.
    Html,
    /// Rendered text of the matched sub-tree, whitespace-normalized.
    #[default]
    Text,
    /// Direct text children only, excluding descendant elements.
    OwnText,
}

impl fmt::Display for ElementOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ElementOutput::Html => "html",
            ElementOutput::Text => "text",
            ElementOutput::OwnText => "own-text",
        };
        write!(f, "{}", s)
    }
}

/// The extraction phase a filter applies to.
///
/// `All` matches every requested phase; the remaining variants match the
/// [`ElementOutput`] mode that produced the candidate under test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterScope {
    #[default]
    All,
    Html,
    Text,
    OwnText,
}

impl FilterScope {
    /// Returns true if a filter with this scope participates when `requested`
    /// is the phase under evaluation.
    pub fn covers(self, requested: FilterScope) -> bool {
        self == FilterScope::All || self == requested
    }
}

impl From<ElementOutput> for FilterScope {
    fn from(output: ElementOutput) -> Self {
        match output {
            ElementOutput::Html => FilterScope::Html,
            ElementOutput::Text => FilterScope::Text,
            ElementOutput::OwnText => FilterScope::OwnText,
        }
    }
}

impl fmt::Display for FilterScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FilterScope::All => "all",
            FilterScope::Html => "html",
            FilterScope::Text => "text",
            FilterScope::OwnText => "own-text",
        };
        write!(f, "{}", s)
    }
}

/// Outcome of running a filter list over one candidate string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterResult {
    /// No filter matched; the candidate passes through.
    #[default]
    None,
    /// Discard this candidate only.
    Skip,
    /// Abort extraction of the whole field.
    Stop,
}

impl fmt::Display for FilterResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FilterResult::None => "none",
            FilterResult::Skip => "skip",
            FilterResult::Stop => "stop",
        };
        write!(f, "{}", s)
    }
}

/// What a matching condition decides about the page or node under test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConditionAction {
    #[default]
    Accept,
    Reject,
}

impl fmt::Display for ConditionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConditionAction::Accept => "accept",
            ConditionAction::Reject => "reject",
        };
        write!(f, "{}", s)
    }
}

/// Text-case transform applied to surviving candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextCase {
    #[default]
    None,
    Upper,
    Lower,
    Capitalize,
}

impl TextCase {
    /// Applies the transform to `text`, returning it unchanged for `None`.
    pub fn apply(self, text: &str) -> String {
        match self {
            TextCase::None => text.to_string(),
            TextCase::Upper => text.to_uppercase(),
            TextCase::Lower => text.to_lowercase(),
            TextCase::Capitalize => {
                let mut chars = text.chars();
                match chars.next() {
                    Some(first) => {
                        first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                    }
                    None => String::new(),
                }
            }
        }
    }
}

impl fmt::Display for TextCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TextCase::None => "none",
            TextCase::Upper => "upper",
            TextCase::Lower => "lower",
            TextCase::Capitalize => "capitalize",
        };
        write!(f, "{}", s)
    }
}
