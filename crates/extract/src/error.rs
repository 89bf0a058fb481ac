// ABOUTME: Error types for rule construction and typed extraction failures.
// ABOUTME: Provides the RuleError enum with selector, regex, exclude, and date-parse variants.

use thiserror::Error;

/// Errors raised while compiling rules from configuration, plus the one typed
/// extraction failure (date parsing) that callers need to distinguish.
///
/// Configuration errors surface at construction time so a bad rule set fails
/// before the crawler starts. Extraction-time absence and rejection are not
/// errors; they are reported as outcome values.
#[derive(Debug, Error)]
pub enum RuleError {
    /// A selector expression failed to compile.
    #[error("invalid selector {expr:?}: {reason}")]
    InvalidSelector { expr: String, reason: String },

    /// A filter, condition, or extractor regex failed to compile.
    #[error("invalid expression {expr:?}: {source}")]
    InvalidRegex {
        expr: String,
        #[source]
        source: Box<regex::Error>,
    },

    /// An exclude expression was empty or otherwise unusable.
    #[error("invalid exclude expression {expr:?}")]
    InvalidExclude { expr: String },

    /// A non-optional field declared no selectors and can never produce a value.
    #[error("field {field:?} has no selectors and is not optional")]
    MissingSelectors { field: String },

    /// The configuration document itself was malformed.
    #[error("malformed configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// Every declared date pattern failed on a non-optional date field.
    #[error("field {field:?}: no date pattern matched {value:?}")]
    DateParse { field: String, value: String },
}

impl RuleError {
    /// Creates an InvalidSelector error from the expression and parse failure.
    pub fn invalid_selector(expr: impl Into<String>, reason: impl ToString) -> Self {
        RuleError::InvalidSelector {
            expr: expr.into(),
            reason: reason.to_string(),
        }
    }

    /// Creates an InvalidRegex error from the expression and regex failure.
    pub fn invalid_regex(expr: impl Into<String>, source: regex::Error) -> Self {
        RuleError::InvalidRegex {
            expr: expr.into(),
            source: Box::new(source),
        }
    }

    /// Returns true if this is a date-parse failure.
    pub fn is_date_parse(&self) -> bool {
        matches!(self, RuleError::DateParse { .. })
    }

    /// Returns true if this error was raised at configuration time.
    pub fn is_config(&self) -> bool {
        !self.is_date_parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_parse_is_not_config() {
        let err = RuleError::DateParse {
            field: "published-date".to_string(),
            value: "yesterday-ish".to_string(),
        };
        assert!(err.is_date_parse());
        assert!(!err.is_config());
    }

    #[test]
    fn selector_error_displays_expression() {
        let err = RuleError::invalid_selector("[[[nope", "unexpected token");
        assert!(err.to_string().contains("[[[nope"));
        assert!(err.is_config());
    }

    #[test]
    fn regex_error_carries_source() {
        let source = regex::Regex::new("(unclosed").unwrap_err();
        let err = RuleError::invalid_regex("(unclosed", source);
        assert!(err.to_string().contains("(unclosed"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
