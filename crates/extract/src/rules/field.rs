// ABOUTME: Field aggregate composing selectors, extractors, filters, and post-processing.
// ABOUTME: Runs the fixed extraction pipeline and the date/case/URL transforms for one named field.

//! The `Field` aggregate.
//!
//! One named field bundles its selector, extractor, and filter rules with the
//! post-processing knobs (text case, date patterns, URL normalization) and an
//! optional flag. Evaluation runs a fixed pipeline: selector candidates,
//! extractor narrowing, filter evaluation, case transform. Date parsing and
//! URL normalization are applied by the caller according to the slot the
//! field occupies.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use scraper::ElementRef;
use url::Url;

use crate::config::FieldSpec;
use crate::error::RuleError;
use crate::output::{FilterResult, FilterScope, TextCase};
use crate::rules::extractor::FieldExtractor;
use crate::rules::filter::FieldFilter;
use crate::rules::selector::FieldSelector;

/// Outcome of evaluating one field against a scoped element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldOutcome {
    /// A normalized value survived the pipeline.
    Value(String),
    /// No candidate survived; a warning unless the field is optional.
    Missing,
    /// A stop filter vetoed the field.
    Stopped,
}

impl FieldOutcome {
    /// Returns the extracted value, if any.
    pub fn into_value(self) -> Option<String> {
        match self {
            FieldOutcome::Value(value) => Some(value),
            FieldOutcome::Missing | FieldOutcome::Stopped => None,
        }
    }

    /// Returns true for the `Value` variant.
    pub fn is_value(&self) -> bool {
        matches!(self, FieldOutcome::Value(_))
    }
}

struct Candidate {
    text: String,
    phase: FilterScope,
}

enum Collected {
    Stopped,
    Values(Vec<String>),
}

/// One named, independently configured extraction rule.
#[derive(Debug, Clone)]
pub struct Field {
    name: String,
    selectors: Vec<FieldSelector>,
    extractors: Vec<FieldExtractor>,
    text_case: TextCase,
    date_patterns: Vec<String>,
    filters: Vec<FieldFilter>,
    base_path: String,
    remove_parameters: bool,
    trailing_slash: bool,
    optional: bool,
}

impl Field {
    /// Compiles a field from its configuration form.
    ///
    /// Fails fast on any invalid selector or regex, and on a non-optional
    /// field with no selectors, which could never produce a value.
    pub fn from_spec(name: impl Into<String>, spec: FieldSpec) -> Result<Self, RuleError> {
        let name = name.into();
        let def = spec.into_def();

        let selectors = def
            .selectors
            .into_vec()
            .into_iter()
            .map(FieldSelector::from_spec)
            .collect::<Result<Vec<_>, _>>()?;
        if selectors.is_empty() && !def.optional {
            return Err(RuleError::MissingSelectors { field: name });
        }
        let extractors = def
            .extractors
            .into_vec()
            .into_iter()
            .map(FieldExtractor::from_spec)
            .collect::<Result<Vec<_>, _>>()?;
        let filters = def
            .filters
            .into_vec()
            .into_iter()
            .map(FieldFilter::from_spec)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name,
            selectors,
            extractors,
            text_case: def.text_case,
            date_patterns: def.date_patterns.into_vec(),
            filters,
            base_path: def.base_path,
            remove_parameters: def.remove_parameters,
            trailing_slash: def.trailing_slash,
            optional: def.optional,
        })
    }

    /// The field's name, unique within its rule set.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The selector rules in declaration order.
    pub fn selectors(&self) -> &[FieldSelector] {
        &self.selectors
    }

    /// The extractor rules in declaration order.
    pub fn extractors(&self) -> &[FieldExtractor] {
        &self.extractors
    }

    /// The filter rules in declaration order.
    pub fn filters(&self) -> &[FieldFilter] {
        &self.filters
    }

    /// The text-case transform.
    pub fn text_case(&self) -> TextCase {
        self.text_case
    }

    /// The date patterns in declaration order.
    pub fn date_patterns(&self) -> &[String] {
        &self.date_patterns
    }

    /// The base used to resolve relative URL candidates.
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Whether the query string is stripped from normalized URLs.
    pub fn remove_parameters(&self) -> bool {
        self.remove_parameters
    }

    /// Whether a trailing slash is enforced on normalized URL paths.
    pub fn trailing_slash(&self) -> bool {
        self.trailing_slash
    }

    /// Whether a missing value is silent instead of a warning.
    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// Returns true if this field can produce a value at all.
    pub fn has_selectors(&self) -> bool {
        !self.selectors.is_empty()
    }

    /// Evaluates the field against a scoped element.
    ///
    /// A single surviving candidate is returned verbatim; multiple survivors
    /// are joined with newlines.
    pub fn evaluate(&self, scope: ElementRef<'_>) -> FieldOutcome {
        match self.collect(scope) {
            Collected::Stopped => {
                log::debug!("field {}: extraction vetoed by stop filter", self.name);
                FieldOutcome::Stopped
            }
            Collected::Values(values) if values.is_empty() => {
                self.report_missing();
                FieldOutcome::Missing
            }
            Collected::Values(values) => FieldOutcome::Value(values.join("\n")),
        }
    }

    /// Evaluates the field and parses the first surviving candidate as a date.
    ///
    /// Absence and stop-vetoes yield `Ok(None)`. A candidate that no pattern
    /// parses is `RuleError::DateParse` unless the field is optional.
    pub fn evaluate_date(&self, scope: ElementRef<'_>) -> Result<Option<DateTime<Utc>>, RuleError> {
        let first = match self.collect(scope) {
            Collected::Stopped => {
                log::debug!("field {}: extraction vetoed by stop filter", self.name);
                return Ok(None);
            }
            Collected::Values(values) => values.into_iter().next(),
        };
        let Some(text) = first else {
            self.report_missing();
            return Ok(None);
        };
        match self.parse_date(&text) {
            Ok(date) => Ok(Some(date)),
            Err(_) if self.optional => {
                log::debug!("field {}: no date pattern matched {:?}", self.name, text);
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// Evaluates the field and normalizes the first surviving candidate as a URL.
    ///
    /// A candidate that cannot be resolved against the base path is reported
    /// as missing.
    pub fn evaluate_url(&self, scope: ElementRef<'_>) -> FieldOutcome {
        let first = match self.collect(scope) {
            Collected::Stopped => {
                log::debug!("field {}: extraction vetoed by stop filter", self.name);
                return FieldOutcome::Stopped;
            }
            Collected::Values(values) => values.into_iter().next(),
        };
        let Some(text) = first else {
            self.report_missing();
            return FieldOutcome::Missing;
        };
        match self.normalize_url(&text) {
            Some(url) => FieldOutcome::Value(url),
            None => {
                log::debug!("field {}: could not resolve URL {:?}", self.name, text);
                FieldOutcome::Missing
            }
        }
    }

    /// Parses a date candidate using the declared patterns in order; the
    /// first successful pattern wins.
    ///
    /// With no declared patterns, RFC3339 is tried first, then loose parsing.
    pub fn parse_date(&self, text: &str) -> Result<DateTime<Utc>, RuleError> {
        let trimmed = text.trim();
        for pattern in &self.date_patterns {
            if let Some(date) = parse_with_pattern(trimmed, pattern) {
                return Ok(date);
            }
        }
        if self.date_patterns.is_empty() {
            if let Ok(date) = DateTime::parse_from_rfc3339(trimmed) {
                return Ok(date.with_timezone(&Utc));
            }
            if let Ok(date) = dateparser::parse(trimmed) {
                return Ok(date);
            }
        }
        Err(RuleError::DateParse {
            field: self.name.clone(),
            value: text.to_string(),
        })
    }

    /// Resolves a URL candidate against the base path and applies the
    /// configured normalizations.
    pub fn normalize_url(&self, text: &str) -> Option<String> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        let mut url = match Url::parse(trimmed) {
            Ok(url) => url,
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                let base = Url::parse(self.base_path.trim()).ok()?;
                base.join(trimmed).ok()?
            }
            Err(_) => return None,
        };
        if self.remove_parameters {
            url.set_query(None);
        }
        if self.trailing_slash && !url.cannot_be_a_base() && !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Some(url.to_string())
    }

    /// Runs the candidate pipeline: selectors, extractors, filters, case.
    fn collect(&self, scope: ElementRef<'_>) -> Collected {
        let mut candidates: Vec<Candidate> = Vec::new();
        for selector in &self.selectors {
            let phase = FilterScope::from(selector.output());
            for text in selector.select(scope) {
                candidates.push(Candidate { text, phase });
            }
        }

        for extractor in &self.extractors {
            candidates = candidates
                .into_iter()
                .filter_map(|candidate| {
                    extractor.extract(&candidate.text).map(|text| Candidate {
                        text,
                        phase: candidate.phase,
                    })
                })
                .collect();
        }

        let mut survivors = Vec::new();
        for candidate in candidates {
            match FieldFilter::apply(&self.filters, &candidate.text, candidate.phase) {
                FilterResult::Stop => return Collected::Stopped,
                FilterResult::Skip => {}
                FilterResult::None => survivors.push(self.text_case.apply(&candidate.text)),
            }
        }
        Collected::Values(survivors)
    }

    fn report_missing(&self) {
        if self.optional {
            log::debug!("field {}: no value extracted", self.name);
        } else {
            log::warn!("field {}: no value extracted", self.name);
        }
    }
}

/// Parses one candidate with one chrono pattern, trying zoned, naive
/// datetime, and date-only interpretations in that order. Naive values are
/// assumed UTC.
fn parse_with_pattern(s: &str, pattern: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = DateTime::parse_from_str(s, pattern) {
        return Some(date.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, pattern) {
        return Some(DateTime::from_naive_utc_and_offset(naive, Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, pattern) {
        let naive = date.and_hms_opt(0, 0, 0)?;
        return Some(DateTime::from_naive_utc_and_offset(naive, Utc));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use scraper::Html;

    fn field(json: &str) -> Field {
        let spec: FieldSpec = serde_json::from_str(json).unwrap();
        Field::from_spec("test", spec).unwrap()
    }

    fn doc(html: &str) -> Html {
        Html::parse_document(html)
    }

    #[test]
    fn shorthand_field_extracts_text() {
        let d = doc("<h1>Breaking News</h1>");
        let f = field("\"h1\"");
        assert_eq!(
            f.evaluate(d.root_element()),
            FieldOutcome::Value("Breaking News".to_string())
        );
    }

    #[test]
    fn candidates_accumulate_across_selectors() {
        let d = doc("<h1>First</h1><h2>Second</h2>");
        let f = field(r#"{"selectors": ["h1", "h2"]}"#);
        assert_eq!(
            f.evaluate(d.root_element()),
            FieldOutcome::Value("First\nSecond".to_string())
        );
    }

    #[test]
    fn extractors_narrow_in_order() {
        let d = doc(r#"<span class="byline">Written By Jane Doe!</span>"#);
        let f = field(r#"{"selector": "span.byline", "extractors": ["By (.+)", "([^!]+)"]}"#);
        assert_eq!(
            f.evaluate(d.root_element()),
            FieldOutcome::Value("Jane Doe".to_string())
        );
    }

    #[test]
    fn extractor_without_match_drops_candidate() {
        let d = doc("<h1>Breaking News</h1>");
        let f = field(r#"{"selector": "h1", "extractor": "By (.+)"}"#);
        assert_eq!(f.evaluate(d.root_element()), FieldOutcome::Missing);
    }

    #[test]
    fn skip_filter_discards_only_matching_candidates() {
        let d = doc("<li>advert block</li><li>real entry</li>");
        let f = field(r#"{"selector": {"expr": "li", "all": true}, "filter": {"expr": "advert.*"}}"#);
        assert_eq!(
            f.evaluate(d.root_element()),
            FieldOutcome::Value("real entry".to_string())
        );
    }

    #[test]
    fn stop_filter_vetoes_whole_field() {
        let d = doc(r#"<h1 class="title">Advertisement: Buy Now</h1>"#);
        let f = field(
            r#"{
                "selector": "h1.title",
                "filter": {"expr": "(?i)advert.*", "scope": "all", "stop": true}
            }"#,
        );
        assert_eq!(f.evaluate(d.root_element()), FieldOutcome::Stopped);
    }

    #[test]
    fn stop_aborts_even_with_surviving_candidates() {
        let d = doc("<li>good one</li><li>advert</li>");
        let f = field(
            r#"{
                "selector": {"expr": "li", "all": true},
                "filter": {"expr": "advert", "stop": true}
            }"#,
        );
        assert_eq!(f.evaluate(d.root_element()), FieldOutcome::Stopped);
    }

    #[test]
    fn case_transform_applies_after_filters() {
        let d = doc("<h1>mixed Case Title</h1>");
        let f = field(r#"{"selector": "h1", "text-case": "upper"}"#);
        assert_eq!(
            f.evaluate(d.root_element()),
            FieldOutcome::Value("MIXED CASE TITLE".to_string())
        );
    }

    #[test]
    fn missing_when_nothing_matches() {
        let d = doc("<p>no heading</p>");
        let f = field("\"h1\"");
        assert_eq!(f.evaluate(d.root_element()), FieldOutcome::Missing);
    }

    #[test]
    fn empty_selectors_require_optional() {
        let spec: FieldSpec = serde_json::from_str("{}").unwrap();
        let err = Field::from_spec("title", spec).unwrap_err();
        assert!(matches!(err, RuleError::MissingSelectors { .. }));

        let spec: FieldSpec = serde_json::from_str(r#"{"optional": true}"#).unwrap();
        let f = Field::from_spec("title", spec).unwrap();
        assert!(!f.has_selectors());
        let d = doc("<p>whatever</p>");
        assert_eq!(f.evaluate(d.root_element()), FieldOutcome::Missing);
    }

    #[test]
    fn date_first_pattern_wins() {
        let f = field(
            r#"{"selector": "time", "date-patterns": ["%d.%m.%Y", "%Y-%m-%d"]}"#,
        );
        let parsed = f.parse_date("15.01.2024").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap());
        let parsed = f.parse_date("2024-01-15").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap());
    }

    #[test]
    fn date_pattern_with_time_and_zone() {
        let f = field(r#"{"selector": "time", "date-patterns": ["%Y-%m-%d %H:%M %z"]}"#);
        let parsed = f.parse_date("2024-01-15 09:30 +0100").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 1, 15, 8, 30, 0).unwrap());
    }

    #[test]
    fn date_without_patterns_falls_back_to_loose_parsing() {
        let f = field(r#"{"selector": "time"}"#);
        let parsed = f.parse_date("2024-01-15T10:00:00Z").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap());
        assert!(f.parse_date("January 15, 2024").is_ok());
    }

    #[test]
    fn date_exhaustion_is_typed_failure() {
        let f = field(r#"{"selector": "time", "date-pattern": "%Y-%m-%d"}"#);
        let err = f.parse_date("not a date").unwrap_err();
        assert!(err.is_date_parse());
    }

    #[test]
    fn evaluate_date_optional_swallows_parse_failure() {
        let d = doc("<time>not a date</time>");
        let f = field(r#"{"selector": "time", "date-pattern": "%Y-%m-%d", "optional": true}"#);
        assert_eq!(f.evaluate_date(d.root_element()).unwrap(), None);

        let strict = field(r#"{"selector": "time", "date-pattern": "%Y-%m-%d"}"#);
        assert!(strict.evaluate_date(d.root_element()).is_err());
    }

    #[test]
    fn evaluate_date_missing_is_ok_none() {
        let d = doc("<p>no time element</p>");
        let f = field(r#"{"selector": "time", "date-pattern": "%Y-%m-%d"}"#);
        assert_eq!(f.evaluate_date(d.root_element()).unwrap(), None);
    }

    #[test]
    fn url_resolves_against_base_path() {
        let f = field(r#"{"selector": "a", "base-path": "https://example.com/news/"}"#);
        assert_eq!(
            f.normalize_url("/articles/1"),
            Some("https://example.com/articles/1".to_string())
        );
        assert_eq!(
            f.normalize_url("latest"),
            Some("https://example.com/news/latest".to_string())
        );
    }

    #[test]
    fn url_query_stripped_by_default() {
        let f = field(r#"{"selector": "a", "base-path": "https://example.com/"}"#);
        assert_eq!(
            f.normalize_url("https://example.com/a?utm_source=feed"),
            Some("https://example.com/a".to_string())
        );
    }

    #[test]
    fn url_query_kept_when_configured() {
        let f = field(
            r#"{"selector": "a", "base-path": "https://example.com/", "remove-parameters": false}"#,
        );
        assert_eq!(
            f.normalize_url("https://example.com/a?page=2"),
            Some("https://example.com/a?page=2".to_string())
        );
    }

    #[test]
    fn url_trailing_slash_enforced_when_configured() {
        let f = field(
            r#"{"selector": "a", "base-path": "https://example.com/", "trailing-slash": true}"#,
        );
        assert_eq!(
            f.normalize_url("https://example.com/section"),
            Some("https://example.com/section/".to_string())
        );
    }

    #[test]
    fn url_unresolvable_relative_is_none() {
        let f = field(r#"{"selector": "a"}"#);
        assert_eq!(f.normalize_url("/relative/only"), None);
    }

    #[test]
    fn evaluate_url_extracts_and_normalizes() {
        let d = doc(r#"<a class="more" href="/read?ref=home">Read more</a>"#);
        let f = field(
            r#"{
                "selector": {"expr": "a.more", "attribute": "href"},
                "base-path": "https://example.com/"
            }"#,
        );
        assert_eq!(
            f.evaluate_url(d.root_element()),
            FieldOutcome::Value("https://example.com/read".to_string())
        );
    }

    #[test]
    fn derived_copy_leaves_template_untouched() {
        let template = field(r#"{"selector": "h1", "text-case": "none"}"#);
        let mut derived = template.clone();
        derived.text_case = TextCase::Upper;
        assert_eq!(template.text_case(), TextCase::None);
        assert_eq!(derived.text_case(), TextCase::Upper);
    }
}
