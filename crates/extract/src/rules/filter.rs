// ABOUTME: FieldFilter rule for suppressing unwanted candidate text.
// ABOUTME: Implements the STOP-dominates list evaluation over scoped whole-string regexes.

//! Filter rules.
//!
//! A filter suppresses unwanted text fragments (boilerplate, ads, cookie
//! banners) during extraction. A matching filter either discards the current
//! candidate (SKIP) or vetoes the whole field (STOP). STOP is terminal: once
//! any stop filter matches, later matches cannot downgrade the result back to
//! SKIP. This is deliberately different from the first-match-wins evaluation
//! of conditions.

use regex::Regex;

use crate::config::FilterSpec;
use crate::error::RuleError;
use crate::output::{FilterResult, FilterScope};
use crate::rules::compile_anchored;

/// One compiled filter rule.
#[derive(Debug, Clone)]
pub struct FieldFilter {
    expr: String,
    compiled: Option<Regex>,
    scope: FilterScope,
    stop: bool,
}

impl FieldFilter {
    /// Compiles a filter rule from its configuration form.
    ///
    /// An empty expression compiles to an inert filter that never matches.
    pub fn from_spec(spec: FilterSpec) -> Result<Self, RuleError> {
        let compiled = compile_anchored(&spec.expr)?;
        Ok(Self {
            expr: spec.expr,
            compiled,
            scope: spec.scope,
            stop: spec.stop,
        })
    }

    /// The raw filter expression as supplied in configuration.
    pub fn expr(&self) -> &str {
        &self.expr
    }

    /// The extraction phase this filter applies to.
    pub fn scope(&self) -> FilterScope {
        self.scope
    }

    /// Whether a match vetoes the whole field.
    pub fn stop(&self) -> bool {
        self.stop
    }

    /// Returns true if this filter's whole expression matches `text` and its
    /// scope covers the requested phase. Inert filters never match.
    fn matches(&self, text: &str, requested: FilterScope) -> bool {
        if !self.scope.covers(requested) {
            return false;
        }
        match &self.compiled {
            Some(re) => re.is_match(text),
            None => false,
        }
    }

    /// Runs a filter list over one candidate string.
    ///
    /// Filters are evaluated in declaration order. A matching filter upgrades
    /// the running result to `Stop` when its stop flag is set, otherwise to
    /// `Skip`; once the result is `Stop` it stays `Stop` for the remainder of
    /// the list.
    pub fn apply(filters: &[FieldFilter], text: &str, scope: FilterScope) -> FilterResult {
        let mut result = FilterResult::None;
        for filter in filters {
            if result != FilterResult::Stop && filter.matches(text, scope) {
                result = if filter.stop {
                    FilterResult::Stop
                } else {
                    FilterResult::Skip
                };
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn filter(expr: &str, scope: FilterScope, stop: bool) -> FieldFilter {
        FieldFilter::from_spec(FilterSpec {
            expr: expr.to_string(),
            scope,
            stop,
        })
        .unwrap()
    }

    #[test]
    fn no_match_returns_none() {
        let filters = vec![
            filter("advert.*", FilterScope::All, false),
            filter("cookie.*", FilterScope::All, true),
        ];
        assert_eq!(
            FieldFilter::apply(&filters, "actual article text", FilterScope::Text),
            FilterResult::None
        );
    }

    #[test]
    fn plain_match_skips_candidate() {
        let filters = vec![filter("(?i)advert.*", FilterScope::All, false)];
        assert_eq!(
            FieldFilter::apply(&filters, "Advertisement: Buy Now", FilterScope::Text),
            FilterResult::Skip
        );
    }

    #[test]
    fn stop_match_vetoes_field() {
        let filters = vec![filter("(?i)advert.*", FilterScope::All, true)];
        assert_eq!(
            FieldFilter::apply(&filters, "Advertisement: Buy Now", FilterScope::Text),
            FilterResult::Stop
        );
    }

    #[test]
    fn stop_dominates_later_skip_matches() {
        let filters = vec![
            filter(".*banner.*", FilterScope::All, true),
            filter(".*banner.*", FilterScope::All, false),
        ];
        assert_eq!(
            FieldFilter::apply(&filters, "cookie banner text", FilterScope::Text),
            FilterResult::Stop
        );
    }

    #[test]
    fn later_stop_upgrades_earlier_skip() {
        let filters = vec![
            filter(".*banner.*", FilterScope::All, false),
            filter(".*banner.*", FilterScope::All, true),
        ];
        assert_eq!(
            FieldFilter::apply(&filters, "cookie banner text", FilterScope::Text),
            FilterResult::Stop
        );
    }

    #[test]
    fn whole_string_match_not_search() {
        let filters = vec![filter("advert", FilterScope::All, true)];
        assert_eq!(
            FieldFilter::apply(&filters, "this advert is embedded", FilterScope::Text),
            FilterResult::None
        );
    }

    #[test]
    fn scope_gates_participation() {
        let filters = vec![filter(".*promo.*", FilterScope::Html, true)];
        assert_eq!(
            FieldFilter::apply(&filters, "promo block", FilterScope::Text),
            FilterResult::None
        );
        assert_eq!(
            FieldFilter::apply(&filters, "promo block", FilterScope::Html),
            FilterResult::Stop
        );
    }

    #[test]
    fn empty_expression_is_inert() {
        let filters = vec![filter("", FilterScope::All, true)];
        assert_eq!(
            FieldFilter::apply(&filters, "", FilterScope::Text),
            FilterResult::None
        );
        assert_eq!(
            FieldFilter::apply(&filters, "anything", FilterScope::Text),
            FilterResult::None
        );
    }

    #[test]
    fn empty_filter_list_returns_none() {
        assert_eq!(
            FieldFilter::apply(&[], "anything", FilterScope::Text),
            FilterResult::None
        );
    }

    #[test]
    fn round_trip_accessors() {
        let f = filter("(?i)advert.*", FilterScope::OwnText, true);
        assert_eq!(f.expr(), "(?i)advert.*");
        assert_eq!(f.scope(), FilterScope::OwnText);
        assert!(f.stop());
    }
}
