// ABOUTME: FieldCondition rule for gating whether a page or node is processed.
// ABOUTME: Implements first-match-wins accept/reject evaluation over whole-string regexes.

//! Condition rules.
//!
//! A condition validates whether a candidate page or node should be processed
//! at all. Evaluation is first-match-wins: the first condition in list order
//! whose expression whole-matches decides the outcome and later conditions
//! are never consulted. With no match the default is reject. This control
//! flow is genuinely different from the STOP-dominates loop in filters and
//! must not be unified with it.

use regex::Regex;

use crate::config::ConditionSpec;
use crate::error::RuleError;
use crate::output::ConditionAction;
use crate::rules::compile_anchored;

/// One compiled condition rule.
#[derive(Debug, Clone)]
pub struct FieldCondition {
    expr: String,
    compiled: Option<Regex>,
    action: ConditionAction,
}

impl FieldCondition {
    /// Compiles a condition rule from its configuration form.
    ///
    /// An empty expression compiles to an inert condition that never matches.
    pub fn from_spec(spec: ConditionSpec) -> Result<Self, RuleError> {
        let compiled = compile_anchored(&spec.expr)?;
        Ok(Self {
            expr: spec.expr,
            compiled,
            action: spec.action,
        })
    }

    /// The raw condition expression as supplied in configuration.
    pub fn expr(&self) -> &str {
        &self.expr
    }

    /// What a match decides.
    pub fn action(&self) -> ConditionAction {
        self.action
    }

    /// Decides whether `text` is accepted by a condition list.
    ///
    /// The first condition with a non-empty expression that whole-matches
    /// `text` decides (`Accept` => true, `Reject` => false) and iteration
    /// stops. If no condition matches, the default is false.
    pub fn accept(conditions: &[FieldCondition], text: &str) -> bool {
        for condition in conditions {
            let matched = match &condition.compiled {
                Some(re) => re.is_match(text),
                None => false,
            };
            if matched {
                return condition.action == ConditionAction::Accept;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn condition(expr: &str, action: ConditionAction) -> FieldCondition {
        FieldCondition::from_spec(ConditionSpec {
            expr: expr.to_string(),
            action,
        })
        .unwrap()
    }

    #[test]
    fn default_is_reject() {
        assert!(!FieldCondition::accept(&[], "anything"));
        let conditions = vec![condition(".*news.*", ConditionAction::Accept)];
        assert!(!FieldCondition::accept(&conditions, "sports scores"));
    }

    #[test]
    fn first_match_wins() {
        let conditions = vec![
            condition(".*press-release.*", ConditionAction::Reject),
            condition(".*", ConditionAction::Accept),
        ];
        assert!(!FieldCondition::accept(
            &conditions,
            "acme press-release 2024"
        ));
        assert!(FieldCondition::accept(&conditions, "regular article"));
    }

    #[test]
    fn later_conditions_never_override_a_match() {
        // Both match; only the first decides, even though the second would
        // flip the result.
        let conditions = vec![
            condition(".*breaking.*", ConditionAction::Accept),
            condition(".*breaking.*", ConditionAction::Reject),
        ];
        assert!(FieldCondition::accept(&conditions, "breaking news"));
    }

    #[test]
    fn whole_string_match_not_search() {
        let conditions = vec![condition("news", ConditionAction::Accept)];
        assert!(!FieldCondition::accept(&conditions, "the news today"));
        assert!(FieldCondition::accept(&conditions, "news"));
    }

    #[test]
    fn empty_expression_is_inert() {
        let conditions = vec![
            condition("", ConditionAction::Accept),
            condition(".*article.*", ConditionAction::Accept),
        ];
        assert!(FieldCondition::accept(&conditions, "an article page"));
        assert!(!FieldCondition::accept(&conditions, "something else"));
    }

    #[test]
    fn action_defaults_to_accept_in_config() {
        let spec: ConditionSpec = serde_json::from_str(r#"{"expr": ".*"}"#).unwrap();
        let c = FieldCondition::from_spec(spec).unwrap();
        assert_eq!(c.action(), ConditionAction::Accept);
        assert!(FieldCondition::accept(&[c], "whatever"));
    }

    #[test]
    fn invalid_expression_fails_at_construction() {
        let spec = ConditionSpec {
            expr: "(unclosed".to_string(),
            action: ConditionAction::Accept,
        };
        assert!(matches!(
            FieldCondition::from_spec(spec),
            Err(RuleError::InvalidRegex { .. })
        ));
    }
}
