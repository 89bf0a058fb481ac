// ABOUTME: FieldExclude rule for stripping unwanted sub-trees before extraction.
// ABOUTME: Parses compact tag/class/id expressions and detaches matching nodes from the document.

//! Exclude rules.
//!
//! An exclude rule strips unwanted sub-nodes (ad slots, share widgets,
//! comment blocks) from a document before any field extraction runs. The
//! compact expression `tag`, `tag.class`, or `tag#id` is parsed once at
//! construction into three constraints, each empty meaning "any". The `.`
//! separator is tried before `#`, so at most one of class/id is populated.

use ego_tree::NodeId;
use scraper::{ElementRef, Html};

use crate::config::ExcludeSpec;
use crate::error::RuleError;

/// One parsed exclude rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldExclude {
    expr: String,
    tag: String,
    class: String,
    id: String,
}

impl FieldExclude {
    /// Parses an exclude rule from its configuration form.
    pub fn from_spec(spec: ExcludeSpec) -> Result<Self, RuleError> {
        Self::from_expr(spec.into_expr())
    }

    /// Parses an exclude rule from its compact expression.
    pub fn from_expr(expr: impl Into<String>) -> Result<Self, RuleError> {
        let expr = expr.into();
        let trimmed = expr.trim();
        if trimmed.is_empty() {
            return Err(RuleError::InvalidExclude { expr });
        }
        let (tag, class, id) = match trimmed.split_once('.') {
            Some((tag, class)) => (tag, class, ""),
            None => match trimmed.split_once('#') {
                Some((tag, id)) => (tag, "", id),
                None => (trimmed, "", ""),
            },
        };
        Ok(Self {
            tag: tag.to_string(),
            class: class.to_string(),
            id: id.to_string(),
            expr,
        })
    }

    /// The raw expression as supplied in configuration.
    pub fn expr(&self) -> &str {
        &self.expr
    }

    /// The tag constraint; empty means any tag.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// The class constraint; empty means any class.
    pub fn class(&self) -> &str {
        &self.class
    }

    /// The id constraint; empty means any id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns true if every non-empty constraint holds for the element.
    pub fn matches(&self, el: ElementRef<'_>) -> bool {
        if !self.tag.is_empty() && !el.value().name().eq_ignore_ascii_case(&self.tag) {
            return false;
        }
        if !self.class.is_empty() && !el.value().classes().any(|c| c == self.class) {
            return false;
        }
        if !self.id.is_empty() && el.value().id() != Some(self.id.as_str()) {
            return false;
        }
        true
    }

    /// Returns true if any rule in the list matches the element.
    pub fn matches_any(excludes: &[FieldExclude], el: ElementRef<'_>) -> bool {
        excludes.iter().any(|rule| rule.matches(el))
    }

    /// Detaches every element matching any exclude rule from the document.
    ///
    /// Matching node ids are collected first, then detached, so the walk
    /// never observes its own mutations.
    pub fn strip(doc: &mut Html, excludes: &[FieldExclude]) {
        if excludes.is_empty() {
            return;
        }
        let ids: Vec<NodeId> = doc
            .tree
            .root()
            .descendants()
            .filter_map(|node| {
                let el = ElementRef::wrap(node)?;
                if FieldExclude::matches_any(excludes, el) {
                    Some(node.id())
                } else {
                    None
                }
            })
            .collect();
        for id in ids {
            if let Some(mut node) = doc.tree.get_mut(id) {
                node.detach();
            }
        }
    }
}
