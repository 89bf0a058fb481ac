// ABOUTME: Fields aggregate holding the named field slots for one content type.
// ABOUTME: Scopes evaluation with a root selector, gates on the validator, and fills an Extraction.

//! The `Fields` aggregate.
//!
//! One `Fields` value holds every named field recognized for a content type
//! plus a root selector scoping the whole page. Slots are evaluated
//! independently; only the validator is special: it runs first and, when
//! present but empty, rejects the page before any other slot is touched.
//! A `Fields` set compiled from an organization-level template can be
//! overlaid with site-level overrides without mutating the template.

use chrono::{DateTime, Utc};
use scraper::{ElementRef, Html, Selector};

use crate::config::FieldsDef;
use crate::error::RuleError;
use crate::rules::field::{Field, FieldOutcome};

/// Values extracted from one page by a [`Fields`] rule set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    pub title: Option<String>,
    pub author: Option<String>,
    pub author_link: Option<String>,
    pub published_date: Option<DateTime<Utc>>,
    pub start_date: Option<DateTime<Utc>>,
    pub start_time: Option<String>,
    pub end_date: Option<DateTime<Utc>>,
    pub end_time: Option<String>,
    pub timezone: Option<String>,
    pub body: Option<String>,
    pub image: Option<String>,
    pub background_image: Option<String>,
    pub url: Option<String>,
}

/// Outcome of applying a [`Fields`] rule set to one page.
#[derive(Debug, Clone, PartialEq)]
pub enum PageOutcome {
    /// The page was accepted; per-slot values may still be absent.
    Extracted(Extraction),
    /// The root selector or validator rejected the page.
    Rejected,
}

impl PageOutcome {
    /// Returns the extraction, if the page was accepted.
    pub fn into_extraction(self) -> Option<Extraction> {
        match self {
            PageOutcome::Extracted(extraction) => Some(extraction),
            PageOutcome::Rejected => None,
        }
    }
}

/// The full set of named fields recognized for one content type.
#[derive(Debug, Clone, Default)]
pub struct Fields {
    root_expr: String,
    root: Option<Selector>,
    validator: Option<Field>,
    title: Option<Field>,
    author: Option<Field>,
    author_link: Option<Field>,
    published_date: Option<Field>,
    start_date: Option<Field>,
    start_time: Option<Field>,
    end_date: Option<Field>,
    end_time: Option<Field>,
    timezone: Option<Field>,
    body: Option<Field>,
    image: Option<Field>,
    background_image: Option<Field>,
    url: Option<Field>,
}

impl Fields {
    /// Compiles a rule set from its configuration form.
    pub fn from_def(def: FieldsDef) -> Result<Self, RuleError> {
        let root = if def.root.is_empty() {
            None
        } else {
            Some(
                Selector::parse(&def.root)
                    .map_err(|e| RuleError::invalid_selector(def.root.as_str(), e))?,
            )
        };

        let slot = |name: &str, spec| -> Result<Option<Field>, RuleError> {
            match spec {
                Some(spec) => Field::from_spec(name, spec).map(Some),
                None => Ok(None),
            }
        };

        Ok(Self {
            root_expr: def.root,
            root,
            validator: slot("validator", def.validator)?,
            title: slot("title", def.title)?,
            author: slot("author", def.author)?,
            author_link: slot("author-link", def.author_link)?,
            published_date: slot("published-date", def.published_date)?,
            start_date: slot("start-date", def.start_date)?,
            start_time: slot("start-time", def.start_time)?,
            end_date: slot("end-date", def.end_date)?,
            end_time: slot("end-time", def.end_time)?,
            timezone: slot("timezone", def.timezone)?,
            body: slot("body", def.body)?,
            image: slot("image", def.image)?,
            background_image: slot("background-image", def.background_image)?,
            url: slot("url", def.url)?,
        })
    }

    /// Compiles a rule set from an already-parsed configuration value.
    pub fn from_value(value: serde_json::Value) -> Result<Self, RuleError> {
        let def: FieldsDef = serde_json::from_value(value)?;
        Self::from_def(def)
    }

    /// Compiles a rule set from a JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self, RuleError> {
        let def: FieldsDef = serde_json::from_str(json)?;
        Self::from_def(def)
    }

    /// The root selector expression; empty scopes to the whole document.
    pub fn root(&self) -> &str {
        &self.root_expr
    }

    pub fn validator(&self) -> Option<&Field> {
        self.validator.as_ref()
    }

    pub fn title(&self) -> Option<&Field> {
        self.title.as_ref()
    }

    pub fn author(&self) -> Option<&Field> {
        self.author.as_ref()
    }

    pub fn author_link(&self) -> Option<&Field> {
        self.author_link.as_ref()
    }

    pub fn published_date(&self) -> Option<&Field> {
        self.published_date.as_ref()
    }

    pub fn start_date(&self) -> Option<&Field> {
        self.start_date.as_ref()
    }

    pub fn start_time(&self) -> Option<&Field> {
        self.start_time.as_ref()
    }

    pub fn end_date(&self) -> Option<&Field> {
        self.end_date.as_ref()
    }

    pub fn end_time(&self) -> Option<&Field> {
        self.end_time.as_ref()
    }

    pub fn timezone(&self) -> Option<&Field> {
        self.timezone.as_ref()
    }

    pub fn body(&self) -> Option<&Field> {
        self.body.as_ref()
    }

    pub fn image(&self) -> Option<&Field> {
        self.image.as_ref()
    }

    pub fn background_image(&self) -> Option<&Field> {
        self.background_image.as_ref()
    }

    pub fn url(&self) -> Option<&Field> {
        self.url.as_ref()
    }

    /// Derives a new rule set from this template, replacing each slot for
    /// which `overrides` carries a present field. The template is never
    /// mutated.
    pub fn overlaid(&self, overrides: &Fields) -> Fields {
        let pick = |base: &Option<Field>, over: &Option<Field>| -> Option<Field> {
            match over {
                Some(field) if field.has_selectors() => Some(field.clone()),
                _ => base.clone(),
            }
        };
        let (root_expr, root) = if overrides.root_expr.is_empty() {
            (self.root_expr.clone(), self.root.clone())
        } else {
            (overrides.root_expr.clone(), overrides.root.clone())
        };
        Fields {
            root_expr,
            root,
            validator: pick(&self.validator, &overrides.validator),
            title: pick(&self.title, &overrides.title),
            author: pick(&self.author, &overrides.author),
            author_link: pick(&self.author_link, &overrides.author_link),
            published_date: pick(&self.published_date, &overrides.published_date),
            start_date: pick(&self.start_date, &overrides.start_date),
            start_time: pick(&self.start_time, &overrides.start_time),
            end_date: pick(&self.end_date, &overrides.end_date),
            end_time: pick(&self.end_time, &overrides.end_time),
            timezone: pick(&self.timezone, &overrides.timezone),
            body: pick(&self.body, &overrides.body),
            image: pick(&self.image, &overrides.image),
            background_image: pick(&self.background_image, &overrides.background_image),
            url: pick(&self.url, &overrides.url),
        }
    }

    /// Applies the rule set to a parsed document.
    ///
    /// The root selector narrows the sub-tree every slot sees; a declared
    /// root with no match rejects the page, as does a present-but-empty
    /// validator. The only error surfaced is a date-parse failure on a
    /// non-optional date slot.
    pub fn extract(&self, doc: &Html) -> Result<PageOutcome, RuleError> {
        let scope = match &self.root {
            Some(selector) => match doc.select(selector).next() {
                Some(el) => el,
                None => return Ok(PageOutcome::Rejected),
            },
            None => doc.root_element(),
        };

        if let Some(validator) = present(&self.validator) {
            if !validator.evaluate(scope).is_value() {
                return Ok(PageOutcome::Rejected);
            }
        }

        let extraction = Extraction {
            title: text_slot(&self.title, scope),
            author: text_slot(&self.author, scope),
            author_link: url_slot(&self.author_link, scope),
            published_date: date_slot(&self.published_date, scope)?,
            start_date: date_slot(&self.start_date, scope)?,
            start_time: text_slot(&self.start_time, scope),
            end_date: date_slot(&self.end_date, scope)?,
            end_time: text_slot(&self.end_time, scope),
            timezone: text_slot(&self.timezone, scope),
            body: text_slot(&self.body, scope),
            image: url_slot(&self.image, scope),
            background_image: url_slot(&self.background_image, scope),
            url: url_slot(&self.url, scope),
        };
        Ok(PageOutcome::Extracted(extraction))
    }
}

/// A slot is present only if it was declared and has at least one selector.
fn present(slot: &Option<Field>) -> Option<&Field> {
    slot.as_ref().filter(|field| field.has_selectors())
}

fn text_slot(slot: &Option<Field>, scope: ElementRef<'_>) -> Option<String> {
    present(slot).and_then(|field| field.evaluate(scope).into_value())
}

fn url_slot(slot: &Option<Field>, scope: ElementRef<'_>) -> Option<String> {
    present(slot).and_then(|field| match field.evaluate_url(scope) {
        FieldOutcome::Value(url) => Some(url),
        FieldOutcome::Missing | FieldOutcome::Stopped => None,
    })
}

fn date_slot(
    slot: &Option<Field>,
    scope: ElementRef<'_>,
) -> Result<Option<DateTime<Utc>>, RuleError> {
    match present(slot) {
        Some(field) => field.evaluate_date(scope),
        None => Ok(None),
    }
}
