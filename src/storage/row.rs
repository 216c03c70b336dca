//! The generic row shared by every kind of thing.
//!
//! Kind-specific views ([`Note`], [`Task`], [`Track`], ...) borrow a [`Row`]
//! and add accessors; they never own or outlive it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single persisted record, matching the `rows` table schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    /// SQLite rowid. `0` until the row has been inserted.
    pub id: i64,
    /// Partition key; one per browser.
    pub namespace: String,
    /// Kind tag such as `"note"` or `"task"`.
    pub kind: String,
    pub summary: String,
    pub content: Option<String>,
    /// URL this row is about, if any.
    #[serde(rename = "ref")]
    pub reference: Option<String>,
    pub number: Option<i64>,
    pub float: Option<f64>,
    pub bool: Option<bool>,
    pub time: Option<DateTime<Utc>>,
    /// Tags including their leading `#`.
    pub tags: Vec<String>,
    pub fields: BTreeMap<String, String>,
    pub date_created: DateTime<Utc>,
}

impl Row {
    pub fn new(kind: impl Into<String>, summary: impl Into<String>) -> Self {
        let summary = summary.into();
        Self {
            id: 0,
            namespace: String::new(),
            kind: kind.into(),
            tags: Self::extract_tags(&summary),
            summary,
            content: None,
            reference: None,
            number: None,
            float: None,
            bool: None,
            time: None,
            fields: BTreeMap::new(),
            date_created: Utc::now(),
        }
    }

    /// Collect `#words` from free text, deduplicated, in order of appearance.
    pub fn extract_tags(text: &str) -> Vec<String> {
        let mut tags: Vec<String> = Vec::new();
        for word in text.split_whitespace() {
            if word.len() > 1 && word.starts_with('#') && !tags.iter().any(|t| t == word) {
                tags.push(word.to_string());
            }
        }
        tags
    }

    /// Whether the row has been persisted.
    pub fn is_stored(&self) -> bool {
        self.id > 0
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        let content = content.into();
        for tag in Self::extract_tags(&content) {
            if !self.tags.contains(&tag) {
                self.tags.push(tag);
            }
        }
        self.content = Some(content);
        self
    }
}

/// A free-form note. `reference` holds the first URL in the text.
#[derive(Debug, Clone, Copy)]
pub struct Note<'a>(pub &'a Row);

impl Note<'_> {
    pub fn text(&self) -> &str {
        &self.0.summary
    }

    pub fn about(&self) -> Option<&str> {
        self.0.reference.as_deref()
    }
}

/// Something to read or watch later.
#[derive(Debug, Clone, Copy)]
pub struct Later<'a>(pub &'a Row);

impl Later<'_> {
    pub fn text(&self) -> &str {
        &self.0.summary
    }
}

/// A task; `bool` is the done flag.
#[derive(Debug, Clone, Copy)]
pub struct Task<'a>(pub &'a Row);

impl Task<'_> {
    pub fn title(&self) -> &str {
        &self.0.summary
    }

    pub fn details(&self) -> &str {
        self.0.content.as_deref().unwrap_or_default()
    }

    pub fn is_done(&self) -> bool {
        self.0.bool.unwrap_or(false)
    }
}

/// A tracked value: category in `summary`, value in `float`, notes in `content`.
#[derive(Debug, Clone, Copy)]
pub struct Track<'a>(pub &'a Row);

impl Track<'_> {
    pub fn category(&self) -> &str {
        &self.0.summary
    }

    pub fn value(&self) -> Option<f64> {
        self.0.float
    }

    pub fn notes(&self) -> &str {
        self.0.content.as_deref().unwrap_or_default()
    }

    /// Human readable value with a unit that depends on the category.
    pub fn format_value(&self) -> String {
        let value = self.value().unwrap_or(0.0);
        // Fractional digits written as minutes, e.g. 7.30 -> 7:30. Rounding
        // happens before the split so 7.999 carries over to 8:00.
        let hundredths = (value * 100.0).round() as i64;
        let (whole, minutes) = (hundredths / 100, (hundredths % 100).abs());

        match self.category() {
            "sport" if minutes == 0 => format!("{whole}min"),
            "sport" => format!("{whole}:{minutes:02}min"),
            "sleep" => format!("{value:.2}hrs"),
            "ready" | "up" | "bed" => format!("{whole}:{minutes:02}hrs"),
            "groceries" => format!("{value:.2}eur"),
            "weight" => format!("{value:.2}kg"),
            _ if value.fract().abs() < 0.001 => format!("{}", value.round() as i64),
            _ => format!("{value:.6}"),
        }
    }
}

/// A `key: value` setting; `summary` is the key, `content` the value.
#[derive(Debug, Clone, Copy)]
pub struct Setting<'a>(pub &'a Row);

impl Setting<'_> {
    /// The setting whose value guards a namespace.
    pub const NAMESPACE_TOKEN: &'static str = "namespace.token";

    pub fn key(&self) -> &str {
        &self.0.summary
    }

    pub fn value(&self) -> &str {
        self.0.content.as_deref().unwrap_or_default()
    }

    pub fn is_secret(&self) -> bool {
        self.key() == Self::NAMESPACE_TOKEN
    }
}
