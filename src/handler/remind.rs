//! `remind <duration> <description>`: reminders kept in memory.
//!
//! Reminders are not written to the database and are lost on restart.
//! Saving a reminder with the description of an existing one moves it.

use anyhow::{anyhow, Result};
use chrono::{DateTime, DurationRound, TimeDelta, Utc};
use std::sync::Mutex;

use super::render::{escape, Renderer};
use super::{Context, Handler, ParseError};
use crate::storage::Row;

#[derive(Debug, Clone, PartialEq)]
pub struct Reminder {
    pub namespace: String,
    pub due: DateTime<Utc>,
    pub description: String,
}

/// Process-wide reminder list, partitioned by namespace.
#[derive(Debug, Default)]
pub struct Reminders {
    inner: Mutex<Vec<Reminder>>,
}

impl Reminders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a reminder, replacing one with the same description in the same namespace.
    pub fn upsert(&self, reminder: Reminder) -> Result<()> {
        let mut list = self
            .inner
            .lock()
            .map_err(|e| anyhow!("reminders lock poisoned: {e}"))?;
        match list
            .iter_mut()
            .find(|r| r.namespace == reminder.namespace && r.description == reminder.description)
        {
            Some(existing) => *existing = reminder,
            None => list.push(reminder),
        }
        Ok(())
    }

    /// Reminders of `namespace`, soonest first.
    pub fn list(&self, namespace: &str) -> Result<Vec<Reminder>> {
        let list = self
            .inner
            .lock()
            .map_err(|e| anyhow!("reminders lock poisoned: {e}"))?;
        let mut mine: Vec<Reminder> = list
            .iter()
            .filter(|r| r.namespace == namespace)
            .cloned()
            .collect();
        mine.sort_by_key(|r| r.due);
        Ok(mine)
    }
}

/// Longest reminder accepted, in days.
pub const MAX_DURATION_DAYS: i64 = 10 * 366;

/// Parse a duration such as `90s`, `25m`, `1h30m` or `1.5h`, up to [`MAX_DURATION_DAYS`].
pub fn parse_duration(text: &str) -> Option<TimeDelta> {
    if text.is_empty() {
        return None;
    }

    let mut total_ms = 0f64;
    let mut rest = text;
    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        if number_len == 0 {
            return None;
        }
        let value: f64 = rest[..number_len].parse().ok()?;
        rest = &rest[number_len..];

        let unit_len = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let millis_per_unit = match &rest[..unit_len] {
            "ms" => 1.0,
            "s" => 1_000.0,
            "m" => 60_000.0,
            "h" => 3_600_000.0,
            "d" => 86_400_000.0,
            _ => return None,
        };
        rest = &rest[unit_len..];
        total_ms += value * millis_per_unit;
        if total_ms > (MAX_DURATION_DAYS * 86_400_000) as f64 {
            return None;
        }
    }

    TimeDelta::try_milliseconds(total_ms.round() as i64)
}

/// `1h5m`, `12m` or `0m`; negative spans read as overdue.
fn format_remaining(delta: TimeDelta) -> String {
    if delta < TimeDelta::zero() {
        return "overdue".to_string();
    }
    let minutes = delta.num_minutes();
    let (hours, minutes) = (minutes / 60, minutes % 60);
    if hours > 0 {
        format!("{hours}h{minutes}m")
    } else {
        format!("{minutes}m")
    }
}

pub struct ReminderHandler;

impl Handler for ReminderHandler {
    fn kind(&self) -> &'static str {
        "remind"
    }

    fn usage(&self) -> &'static str {
        "remind <duration> <description>"
    }

    fn can_handle(&self, input: &str) -> bool {
        input.starts_with("remind")
    }

    /// A bare `remind` parses to an undated row: it only lists reminders.
    fn parse(&self, input: &str) -> Result<Row, ParseError> {
        if input.trim() == self.kind() {
            return Ok(Row::new(self.kind(), ""));
        }

        let parts: Vec<&str> = input.splitn(3, ' ').collect();
        let [_, duration, description] = parts.as_slice() else {
            return Err(ParseError::Usage(self.usage()));
        };

        let delta = parse_duration(duration)
            .filter(|d| *d > TimeDelta::zero())
            .ok_or_else(|| ParseError::InvalidDuration(duration.to_string()))?;

        let due = Utc::now()
            .checked_add_signed(delta)
            .ok_or_else(|| ParseError::InvalidDuration(duration.to_string()))?;
        let due = due.duration_trunc(TimeDelta::minutes(1)).unwrap_or(due);

        let mut row = Row::new(self.kind(), description.trim());
        row.time = Some(due);
        Ok(row)
    }

    fn query(&self, ctx: &Context<'_>, _input: &str) -> Result<Vec<Row>> {
        let rows = ctx
            .reminders
            .list(ctx.namespace)?
            .into_iter()
            .map(|reminder| {
                let mut row = Row::new(self.kind(), reminder.description);
                row.namespace = reminder.namespace;
                row.time = Some(reminder.due);
                row
            })
            .collect();
        Ok(rows)
    }

    fn render(&self, _ctx: &Context<'_>, row: &Row) -> Result<Renderer> {
        let due = row.time.unwrap_or(row.date_created);
        Ok(Renderer::Html(format!(
            "<time datetime=\"{}\">in {}</time> {}",
            due.to_rfc3339(),
            format_remaining(due - Utc::now()),
            escape(&row.summary)
        )))
    }

    /// Reminders stay in memory.
    fn save(&self, ctx: &Context<'_>, mut row: Row) -> Result<Row> {
        let due = row.time.ok_or(ParseError::Usage(self.usage()))?;
        ctx.reminders.upsert(Reminder {
            namespace: ctx.namespace.to_string(),
            due,
            description: row.summary.clone(),
        })?;
        tracing::info!(namespace = ctx.namespace, due = %due, "reminder saved");
        row.namespace = ctx.namespace.to_string();
        Ok(row)
    }
}
