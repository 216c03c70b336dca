use anyhow::Result;

use super::render::{escape, markdown, Renderer};
use super::{Context, Handler, ParseError};
use crate::storage::row::Track;
use crate::storage::{Row, RowQuery};

/// `track <category> [<number> [<notes>]]`, e.g. `track sleep 7.5 woke up twice`.
pub struct TrackHandler;

impl TrackHandler {
    fn category(input: &str) -> Option<&str> {
        input.splitn(4, ' ').nth(1).filter(|c| !c.is_empty())
    }
}

impl Handler for TrackHandler {
    fn kind(&self) -> &'static str {
        "track"
    }

    fn usage(&self) -> &'static str {
        "track <category> [<number> [<notes>]]"
    }

    fn can_handle(&self, input: &str) -> bool {
        input.starts_with("track")
    }

    fn parse(&self, input: &str) -> Result<Row, ParseError> {
        let parts: Vec<&str> = input.splitn(4, ' ').collect();
        let mut row = Row::new(self.kind(), parts.get(1).copied().unwrap_or_default());

        if let Some(number) = parts.get(2).filter(|n| !n.is_empty()) {
            let value = number.parse::<f64>().map_err(|source| ParseError::InvalidNumber {
                input: number.to_string(),
                source,
            })?;
            row.float = Some(value);
        }

        if let Some(notes) = parts.get(3) {
            row = row.with_content(*notes);
        }

        Ok(row)
    }

    /// All tracked values, or only those of the category named in `input`.
    fn query(&self, ctx: &Context<'_>, input: &str) -> Result<Vec<Row>> {
        let filter = RowQuery::new().kind(self.kind());
        match Self::category(input) {
            Some(category) => ctx.query(filter.summary(category)),
            None => ctx.query(filter),
        }
    }

    fn render(&self, _ctx: &Context<'_>, row: &Row) -> Result<Renderer> {
        let track = Track(row);
        let mut body = escape(track.category());

        if let Some(value) = track.value() {
            let style = if track.category() == "mood" {
                format!(" style=\"opacity: calc({value}/100)\"")
            } else {
                String::new()
            };
            body.push_str(&format!(
                "\n<span{style}>{}</span>",
                escape(&track.format_value())
            ));
        }

        if !track.notes().is_empty() {
            body.push_str(&format!("\n<p>{}</p>", markdown(track.notes())));
        }

        Ok(Renderer::thing(row, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_category_value_and_notes() {
        let row = TrackHandler.parse("track sleep 7.5 woke up twice").unwrap();
        assert_eq!(row.summary, "sleep");
        assert_eq!(row.float, Some(7.5));
        assert_eq!(row.content.as_deref(), Some("woke up twice"));
    }

    #[test]
    fn value_is_optional() {
        let row = TrackHandler.parse("track headache").unwrap();
        assert_eq!(row.summary, "headache");
        assert!(row.float.is_none());
        assert!(row.content.is_none());
    }

    #[test]
    fn invalid_number_is_rejected() {
        let err = TrackHandler.parse("track sleep lots").unwrap_err();
        assert!(matches!(err, ParseError::InvalidNumber { ref input, .. } if input == "lots"));
    }

    #[test]
    fn category_ignores_trailing_parts() {
        assert_eq!(TrackHandler::category("track sleep 7 notes"), Some("sleep"));
        assert_eq!(TrackHandler::category("track"), None);
        assert_eq!(TrackHandler::category("track "), None);
    }
}
