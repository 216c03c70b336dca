use anyhow::Result;
use regex::Regex;
use std::sync::LazyLock;

use super::render::{escape, Renderer};
use super::{Context, Handler, ParseError};
use crate::storage::{Row, RowQuery};

static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}(-\d{2}){0,2}$").expect("valid date regex"));

/// `2024`, `2024-08` or `2024-08-15`: everything created in that period.
pub struct ByDateHandler;

impl Handler for ByDateHandler {
    fn kind(&self) -> &'static str {
        "date"
    }

    fn usage(&self) -> &'static str {
        "<yyyy>[-<mm>[-<dd>]]"
    }

    fn can_handle(&self, input: &str) -> bool {
        DATE_RE.is_match(input.trim())
    }

    fn parse(&self, input: &str) -> Result<Row, ParseError> {
        Ok(Row::new(self.kind(), input.trim()))
    }

    fn query(&self, ctx: &Context<'_>, input: &str) -> Result<Vec<Row>> {
        ctx.query(RowQuery::new().created_prefix(input.trim()))
    }

    fn render(&self, ctx: &Context<'_>, row: &Row) -> Result<Renderer> {
        if row.kind == self.kind() || self.can_handle(&row.kind) {
            return Ok(Renderer::Html(format!(
                "<h2 class=\"date\">{}</h2>",
                escape(&row.summary)
            )));
        }
        ctx.render_row(row)
    }

    fn persistable(&self) -> bool {
        false
    }
}
