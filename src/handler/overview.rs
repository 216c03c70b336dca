use anyhow::Result;

use super::render::Renderer;
use super::{Context, Handler, ParseError};
use crate::storage::{Row, RowQuery};

/// Catches everything no other handler takes, including the empty input the
/// page sends on load. Shows the most recent rows of the namespace.
pub struct OverviewHandler;

impl Handler for OverviewHandler {
    fn kind(&self) -> &'static str {
        "overview"
    }

    fn can_handle(&self, _input: &str) -> bool {
        true
    }

    fn parse(&self, input: &str) -> Result<Row, ParseError> {
        let mut row = Row::new(self.kind(), input.trim());
        row.tags.clear();
        Ok(row)
    }

    fn query(&self, ctx: &Context<'_>, _input: &str) -> Result<Vec<Row>> {
        ctx.query(RowQuery::new())
    }

    fn render(&self, ctx: &Context<'_>, row: &Row) -> Result<Renderer> {
        if row.kind != self.kind() {
            return ctx.render_row(row);
        }
        if row.summary.is_empty() {
            return Ok(Renderer::empty());
        }
        Ok(Renderer::Html(
            "<p class=\"unknown\">don't know that thing, sorry.</p>".into(),
        ))
    }

    fn persistable(&self) -> bool {
        false
    }
}
