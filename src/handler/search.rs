use anyhow::Result;

use super::render::Renderer;
use super::{Context, Handler, ParseError};
use crate::storage::{Row, RowQuery};

/// `search <text>`. Lists every row of the namespace; there is no text index.
pub struct SearchHandler;

impl Handler for SearchHandler {
    fn kind(&self) -> &'static str {
        "search"
    }

    fn usage(&self) -> &'static str {
        "search <text>"
    }

    fn can_handle(&self, input: &str) -> bool {
        input.starts_with("search")
    }

    fn parse(&self, input: &str) -> Result<Row, ParseError> {
        let mut row = Row::new(self.kind(), input);
        row.tags.clear();
        Ok(row)
    }

    fn query(&self, ctx: &Context<'_>, _input: &str) -> Result<Vec<Row>> {
        ctx.query(RowQuery::new())
    }

    fn render(&self, ctx: &Context<'_>, row: &Row) -> Result<Renderer> {
        match row.kind.as_str() {
            "search" | "overview" => Ok(Renderer::Text("searching...".into())),
            _ => ctx.render_row(row),
        }
    }

    fn persistable(&self) -> bool {
        false
    }
}
