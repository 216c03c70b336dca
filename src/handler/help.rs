use anyhow::Result;

use super::render::{escape, Renderer};
use super::{Context, Handler, ParseError};
use crate::storage::Row;

/// `help`: what can be typed into the box.
pub struct HelpHandler;

impl Handler for HelpHandler {
    fn kind(&self) -> &'static str {
        "help"
    }

    fn usage(&self) -> &'static str {
        "help"
    }

    fn can_handle(&self, input: &str) -> bool {
        input.trim() == "help"
    }

    fn parse(&self, input: &str) -> Result<Row, ParseError> {
        Ok(Row::new(self.kind(), input))
    }

    fn query(&self, _ctx: &Context<'_>, _input: &str) -> Result<Vec<Row>> {
        Ok(Vec::new())
    }

    fn render(&self, ctx: &Context<'_>, _row: &Row) -> Result<Renderer> {
        let items = ctx
            .handlers
            .iter()
            .filter(|h| !h.usage().is_empty())
            .map(|h| {
                Renderer::Html(format!(
                    "<code>{}</code>{}",
                    escape(h.usage()),
                    if h.persistable() {
                        " <small>(append <code>!save</code> to keep it)</small>"
                    } else {
                        ""
                    }
                ))
            })
            .collect();
        Ok(Renderer::Sequence(vec![
            Renderer::Html("<p>try one of these:</p>".into()),
            Renderer::List(items),
        ]))
    }

    fn persistable(&self) -> bool {
        false
    }
}
