use anyhow::Result;

use super::render::{escape, Renderer};
use super::{Context, Handler, ParseError};
use crate::storage::{Row, RowQuery};

const PLACEHOLDER: &str = "/* your code here ✨ */";

/// `js <code>` / `javascript <code>`: a scratch canvas evaluated in the browser
/// by `static/things.js`.
pub struct JavaScriptHandler;

impl Handler for JavaScriptHandler {
    fn kind(&self) -> &'static str {
        "javascript"
    }

    fn usage(&self) -> &'static str {
        "js <code>"
    }

    fn can_handle(&self, input: &str) -> bool {
        input.starts_with("javascript") || input.starts_with("js")
    }

    fn parse(&self, input: &str) -> Result<Row, ParseError> {
        let code = match input.split_once(' ') {
            Some((_, code)) => code,
            None => PLACEHOLDER,
        };
        let mut row = Row::new(self.kind(), "");
        row.summary = code.to_string();
        row.tags.clear();
        Ok(row)
    }

    fn query(&self, ctx: &Context<'_>, _input: &str) -> Result<Vec<Row>> {
        ctx.query(RowQuery::new().kind(self.kind()))
    }

    /// Rendered without the common frame; the script hooks `.thing.js` sections.
    fn render(&self, _ctx: &Context<'_>, row: &Row) -> Result<Renderer> {
        Ok(Renderer::Html(format!(
            "<section class=\"thing js\">\n\
             \t<pre>function(canvas, ctx) {{\n\
             <textarea name=\"summary\" class=\"js-code\">{}</textarea>\n\
             }}</pre>\n\
             \t<code><pre class=\"js-output\"></pre></code>\n\
             \t<canvas class=\"js-canvas\"></canvas>\n\
             </section>",
            escape(&row.summary)
        )))
    }
}
