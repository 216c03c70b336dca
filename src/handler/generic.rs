use anyhow::Result;
use std::fmt::Write;

use super::render::{escape, Renderer};
use super::{Context, Handler, ParseError};
use crate::storage::Row;

/// Renders rows of kinds no other handler claims as an editable form.
/// It never takes input itself.
pub struct GenericHandler;

impl GenericHandler {
    fn form(row: &Row) -> String {
        let mut out = String::from("<form method=\"POST\" action=\"\">\n");
        let _ = writeln!(
            out,
            "\t<div><input name=\"summary\" type=\"text\" value=\"{}\" /></div>",
            escape(&row.summary)
        );
        let _ = writeln!(
            out,
            "\t<div><textarea name=\"content\">{}</textarea></div>",
            escape(row.content.as_deref().unwrap_or_default())
        );
        let _ = writeln!(
            out,
            "\t<div><input name=\"tags\" type=\"text\" value=\"{}\" /></div>",
            escape(&row.tags.join(" "))
        );
        if let Some(number) = row.number {
            let _ = writeln!(
                out,
                "\t<div><input name=\"number\" type=\"number\" value=\"{number}\" /></div>"
            );
        }
        if let Some(float) = row.float {
            let _ = writeln!(
                out,
                "\t<div><input name=\"float\" type=\"number\" step=\"any\" value=\"{float}\" /></div>"
            );
        }
        let _ = writeln!(
            out,
            "\t<div><input name=\"bool-valid\" type=\"hidden\" value=\"{}\" /><input name=\"bool\" type=\"checkbox\"{}{} /></div>",
            row.bool.is_some(),
            if row.bool.is_none() { " disabled" } else { "" },
            if row.bool == Some(true) { " checked" } else { "" },
        );
        if let Some(time) = row.time {
            let _ = writeln!(
                out,
                "\t<div><input name=\"time\" type=\"datetime-local\" value=\"{}\" /></div>",
                time.format("%Y-%m-%dT%H:%M")
            );
        }
        for (key, value) in &row.fields {
            let _ = writeln!(
                out,
                "\t<div><label for=\"{0}\">{0}</label><input id=\"{0}\" name=\"{0}\" type=\"text\" value=\"{1}\" /></div>",
                escape(key),
                escape(value)
            );
        }
        out.push_str("\t<div><input type=\"submit\" value=\"save\" /></div>\n</form>");
        out
    }
}

impl Handler for GenericHandler {
    fn kind(&self) -> &'static str {
        "generic"
    }

    fn can_handle(&self, _input: &str) -> bool {
        false
    }

    fn parse(&self, input: &str) -> Result<Row, ParseError> {
        Ok(Row::new(self.kind(), input))
    }

    fn query(&self, _ctx: &Context<'_>, _input: &str) -> Result<Vec<Row>> {
        Ok(Vec::new())
    }

    fn render(&self, _ctx: &Context<'_>, row: &Row) -> Result<Renderer> {
        Ok(Renderer::thing(row, Self::form(row)))
    }

    fn persistable(&self) -> bool {
        false
    }
}
