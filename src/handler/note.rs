use anyhow::Result;
use regex::Regex;
use std::sync::LazyLock;

use super::render::{escape, is_safe_url, markdown, Renderer};
use super::{query_kind_matching, rest_of, Context, Handler, ParseError};
use crate::storage::row::{Later, Note};
use crate::storage::Row;

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w+://[^\s]+").expect("valid url regex"));

/// `note <text>`: free-form markdown. The first URL becomes the row's reference.
pub struct NoteHandler;

impl Handler for NoteHandler {
    fn kind(&self) -> &'static str {
        "note"
    }

    fn usage(&self) -> &'static str {
        "note <text>"
    }

    fn can_handle(&self, input: &str) -> bool {
        input.starts_with("note")
    }

    fn parse(&self, input: &str) -> Result<Row, ParseError> {
        let text = rest_of(input);
        let mut row = Row::new(self.kind(), text);
        row.reference = URL_RE
            .find_iter(text)
            .map(|m| m.as_str())
            .find(|url| is_safe_url(url))
            .map(str::to_string);
        Ok(row)
    }

    fn query(&self, ctx: &Context<'_>, input: &str) -> Result<Vec<Row>> {
        query_kind_matching(ctx, self.kind(), input)
    }

    fn render(&self, _ctx: &Context<'_>, row: &Row) -> Result<Renderer> {
        let note = Note(row);
        let mut body = format!("<div>{}</div>", markdown(note.text()));
        if let Some(about) = note.about().filter(|url| is_safe_url(url)) {
            body.push_str(&format!(
                "\n<a class=\"about\" href=\"{0}\">{0}</a>",
                escape(about)
            ));
        }
        Ok(Renderer::thing(row, body))
    }
}

/// `later <text>`: a reading list entry.
pub struct LaterHandler;

impl Handler for LaterHandler {
    fn kind(&self) -> &'static str {
        "later"
    }

    fn usage(&self) -> &'static str {
        "later <link or title>"
    }

    fn can_handle(&self, input: &str) -> bool {
        input.starts_with("later")
    }

    fn parse(&self, input: &str) -> Result<Row, ParseError> {
        Ok(Row::new(self.kind(), rest_of(input)))
    }

    fn query(&self, ctx: &Context<'_>, input: &str) -> Result<Vec<Row>> {
        query_kind_matching(ctx, self.kind(), input)
    }

    fn render(&self, _ctx: &Context<'_>, row: &Row) -> Result<Renderer> {
        let body = format!("<div>{}</div>", markdown(Later(row).text()));
        Ok(Renderer::thing(row, body))
    }
}
