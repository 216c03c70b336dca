//! HTML output tree.
//!
//! Handlers return a [`Renderer`]; nodes nest arbitrarily and are written out
//! in one pass into any [`fmt::Write`] sink.

use chrono::{DateTime, Utc};
use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag};
use std::fmt::{self, Write};

use crate::storage::Row;

/// One node of the rendered output.
#[derive(Debug, Clone, PartialEq)]
pub enum Renderer {
    /// Plain text, escaped and wrapped in `<pre>`.
    Text(String),
    /// Trusted markup, written verbatim.
    Html(String),
    /// Children as `<ul>` items.
    List(Vec<Renderer>),
    /// Children one after another.
    Sequence(Vec<Renderer>),
    /// A row inside the common `<section class="thing">` frame.
    Thing(ThingView),
}

/// Data for the frame shared by every stored kind: body plus created date and tags.
#[derive(Debug, Clone, PartialEq)]
pub struct ThingView {
    pub kind: String,
    pub date_created: DateTime<Utc>,
    pub tags: Vec<String>,
    /// Kind-specific inner markup.
    pub body: String,
}

impl Renderer {
    /// Frame `body` with the kind, date and tags of `row`.
    pub fn thing(row: &Row, body: String) -> Self {
        Self::Thing(ThingView {
            kind: row.kind.clone(),
            date_created: row.date_created,
            tags: row.tags.clone(),
            body,
        })
    }

    /// An escaped error paragraph.
    pub fn error(message: impl fmt::Display) -> Self {
        Self::Html(format!(
            "<p class=\"error\">{}</p>\n",
            escape(&message.to_string())
        ))
    }

    pub fn empty() -> Self {
        Self::Sequence(Vec::new())
    }

    pub fn render(&self, w: &mut impl Write) -> fmt::Result {
        match self {
            Self::Text(text) => writeln!(w, "<pre>{}</pre>", escape(text)),
            Self::Html(markup) => writeln!(w, "{markup}"),
            Self::List(items) => {
                writeln!(w, "<ul>")?;
                for item in items {
                    writeln!(w, "<li>")?;
                    item.render(w)?;
                    writeln!(w, "</li>")?;
                }
                writeln!(w, "</ul>")
            }
            Self::Sequence(items) => items.iter().try_for_each(|item| item.render(w)),
            Self::Thing(view) => view.render(w),
        }
    }

    /// Render into a fresh string.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.render(&mut out);
        out
    }
}

impl ThingView {
    fn render(&self, w: &mut impl Write) -> fmt::Result {
        writeln!(w, "<section class=\"thing {}\">", escape(&self.kind))?;
        writeln!(w, "\t<div class=\"content\">\n{}\n\t</div>", self.body)?;
        writeln!(w, "\t<footer class=\"meta\">")?;
        writeln!(
            w,
            "\t\t<time class=\"date-created\" datetime=\"{0}\" title=\"{0}\">{1}</time>",
            self.date_created.to_rfc3339(),
            self.date_created.format("%Y-%m-%d %H:%M:%S"),
        )?;
        write!(w, "\t\t<span class=\"tags\">")?;
        for tag in &self.tags {
            if let Some(name) = tag.strip_prefix('#').filter(|name| !name.is_empty()) {
                write!(w, "<a href=\"/tag/{}\">{}</a> ", escape(name), escape(tag))?;
            }
        }
        writeln!(w, "</span>")?;
        writeln!(w, "\t</footer>")?;
        writeln!(w, "</section>")
    }
}

/// Escape text for use in HTML content and quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Whether `url` is relative or uses `http`, `https` or `mailto`.
///
/// Browsers ignore whitespace and control characters inside a scheme, so they
/// are dropped before looking at it.
pub fn is_safe_url(url: &str) -> bool {
    let cleaned: String = url
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect();
    match cleaned.find([':', '/', '?', '#']) {
        Some(i) if cleaned[i..].starts_with(':') => {
            matches!(
                cleaned[..i].to_ascii_lowercase().as_str(),
                "http" | "https" | "mailto"
            )
        }
        _ => true,
    }
}

fn safe_destination(url: CowStr<'_>) -> CowStr<'_> {
    if is_safe_url(&url) {
        url
    } else {
        CowStr::Borrowed("#")
    }
}

/// Render GitHub-flavoured markdown. Raw HTML in the input is escaped and
/// links or images with other schemes than [`is_safe_url`] allows point to `#`.
pub fn markdown(text: &str) -> String {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_FOOTNOTES;
    let parser = Parser::new_ext(text, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Link {
            link_type,
            dest_url: safe_destination(dest_url),
            title,
            id,
        }),
        Event::Start(Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Image {
            link_type,
            dest_url: safe_destination(dest_url),
            title,
            id,
        }),
        other => other,
    });

    let mut out = String::with_capacity(text.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_is_escaped() {
        let html = Renderer::Text("<b>&".into()).to_html();
        assert_eq!(html, "<pre>&lt;b&gt;&amp;</pre>\n");
    }

    #[test]
    fn list_wraps_items() {
        let html = Renderer::List(vec![
            Renderer::Html("a".into()),
            Renderer::Html("b".into()),
        ])
        .to_html();
        assert_eq!(html, "<ul>\n<li>\na\n</li>\n<li>\nb\n</li>\n</ul>\n");
    }

    #[test]
    fn nested_sequences_flatten() {
        let tree = Renderer::Sequence(vec![
            Renderer::Html("one".into()),
            Renderer::Sequence(vec![Renderer::List(vec![Renderer::Html("two".into())])]),
        ]);
        let html = tree.to_html();
        assert!(html.starts_with("one\n<ul>"));
        assert!(html.contains("two"));
    }

    #[test]
    fn thing_frame_links_tags() {
        let mut row = Row::new("note", "hello #world");
        row.tags.push("#".into());
        let html = Renderer::thing(&row, "body".into()).to_html();
        assert!(html.contains("<section class=\"thing note\">"));
        assert!(html.contains("<a href=\"/tag/world\">#world</a>"));
        assert!(!html.contains("href=\"/tag/\""));
    }

    #[test]
    fn markdown_escapes_raw_html() {
        let html = markdown("**bold** <script>alert(1)</script>");
        assert!(html.contains("<strong>bold</strong>"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn markdown_neutralizes_script_links() {
        let html = markdown("[click](javascript:alert(1)) ![img](JavaScript:x) [ok](https://example.com)");
        assert!(!html.to_lowercase().contains("javascript:"));
        assert!(html.contains("<a href=\"#\">click</a>"));
        assert!(html.contains("<a href=\"https://example.com\">ok</a>"));
    }

    #[test]
    fn safe_urls() {
        for url in ["https://a.b/c", "http://x", "mailto:me@x.org", "/tag/x", "notes/a:b", "#top", "?q=1"] {
            assert!(is_safe_url(url), "{url}");
        }
        for url in ["javascript:alert(1)", "JAVASCRIPT:x", "java\tscript:x", " data:text/html,x", "vbscript:x", "javascript://%0aalert(1)"] {
            assert!(!is_safe_url(url), "{url}");
        }
    }

    #[test]
    fn markdown_supports_strikethrough() {
        assert!(markdown("~~gone~~").contains("<del>gone</del>"));
    }
}
