//! Input handlers.
//!
//! A [`Handler`] recognizes one kind of input, parses it into a [`Row`],
//! queries related rows and renders rows of its kind. [`Handlers`] holds the
//! prioritized chain; the first handler whose [`Handler::can_handle`] accepts
//! the input wins.

pub mod date;
pub mod generic;
pub mod help;
pub mod javascript;
pub mod math;
pub mod note;
pub mod overview;
pub mod pipeline;
pub mod remind;
pub mod render;
pub mod search;
pub mod setting;
pub mod task;
pub mod track;

use anyhow::Result;
use rusqlite::Connection;

use crate::storage::{self, Field, Row, RowQuery};
pub use remind::Reminders;
pub use render::Renderer;

/// Why an input could not be turned into a row.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("not a number: {input:?}")]
    InvalidNumber {
        input: String,
        #[source]
        source: std::num::ParseFloatError,
    },

    #[error("not a duration: {0:?} (try 90s, 25m or 1h30m)")]
    InvalidDuration(String),

    #[error("can't compute {input:?}: {reason}")]
    Math { input: String, reason: String },
}

/// Everything a handler may touch while serving one request.
#[derive(Clone, Copy)]
pub struct Context<'a> {
    pub conn: &'a Connection,
    pub namespace: &'a str,
    pub handlers: &'a Handlers,
    pub reminders: &'a Reminders,
    /// Upper bound on rows per query.
    pub limit: usize,
}

impl Context<'_> {
    /// Render `row` with the handler responsible for its kind, falling back
    /// to the generic editor for unknown kinds.
    pub fn render_row(&self, row: &Row) -> Result<Renderer> {
        self.handlers.renderer_for(&row.kind).render(self, row)
    }

    /// Render every row, turning per-row failures into error paragraphs.
    pub fn render_rows(&self, rows: &[Row]) -> Renderer {
        Renderer::List(
            rows.iter()
                .map(|row| self.render_row(row).unwrap_or_else(Renderer::error))
                .collect(),
        )
    }

    pub fn query(&self, filter: RowQuery) -> Result<Vec<Row>> {
        storage::query(self.conn, self.namespace, &filter.limit(self.limit))
    }
}

pub trait Handler: Send + Sync {
    /// Kind tag of the rows this handler produces.
    fn kind(&self) -> &'static str;

    /// One-line usage shown by `help`.
    fn usage(&self) -> &'static str {
        ""
    }

    fn can_handle(&self, input: &str) -> bool;

    fn parse(&self, input: &str) -> Result<Row, ParseError>;

    /// Rows related to `input`, newest first.
    fn query(&self, ctx: &Context<'_>, input: &str) -> Result<Vec<Row>>;

    fn render(&self, ctx: &Context<'_>, row: &Row) -> Result<Renderer>;

    /// Persist a parsed row. Rows go to the database unless overridden.
    fn save(&self, ctx: &Context<'_>, row: Row) -> Result<Row> {
        storage::insert(ctx.conn, ctx.namespace, row)
    }

    /// Whether rows of this kind can be saved with `!save`.
    fn persistable(&self) -> bool {
        true
    }
}

/// The prioritized handler chain.
pub struct Handlers {
    chain: Vec<Box<dyn Handler>>,
    /// Takes every input nothing in `chain` accepts.
    fallback: Box<dyn Handler>,
    /// Renders rows whose kind no handler claims.
    generic: generic::GenericHandler,
}

impl Handlers {
    pub fn new(chain: Vec<Box<dyn Handler>>, fallback: Box<dyn Handler>) -> Self {
        Self {
            chain,
            fallback,
            generic: generic::GenericHandler,
        }
    }

    /// The default chain, in priority order.
    pub fn standard() -> Self {
        Self::new(
            vec![
                Box::new(remind::ReminderHandler),
                Box::new(track::TrackHandler),
                Box::new(note::NoteHandler),
                Box::new(note::LaterHandler),
                Box::new(task::TaskHandler),
                Box::new(date::ByDateHandler),
                Box::new(javascript::JavaScriptHandler),
                Box::new(search::SearchHandler),
                Box::new(setting::SettingHandler),
                Box::new(math::MathHandler),
                Box::new(help::HelpHandler),
            ],
            Box::new(overview::OverviewHandler),
        )
    }

    /// First handler accepting `input`; the fallback when none does.
    pub fn dispatch(&self, input: &str) -> &dyn Handler {
        self.chain
            .iter()
            .find(|h| h.can_handle(input))
            .map(|h| &**h)
            .unwrap_or(&*self.fallback)
    }

    /// Handler for a stored kind. Tries an exact kind match first, then any
    /// handler accepting `kind` as input (so `2024-08` finds the date handler).
    pub fn for_kind(&self, kind: &str) -> Option<&dyn Handler> {
        if self.fallback.kind() == kind {
            return Some(&*self.fallback);
        }
        self.chain
            .iter()
            .find(|h| h.kind() == kind)
            .or_else(|| self.chain.iter().find(|h| h.can_handle(kind)))
            .map(|h| &**h)
    }

    /// Like [`Handlers::for_kind`] but never empty-handed.
    pub fn renderer_for(&self, kind: &str) -> &dyn Handler {
        self.for_kind(kind).unwrap_or(&self.generic)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(dyn Handler + 'static)> {
        self.chain
            .iter()
            .map(|h| &**h)
            .chain(std::iter::once(&*self.fallback))
    }
}

impl Default for Handlers {
    fn default() -> Self {
        Self::standard()
    }
}

/// Text after the first space, or `""` when the input is a bare keyword.
pub(crate) fn rest_of(input: &str) -> &str {
    input.split_once(' ').map_or("", |(_, rest)| rest.trim())
}

/// Rows of `kind`, narrowed to summaries containing the text after the keyword.
pub(crate) fn query_kind_matching(ctx: &Context<'_>, kind: &str, input: &str) -> Result<Vec<Row>> {
    let rest = rest_of(input);
    let filter = RowQuery::new().kind(kind);
    if rest.is_empty() {
        ctx.query(filter)
    } else {
        ctx.query(filter.matching(Field::Summary, rest))
    }
}
