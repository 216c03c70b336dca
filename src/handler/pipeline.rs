//! From raw input to a rendered answer.
//!
//! [`handle_input`] is the single entry point for the text box: dispatch,
//! parse, optional save, query and render. [`toggle`] serves task checkboxes.

use anyhow::Result;

use super::render::Renderer;
use super::{Context, ParseError};
use crate::storage;

/// Suffix that asks for the parsed row to be kept.
pub const SAVE_MARKER: &str = "!save";

/// Split a trailing `!save` off the input.
pub fn strip_save_marker(input: &str) -> (&str, bool) {
    match input.trim_end().strip_suffix(SAVE_MARKER) {
        Some(rest) => (rest.trim_end(), true),
        None => (input, false),
    }
}

/// Answer one line of input.
///
/// Parse and query failures are shown inline, as are rows a handler refuses
/// to save. Only storage failures are returned as errors.
pub fn handle_input(ctx: &Context<'_>, raw: &str) -> Result<Renderer> {
    let (input, save) = strip_save_marker(raw.trim_start());
    let handler = ctx.handlers.dispatch(input);

    tracing::debug!(
        kind = handler.kind(),
        namespace = ctx.namespace,
        save,
        "dispatching input"
    );

    let mut out = Vec::new();

    match handler.parse(input) {
        Err(err) => out.push(Renderer::error(err)),
        Ok(row) if save && handler.persistable() => match handler.save(ctx, row) {
            Ok(saved) => {
                tracing::info!(
                    kind = handler.kind(),
                    id = saved.id,
                    namespace = ctx.namespace,
                    "thing saved"
                );
                out.push(Renderer::Html("<p class=\"saved\">saved!</p>".into()));
                out.push(handler.render(ctx, &saved)?);
            }
            // The handler refused the row; anything else is a storage failure.
            Err(err) => match err.downcast::<ParseError>() {
                Ok(rejected) => out.push(Renderer::error(rejected)),
                Err(err) => return Err(err),
            },
        },
        Ok(row) if save => {
            out.push(Renderer::error(format!(
                "{} can't be saved",
                handler.kind()
            )));
            out.push(handler.render(ctx, &row).unwrap_or_else(Renderer::error));
        }
        Ok(row) if !handler.persistable() => {
            out.push(handler.render(ctx, &row).unwrap_or_else(Renderer::error));
        }
        Ok(_) => {}
    }

    match handler.query(ctx, input) {
        Ok(rows) if rows.is_empty() => {}
        Ok(rows) => out.push(Renderer::List(
            rows.iter()
                .map(|row| handler.render(ctx, row).unwrap_or_else(Renderer::error))
                .collect(),
        )),
        Err(err) => {
            tracing::warn!(kind = handler.kind(), error = %err, "query failed");
            out.push(Renderer::error(err));
        }
    }

    Ok(Renderer::Sequence(out))
}

/// Set a row's checkbox and re-render it. `None` when the row does not exist.
pub fn toggle(ctx: &Context<'_>, kind: &str, id: i64, done: bool) -> Result<Option<Renderer>> {
    match storage::set_bool(ctx.conn, ctx.namespace, kind, id, done)? {
        Some(row) => {
            tracing::info!(kind, id, done, namespace = ctx.namespace, "row toggled");
            Ok(Some(ctx.render_row(&row)?))
        }
        None => Ok(None),
    }
}
