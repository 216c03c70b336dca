use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::{Html, IntoResponse, Response};
use axum::Form;
use serde::Deserialize;

use super::error::AppError;
use super::session::Session;
use super::{assets, pages, AppState};
use crate::handler::pipeline;
use crate::storage::RowQuery;

#[derive(Debug, Deserialize)]
pub struct ThingForm {
    #[serde(rename = "tell-me", default)]
    pub tell_me: String,
}

/// Current checkbox state as sent by the task's hidden `bool` input.
#[derive(Debug, Deserialize)]
pub struct ToggleForm {
    #[serde(default)]
    pub bool: Option<String>,
}

impl ToggleForm {
    fn is_checked(&self) -> bool {
        matches!(self.bool.as_deref(), Some("true" | "on" | "1"))
    }
}

/// HTML response, carrying the namespace cookie when it was just created.
fn respond(session: &Session, html: String) -> Response {
    let mut response = Html(html).into_response();
    if let Some((name, value)) = session.set_cookie() {
        response.headers_mut().insert(name, value);
    }
    response
}

pub async fn index(headers: HeaderMap) -> Response {
    let session = Session::from_headers(&headers);
    if session.fresh {
        tracing::info!(namespace = %session.namespace, "new namespace");
    }
    respond(&session, pages::index())
}

pub async fn thing(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<ThingForm>,
) -> Result<Response, AppError> {
    let session = Session::from_headers(&headers);
    let input = form.tell_me;

    let html = state
        .with_context(&session, move |ctx| {
            Ok(pipeline::handle_input(ctx, &input)?.to_html())
        })
        .await?;

    Ok(respond(&session, html))
}

/// Flip a row's checkbox. The posted value is the state before the click.
pub async fn toggle(
    State(state): State<AppState>,
    Path((namespace, kind, id)): Path<(String, String, i64)>,
    headers: HeaderMap,
    Form(form): Form<ToggleForm>,
) -> Result<Response, AppError> {
    let session = Session::from_headers(&headers);
    if session.fresh || session.namespace != namespace {
        return Err(AppError::Forbidden);
    }
    let done = !form.is_checked();

    let html = state
        .with_context(&session, move |ctx| {
            pipeline::toggle(ctx, &kind, id, done)?
                .map(|renderer| renderer.to_html())
                .ok_or(AppError::NotFound)
        })
        .await?;

    Ok(respond(&session, html))
}

pub async fn tag(
    State(state): State<AppState>,
    Path(tag): Path<String>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    if tag.trim_start_matches('#').is_empty() {
        return Err(AppError::BadRequest("empty tag".into()));
    }
    let session = Session::from_headers(&headers);

    let query_tag = tag.clone();
    let body = state
        .with_context(&session, move |ctx| {
            let rows = ctx.query(RowQuery::new().tag(&query_tag))?;
            Ok(ctx.render_rows(&rows).to_html())
        })
        .await?;

    Ok(respond(&session, pages::tag(tag.trim_start_matches('#'), &body)))
}

pub async fn static_file(
    State(state): State<AppState>,
    Path(file): Path<String>,
) -> Result<Response, AppError> {
    assets::serve(&state.static_dir, &file).await
}
