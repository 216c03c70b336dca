//! Files under the configured static directory.

use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use std::path::Path;

use super::error::AppError;

/// Content type by file extension.
pub fn content_type(extension: Option<&str>) -> &'static str {
    match extension {
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css",
        Some("js" | "mjs") => "application/javascript",
        Some("json") => "application/json",
        Some("txt" | "md") => "text/plain; charset=utf-8",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("ico") => "image/x-icon",
        Some("webp") => "image/webp",
        Some("woff2") => "font/woff2",
        _ => "application/octet-stream",
    }
}

/// Only plain file names are served; anything that could leave the directory is refused.
pub fn is_safe_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && !name.contains("..")
        && !name.contains(['/', '\\', '\0'])
}

pub async fn serve(dir: &Path, name: &str) -> Result<Response, AppError> {
    if !is_safe_name(name) {
        tracing::debug!(name, "refusing static path");
        return Err(AppError::NotFound);
    }

    let path = dir.join(name);
    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Err(AppError::NotFound),
        Err(err) => {
            return Err(anyhow::Error::new(err)
                .context(format!("failed to read {}", path.display()))
                .into())
        }
    };

    let extension = path.extension().and_then(|ext| ext.to_str());
    Ok((
        [
            (CONTENT_TYPE, content_type(extension)),
            (CACHE_CONTROL, "public, max-age=3600"),
        ],
        bytes,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_by_extension() {
        assert_eq!(content_type(Some("css")), "text/css");
        assert_eq!(content_type(Some("js")), "application/javascript");
        assert_eq!(content_type(None), "application/octet-stream");
    }

    #[test]
    fn rejects_traversal() {
        assert!(is_safe_name("things.css"));
        assert!(!is_safe_name("../Cargo.toml"));
        assert!(!is_safe_name("a/b.css"));
        assert!(!is_safe_name(".env"));
        assert!(!is_safe_name(""));
    }

    #[tokio::test]
    async fn serves_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("hello.txt"), "hi").unwrap();

        let response = serve(dir.path(), "hello.txt").await.unwrap();
        assert_eq!(response.status(), axum::http::StatusCode::OK);
        assert_eq!(
            response.headers()[CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );

        assert!(matches!(
            serve(dir.path(), "missing.txt").await,
            Err(AppError::NotFound)
        ));
    }
}
