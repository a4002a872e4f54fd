//! Embedded calling UI
//!
//! Served from the binary; falls back to the `ui/dist` directory so the page
//! can be edited without rebuilding.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::{IntoResponse, Response},
};
use rust_embed::Embed;
use std::path::PathBuf;

#[derive(Embed)]
#[folder = "ui/dist"]
struct Assets;

fn file_response(path: &str, content: Vec<u8>) -> Response {
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, mime.as_ref().to_string())],
        content,
    )
        .into_response()
}

/// Serve embedded static files, with filesystem fallback for development
pub async fn serve_static(req: Request<Body>) -> Response {
    let path = req.uri().path().trim_start_matches('/');

    if let Some(content) = Assets::get(path) {
        return file_response(path, content.data.into_owned());
    }

    // Never read outside ui/dist
    if !path.split('/').any(|segment| segment == "..") {
        if let Ok(content) = std::fs::read(PathBuf::from("ui/dist").join(path)) {
            return file_response(path, content);
        }
    }

    (StatusCode::NOT_FOUND, "Not found").into_response()
}

/// Get the index.html content (embedded or from filesystem)
pub fn get_index_html() -> Option<String> {
    if let Some(content) = Assets::get("index.html") {
        return String::from_utf8(content.data.into_owned()).ok();
    }

    std::fs::read_to_string("ui/dist/index.html").ok()
}
