use crate::AppState;
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderValue, StatusCode},
    response::Response,
};
use std::path::Path as FsPath;

fn asset_response(bytes: Vec<u8>, mime: &str, cache_control: &str) -> Response {
    let mut response = Response::new(Body::from(bytes));
    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(mime) {
        headers.insert(header::CONTENT_TYPE, value);
    }
    if let Ok(value) = HeaderValue::from_str(cache_control) {
        headers.insert(header::CACHE_CONTROL, value);
    }
    response
}

fn not_found() -> Response {
    let mut response = Response::new(Body::from("Not Found"));
    *response.status_mut() = StatusCode::NOT_FOUND;
    response
}

async fn read_asset(dist_dir: &FsPath, path: &str) -> Option<Response> {
    if path.contains("..") {
        return None;
    }

    let full_path = dist_dir.join(path);
    if !full_path.is_file() {
        return None;
    }

    let bytes = tokio::fs::read(&full_path).await.ok()?;
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    // index.html must pick up new bundle hashes right away.
    let cache_control = if path == "index.html" {
        "no-cache"
    } else {
        "public, max-age=3600"
    };
    Some(asset_response(bytes, mime.as_ref(), cache_control))
}

/// Serve Mini App main page
pub async fn serve_app(State(state): State<AppState>) -> Response {
    serve_app_assets(State(state), Path("index.html".to_string())).await
}

/// Serve Mini App static assets
pub async fn serve_app_assets(State(state): State<AppState>, Path(path): Path<String>) -> Response {
    let dist_dir = state.config.mini_app_dir.as_path();
    let path = path.trim_start_matches('/');

    if let Some(response) = read_asset(dist_dir, path).await {
        return response;
    }

    // SPA fallback
    if !path.contains('.') {
        if let Some(response) = read_asset(dist_dir, "index.html").await {
            return response;
        }
    }

    not_found()
}
