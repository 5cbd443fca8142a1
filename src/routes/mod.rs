mod genres;
mod movies;

use std::{convert::Infallible, sync::Arc};

use axum::{
    Router,
    extract::{FromRequest, FromRequestParts, NestedPath, OriginalUri, Path, Query},
    http::{header, request::Parts},
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{AppState, error::AppError};

pub const DEFAULT_LIMIT: u64 = 5;

/// Builds the HTTP surface: one nested router per resource.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api/genres", genres::router())
        .nest("/api/movies", movies::router())
        .fallback(not_found)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)),
        )
}

async fn not_found(OriginalUri(uri): OriginalUri) -> AppError {
    AppError::not_found(format!("no route for {}", uri.path()))
}

/// JSON body whose rejections are reported through the error envelope.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(Path), rejection(AppError))]
pub struct AppPath<T>(pub T);

/// `{scheme}://{host}{mount}` of the resource router handling the request, e.g.
/// `http://localhost:3000/api/movies` for both `/api/movies` and `/api/movies/new`.
#[derive(Clone, Debug)]
pub struct BaseUrl(pub String);

impl<S> FromRequestParts<S> for BaseUrl
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let mount = NestedPath::from_request_parts(parts, state)
            .await
            .map(|nested| nested.as_str().trim_end_matches('/').to_string())
            .unwrap_or_default();

        let host = parts
            .headers
            .get(header::HOST)
            .and_then(|h| h.to_str().ok())
            .or_else(|| parts.uri.host())
            .unwrap_or("localhost");
        let scheme = parts
            .headers
            .get("x-forwarded-proto")
            .and_then(|h| h.to_str().ok())
            .unwrap_or("http");

        Ok(Self(format!("{scheme}://{host}{mount}")))
    }
}

pub fn parse_id(raw: &str) -> Result<i32, AppError> {
    match raw.trim().parse::<i32>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(AppError::invalid("id must be a positive integer")),
    }
}

/// Parses a page size. Absent, empty and zero values fall back to the default.
pub fn parse_limit(raw: Option<&str>) -> Result<u64, AppError> {
    match parse_count("limit", raw)? {
        None | Some(0) => Ok(DEFAULT_LIMIT),
        Some(limit) => Ok(limit),
    }
}

pub fn parse_offset(raw: Option<&str>) -> Result<u64, AppError> {
    Ok(parse_count("offset", raw)?.unwrap_or(0))
}

fn parse_count(name: &str, raw: Option<&str>) -> Result<Option<u64>, AppError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    // SQLite binds LIMIT/OFFSET as i64.
    match raw.parse::<i64>() {
        Ok(count) if count >= 0 => Ok(Some(count as u64)),
        _ => Err(AppError::invalid(format!("{name} must be a non-negative integer"))),
    }
}

/// Resolves an `order` query value against a resource's sortable fields.
pub fn parse_order<T>(
    raw: Option<&str>,
    allowed: &[&str],
    parse: impl Fn(&str) -> Option<T>,
    default: T,
) -> Result<T, AppError> {
    let Some(field) = raw.filter(|s| !s.is_empty()) else {
        return Ok(default);
    };
    parse(field).ok_or_else(|| {
        AppError::invalid(format!(
            "invalid order field; only {} can be used",
            allowed.join(", ")
        ))
    })
}
