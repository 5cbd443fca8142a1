use std::sync::Arc;

use axum::{Router, extract::State, routing::get};
use serde::Deserialize;

use super::{AppPath, AppQuery, parse_id, parse_limit, parse_order};
use crate::{
    AppState,
    catalog::GenreOrder,
    error::{AppError, AppResult},
    models::{GenreDetail, GenreList},
    response::Envelope,
};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list))
        .route("/name", get(by_missing_name))
        .route("/name/", get(by_missing_name))
        .route("/name/{name}", get(by_name))
        .route("/{id}", get(by_id))
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    limit: Option<String>,
    order: Option<String>,
}

async fn list(
    State(state): State<Arc<AppState>>,
    AppQuery(q): AppQuery<ListQuery>,
) -> AppResult<Envelope<GenreList>> {
    let order = parse_order(q.order.as_deref(), &GenreOrder::ALLOWED, GenreOrder::parse, GenreOrder::Id)?;
    let limit = parse_limit(q.limit.as_deref())?;

    let total = state.catalog.count_genres().await?;
    let genres = state.catalog.list_genres(limit, order).await?;

    Ok(Envelope::ok(GenreList {
        per_page: genres.len(),
        total,
        genres: genres.into_iter().map(Into::into).collect(),
    }))
}

async fn by_id(
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<String>,
) -> AppResult<Envelope<GenreDetail>> {
    let genre = state.catalog.find_genre(parse_id(&id)?).await?;
    Ok(Envelope::ok(GenreDetail { genre, total: 1 }))
}

async fn by_name(
    State(state): State<Arc<AppState>>,
    AppPath(name): AppPath<String>,
) -> AppResult<Envelope<GenreDetail>> {
    let name = name.trim();
    if name.is_empty() {
        return Err(missing_name());
    }

    let genre = state.catalog.find_genre_by_name(name).await?;
    Ok(Envelope::ok(GenreDetail { genre, total: 1 }))
}

async fn by_missing_name() -> AppError {
    missing_name()
}

fn missing_name() -> AppError {
    AppError::invalid("a name to search for is required")
}
