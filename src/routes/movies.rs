use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    routing::{get, post},
};
use serde::Deserialize;

use super::{AppJson, AppPath, AppQuery, BaseUrl, parse_id, parse_limit, parse_offset, parse_order};
use crate::{
    AppState,
    catalog::MovieOrder,
    entities::movie,
    error::AppResult,
    models::{
        DeletedMovie, MovieChanges, MovieDetail, MovieList, MoviePage, MovieView, NewMovie,
    },
    response::Envelope,
};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list))
        .route("/new", get(newest))
        .route("/recommended", get(recommended))
        .route("/create", post(create))
        .route("/{id}", get(detail).put(update).delete(destroy))
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    limit: Option<String>,
    offset: Option<String>,
    order: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LimitQuery {
    limit: Option<String>,
}

async fn list(
    State(state): State<Arc<AppState>>,
    BaseUrl(base): BaseUrl,
    AppQuery(q): AppQuery<ListQuery>,
) -> AppResult<Envelope<MoviePage>> {
    let order = parse_order(q.order.as_deref(), &MovieOrder::ALLOWED, MovieOrder::parse, MovieOrder::Id)?;
    let limit = parse_limit(q.limit.as_deref())?;
    let offset = parse_offset(q.offset.as_deref())?;

    let total = state.catalog.count_movies().await?;
    let movies = state.catalog.list_movies(limit, offset, order).await?;
    let movies: Vec<_> = movies.into_iter().map(|m| m.with_link(&base)).collect();

    Ok(Envelope::ok(MoviePage { per_page: movies.len(), total, movies }))
}

async fn newest(
    State(state): State<Arc<AppState>>,
    BaseUrl(base): BaseUrl,
    AppQuery(q): AppQuery<LimitQuery>,
) -> AppResult<Envelope<MovieList>> {
    let limit = parse_limit(q.limit.as_deref())?;
    let movies = state.catalog.newest_movies(limit).await?;
    Ok(Envelope::ok(linked(movies, &base)))
}

async fn recommended(
    State(state): State<Arc<AppState>>,
    BaseUrl(base): BaseUrl,
    AppQuery(q): AppQuery<LimitQuery>,
) -> AppResult<Envelope<MovieList>> {
    let limit = parse_limit(q.limit.as_deref())?;
    let movies = state.catalog.recommended_movies(limit).await?;
    Ok(Envelope::ok(linked(movies, &base)))
}

fn linked(movies: Vec<MovieView>, base: &str) -> MovieList {
    let movies = movies.into_iter().map(|m| m.without_genre_id().with_link(base)).collect();
    MovieList { movies }
}

async fn detail(
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<String>,
) -> AppResult<Envelope<MovieDetail<MovieView>>> {
    let movie = state.catalog.movie_view(parse_id(&id)?).await?;
    let movie = movie.without_genre_id().with_timestamp_release_date()?;
    Ok(Envelope::ok(MovieDetail { movie }))
}

async fn create(
    State(state): State<Arc<AppState>>,
    AppJson(body): AppJson<NewMovie>,
) -> AppResult<Envelope<MovieDetail<movie::Model>>> {
    let movie = state.catalog.create_movie(body).await?;
    Ok(Envelope::created(MovieDetail { movie }))
}

async fn update(
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<String>,
    AppJson(body): AppJson<MovieChanges>,
) -> AppResult<Envelope<MovieDetail<movie::Model>>> {
    let movie = state.catalog.update_movie(parse_id(&id)?, body).await?;
    Ok(Envelope::ok(MovieDetail { movie }))
}

async fn destroy(
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<String>,
) -> AppResult<Envelope<DeletedMovie>> {
    let deleted_movie = state.catalog.delete_movie(parse_id(&id)?).await?;
    Ok(Envelope::ok(DeletedMovie { deleted_movie }))
}
