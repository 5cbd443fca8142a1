use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, LoaderTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, TransactionTrait, Value,
    sea_query::Expr,
};
use tracing::{debug, info};

use crate::{
    entities::{actor, actor_movie, genre, movie},
    error::{AppError, AppResult},
    models::{MovieChanges, MovieView, NewMovie},
};

pub const MOVIE_NOT_FOUND: &str = "no movie found with that id";
pub const GENRE_NOT_FOUND: &str = "no genre found with that id";
pub const GENRE_NAME_NOT_FOUND: &str = "no genre found with that name";

/// Movies at or above this rating are listed as recommended.
pub const RECOMMENDED_MIN_RATING: f64 = 8.0;

/// Sortable genre columns, by their public names.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GenreOrder {
    Name,
    Ranking,
    Id,
}

impl GenreOrder {
    pub const ALLOWED: [&'static str; 3] = ["name", "ranking", "id"];

    pub fn parse(field: &str) -> Option<Self> {
        match field {
            "name" => Some(Self::Name),
            "ranking" => Some(Self::Ranking),
            "id" => Some(Self::Id),
            _ => None,
        }
    }

    fn column(self) -> genre::Column {
        match self {
            Self::Name => genre::Column::Name,
            Self::Ranking => genre::Column::Ranking,
            Self::Id => genre::Column::Id,
        }
    }
}

/// Sortable movie columns, by their public names.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MovieOrder {
    Title,
    Rating,
    Id,
    ReleaseDate,
    Length,
    Awards,
}

impl MovieOrder {
    pub const ALLOWED: [&'static str; 6] =
        ["title", "rating", "id", "release_date", "length", "awards"];

    pub fn parse(field: &str) -> Option<Self> {
        match field {
            "title" => Some(Self::Title),
            "rating" => Some(Self::Rating),
            "id" => Some(Self::Id),
            "release_date" => Some(Self::ReleaseDate),
            "length" => Some(Self::Length),
            "awards" => Some(Self::Awards),
            _ => None,
        }
    }

    fn column(self) -> movie::Column {
        match self {
            Self::Title => movie::Column::Title,
            Self::Rating => movie::Column::Rating,
            Self::Id => movie::Column::Id,
            Self::ReleaseDate => movie::Column::ReleaseDate,
            Self::Length => movie::Column::Length,
            Self::Awards => movie::Column::Awards,
        }
    }
}

/// Persistence client for the movie catalog, shared by every handler.
#[derive(Clone)]
pub struct Catalog {
    db: DatabaseConnection,
}

impl Catalog {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub async fn count_genres(&self) -> AppResult<u64> {
        Ok(genre::Entity::find().count(&self.db).await?)
    }

    pub async fn list_genres(&self, limit: u64, order: GenreOrder) -> AppResult<Vec<genre::Model>> {
        let genres = genre::Entity::find()
            .order_by_asc(order.column())
            .limit(limit)
            .all(&self.db)
            .await?;
        Ok(genres)
    }

    pub async fn find_genre(&self, id: i32) -> AppResult<genre::Model> {
        genre::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found(GENRE_NOT_FOUND))
    }

    /// First genre, by id, whose name contains `fragment`.
    pub async fn find_genre_by_name(&self, fragment: &str) -> AppResult<genre::Model> {
        genre::Entity::find()
            .filter(genre::Column::Name.contains(fragment))
            .order_by_asc(genre::Column::Id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found(GENRE_NAME_NOT_FOUND))
    }

    pub async fn count_movies(&self) -> AppResult<u64> {
        Ok(movie::Entity::find().count(&self.db).await?)
    }

    pub async fn list_movies(
        &self,
        limit: u64,
        offset: u64,
        order: MovieOrder,
    ) -> AppResult<Vec<MovieView>> {
        let query = movie::Entity::find()
            .order_by_asc(order.column())
            .limit(limit)
            .offset(offset);
        self.load_views(query).await
    }

    pub async fn newest_movies(&self, limit: u64) -> AppResult<Vec<MovieView>> {
        let query = movie::Entity::find()
            .order_by_desc(movie::Column::ReleaseDate)
            .order_by_asc(movie::Column::Id)
            .limit(limit);
        self.load_views(query).await
    }

    pub async fn recommended_movies(&self, limit: u64) -> AppResult<Vec<MovieView>> {
        let query = movie::Entity::find()
            .filter(movie::Column::Rating.gte(RECOMMENDED_MIN_RATING))
            .order_by_desc(movie::Column::Rating)
            .order_by_asc(movie::Column::Id)
            .limit(limit);
        self.load_views(query).await
    }

    pub async fn movie_view(&self, id: i32) -> AppResult<MovieView> {
        let mut views = self.load_views(movie::Entity::find_by_id(id)).await?;
        views.pop().ok_or_else(|| AppError::not_found(MOVIE_NOT_FOUND))
    }

    /// Runs `query` and attaches each movie's genre and cast.
    async fn load_views(&self, query: Select<movie::Entity>) -> AppResult<Vec<MovieView>> {
        let movies = query.all(&self.db).await?;
        let genres = movies.load_one(genre::Entity, &self.db).await?;
        let casts = movies.load_many_to_many(actor::Entity, actor_movie::Entity, &self.db).await?;

        debug!(count = movies.len(), "loaded movies with associations");

        let views = movies
            .into_iter()
            .zip(genres)
            .zip(casts)
            .map(|((movie, genre), actors)| MovieView::new(movie, genre, actors))
            .collect();
        Ok(views)
    }

    pub async fn create_movie(&self, new: NewMovie) -> AppResult<movie::Model> {
        let active = new.into_active_model();
        active.validate(true, movie::today())?;
        let created = active.insert(&self.db).await?;
        info!(id = created.id, title = %created.title, "movie created");
        Ok(created)
    }

    pub async fn update_movie(&self, id: i32, changes: MovieChanges) -> AppResult<movie::Model> {
        let existing = movie::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found(MOVIE_NOT_FOUND))?;

        let mut active = existing.clone().into_active_model();
        changes.apply(&mut active);
        if !active.is_changed() {
            return Ok(existing);
        }

        active.validate(false, movie::today())?;
        let updated = active.update(&self.db).await?;
        info!(id = updated.id, "movie updated");
        Ok(updated)
    }

    /// Deletes a movie after clearing favorite references and cast rows, all in
    /// one transaction. Returns the row as it was before deletion.
    pub async fn delete_movie(&self, id: i32) -> AppResult<movie::Model> {
        let txn = self.db.begin().await?;

        let Some(movie) = movie::Entity::find_by_id(id).one(&txn).await? else {
            txn.rollback().await?;
            return Err(AppError::not_found(MOVIE_NOT_FOUND));
        };

        let unfavorited = actor::Entity::update_many()
            .col_expr(actor::Column::FavoriteMovieId, Expr::value(Value::Int(None)))
            .filter(actor::Column::FavoriteMovieId.eq(id))
            .exec(&txn)
            .await?;

        let uncast = actor_movie::Entity::delete_many()
            .filter(actor_movie::Column::MovieId.eq(id))
            .exec(&txn)
            .await?;

        movie::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;

        info!(
            id,
            actors_unfavorited = unfavorited.rows_affected,
            cast_rows_removed = uncast.rows_affected,
            "movie deleted"
        );
        Ok(movie)
    }
}
