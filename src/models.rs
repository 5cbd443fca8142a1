use jiff::{civil::Date, tz::TimeZone};
use sea_orm::{ActiveValue, IntoActiveModel, Set};
use serde::{Deserialize, Serialize};

use crate::entities::{actor, genre, movie};

/// Genre without its audit columns.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GenreSummary {
    pub id: i32,
    pub name: String,
    pub ranking: i32,
}

impl From<genre::Model> for GenreSummary {
    fn from(g: genre::Model) -> Self {
        Self { id: g.id, name: g.name, ranking: g.ranking }
    }
}

/// Actor without its audit columns.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ActorSummary {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub rating: Option<f64>,
    pub favorite_movie_id: Option<i32>,
}

impl From<actor::Model> for ActorSummary {
    fn from(a: actor::Model) -> Self {
        Self {
            id: a.id,
            first_name: a.first_name,
            last_name: a.last_name,
            rating: a.rating,
            favorite_movie_id: a.favorite_movie_id,
        }
    }
}

/// A movie with its genre and cast loaded, as returned by the read endpoints.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MovieView {
    pub id: i32,
    pub title: String,
    pub rating: f64,
    pub awards: i32,
    pub release_date: String,
    pub length: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre_id: Option<Option<i32>>,
    pub genre: Option<GenreSummary>,
    pub actors: Vec<ActorSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl MovieView {
    pub fn new(movie: movie::Model, genre: Option<genre::Model>, actors: Vec<actor::Model>) -> Self {
        Self {
            id: movie.id,
            title: movie.title,
            rating: movie.rating,
            awards: movie.awards,
            release_date: movie.release_date,
            length: movie.length,
            genre_id: Some(movie.genre_id),
            genre: genre.map(Into::into),
            actors: actors.into_iter().map(Into::into).collect(),
            link: None,
        }
    }

    pub fn without_genre_id(mut self) -> Self {
        self.genre_id = None;
        self
    }

    /// Points `link` at this movie's detail route under `base_url`.
    pub fn with_link(mut self, base_url: &str) -> Self {
        self.link = Some(format!("{}/{}", base_url.trim_end_matches('/'), self.id));
        self
    }

    pub fn with_timestamp_release_date(mut self) -> Result<Self, jiff::Error> {
        self.release_date = iso_timestamp(&self.release_date)?;
        Ok(self)
    }
}

/// Renders a `YYYY-MM-DD` date as midnight UTC in ISO-8601 form.
pub fn iso_timestamp(date: &str) -> Result<String, jiff::Error> {
    let date: Date = date.trim().parse()?;
    let zoned = date.to_zoned(TimeZone::UTC)?;
    Ok(zoned.strftime("%Y-%m-%dT%H:%M:%S%:z").to_string())
}

/// Body of `POST /movies/create`. Every field is optional here so missing ones
/// are reported by the model rules instead of a deserialization error.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct NewMovie {
    pub title: Option<String>,
    pub rating: Option<f64>,
    pub awards: Option<i32>,
    pub release_date: Option<String>,
    pub length: Option<i32>,
    pub genre_id: Option<i32>,
}

impl IntoActiveModel<movie::ActiveModel> for NewMovie {
    fn into_active_model(self) -> movie::ActiveModel {
        fn set_opt<T: Into<sea_orm::Value>>(value: Option<T>) -> ActiveValue<T> {
            value.map_or(ActiveValue::NotSet, Set)
        }

        movie::ActiveModel {
            title: set_opt(self.title.map(|t| t.trim().to_string())),
            rating: set_opt(self.rating),
            awards: set_opt(self.awards),
            release_date: set_opt(self.release_date),
            length: Set(self.length),
            genre_id: Set(self.genre_id),
            ..Default::default()
        }
    }
}

/// Body of `PUT /movies/{id}`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct MovieChanges {
    pub title: Option<String>,
    pub rating: Option<f64>,
    pub awards: Option<i32>,
    pub release_date: Option<String>,
    pub length: Option<i32>,
    pub genre_id: Option<i32>,
}

impl MovieChanges {
    /// Copies the truthy fields onto `movie`. Empty strings and zero values are
    /// treated like omitted fields and leave the stored value untouched.
    pub fn apply(self, movie: &mut movie::ActiveModel) {
        if let Some(title) = self.title.map(|t| t.trim().to_string()).filter(|t| !t.is_empty()) {
            movie.title = Set(title);
        }
        if let Some(rating) = self.rating.filter(|r| *r != 0.0 && !r.is_nan()) {
            movie.rating = Set(rating);
        }
        if let Some(awards) = self.awards.filter(|a| *a != 0) {
            movie.awards = Set(awards);
        }
        if let Some(date) = self.release_date.filter(|d| !d.is_empty()) {
            movie.release_date = Set(date);
        }
        if let Some(length) = self.length.filter(|l| *l != 0) {
            movie.length = Set(Some(length));
        }
        if let Some(genre_id) = self.genre_id.filter(|g| *g != 0) {
            movie.genre_id = Set(Some(genre_id));
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GenreList {
    #[serde(rename = "perPage")]
    pub per_page: usize,
    pub total: u64,
    pub genres: Vec<GenreSummary>,
}

#[derive(Debug, Serialize)]
pub struct GenreDetail {
    pub genre: genre::Model,
    pub total: u64,
}

#[derive(Debug, Serialize)]
pub struct MoviePage {
    #[serde(rename = "perPage")]
    pub per_page: usize,
    pub total: u64,
    pub movies: Vec<MovieView>,
}

#[derive(Debug, Serialize)]
pub struct MovieList {
    pub movies: Vec<MovieView>,
}

#[derive(Debug, Serialize)]
pub struct MovieDetail<T> {
    pub movie: T,
}

#[derive(Debug, Serialize)]
pub struct DeletedMovie {
    #[serde(rename = "deletedMovie")]
    pub deleted_movie: movie::Model,
}

#[cfg(test)]
mod tests {
    use sea_orm::{ActiveModelTrait, ActiveValue};

    use super::*;

    fn stored() -> movie::Model {
        movie::Model {
            id: 7,
            title: "Alien".to_string(),
            rating: 8.5,
            awards: 2,
            release_date: "1979-05-25".to_string(),
            length: Some(117),
            genre_id: Some(3),
            created_at: 1,
            updated_at: 1,
        }
    }

    #[test]
    fn falsy_changes_keep_stored_values() {
        let mut active = stored().into_active_model();
        MovieChanges {
            title: Some("   ".to_string()),
            rating: Some(0.0),
            awards: Some(0),
            release_date: Some(String::new()),
            length: Some(0),
            genre_id: Some(0),
        }
        .apply(&mut active);

        assert!(!active.is_changed());
    }

    #[test]
    fn truthy_changes_overwrite() {
        let mut active = stored().into_active_model();
        MovieChanges {
            title: Some("  Aliens ".to_string()),
            rating: Some(8.4),
            ..Default::default()
        }
        .apply(&mut active);

        assert_eq!(active.title, ActiveValue::Set("Aliens".to_string()));
        assert_eq!(active.rating, ActiveValue::Set(8.4));
        assert_eq!(active.awards, ActiveValue::Unchanged(2));
    }

    #[test]
    fn new_movie_trims_title_and_leaves_missing_fields_unset() {
        let active = NewMovie { title: Some(" Up ".to_string()), ..Default::default() }
            .into_active_model();
        assert_eq!(active.title, ActiveValue::Set("Up".to_string()));
        assert_eq!(active.rating, ActiveValue::NotSet);
        assert_eq!(active.genre_id, ActiveValue::Set(None));
    }

    #[test]
    fn release_date_renders_as_timestamp() {
        assert_eq!(iso_timestamp("1979-05-25").unwrap(), "1979-05-25T00:00:00+00:00");
        assert!(iso_timestamp("not a date").is_err());
    }

    #[test]
    fn view_shaping() {
        let view = MovieView::new(stored(), None, Vec::new()).with_link("http://localhost/api/movies/");
        assert_eq!(view.link.as_deref(), Some("http://localhost/api/movies/7"));

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["genre_id"], 3);
        assert!(json.get("created_at").is_none());

        let json = serde_json::to_value(view.without_genre_id()).unwrap();
        assert!(json.get("genre_id").is_none());
    }
}
