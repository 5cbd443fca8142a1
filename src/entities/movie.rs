use jiff::civil::Date;
use sea_orm::{ActiveValue, ConnectionTrait, entity::prelude::*};
use serde::Serialize;

use super::active_value;
use crate::validation::ValidationErrors;

pub const TITLE_MAX_CHARS: usize = 500;
/// Upper bound of a `DECIMAL(3,1)` rating.
pub const RATING_MAX: f64 = 99.9;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "movie")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub rating: f64,
    pub awards: i32,
    /// Calendar date, `YYYY-MM-DD`.
    pub release_date: String,
    pub length: Option<i32>,
    pub genre_id: Option<i32>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::genre::Entity",
        from = "Column::GenreId",
        to = "super::genre::Column::Id"
    )]
    Genre,
    #[sea_orm(has_many = "super::actor_movie::Entity")]
    ActorMovie,
}

impl Related<super::genre::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Genre.def()
    }
}

impl Related<super::actor::Entity> for Entity {
    fn to() -> RelationDef {
        super::actor_movie::Relation::Actor.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::actor_movie::Relation::Movie.def().rev())
    }
}

impl ActiveModel {
    /// Runs the column rules against the fields held by this model.
    ///
    /// Missing required fields are only reported when `insert` is set, so partial
    /// updates can be saved without reloading the row.
    pub fn validate(&self, insert: bool, today: Date) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let title = active_value(&self.title);
        if let Some(title) = required(&mut errors, insert, "title", title) {
            if errors.not_empty("title", title) {
                errors.max_chars("title", title, TITLE_MAX_CHARS);
            }
        }

        if let Some(&rating) = required(&mut errors, insert, "rating", active_value(&self.rating)) {
            errors.within("rating", rating, 0.0, RATING_MAX);
        }

        if let Some(&awards) = required(&mut errors, insert, "awards", active_value(&self.awards)) {
            errors.non_negative("awards", awards.into());
        }

        let release_date = active_value(&self.release_date);
        if let Some(date) = required(&mut errors, insert, "release_date", release_date) {
            if errors.not_empty("release_date", date) {
                errors.before("release_date", date, today);
            }
        }

        if let Some(Some(length)) = active_value(&self.length) {
            errors.non_negative("length", (*length).into());
        }

        errors.into_result()
    }

    /// Stores a held release date as `YYYY-MM-DD`; the column is ordered as text.
    fn canonicalize_release_date(&mut self) {
        if let ActiveValue::Set(raw) = &self.release_date {
            if let Ok(date) = raw.trim().parse::<Date>() {
                self.release_date = ActiveValue::Set(date.to_string());
            }
        }
    }
}

fn required<'a, T>(
    errors: &mut ValidationErrors,
    insert: bool,
    path: &str,
    value: Option<&'a T>,
) -> Option<&'a T> {
    if insert { errors.require(path, value) } else { value }
}

pub fn today() -> Date {
    jiff::Zoned::now().date()
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        self.validate(insert, today()).map_err(|e| DbErr::Custom(e.to_string()))?;
        self.canonicalize_release_date();

        if let ActiveValue::Set(rating) = self.rating {
            self.rating = ActiveValue::Set((rating * 10.0).round() / 10.0);
        }
        super::stamp_timestamps!(self, insert);
        Ok(self)
    }
}
