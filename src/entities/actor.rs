use sea_orm::{ConnectionTrait, entity::prelude::*};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "actor")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub rating: Option<f64>,
    pub favorite_movie_id: Option<i32>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::movie::Entity",
        from = "Column::FavoriteMovieId",
        to = "super::movie::Column::Id"
    )]
    FavoriteMovie,
    #[sea_orm(has_many = "super::actor_movie::Entity")]
    ActorMovie,
}

impl Related<super::movie::Entity> for Entity {
    fn to() -> RelationDef {
        super::actor_movie::Relation::Movie.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::actor_movie::Relation::Actor.def().rev())
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        super::stamp_timestamps!(self, insert);
        Ok(self)
    }
}
