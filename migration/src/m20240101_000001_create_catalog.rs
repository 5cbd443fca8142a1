use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Genre::Table)
                    .if_not_exists()
                    .col(pk_auto(Genre::Id))
                    .col(string_len(Genre::Name, 100))
                    .col(integer(Genre::Ranking))
                    .col(big_integer(Genre::CreatedAt))
                    .col(big_integer(Genre::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Movie::Table)
                    .if_not_exists()
                    .col(pk_auto(Movie::Id))
                    .col(string_len(Movie::Title, 500))
                    .col(double(Movie::Rating))
                    .col(integer(Movie::Awards))
                    .col(string(Movie::ReleaseDate))
                    .col(integer_null(Movie::Length))
                    .col(integer_null(Movie::GenreId))
                    .col(big_integer(Movie::CreatedAt))
                    .col(big_integer(Movie::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movie_genre_id")
                            .from(Movie::Table, Movie::GenreId)
                            .to(Genre::Table, Genre::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_movie_release_date")
                    .table(Movie::Table)
                    .col(Movie::ReleaseDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_movie_rating")
                    .table(Movie::Table)
                    .col(Movie::Rating)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Actor::Table)
                    .if_not_exists()
                    .col(pk_auto(Actor::Id))
                    .col(string_len(Actor::FirstName, 100))
                    .col(string_len(Actor::LastName, 100))
                    .col(double_null(Actor::Rating))
                    .col(integer_null(Actor::FavoriteMovieId))
                    .col(big_integer(Actor::CreatedAt))
                    .col(big_integer(Actor::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_actor_favorite_movie_id")
                            .from(Actor::Table, Actor::FavoriteMovieId)
                            .to(Movie::Table, Movie::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ActorMovie::Table)
                    .if_not_exists()
                    .col(pk_auto(ActorMovie::Id))
                    .col(integer(ActorMovie::MovieId))
                    .col(integer(ActorMovie::ActorId))
                    .col(big_integer(ActorMovie::CreatedAt))
                    .col(big_integer(ActorMovie::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_actor_movie_movie_id")
                            .from(ActorMovie::Table, ActorMovie::MovieId)
                            .to(Movie::Table, Movie::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_actor_movie_actor_id")
                            .from(ActorMovie::Table, ActorMovie::ActorId)
                            .to(Actor::Table, Actor::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_actor_movie_movie_id")
                    .table(ActorMovie::Table)
                    .col(ActorMovie::MovieId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(ActorMovie::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Actor::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Movie::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Genre::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Genre {
    Table,
    Id,
    Name,
    Ranking,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Movie {
    Table,
    Id,
    Title,
    Rating,
    Awards,
    ReleaseDate,
    Length,
    GenreId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Actor {
    Table,
    Id,
    FirstName,
    LastName,
    Rating,
    FavoriteMovieId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ActorMovie {
    Table,
    Id,
    MovieId,
    ActorId,
    CreatedAt,
    UpdatedAt,
}
