use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use sea_orm_migration::MigratorTrait;
use tracing::info;

use crate::{config::Config, error::AppResult};

const FILE_PRAGMAS: [&str; 2] = ["PRAGMA journal_mode=WAL", "PRAGMA synchronous=NORMAL"];

pub async fn connect_and_migrate(config: &Config) -> AppResult<DatabaseConnection> {
    let in_memory = config.database_url.contains(":memory:");

    let mut opts = ConnectOptions::new(config.database_url.clone());
    opts.sqlx_logging(config.db_sql_logging);
    if in_memory {
        // Every pooled connection would get its own empty database.
        opts.max_connections(1).min_connections(1);
    } else {
        opts.max_connections(config.db_max_connections.max(1));
    }

    let db = Database::connect(opts).await?;

    if !in_memory {
        for pragma in FILE_PRAGMAS {
            db.execute(Statement::from_string(db.get_database_backend(), pragma.to_string()))
                .await?;
        }
    }

    migration::Migrator::up(&db, None).await?;
    info!(url = %config.database_url, "database ready");
    Ok(db)
}
