pub mod catalog;
pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod models;
pub mod response;
pub mod routes;
pub mod validation;

use std::sync::Arc;

use crate::{catalog::Catalog, config::Config};

#[derive(Clone)]
pub struct AppState {
    pub catalog: Catalog,
}

/// Connects to the configured database, runs migrations and builds the state.
pub async fn create_app_state(config: &Config) -> error::AppResult<Arc<AppState>> {
    let db = db::connect_and_migrate(config).await?;
    Ok(Arc::new(AppState { catalog: Catalog::new(db) }))
}

pub use routes::router;
