use std::sync::Arc;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;

use crate::config::Config;
use crate::graphql::{build_schema, HubSchema};

pub type DbPool = Pool<SqliteConnectionManager>;

/// Shared by every handler; cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub config: Arc<Config>,
    pub graphql_schema: HubSchema,
}

impl AppState {
    pub fn new(db: DbPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
            graphql_schema: build_schema(),
        }
    }
}
