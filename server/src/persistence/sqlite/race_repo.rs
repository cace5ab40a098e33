//! SQLite-backed implementation of [`RacesRepository`].

use std::sync::Arc;

use racing_proto::{ListRacesRequest, Race};
use sqlx::SqlitePool;
use tokio::sync::OnceCell;

use super::{scan_races, seed_races};
use crate::persistence::query::{build_list_query, LIST_RACES_QUERY};
use crate::persistence::traits::RacesRepository;
use crate::persistence::PersistenceError;

pub struct SqliteRacesRepository {
    pool: SqlitePool,
    init: OnceCell<Result<(), Arc<sqlx::Error>>>,
}

impl SqliteRacesRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            init: OnceCell::new(),
        }
    }
}

impl RacesRepository for SqliteRacesRepository {
    async fn init(&self) -> Result<(), PersistenceError> {
        // The outcome is cached, error included, so a failed seed is reported
        // to every caller instead of being retried.
        self.init
            .get_or_init(|| async { seed_races(&self.pool).await.map_err(Arc::new) })
            .await
            .clone()
            .map_err(PersistenceError::Init)
    }

    async fn list(&self, request: &ListRacesRequest) -> Result<Vec<Race>, PersistenceError> {
        let plan = build_list_query(LIST_RACES_QUERY, request);
        tracing::debug!(sql = %plan.sql, args = ?plan.args, "Listing races");

        let mut query = sqlx::query(&plan.sql);
        for arg in &plan.args {
            query = query.bind(*arg);
        }

        scan_races(query.fetch(&self.pool)).await
    }
}
