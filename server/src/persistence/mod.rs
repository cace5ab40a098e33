//! Read-side persistence for races.
//!
//! [`query`] turns a [`ListRacesRequest`](racing_proto::ListRacesRequest) into
//! a parameterized [`QueryPlan`] without touching the database. The
//! [`sqlite`] module executes plans against a `SqlitePool` and maps rows back
//! into [`Race`](racing_proto::Race) records.

pub mod query;
pub mod sqlite;
pub mod traits;

pub use query::{build_list_query, QueryPlan};
pub use traits::RacesRepository;

use std::sync::Arc;

/// Errors from the persistence layer.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Migration error: {0}")]
    Migration(String),
    #[error("Invalid advertised start time {value:?} for race {race_id}: {source}")]
    Timestamp {
        race_id: i64,
        value: String,
        #[source]
        source: prost_types::TimestampError,
    },
    #[error("Race data initialisation failed: {0}")]
    Init(#[source] Arc<sqlx::Error>),
}
