//! SQLite-backed race repository.
//!
//! ## Database setup
//!
//! [`Database`] wraps a `sqlx::SqlitePool` configured with:
//! - **WAL mode** — allows one writer and multiple concurrent readers.
//! - **Embedded migrations** — `sqlx::migrate!` runs `migrations/001_create_races.sql`
//!   automatically when [`Database::open`] is called. The schema is idempotent.
//!
//! ## Reading races
//!
//! [`SqliteRacesRepository`] executes a [`QueryPlan`](crate::persistence::QueryPlan)
//! as a row stream and hands it to [`scan_races`], which owns the cursor until
//! it is exhausted or the scan fails.
//!
//! Start times are stored as RFC 3339 `TEXT` and normalized to
//! `prost_types::Timestamp` while mapping.

mod database;
mod mapper;
mod race_repo;
mod seed;

pub use database::Database;
pub use mapper::scan_races;
pub use race_repo::SqliteRacesRepository;
pub use seed::{seed_races, SEED_RACE_COUNT};
