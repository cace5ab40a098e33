//! Async repository trait for race listings.
//!
//! Methods return `impl Future + Send` rather than using `async fn` so that
//! the futures are guaranteed `Send` for use from tonic handlers and
//! `tokio::spawn`.

use super::PersistenceError;
use racing_proto::{ListRacesRequest, Race};
use std::future::Future;

/// Read access to races.
pub trait RacesRepository: Send + Sync {
    /// Write the demonstration races. Runs at most once per repository; every
    /// caller sees the outcome of that single run.
    fn init(&self) -> impl Future<Output = Result<(), PersistenceError>> + Send;

    /// List races matching the request's filter, in the requested order.
    fn list(
        &self,
        request: &ListRacesRequest,
    ) -> impl Future<Output = Result<Vec<Race>, PersistenceError>> + Send;
}
