//! gRPC service implementation
//!
//! [`RacingServiceImpl`] implements the generated `Racing` trait and forwards
//! each RPC to the matching handler in [`endpoints`].

pub mod endpoints;

pub use endpoints::RacesEndpoints;

use crate::persistence::RacesRepository;
use racing_proto::racing_server::Racing;
use racing_proto::{ListRacesRequest, ListRacesResponse};
use std::sync::Arc;
use tonic::{Request, Response, Status};

/// Implementation of the Racing gRPC service
pub struct RacingServiceImpl<R: RacesRepository> {
    races: RacesEndpoints<R>,
}

impl<R: RacesRepository> RacingServiceImpl<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self {
            races: RacesEndpoints::new(repo),
        }
    }
}

#[tonic::async_trait]
impl<R: RacesRepository + 'static> Racing for RacingServiceImpl<R> {
    async fn list_races(
        &self,
        request: Request<ListRacesRequest>,
    ) -> Result<Response<ListRacesResponse>, Status> {
        self.races.list_races(request).await
    }
}
