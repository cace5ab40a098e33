//! Race listing endpoints

use crate::persistence::RacesRepository;
use racing_proto::{ListRacesRequest, ListRacesResponse};
use std::sync::Arc;
use tonic::{Request, Response, Status};

pub struct RacesEndpoints<R: RacesRepository> {
    repo: Arc<R>,
}

impl<R: RacesRepository> RacesEndpoints<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn list_races(
        &self,
        request: Request<ListRacesRequest>,
    ) -> Result<Response<ListRacesResponse>, Status> {
        let req = request.into_inner();
        tracing::info!(filter = ?req.filter, order_by = %req.order_by, "RPC list_races");

        let races = self
            .repo
            .list(&req)
            .await
            .map_err(|e| Status::internal(e.to_string()))?;

        Ok(Response::new(ListRacesResponse { races }))
    }
}
