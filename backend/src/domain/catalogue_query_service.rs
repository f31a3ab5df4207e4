//! Ranked list and book listing service.

use std::sync::Arc;

use async_trait::async_trait;

use super::ports::{CatalogueQuery, CatalogueReadError, CatalogueReadRepository, RankQuery};
use super::{
    BookSummary, Error, PublisherSummary, RankLimit, RankRequest, RankedList, SeriesSummary,
    SortField,
};

fn map_read_error(error: CatalogueReadError) -> Error {
    match error {
        CatalogueReadError::Connection { message } => {
            Error::service_unavailable(format!("catalogue unavailable: {message}"))
        }
        CatalogueReadError::Query { message } => {
            Error::internal(format!("catalogue read error: {message}"))
        }
    }
}

/// Validates ranked-list parameters and delegates to the read repository.
#[derive(Clone)]
pub struct CatalogueQueryService<R> {
    repository: Arc<R>,
    limit_max: u32,
}

impl<R> CatalogueQueryService<R> {
    /// Build the service; requested limits above `limit_max` are clamped.
    pub fn new(repository: Arc<R>, limit_max: u32) -> Self {
        Self {
            repository,
            limit_max,
        }
    }

    fn request<F: SortField>(&self, query: &RankQuery) -> Result<RankRequest<F>, Error> {
        Ok(RankRequest::parse(
            &query.field,
            query.direction.as_deref(),
            query.limit,
            self.limit_max,
        )?)
    }
}

#[async_trait]
impl<R: CatalogueReadRepository> CatalogueQuery for CatalogueQueryService<R> {
    async fn rank_publishers(
        &self,
        query: &RankQuery,
    ) -> Result<RankedList<PublisherSummary>, Error> {
        let request = self.request(query)?;
        self.repository
            .rank_publishers(&request)
            .await
            .map_err(map_read_error)
    }

    async fn rank_series(&self, query: &RankQuery) -> Result<RankedList<SeriesSummary>, Error> {
        let request = self.request(query)?;
        self.repository
            .rank_series(&request)
            .await
            .map_err(map_read_error)
    }

    async fn rank_books(&self, query: &RankQuery) -> Result<RankedList<BookSummary>, Error> {
        let request = self.request(query)?;
        self.repository
            .rank_books(&request)
            .await
            .map_err(map_read_error)
    }

    async fn list_books(&self, limit: i64) -> Result<RankedList<BookSummary>, Error> {
        let limit = RankLimit::new(limit, self.limit_max)?;
        self.repository
            .list_books(limit)
            .await
            .map_err(map_read_error)
    }
}
