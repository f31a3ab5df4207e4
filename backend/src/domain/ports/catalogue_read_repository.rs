//! Read-side port for ranked catalogue projections.
//!
//! Requests arrive already validated: the field is one of the entity's
//! declared sort fields and the limit is positive and clamped. Adapters must
//! order nulls last in both directions and break ties by id ascending.

use async_trait::async_trait;

use crate::domain::{
    BookSortField, BookSummary, PublisherSortField, PublisherSummary, RankLimit, RankRequest,
    RankedList, SeriesSortField, SeriesSummary,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised when reading catalogue projections.
    pub enum CatalogueReadError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "catalogue read connection failed: {message}",
        /// Query failed during execution or row conversion.
        Query { message: String } =>
            "catalogue read query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogueReadRepository: Send + Sync {
    async fn rank_publishers(
        &self,
        request: &RankRequest<PublisherSortField>,
    ) -> Result<RankedList<PublisherSummary>, CatalogueReadError>;

    async fn rank_series(
        &self,
        request: &RankRequest<SeriesSortField>,
    ) -> Result<RankedList<SeriesSummary>, CatalogueReadError>;

    async fn rank_books(
        &self,
        request: &RankRequest<BookSortField>,
    ) -> Result<RankedList<BookSummary>, CatalogueReadError>;

    /// Books in catalogue order: publisher name, series name, issue, id.
    async fn list_books(
        &self,
        limit: RankLimit,
    ) -> Result<RankedList<BookSummary>, CatalogueReadError>;
}
