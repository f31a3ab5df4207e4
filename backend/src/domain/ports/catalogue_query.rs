//! Driving port for ranked lists and the flat book listing.

use async_trait::async_trait;

use crate::domain::{BookSummary, Error, PublisherSummary, RankedList, SeriesSummary};

/// Raw ranked-list parameters as received from a caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankQuery {
    pub field: String,
    /// `ASC` or `DESC`, any case. Missing means descending.
    pub direction: Option<String>,
    pub limit: i64,
}

impl RankQuery {
    pub fn new(field: impl Into<String>, direction: Option<&str>, limit: i64) -> Self {
        Self {
            field: field.into(),
            direction: direction.map(str::to_owned),
            limit,
        }
    }
}

/// Domain use-case port for catalogue reads.
///
/// Unknown fields, bad directions, and non-positive limits fail with
/// `InvalidRequest`; limits above the configured maximum are clamped.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogueQuery: Send + Sync {
    async fn rank_publishers(&self, query: &RankQuery)
    -> Result<RankedList<PublisherSummary>, Error>;

    async fn rank_series(&self, query: &RankQuery) -> Result<RankedList<SeriesSummary>, Error>;

    async fn rank_books(&self, query: &RankQuery) -> Result<RankedList<BookSummary>, Error>;

    async fn list_books(&self, limit: i64) -> Result<RankedList<BookSummary>, Error>;
}
