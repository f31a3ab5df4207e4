//! Dashboard aggregator.
//!
//! Four catalogue reads run concurrently. Each settles independently into a
//! [`Panel`]; a failed or timed-out read only affects its own panel.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::join;
use serde::Serialize;
use tracing::warn;
use utoipa::ToSchema;

use super::ports::{CatalogueQuery, DashboardQuery, RankQuery};
use super::{BookSummary, Error, PublisherSummary, SeriesSummary};

/// Message shown for a panel whose query failed.
pub const PANEL_ERROR_MESSAGE: &str = "An error has occurred";
/// Default per-panel time budget.
pub const DEFAULT_PANEL_TIMEOUT: Duration = Duration::from_secs(5);

const TOP_LIMIT: i64 = 5;
const RECENT_BOOKS_LIMIT: i64 = 50;

/// A settled dashboard panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Panel<T> {
    Ready { items: Vec<T> },
    Error { message: String },
}

impl<T> Panel<T> {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }

    fn failed() -> Self {
        Self::Error {
            message: PANEL_ERROR_MESSAGE.to_owned(),
        }
    }
}

/// All four panels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub top_publishers: Panel<PublisherSummary>,
    pub top_series: Panel<SeriesSummary>,
    pub latest_books: Panel<BookSummary>,
    pub books: Panel<BookSummary>,
}

/// Runs the dashboard queries against a [`CatalogueQuery`].
#[derive(Clone)]
pub struct DashboardAggregator<Q> {
    catalogue: Arc<Q>,
    panel_timeout: Duration,
}

impl<Q: CatalogueQuery> DashboardAggregator<Q> {
    pub fn new(catalogue: Arc<Q>, panel_timeout: Duration) -> Self {
        Self {
            catalogue,
            panel_timeout,
        }
    }

    async fn settle<T, F>(&self, panel: &'static str, query: F) -> Panel<T>
    where
        F: Future<Output = Result<Vec<T>, Error>>,
    {
        match tokio::time::timeout(self.panel_timeout, query).await {
            Ok(Ok(items)) => Panel::Ready { items },
            Ok(Err(err)) => {
                warn!(panel, code = ?err.code(), error = %err, "dashboard panel failed");
                Panel::failed()
            }
            Err(_) => {
                warn!(
                    panel,
                    timeout_ms = self.panel_timeout.as_millis() as u64,
                    "dashboard panel timed out"
                );
                Panel::failed()
            }
        }
    }

    /// Query every panel and wait for all of them to settle.
    pub async fn load(&self) -> DashboardView {
        let catalogue = &self.catalogue;
        let top_publishers = RankQuery::new("series_count", Some("DESC"), TOP_LIMIT);
        let top_series = RankQuery::new("book_count", Some("DESC"), TOP_LIMIT);
        let latest_books = RankQuery::new("created_at", Some("DESC"), TOP_LIMIT);

        let (top_publishers, top_series, latest_books, books) = join!(
            self.settle("top_publishers", async {
                Ok::<_, Error>(catalogue.rank_publishers(&top_publishers).await?.nodes)
            }),
            self.settle("top_series", async {
                Ok::<_, Error>(catalogue.rank_series(&top_series).await?.nodes)
            }),
            self.settle("latest_books", async {
                Ok::<_, Error>(catalogue.rank_books(&latest_books).await?.nodes)
            }),
            self.settle("books", async {
                Ok::<_, Error>(catalogue.list_books(RECENT_BOOKS_LIMIT).await?.nodes)
            }),
        );

        DashboardView {
            top_publishers,
            top_series,
            latest_books,
            books,
        }
    }
}

#[async_trait]
impl<Q: CatalogueQuery> DashboardQuery for DashboardAggregator<Q> {
    async fn load(&self) -> DashboardView {
        DashboardAggregator::load(self).await
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::MockCatalogueQuery;
    use crate::domain::RankedList;
    use rstest::rstest;
    use serde_json::json;

    fn empty<T>() -> RankedList<T> {
        RankedList {
            nodes: Vec::new(),
            total_count: 0,
        }
    }

    fn healthy() -> MockCatalogueQuery {
        let mut catalogue = MockCatalogueQuery::new();
        catalogue.expect_rank_publishers().returning(|_| Ok(empty()));
        catalogue.expect_rank_series().returning(|_| Ok(empty()));
        catalogue.expect_rank_books().returning(|_| Ok(empty()));
        catalogue.expect_list_books().returning(|_| Ok(empty()));
        catalogue
    }

    #[rstest]
    #[tokio::test]
    async fn issues_the_declared_queries() {
        let mut catalogue = MockCatalogueQuery::new();
        catalogue
            .expect_rank_publishers()
            .withf(|q| q.field == "series_count" && q.limit == 5)
            .times(1)
            .returning(|_| Ok(empty()));
        catalogue
            .expect_rank_series()
            .withf(|q| q.field == "book_count" && q.limit == 5)
            .times(1)
            .returning(|_| Ok(empty()));
        catalogue
            .expect_rank_books()
            .withf(|q| q.field == "created_at" && q.direction.as_deref() == Some("DESC"))
            .times(1)
            .returning(|_| Ok(empty()));
        catalogue
            .expect_list_books()
            .withf(|limit| *limit == 50)
            .times(1)
            .returning(|_| Ok(empty()));
        let view = DashboardAggregator::new(Arc::new(catalogue), DEFAULT_PANEL_TIMEOUT)
            .load()
            .await;
        assert!(view.top_publishers.is_ready());
        assert!(view.books.is_ready());
    }

    #[rstest]
    #[tokio::test]
    async fn failing_top_series_only_fails_its_panel() {
        let mut catalogue = MockCatalogueQuery::new();
        catalogue.expect_rank_publishers().returning(|_| Ok(empty()));
        catalogue
            .expect_rank_series()
            .returning(|_| Err(Error::internal("boom")));
        catalogue.expect_rank_books().returning(|_| Ok(empty()));
        catalogue.expect_list_books().returning(|_| Ok(empty()));

        let view = DashboardAggregator::new(Arc::new(catalogue), DEFAULT_PANEL_TIMEOUT)
            .load()
            .await;
        assert!(view.top_publishers.is_ready());
        assert!(view.latest_books.is_ready());
        assert!(view.books.is_ready());
        assert_eq!(
            view.top_series,
            Panel::Error {
                message: PANEL_ERROR_MESSAGE.to_owned()
            }
        );
    }

    #[rstest]
    #[tokio::test]
    async fn every_panel_can_fail_independently() {
        let mut catalogue = MockCatalogueQuery::new();
        catalogue
            .expect_rank_publishers()
            .returning(|_| Err(Error::service_unavailable("down")));
        catalogue
            .expect_rank_series()
            .returning(|_| Err(Error::service_unavailable("down")));
        catalogue
            .expect_rank_books()
            .returning(|_| Err(Error::service_unavailable("down")));
        catalogue
            .expect_list_books()
            .returning(|_| Err(Error::service_unavailable("down")));
        let view = DashboardAggregator::new(Arc::new(catalogue), DEFAULT_PANEL_TIMEOUT)
            .load()
            .await;
        assert!(!view.top_publishers.is_ready());
        assert!(!view.top_series.is_ready());
        assert!(!view.latest_books.is_ready());
        assert!(!view.books.is_ready());
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn slow_panel_times_out() {
        let aggregator = DashboardAggregator::new(Arc::new(healthy()), Duration::from_millis(50));
        let panel: Panel<()> = aggregator
            .settle("slow", async {
                tokio::time::sleep(Duration::from_secs(1)).await;
                Ok(Vec::new())
            })
            .await;
        assert!(!panel.is_ready());
    }

    #[rstest]
    fn panels_serialise_with_status_tag() {
        let ready: Panel<u8> = Panel::Ready { items: vec![1] };
        let failed: Panel<u8> = Panel::failed();
        assert_eq!(
            serde_json::to_value(&ready).expect("serialise"),
            json!({ "status": "ready", "items": [1] })
        );
        assert_eq!(
            serde_json::to_value(&failed).expect("serialise"),
            json!({ "status": "error", "message": "An error has occurred" })
        );
    }
}
