//! Driven port for persisting the publisher aggregate.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Publisher, PublisherDraft, PublisherId, SeriesId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by publisher repository adapters.
    pub enum PublisherRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "publisher repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "publisher repository query failed: {message}",
        /// Update targeted a publisher that does not exist.
        PublisherNotFound { id: PublisherId } => "publisher {id} not found",
        /// A series id in the draft does not belong to the publisher.
        SeriesNotFound { id: SeriesId } => "series {id} does not belong to the publisher",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PublisherRepository: Send + Sync {
    /// Create or update the publisher and its series in one transaction.
    ///
    /// A draft with an id updates that publisher: series with ids are
    /// renamed, new series are inserted, and stored series missing from the
    /// draft are deleted. Series positions follow draft order. `now` stamps
    /// `created_at` on inserts and `updated_at` on every written row.
    async fn save(
        &self,
        draft: &PublisherDraft,
        now: DateTime<Utc>,
    ) -> Result<Publisher, PublisherRepositoryError>;

    /// Fetch a publisher with its series in order.
    async fn find_by_id(
        &self,
        id: &PublisherId,
    ) -> Result<Option<Publisher>, PublisherRepositoryError>;
}
