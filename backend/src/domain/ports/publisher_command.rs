//! Driving ports for publisher writes and reads.

use async_trait::async_trait;

use crate::domain::{
    Error, Publisher, PublisherId, PublisherInput, SavePublisherOutcome, UserId,
};

/// Domain use-case port for saving a publisher aggregate.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PublisherCommand: Send + Sync {
    /// Validate and persist `input` on behalf of `acting_user`.
    ///
    /// A missing acting user fails with `Unauthorized` before the input is
    /// looked at. Validation failures are returned as
    /// [`SavePublisherOutcome::Invalid`], not as an error.
    async fn save(
        &self,
        input: PublisherInput,
        acting_user: Option<UserId>,
    ) -> Result<SavePublisherOutcome, Error>;
}

/// Domain use-case port for viewing a publisher.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PublisherQuery: Send + Sync {
    /// Return the publisher or a `NotFound` error.
    async fn find(&self, id: &PublisherId) -> Result<Publisher, Error>;
}
