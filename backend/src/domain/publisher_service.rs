//! Publisher save and view services.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::debug;

use super::ports::{PublisherCommand, PublisherQuery, PublisherRepository, PublisherRepositoryError};
use super::{
    Error, Publisher, PublisherDraft, PublisherId, PublisherInput, SavePublisherOutcome, UserId,
};

fn map_repository_error(error: PublisherRepositoryError) -> Error {
    match error {
        PublisherRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("publisher repository unavailable: {message}"))
        }
        PublisherRepositoryError::Query { message } => {
            Error::internal(format!("publisher repository error: {message}"))
        }
        PublisherRepositoryError::PublisherNotFound { id } => {
            Error::not_found(format!("publisher {id} not found"))
        }
        PublisherRepositoryError::SeriesNotFound { id } => {
            Error::not_found(format!("series {id} not found for this publisher"))
        }
    }
}

/// Validates and persists publisher aggregates.
#[derive(Clone)]
pub struct PublisherService<R> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> PublisherService<R> {
    pub fn new(repository: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }
}

#[async_trait]
impl<R: PublisherRepository> PublisherCommand for PublisherService<R> {
    async fn save(
        &self,
        input: PublisherInput,
        acting_user: Option<UserId>,
    ) -> Result<SavePublisherOutcome, Error> {
        let Some(acting_user) = acting_user else {
            return Err(Error::unauthorized("Unauthorized"));
        };

        let draft = match PublisherDraft::validate(input) {
            Ok(draft) => draft,
            Err(errors) => {
                debug!(%acting_user, violations = errors.len(), "publisher input rejected");
                return Ok(SavePublisherOutcome::Invalid(errors));
            }
        };

        let publisher = self
            .repository
            .save(&draft, self.clock.utc())
            .await
            .map_err(map_repository_error)?;
        debug!(
            %acting_user,
            publisher_id = %publisher.id,
            series = publisher.series.len(),
            "publisher saved"
        );
        Ok(SavePublisherOutcome::Saved(publisher))
    }
}

#[async_trait]
impl<R: PublisherRepository> PublisherQuery for PublisherService<R> {
    async fn find(&self, id: &PublisherId) -> Result<Publisher, Error> {
        self.repository
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("publisher {id} not found")))
    }
}
