//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod catalogue_query;
mod catalogue_read_repository;
mod dashboard_query;
mod login_service;
mod publisher_command;
mod publisher_repository;
mod seed_repository;
mod user_repository;

#[cfg(test)]
pub use catalogue_query::MockCatalogueQuery;
pub use catalogue_query::{CatalogueQuery, RankQuery};
#[cfg(test)]
pub use catalogue_read_repository::MockCatalogueReadRepository;
pub use catalogue_read_repository::{CatalogueReadError, CatalogueReadRepository};
#[cfg(test)]
pub use dashboard_query::MockDashboardQuery;
pub use dashboard_query::DashboardQuery;
#[cfg(test)]
pub use login_service::{MockLoginService, MockUsersQuery};
pub use login_service::{AuthenticatedSession, LoginService, UsersQuery};
#[cfg(test)]
pub use publisher_command::{MockPublisherCommand, MockPublisherQuery};
pub use publisher_command::{PublisherCommand, PublisherQuery};
#[cfg(test)]
pub use publisher_repository::MockPublisherRepository;
pub use publisher_repository::{PublisherRepository, PublisherRepositoryError};
#[cfg(test)]
pub use seed_repository::MockSeedRepository;
pub use seed_repository::{SeedRepository, SeedRepositoryError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
