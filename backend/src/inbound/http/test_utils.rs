//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use mockable::DefaultClock;

use crate::domain::ports::{
    CatalogueQuery, DashboardQuery, LoginService, MockCatalogueQuery, MockDashboardQuery,
    MockLoginService, MockPublisherCommand, MockPublisherQuery, MockUsersQuery, PublisherCommand,
    PublisherQuery, UsersQuery,
};
use crate::domain::{TokenSigner, UserId};

use super::state::HttpState;

const TEST_SECRET: &[u8] = b"longbox-http-test-secret-0123456789";

/// Signer shared by handler tests; tokens live for an hour.
pub fn test_signer() -> TokenSigner {
    TokenSigner::new(TEST_SECRET, 3600, Arc::new(DefaultClock)).expect("test signer")
}

/// `Authorization` header value for `user_id`, signed with [`test_signer`].
pub fn bearer_for(user_id: &UserId) -> String {
    let token = test_signer().sign(user_id).expect("sign test token");
    format!("Bearer {token}")
}

/// Assemble [`HttpState`] from port doubles.
///
/// Ports left unset get a mock with no expectations, so any unexpected call
/// fails the test.
pub struct HttpStateBuilder {
    login: Arc<dyn LoginService>,
    users: Arc<dyn UsersQuery>,
    publishers: Arc<dyn PublisherCommand>,
    publishers_query: Arc<dyn PublisherQuery>,
    catalogue: Arc<dyn CatalogueQuery>,
    dashboard: Arc<dyn DashboardQuery>,
}

impl HttpStateBuilder {
    pub fn new() -> Self {
        Self {
            login: Arc::new(MockLoginService::new()),
            users: Arc::new(MockUsersQuery::new()),
            publishers: Arc::new(MockPublisherCommand::new()),
            publishers_query: Arc::new(MockPublisherQuery::new()),
            catalogue: Arc::new(MockCatalogueQuery::new()),
            dashboard: Arc::new(MockDashboardQuery::new()),
        }
    }

    pub fn login(mut self, login: MockLoginService) -> Self {
        self.login = Arc::new(login);
        self
    }

    pub fn users(mut self, users: MockUsersQuery) -> Self {
        self.users = Arc::new(users);
        self
    }

    pub fn publishers(mut self, publishers: MockPublisherCommand) -> Self {
        self.publishers = Arc::new(publishers);
        self
    }

    pub fn publishers_query(mut self, query: MockPublisherQuery) -> Self {
        self.publishers_query = Arc::new(query);
        self
    }

    pub fn catalogue(mut self, catalogue: MockCatalogueQuery) -> Self {
        self.catalogue = Arc::new(catalogue);
        self
    }

    pub fn dashboard(mut self, dashboard: MockDashboardQuery) -> Self {
        self.dashboard = Arc::new(dashboard);
        self
    }

    pub fn build(self) -> HttpState {
        HttpState {
            login: self.login,
            users: self.users,
            publishers: self.publishers,
            publishers_query: self.publishers_query,
            catalogue: self.catalogue,
            dashboard: self.dashboard,
            tokens: test_signer(),
        }
    }
}
