//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data<HttpState>` and only see domain
//! ports, so they can be tested against doubles without any I/O.

use std::sync::Arc;

use crate::domain::TokenSigner;
use crate::domain::ports::{
    CatalogueQuery, DashboardQuery, LoginService, PublisherCommand, PublisherQuery, UsersQuery,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub users: Arc<dyn UsersQuery>,
    pub publishers: Arc<dyn PublisherCommand>,
    pub publishers_query: Arc<dyn PublisherQuery>,
    pub catalogue: Arc<dyn CatalogueQuery>,
    pub dashboard: Arc<dyn DashboardQuery>,
    /// Verifies bearer tokens presented to protected endpoints.
    pub tokens: TokenSigner,
}
