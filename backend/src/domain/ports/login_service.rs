//! Driving ports for authentication and the current-user lookup.
//!
//! Inbound adapters call these to authenticate credentials without importing
//! the credential store, so handler tests can substitute a double.

use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{Error, LoginCredentials, User, UserId};

/// A verified user and the token minted for them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct AuthenticatedSession {
    pub user: User,
    /// Signed bearer token.
    pub token: String,
}

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Verify credentials and mint a session token.
    ///
    /// Unknown emails and wrong passwords fail identically with
    /// `Unauthorized` / `"Invalid credentials"`.
    async fn authenticate(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<AuthenticatedSession, Error>;
}

/// Domain use-case port for reading the authenticated user.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Return the user a verified token belongs to.
    ///
    /// A user deleted after the token was minted yields `Unauthorized`.
    async fn current_user(&self, user_id: &UserId) -> Result<User, Error>;
}
