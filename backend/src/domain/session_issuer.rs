//! Session issuer: credential verification and token minting.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};
use zeroize::Zeroizing;

use super::password::{Argon2Check, DECOY_PASSWORD_HASH, PasswordCheck};
use super::ports::{
    AuthenticatedSession, LoginService, UserPersistenceError, UserRepository, UsersQuery,
};
use super::{Error, LoginCredentials, TokenSigner, User, UserId};

/// Message returned for every failed login.
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
    }
}

/// Verifies credentials against the credential store and signs tokens.
#[derive(Clone)]
pub struct SessionIssuer<R> {
    users: Arc<R>,
    signer: TokenSigner,
    passwords: Arc<dyn PasswordCheck>,
}

impl<R> SessionIssuer<R> {
    /// Issuer verifying passwords with Argon2.
    pub fn new(users: Arc<R>, signer: TokenSigner) -> Self {
        Self {
            users,
            signer,
            passwords: Arc::new(Argon2Check),
        }
    }

    /// Replace the password verifier.
    pub fn with_password_check(mut self, passwords: Arc<dyn PasswordCheck>) -> Self {
        self.passwords = passwords;
        self
    }
}

impl<R: UserRepository> SessionIssuer<R> {
    async fn password_matches(&self, password: &str, stored_hash: &str) -> Result<bool, Error> {
        let password = Zeroizing::new(password.to_owned());
        let stored_hash = stored_hash.to_owned();
        let passwords = Arc::clone(&self.passwords);
        let outcome =
            tokio::task::spawn_blocking(move || passwords.verify(&password, &stored_hash))
                .await
                .map_err(|err| {
                    Error::internal(format!("password verification task failed: {err}"))
                })?;
        match outcome {
            Ok(matches) => Ok(matches),
            Err(err) => {
                warn!(error = %err, "stored password hash could not be parsed");
                Ok(false)
            }
        }
    }
}

#[async_trait]
impl<R: UserRepository> LoginService for SessionIssuer<R> {
    async fn authenticate(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<AuthenticatedSession, Error> {
        let record = self
            .users
            .find_credentials_by_email(credentials.email())
            .await
            .map_err(map_user_error)?;

        // Unknown emails still pay for a full verification.
        let stored_hash = record
            .as_ref()
            .map_or(DECOY_PASSWORD_HASH, |found| found.password_hash.as_str());
        let matches = self
            .password_matches(credentials.password(), stored_hash)
            .await?;

        let record = match record {
            Some(record) if matches => record,
            Some(record) => {
                debug!(user_id = %record.user.id(), "login rejected: password mismatch");
                return Err(Error::unauthorized(INVALID_CREDENTIALS));
            }
            None => {
                debug!("login rejected: no matching user");
                return Err(Error::unauthorized(INVALID_CREDENTIALS));
            }
        };

        let token = self
            .signer
            .sign(record.user.id())
            .map_err(|err| Error::internal(err.to_string()))?;
        debug!(user_id = %record.user.id(), "session issued");
        Ok(AuthenticatedSession {
            user: record.user,
            token,
        })
    }
}

#[async_trait]
impl<R: UserRepository> UsersQuery for SessionIssuer<R> {
    async fn current_user(&self, user_id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(user_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::unauthorized("Unauthorized"))
    }
}
