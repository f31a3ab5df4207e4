//! PostgreSQL-backed credential store.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{User, UserCredentials, UserId};

use super::diesel_helpers::impl_persistence_error_conversions;
use super::models::UserRow;
use super::pool::DbPool;
use super::schema::users;

impl_persistence_error_conversions!(UserPersistenceError);

/// Diesel adapter for [`UserRepository`].
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn corrupt_row(id: uuid::Uuid, error: impl std::fmt::Display) -> UserPersistenceError {
    warn!(user_id = %id, error = %error, "stored user row failed validation");
    UserPersistenceError::query("stored user row is invalid")
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserCredentials>, UserPersistenceError> {
        let mut conn = self.pool.get().await?;
        let row: Option<UserRow> = users::table
            .filter(users::email.eq(email))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()?;

        row.map(|row| {
            let id = row.id;
            row.into_credentials().map_err(|err| corrupt_row(id, err))
        })
        .transpose()
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await?;
        let row: Option<UserRow> = users::table
            .find(*id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()?;

        row.map(|row| {
            let id = row.id;
            row.into_user().map_err(|err| corrupt_row(id, err))
        })
        .transpose()
    }
}
