//! Internal Diesel row structs.
//!
//! These never leave the persistence layer; adapters convert them into domain
//! types at the port boundary.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Int4, Nullable, Text, Timestamptz, Uuid as SqlUuid};
use uuid::Uuid;

use crate::domain::{
    BookSummary, Publisher, PublisherSummary, Series, SeriesSummary, User, UserCredentials,
    UserValidationError, book_display_name,
};

use super::schema::{book_formats, books, credit_roles, publishers, series, users};

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

impl UserRow {
    pub(crate) fn into_user(self) -> Result<User, UserValidationError> {
        User::try_from_strings(self.id.to_string(), self.name, self.email)
    }

    pub(crate) fn into_credentials(self) -> Result<UserCredentials, UserValidationError> {
        let Self {
            id,
            name,
            email,
            password_hash,
        } = self;
        Ok(UserCredentials {
            user: User::try_from_strings(id.to_string(), name, email)?,
            password_hash,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Publisher aggregate
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = publishers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PublisherRow {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PublisherRow {
    /// Assemble the aggregate; rows owned by another publisher are skipped.
    pub(crate) fn into_publisher(self, series: Vec<SeriesRow>) -> Publisher {
        let owner = self.id;
        Publisher {
            id: self.id.into(),
            name: self.name,
            series: series
                .into_iter()
                .filter(|row| row.publisher_id == owner)
                .map(SeriesRow::into_series)
                .collect(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = publishers)]
pub(crate) struct NewPublisherRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = series)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SeriesRow {
    pub id: Uuid,
    pub publisher_id: Uuid,
    pub name: String,
    pub position: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SeriesRow {
    fn into_series(self) -> Series {
        Series {
            id: self.id.into(),
            name: self.name,
            position: self.position,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Series insert; `created_at` is preserved on conflict.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = series)]
pub(crate) struct NewSeriesRow<'a> {
    pub id: Uuid,
    pub publisher_id: Uuid,
    pub name: &'a str,
    pub position: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Seeded catalogue and reference data
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = books)]
pub(crate) struct NewBookRow<'a> {
    pub id: Uuid,
    pub series_id: Uuid,
    pub issue: Option<&'a str>,
    pub format: Option<&'a str>,
    pub page_count: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = credit_roles)]
pub(crate) struct NewCreditRoleRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = book_formats)]
pub(crate) struct NewBookFormatRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
}

// ---------------------------------------------------------------------------
// Ranked projections (raw SQL)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, QueryableByName)]
pub(crate) struct PublisherSummaryRow {
    #[diesel(sql_type = SqlUuid)]
    pub id: Uuid,
    #[diesel(sql_type = Text)]
    pub name: String,
    #[diesel(sql_type = BigInt)]
    pub series_count: i64,
    #[diesel(sql_type = Timestamptz)]
    pub created_at: DateTime<Utc>,
    #[diesel(sql_type = Timestamptz)]
    pub updated_at: DateTime<Utc>,
}

impl From<PublisherSummaryRow> for PublisherSummary {
    fn from(row: PublisherSummaryRow) -> Self {
        Self {
            id: row.id.into(),
            name: row.name,
            series_count: row.series_count,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, QueryableByName)]
pub(crate) struct SeriesSummaryRow {
    #[diesel(sql_type = SqlUuid)]
    pub id: Uuid,
    #[diesel(sql_type = Text)]
    pub name: String,
    #[diesel(sql_type = SqlUuid)]
    pub publisher_id: Uuid,
    #[diesel(sql_type = Text)]
    pub publisher_name: String,
    #[diesel(sql_type = BigInt)]
    pub book_count: i64,
    #[diesel(sql_type = Timestamptz)]
    pub created_at: DateTime<Utc>,
    #[diesel(sql_type = Timestamptz)]
    pub updated_at: DateTime<Utc>,
}

impl From<SeriesSummaryRow> for SeriesSummary {
    fn from(row: SeriesSummaryRow) -> Self {
        Self {
            id: row.id.into(),
            name: row.name,
            publisher_id: row.publisher_id.into(),
            publisher_name: row.publisher_name,
            book_count: row.book_count,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, QueryableByName)]
pub(crate) struct BookSummaryRow {
    #[diesel(sql_type = SqlUuid)]
    pub id: Uuid,
    #[diesel(sql_type = Nullable<Text>)]
    pub issue: Option<String>,
    #[diesel(sql_type = SqlUuid)]
    pub series_id: Uuid,
    #[diesel(sql_type = Text)]
    pub series_name: String,
    #[diesel(sql_type = Text)]
    pub publisher_name: String,
    #[diesel(sql_type = Nullable<Text>)]
    pub format: Option<String>,
    #[diesel(sql_type = Nullable<Int4>)]
    pub page_count: Option<i32>,
    #[diesel(sql_type = Timestamptz)]
    pub created_at: DateTime<Utc>,
    #[diesel(sql_type = Timestamptz)]
    pub updated_at: DateTime<Utc>,
}

impl From<BookSummaryRow> for BookSummary {
    fn from(row: BookSummaryRow) -> Self {
        Self {
            id: row.id.into(),
            display_name: book_display_name(&row.series_name, row.issue.as_deref()),
            issue: row.issue,
            series_id: row.series_id.into(),
            series_name: row.series_name,
            publisher_name: row.publisher_name,
            format: row.format,
            page_count: row.page_count,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// `SELECT count(*)` result.
#[derive(Debug, Clone, Copy, QueryableByName)]
pub(crate) struct CountRow {
    #[diesel(sql_type = BigInt)]
    pub count: i64,
}
