//! PostgreSQL adapter applying a [`SeedPlan`].
//!
//! The whole plan runs in one transaction. Users are matched by email and
//! reference rows by name (`ON CONFLICT DO NOTHING`); a publisher whose name
//! already exists is skipped together with its series and books, so
//! re-applying the plan inserts nothing.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{SeedRepository, SeedRepositoryError};
use crate::domain::seed::SeedPublisher;
use crate::domain::{SeedPlan, SeedReport};

use super::diesel_helpers::impl_persistence_error_conversions;
use super::models::{NewBookFormatRow, NewBookRow, NewCreditRoleRow, NewPublisherRow, NewSeriesRow, NewUserRow};
use super::pool::DbPool;
use super::schema::{book_formats, books, credit_roles, publishers, series, users};

impl_persistence_error_conversions!(SeedRepositoryError);

/// Diesel adapter for [`SeedRepository`].
///
/// # Examples
///
/// ```rust,no_run
/// use longbox::outbound::persistence::{DbPool, DieselSeedRepository, PoolConfig};
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = DbPool::new(PoolConfig::new("postgres://localhost/longbox")).await?;
/// let repository = DieselSeedRepository::new(pool);
/// # let _ = repository;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct DieselSeedRepository {
    pool: DbPool,
}

impl DieselSeedRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

async fn seed_users(
    conn: &mut AsyncPgConnection,
    plan: &SeedPlan,
    now: DateTime<Utc>,
) -> Result<usize, SeedRepositoryError> {
    let mut inserted = 0;
    for user in &plan.users {
        inserted += diesel::insert_into(users::table)
            .values(&NewUserRow {
                id: Uuid::new_v4(),
                name: user.name.as_ref(),
                email: user.email.as_ref(),
                password_hash: &user.password_hash,
                created_at: now,
                updated_at: now,
            })
            .on_conflict(users::email)
            .do_nothing()
            .execute(conn)
            .await?;
    }
    Ok(inserted)
}

async fn seed_reference_rows(
    conn: &mut AsyncPgConnection,
    plan: &SeedPlan,
) -> Result<usize, SeedRepositoryError> {
    let roles: Vec<NewCreditRoleRow<'_>> = plan
        .credit_roles
        .iter()
        .map(|name| NewCreditRoleRow {
            id: Uuid::new_v4(),
            name,
        })
        .collect();
    let formats: Vec<NewBookFormatRow<'_>> = plan
        .book_formats
        .iter()
        .map(|name| NewBookFormatRow {
            id: Uuid::new_v4(),
            name,
        })
        .collect();

    let roles_inserted = diesel::insert_into(credit_roles::table)
        .values(&roles)
        .on_conflict(credit_roles::name)
        .do_nothing()
        .execute(conn)
        .await?;
    let formats_inserted = diesel::insert_into(book_formats::table)
        .values(&formats)
        .on_conflict(book_formats::name)
        .do_nothing()
        .execute(conn)
        .await?;
    Ok(roles_inserted + formats_inserted)
}

async fn seed_publisher(
    conn: &mut AsyncPgConnection,
    publisher: &SeedPublisher,
    now: DateTime<Utc>,
    report: &mut SeedReport,
) -> Result<(), SeedRepositoryError> {
    let existing: Option<Uuid> = publishers::table
        .filter(publishers::name.eq(publisher.name))
        .select(publishers::id)
        .first(conn)
        .await
        .optional()?;
    if existing.is_some() {
        debug!(publisher = publisher.name, "seed publisher already present");
        return Ok(());
    }

    let publisher_id = Uuid::new_v4();
    diesel::insert_into(publishers::table)
        .values(&NewPublisherRow {
            id: publisher_id,
            name: publisher.name,
            created_at: now,
            updated_at: now,
        })
        .execute(conn)
        .await?;
    report.publishers += 1;

    for (index, seed_series) in publisher.series.iter().enumerate() {
        let series_id = Uuid::new_v4();
        diesel::insert_into(series::table)
            .values(&NewSeriesRow {
                id: series_id,
                publisher_id,
                name: seed_series.name,
                position: i32::try_from(index)
                    .map_err(|_| SeedRepositoryError::query("too many seed series"))?,
                created_at: now,
                updated_at: now,
            })
            .execute(conn)
            .await?;
        report.series += 1;

        let rows: Vec<NewBookRow<'_>> = seed_series
            .books
            .iter()
            .map(|book| NewBookRow {
                id: Uuid::new_v4(),
                series_id,
                issue: Some(book.issue.as_str()),
                format: Some(book.format),
                page_count: book.page_count,
                created_at: now,
                updated_at: now,
            })
            .collect();
        report.books += diesel::insert_into(books::table)
            .values(&rows)
            .execute(conn)
            .await?;
    }
    Ok(())
}

#[async_trait]
impl SeedRepository for DieselSeedRepository {
    async fn apply(
        &self,
        plan: &SeedPlan,
        now: DateTime<Utc>,
    ) -> Result<SeedReport, SeedRepositoryError> {
        let mut conn = self.pool.get().await?;
        conn.transaction::<_, SeedRepositoryError, _>(|conn| {
            async move {
                let mut report = SeedReport {
                    users: seed_users(conn, plan, now).await?,
                    reference_rows: seed_reference_rows(conn, plan).await?,
                    ..SeedReport::default()
                };
                for publisher in &plan.publishers {
                    seed_publisher(conn, publisher, now, &mut report).await?;
                }
                Ok(report)
            }
            .scope_boxed()
        })
        .await
    }
}
