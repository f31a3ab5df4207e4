//! PostgreSQL adapter for the publisher aggregate.
//!
//! A save runs in one transaction: the publisher row is locked (or inserted),
//! series ownership is checked, omitted series are deleted (their books go
//! with them through the cascade), and the remaining series are updated or
//! inserted in input order.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{PublisherRepository, PublisherRepositoryError};
use crate::domain::{Publisher, PublisherDraft, PublisherId, SeriesId};

use super::diesel_helpers::impl_persistence_error_conversions;
use super::models::{NewPublisherRow, NewSeriesRow, PublisherRow, SeriesRow};
use super::pool::DbPool;
use super::schema::{publishers, series};

impl_persistence_error_conversions!(PublisherRepositoryError);

/// Diesel adapter for [`PublisherRepository`].
#[derive(Clone)]
pub struct DieselPublisherRepository {
    pool: DbPool,
}

impl DieselPublisherRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

async fn load_publisher(
    conn: &mut AsyncPgConnection,
    id: Uuid,
) -> Result<Option<Publisher>, PublisherRepositoryError> {
    let Some(row) = publishers::table
        .find(id)
        .select(PublisherRow::as_select())
        .first(conn)
        .await
        .optional()?
    else {
        return Ok(None);
    };

    let series_rows: Vec<SeriesRow> = series::table
        .filter(series::publisher_id.eq(id))
        .select(SeriesRow::as_select())
        .order_by((series::position.asc(), series::id.asc()))
        .load(conn)
        .await?;

    Ok(Some(row.into_publisher(series_rows)))
}

/// Lock an existing publisher and return the ids of the series it owns.
async fn lock_existing(
    conn: &mut AsyncPgConnection,
    id: PublisherId,
) -> Result<HashSet<Uuid>, PublisherRepositoryError> {
    let locked: Option<Uuid> = publishers::table
        .find(*id.as_uuid())
        .select(publishers::id)
        .for_update()
        .first(conn)
        .await
        .optional()?;
    if locked.is_none() {
        return Err(PublisherRepositoryError::publisher_not_found(id));
    }

    let owned: Vec<Uuid> = series::table
        .filter(series::publisher_id.eq(*id.as_uuid()))
        .select(series::id)
        .load(conn)
        .await?;
    Ok(owned.into_iter().collect())
}

fn check_ownership(
    draft: &PublisherDraft,
    owned: &HashSet<Uuid>,
) -> Result<(), PublisherRepositoryError> {
    match draft
        .series
        .iter()
        .filter_map(|entry| entry.id)
        .find(|id| !owned.contains(id.as_uuid()))
    {
        Some(foreign) => Err(PublisherRepositoryError::series_not_found(foreign)),
        None => Ok(()),
    }
}

async fn write_publisher(
    conn: &mut AsyncPgConnection,
    draft: &PublisherDraft,
    now: DateTime<Utc>,
) -> Result<Uuid, PublisherRepositoryError> {
    let owned = match draft.id {
        Some(id) => lock_existing(conn, id).await?,
        None => HashSet::new(),
    };
    check_ownership(draft, &owned)?;

    let publisher_id = match draft.id {
        Some(id) => {
            diesel::update(publishers::table.find(*id.as_uuid()))
                .set((
                    publishers::name.eq(&draft.name),
                    publishers::updated_at.eq(now),
                ))
                .execute(conn)
                .await?;
            *id.as_uuid()
        }
        None => {
            let id = Uuid::new_v4();
            diesel::insert_into(publishers::table)
                .values(&NewPublisherRow {
                    id,
                    name: &draft.name,
                    created_at: now,
                    updated_at: now,
                })
                .execute(conn)
                .await?;
            id
        }
    };

    let kept: Vec<Uuid> = draft
        .series
        .iter()
        .filter_map(|entry| entry.id.map(|id| *id.as_uuid()))
        .collect();
    let removed = diesel::delete(
        series::table
            .filter(series::publisher_id.eq(publisher_id))
            .filter(series::id.ne_all(kept)),
    )
    .execute(conn)
    .await?;
    debug!(publisher_id = %publisher_id, removed, "dropped omitted series");

    for (index, entry) in draft.series.iter().enumerate() {
        let position = i32::try_from(index)
            .map_err(|_| PublisherRepositoryError::query("too many series"))?;
        match entry.id {
            Some(id) => {
                diesel::update(series::table.find(*id.as_uuid()))
                    .set((
                        series::name.eq(&entry.name),
                        series::position.eq(position),
                        series::updated_at.eq(now),
                    ))
                    .execute(conn)
                    .await?;
            }
            None => {
                diesel::insert_into(series::table)
                    .values(&NewSeriesRow {
                        id: *SeriesId::random().as_uuid(),
                        publisher_id,
                        name: &entry.name,
                        position,
                        created_at: now,
                        updated_at: now,
                    })
                    .execute(conn)
                    .await?;
            }
        }
    }

    Ok(publisher_id)
}

#[async_trait]
impl PublisherRepository for DieselPublisherRepository {
    async fn save(
        &self,
        draft: &PublisherDraft,
        now: DateTime<Utc>,
    ) -> Result<Publisher, PublisherRepositoryError> {
        let mut conn = self.pool.get().await?;
        conn.transaction::<_, PublisherRepositoryError, _>(|conn| {
            async move {
                let id = write_publisher(conn, draft, now).await?;
                load_publisher(conn, id)
                    .await?
                    .ok_or_else(|| PublisherRepositoryError::query("saved publisher vanished"))
            }
            .scope_boxed()
        })
        .await
    }

    async fn find_by_id(
        &self,
        id: &PublisherId,
    ) -> Result<Option<Publisher>, PublisherRepositoryError> {
        let mut conn = self.pool.get().await?;
        load_publisher(&mut conn, *id.as_uuid()).await
    }
}
