//! Ranked catalogue projections over PostgreSQL.
//!
//! Each entity has one projection query exposing its sortable columns under
//! their wire names. The ranking wraps that projection with an `ORDER BY`
//! built only from [`SortField::as_str`] and [`SortDirection::as_sql`](crate::domain::SortDirection::as_sql), both
//! closed sets of static strings, so no request text reaches the SQL.

use async_trait::async_trait;
use diesel::sql_types::BigInt;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{CatalogueReadError, CatalogueReadRepository};
use crate::domain::{
    BookSortField, BookSummary, PublisherSortField, PublisherSummary, RankLimit, RankRequest,
    RankedList, SeriesSortField, SeriesSummary, SortField,
};

use super::diesel_helpers::impl_persistence_error_conversions;
use super::models::{BookSummaryRow, CountRow, PublisherSummaryRow, SeriesSummaryRow};
use super::pool::DbPool;

impl_persistence_error_conversions!(CatalogueReadError);

const PUBLISHER_PROJECTION: &str = "\
    SELECT p.id, p.name, \
           (SELECT count(*) FROM series s WHERE s.publisher_id = p.id) AS series_count, \
           p.created_at, p.updated_at \
    FROM publishers p";

const SERIES_PROJECTION: &str = "\
    SELECT s.id, s.name, s.publisher_id, p.name AS publisher_name, \
           (SELECT count(*) FROM books b WHERE b.series_id = s.id) AS book_count, \
           s.created_at, s.updated_at \
    FROM series s JOIN publishers p ON p.id = s.publisher_id";

const BOOK_PROJECTION: &str = "\
    SELECT b.id, b.issue, b.series_id, s.name AS series_name, p.name AS publisher_name, \
           b.format, b.page_count, b.created_at, b.updated_at \
    FROM books b \
    JOIN series s ON s.id = b.series_id \
    JOIN publishers p ON p.id = s.publisher_id";

// Text columns sort with `COLLATE "C"`: byte order, as the in-memory adapter.
const CATALOGUE_ORDER: &str = "ORDER BY publisher_name COLLATE \"C\" ASC, \
     series_name COLLATE \"C\" ASC, issue COLLATE \"C\" ASC NULLS LAST, id ASC";

/// Sort fields holding text.
const TEXT_FIELDS: &[&str] = &["name"];

fn order_key(field: &str) -> String {
    if TEXT_FIELDS.contains(&field) {
        format!("{field} COLLATE \"C\"")
    } else {
        field.to_owned()
    }
}

/// Wrap `projection` in a ranked, limited query. The limit is bound as `$1`.
fn ranked_sql<F: SortField>(projection: &str, request: &RankRequest<F>) -> String {
    format!(
        "SELECT * FROM ({projection}) AS ranked \
         ORDER BY {key} {direction} NULLS LAST, id ASC \
         LIMIT $1",
        key = order_key(request.field.as_str()),
        direction = request.direction.as_sql(),
    )
}

fn listing_sql() -> String {
    format!("SELECT * FROM ({BOOK_PROJECTION}) AS listed {CATALOGUE_ORDER} LIMIT $1")
}

fn count_sql(table: &str) -> String {
    format!("SELECT count(*) AS count FROM {table}")
}

/// Load `$row` summaries for `$sql` plus the total row count of `$table`.
macro_rules! ranked_list {
    ($self:ident, $row:ty, $sql:expr, $limit:expr, $table:literal) => {{
        let mut conn = $self.pool.get().await?;
        let rows: Vec<$row> = diesel::sql_query($sql)
            .bind::<BigInt, _>($limit.as_i64())
            .load(&mut conn)
            .await?;
        let total_count = total(&mut conn, $table).await?;
        Ok(RankedList {
            nodes: rows.into_iter().map(Into::into).collect(),
            total_count,
        })
    }};
}

/// Diesel adapter for [`CatalogueReadRepository`].
#[derive(Clone)]
pub struct DieselCatalogueReadRepository {
    pool: DbPool,
}

impl DieselCatalogueReadRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

async fn total(conn: &mut AsyncPgConnection, table: &str) -> Result<i64, CatalogueReadError> {
    let row: CountRow = diesel::sql_query(count_sql(table))
        .get_result(conn)
        .await?;
    Ok(row.count)
}

#[async_trait]
impl CatalogueReadRepository for DieselCatalogueReadRepository {
    async fn rank_publishers(
        &self,
        request: &RankRequest<PublisherSortField>,
    ) -> Result<RankedList<PublisherSummary>, CatalogueReadError> {
        ranked_list!(
            self,
            PublisherSummaryRow,
            ranked_sql(PUBLISHER_PROJECTION, request),
            request.limit,
            "publishers"
        )
    }

    async fn rank_series(
        &self,
        request: &RankRequest<SeriesSortField>,
    ) -> Result<RankedList<SeriesSummary>, CatalogueReadError> {
        ranked_list!(
            self,
            SeriesSummaryRow,
            ranked_sql(SERIES_PROJECTION, request),
            request.limit,
            "series"
        )
    }

    async fn rank_books(
        &self,
        request: &RankRequest<BookSortField>,
    ) -> Result<RankedList<BookSummary>, CatalogueReadError> {
        ranked_list!(
            self,
            BookSummaryRow,
            ranked_sql(BOOK_PROJECTION, request),
            request.limit,
            "books"
        )
    }

    async fn list_books(
        &self,
        limit: RankLimit,
    ) -> Result<RankedList<BookSummary>, CatalogueReadError> {
        ranked_list!(self, BookSummaryRow, listing_sql(), limit, "books")
    }
}
