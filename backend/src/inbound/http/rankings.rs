//! Ranked list and book listing handlers.
//!
//! ```text
//! GET /api/v1/publishers/ranked?field=series_count&direction=DESC&limit=5
//! GET /api/v1/series/ranked?field=book_count
//! GET /api/v1/books/ranked?field=page_count&direction=asc
//! GET /api/v1/books?limit=50
//! ```

use actix_web::{get, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::ports::RankQuery;
use crate::domain::{BookSummary, Error, PublisherSummary, RankedList, SeriesSummary};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_limit;

/// Limit applied to ranked lists when the query omits one.
pub const DEFAULT_RANK_LIMIT: i64 = 10;
/// Limit applied to the flat book listing when the query omits one.
pub const DEFAULT_LISTING_LIMIT: i64 = 50;

/// Query string accepted by the ranked-list endpoints.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RankParams {
    /// Sortable field declared for the entity type.
    pub field: Option<String>,
    /// `ASC` or `DESC`, any case. Defaults to `DESC`.
    pub direction: Option<String>,
    /// Positive integer; values above the server maximum are clamped.
    pub limit: Option<String>,
}

impl RankParams {
    fn into_query(self) -> Result<RankQuery, Error> {
        let limit = parse_limit(self.limit.as_deref(), DEFAULT_RANK_LIMIT)?;
        Ok(RankQuery::new(
            self.field.unwrap_or_default(),
            self.direction.as_deref(),
            limit,
        ))
    }
}

/// Query string accepted by the flat book listing.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListingParams {
    /// Positive integer; values above the server maximum are clamped.
    pub limit: Option<String>,
}

/// Publishers ordered by `series_count`, `name`, or `created_at`.
#[utoipa::path(
    get,
    path = "/api/v1/publishers/ranked",
    params(RankParams),
    responses(
        (status = 200, description = "Ranked publishers", body = RankedList<PublisherSummary>),
        (status = 400, description = "Invalid field, direction, or limit", body = Error),
        (status = 503, description = "Catalogue unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["catalogue"],
    operation_id = "rankPublishers",
    security([])
)]
#[get("/publishers/ranked")]
pub async fn rank_publishers(
    state: web::Data<HttpState>,
    params: web::Query<RankParams>,
) -> ApiResult<web::Json<RankedList<PublisherSummary>>> {
    let query = params.into_inner().into_query()?;
    Ok(web::Json(state.catalogue.rank_publishers(&query).await?))
}

/// Series ordered by `book_count`, `name`, or `created_at`.
#[utoipa::path(
    get,
    path = "/api/v1/series/ranked",
    params(RankParams),
    responses(
        (status = 200, description = "Ranked series", body = RankedList<SeriesSummary>),
        (status = 400, description = "Invalid field, direction, or limit", body = Error),
        (status = 503, description = "Catalogue unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["catalogue"],
    operation_id = "rankSeries",
    security([])
)]
#[get("/series/ranked")]
pub async fn rank_series(
    state: web::Data<HttpState>,
    params: web::Query<RankParams>,
) -> ApiResult<web::Json<RankedList<SeriesSummary>>> {
    let query = params.into_inner().into_query()?;
    Ok(web::Json(state.catalogue.rank_series(&query).await?))
}

/// Books ordered by `created_at`, `updated_at`, or `page_count`.
#[utoipa::path(
    get,
    path = "/api/v1/books/ranked",
    params(RankParams),
    responses(
        (status = 200, description = "Ranked books", body = RankedList<BookSummary>),
        (status = 400, description = "Invalid field, direction, or limit", body = Error),
        (status = 503, description = "Catalogue unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["catalogue"],
    operation_id = "rankBooks",
    security([])
)]
#[get("/books/ranked")]
pub async fn rank_books(
    state: web::Data<HttpState>,
    params: web::Query<RankParams>,
) -> ApiResult<web::Json<RankedList<BookSummary>>> {
    let query = params.into_inner().into_query()?;
    Ok(web::Json(state.catalogue.rank_books(&query).await?))
}

/// Books in catalogue order: publisher, series, issue.
#[utoipa::path(
    get,
    path = "/api/v1/books",
    params(ListingParams),
    responses(
        (status = 200, description = "Book listing", body = RankedList<BookSummary>),
        (status = 400, description = "Invalid limit", body = Error),
        (status = 503, description = "Catalogue unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["catalogue"],
    operation_id = "listBooks",
    security([])
)]
#[get("/books")]
pub async fn list_books(
    state: web::Data<HttpState>,
    params: web::Query<ListingParams>,
) -> ApiResult<web::Json<RankedList<BookSummary>>> {
    let limit = parse_limit(params.limit.as_deref(), DEFAULT_LISTING_LIMIT)?;
    Ok(web::Json(state.catalogue.list_books(limit).await?))
}
