//! Publisher API handlers.
//!
//! ```text
//! POST /api/v1/publishers {"name":"Image","series":[{"name":"Saga"}]}
//! GET /api/v1/publishers/{id}
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    Error, Publisher, PublisherId, PublisherInput, SavePublisherOutcome, SeriesInput,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::BearerSession;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, field_errors, invalid_uuid_index_error, parse_json_body, parse_optional_uuid,
    parse_uuid,
};

const PUBLISHER_ID: FieldName = FieldName::new("id");
const SERIES_ID: FieldName = FieldName::new("series.id");

/// Series entry of a save request. Omit `id` to create a new series.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SeriesRequest {
    #[schema(format = "uuid")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
}

/// Request body for `POST /api/v1/publishers`.
///
/// Omit `id` to create a publisher. With an `id`, the listed series replace
/// the stored ones.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SavePublisherRequest {
    #[schema(format = "uuid")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    pub series: Option<Vec<SeriesRequest>>,
}

impl TryFrom<SavePublisherRequest> for PublisherInput {
    type Error = Error;

    fn try_from(value: SavePublisherRequest) -> Result<Self, Self::Error> {
        let id = parse_optional_uuid(value.id.as_deref(), PUBLISHER_ID)?;
        let series = value
            .series
            .map(|entries| {
                entries
                    .into_iter()
                    .enumerate()
                    .map(|(index, entry)| {
                        let id = match entry.id.as_deref() {
                            Some(raw) => Some(uuid::Uuid::parse_str(raw).map_err(|_| {
                                invalid_uuid_index_error(SERIES_ID, index, raw)
                            })?),
                            None => None,
                        };
                        Ok(SeriesInput {
                            id,
                            name: entry.name,
                        })
                    })
                    .collect::<Result<Vec<_>, Error>>()
            })
            .transpose()?;
        Ok(Self {
            id,
            name: value.name,
            series,
        })
    }
}

/// Create or update a publisher and its series.
///
/// Requires a bearer token, checked before the body is decoded. Every
/// field-level failure is listed in `details.fields`.
#[utoipa::path(
    post,
    path = "/api/v1/publishers",
    request_body = SavePublisherRequest,
    responses(
        (status = 200, description = "Publisher updated", body = Publisher),
        (status = 201, description = "Publisher created", body = Publisher),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Publisher or series not found", body = Error),
        (status = 503, description = "Catalogue unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["publishers"],
    operation_id = "savePublisher"
)]
#[post("/publishers")]
pub async fn save_publisher(
    state: web::Data<HttpState>,
    session: BearerSession,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let acting_user = session.require_user_id()?;
    let request: SavePublisherRequest = parse_json_body(&body)?;
    let input = PublisherInput::try_from(request)?;
    let creating = input.id.is_none();
    match state.publishers.save(input, Some(acting_user)).await? {
        SavePublisherOutcome::Saved(publisher) => {
            let mut response = if creating {
                HttpResponse::Created()
            } else {
                HttpResponse::Ok()
            };
            Ok(response.json(publisher))
        }
        SavePublisherOutcome::Invalid(errors) => {
            Err(field_errors("publisher failed validation", &errors))
        }
    }
}

/// Fetch a publisher with its ordered series.
#[utoipa::path(
    get,
    path = "/api/v1/publishers/{id}",
    params(("id" = String, Path, description = "Publisher id", format = "uuid")),
    responses(
        (status = 200, description = "Publisher", body = Publisher),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 503, description = "Catalogue unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["publishers"],
    operation_id = "getPublisher",
    security([])
)]
#[get("/publishers/{id}")]
pub async fn get_publisher(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Publisher>> {
    let id = PublisherId::from(parse_uuid(&path.into_inner(), PUBLISHER_ID)?);
    let publisher = state.publishers_query.find(&id).await?;
    Ok(web::Json(publisher))
}
