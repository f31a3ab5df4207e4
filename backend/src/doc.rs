//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] collects every HTTP endpoint from the inbound layer together
//! with the domain schemas they exchange, and declares the bearer-token
//! security scheme used by protected endpoints. Swagger UI serves it in debug
//! builds.

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::ports::AuthenticatedSession;
use crate::domain::{
    BookSummary, DashboardView, Error, ErrorCode, FieldError, Publisher, PublisherSummary, Series,
    SeriesSummary, User,
};
use crate::inbound::http::publishers::{SavePublisherRequest, SeriesRequest};
use crate::inbound::http::users::LoginRequest;

/// Name of the bearer security scheme in the generated document.
pub const BEARER_SCHEME: &str = "BearerToken";

/// Enrich the generated document with the bearer-token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(
                Http::builder()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Token returned by POST /api/v1/login."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Longbox backend API",
        description = "Comic catalogue: sessions, publishers, ranked lists, and the dashboard.",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::users::login,
        crate::inbound::http::users::current_user,
        crate::inbound::http::publishers::save_publisher,
        crate::inbound::http::publishers::get_publisher,
        crate::inbound::http::rankings::rank_publishers,
        crate::inbound::http::rankings::rank_series,
        crate::inbound::http::rankings::rank_books,
        crate::inbound::http::rankings::list_books,
        crate::inbound::http::dashboard::dashboard,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        User,
        AuthenticatedSession,
        LoginRequest,
        Publisher,
        Series,
        FieldError,
        SavePublisherRequest,
        SeriesRequest,
        PublisherSummary,
        SeriesSummary,
        BookSummary,
        DashboardView,
    )),
    tags(
        (name = "users", description = "Login and the current user"),
        (name = "publishers", description = "Publisher aggregate writes and reads"),
        (name = "catalogue", description = "Ranked lists, listings, and the dashboard"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
