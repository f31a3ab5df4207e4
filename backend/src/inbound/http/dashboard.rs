//! Dashboard handler.
//!
//! ```text
//! GET /api/v1/dashboard
//! ```

use actix_web::{HttpResponse, get, web};

use crate::domain::DashboardView;
use crate::inbound::http::state::HttpState;

/// Four catalogue panels, each either ready or failed.
///
/// Always answers 200; a failed query only marks its own panel.
#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    responses(
        (status = 200, description = "Settled dashboard panels", body = DashboardView)
    ),
    tags = ["catalogue"],
    operation_id = "dashboard",
    security([])
)]
#[get("/dashboard")]
pub async fn dashboard(state: web::Data<HttpState>) -> HttpResponse {
    let view = state.dashboard.load().await;
    HttpResponse::Ok()
        .insert_header(("Cache-Control", "no-cache"))
        .json(view)
}
