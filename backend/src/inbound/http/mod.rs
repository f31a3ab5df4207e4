//! HTTP inbound adapter exposing REST endpoints.

pub mod auth;
pub mod dashboard;
pub mod error;
pub mod health;
pub mod publishers;
pub mod rankings;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod token_config;
pub mod users;
pub mod validation;

pub use error::ApiResult;

use actix_web::web;

/// Register every `/api/v1` endpoint on `cfg`.
///
/// The ranked routes are registered ahead of `/publishers/{id}` so the
/// literal `ranked` segment never reaches the id parser. JSON bodies that fail
/// to decode answer with the usual `invalid_request` error document.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(validation::json_payload_error))
        .service(users::login)
        .service(users::current_user)
        .service(rankings::rank_publishers)
        .service(rankings::rank_series)
        .service(rankings::rank_books)
        .service(rankings::list_books)
        .service(publishers::save_publisher)
        .service(publishers::get_publisher)
        .service(dashboard::dashboard);
}
