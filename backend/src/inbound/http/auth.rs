//! Bearer-token extraction for HTTP handlers.
//!
//! Keep the HTTP modules focused on request/response mapping by concentrating
//! token parsing and user identity derivation here. A bad or expired token is
//! treated exactly like a missing one; handlers decide whether that matters.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::{Ready, ready};
use tracing::warn;

use crate::domain::{Error, TokenSigner, UserId};

use super::state::HttpState;

const BEARER_PREFIX: &str = "Bearer ";

/// Message returned when a protected endpoint has no verified caller.
pub const UNAUTHORIZED: &str = "Unauthorized";

/// Identity carried by the request's `Authorization: Bearer` header, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BearerSession(Option<UserId>);

impl BearerSession {
    /// Construct a session around an optional verified user id.
    pub fn new(user_id: Option<UserId>) -> Self {
        Self(user_id)
    }

    /// Require an authenticated user id or return `401 Unauthorized`.
    pub fn require_user_id(&self) -> Result<UserId, Error> {
        self.0
            .clone()
            .ok_or_else(|| Error::unauthorized(UNAUTHORIZED))
    }
}

fn bearer_token(req: &HttpRequest) -> Option<&str> {
    let value = req.headers().get(AUTHORIZATION)?;
    let Ok(value) = value.to_str() else {
        warn!("authorization header is not valid ASCII");
        return None;
    };
    match value.strip_prefix(BEARER_PREFIX) {
        Some(token) if !token.trim().is_empty() => Some(token.trim()),
        _ => {
            warn!("authorization header is not a bearer token");
            None
        }
    }
}

fn resolve(req: &HttpRequest, signer: &TokenSigner) -> BearerSession {
    let Some(token) = bearer_token(req) else {
        return BearerSession::new(None);
    };
    match signer.verify(token) {
        Ok(user_id) => BearerSession::new(Some(user_id)),
        Err(error) => {
            warn!(error = %error, "rejected bearer token");
            BearerSession::new(None)
        }
    }
}

impl FromRequest for BearerSession {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = match req.app_data::<web::Data<HttpState>>() {
            Some(state) => Ok(resolve(req, &state.tokens)),
            None => Err(Error::internal("HTTP state is not configured").into()),
        };
        ready(result)
    }
}
