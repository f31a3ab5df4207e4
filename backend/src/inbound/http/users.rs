//! Users API handlers.
//!
//! ```text
//! POST /api/v1/login {"email":"daryl@example.com","password":"password"}
//! GET /api/v1/users/me   (Authorization: Bearer <token>)
//! ```

use actix_web::{HttpResponse, get, http::header, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::ports::AuthenticatedSession;
use crate::domain::{Error, LoginCredentials, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::BearerSession;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::login_errors;

/// Login request body for `POST /api/v1/login`.
///
/// Example JSON:
/// `{"email":"daryl@example.com","password":"password"}`
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = Error;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        let errors = Self::validate_parts(&value.email, &value.password);
        if !errors.is_empty() {
            return Err(login_errors(errors));
        }
        Self::try_from_parts(&value.email, &value.password)
            .map_err(|error| login_errors(vec![error]))
    }
}

/// Authenticate a user and mint a bearer token.
///
/// Unknown emails and wrong passwords both answer 401 with the same message.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = AuthenticatedSession),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 503, description = "Credential store unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials = LoginCredentials::try_from(payload.into_inner())?;
    let session = state.login.authenticate(&credentials).await?;
    Ok(HttpResponse::Ok()
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .json(session))
}

/// Return the user the bearer token belongs to.
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "Current user", body = User),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Credential store unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "currentUser"
)]
#[get("/users/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    session: BearerSession,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let user = state.users.current_user(&user_id).await?;
    Ok(HttpResponse::Ok()
        .insert_header(("Cache-Control", "private, no-cache, must-revalidate"))
        .json(user))
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::{MockLoginService, MockUsersQuery};
    use crate::domain::{INVALID_CREDENTIALS, UserId};
    use crate::inbound::http::test_utils::{HttpStateBuilder, bearer_for, test_signer};
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use rstest::rstest;
    use serde_json::{Value, json};

    const USER_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

    fn daryl() -> User {
        User::try_from_strings(USER_ID, "Daryl", "daryl@example.com").expect("fixture user")
    }

    fn test_app(
        state: HttpState,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(web::Data::new(state))
            .service(web::scope("/api/v1").service(login).service(current_user))
    }

    async fn post_login(state: HttpState, body: Value) -> (StatusCode, Value) {
        let app = actix_test::init_service(test_app(state)).await;
        let request = actix_test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(body)
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        let status = response.status();
        let value = actix_test::read_body_json(response).await;
        (status, value)
    }

    #[actix_web::test]
    async fn login_returns_user_and_token() {
        let mut login_service = MockLoginService::new();
        login_service
            .expect_authenticate()
            .withf(|creds| creds.email() == "daryl@example.com" && creds.password() == "password")
            .times(1)
            .returning(|_| {
                Ok(AuthenticatedSession {
                    user: daryl(),
                    token: "signed".to_owned(),
                })
            });
        let state = HttpStateBuilder::new().login(login_service).build();

        let (status, body) = post_login(
            state,
            json!({ "email": " daryl@example.com ", "password": "password" }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["token"], "signed");
        assert_eq!(body["user"]["name"], "Daryl");
        assert_eq!(body["user"]["email"], "daryl@example.com");
        assert_eq!(body["user"]["id"], USER_ID);
    }

    #[rstest]
    #[case(json!({ "email": "   ", "password": "password" }), vec!["email"])]
    #[case(json!({ "email": "daryl@example.com", "password": "" }), vec!["password"])]
    #[case(json!({ "email": "", "password": "" }), vec!["email", "password"])]
    #[case(json!({}), vec!["email", "password"])]
    #[actix_web::test]
    async fn login_rejects_blank_fields(#[case] body: Value, #[case] fields: Vec<&str>) {
        let state = HttpStateBuilder::new().build();
        let (status, value) = post_login(state, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(value["code"], "invalid_request");
        let reported: Vec<&str> = value["details"]["fields"]
            .as_array()
            .expect("fields")
            .iter()
            .filter_map(|entry| entry["field"].as_str())
            .collect();
        assert_eq!(reported, fields);
    }

    #[actix_web::test]
    async fn login_passes_through_invalid_credentials() {
        let mut login_service = MockLoginService::new();
        login_service
            .expect_authenticate()
            .returning(|_| Err(Error::unauthorized(INVALID_CREDENTIALS)));
        let state = HttpStateBuilder::new().login(login_service).build();

        let (status, body) = post_login(
            state,
            json!({ "email": "nobody@example.com", "password": "password" }),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "unauthorized");
        assert_eq!(body["message"], INVALID_CREDENTIALS);
    }

    #[actix_web::test]
    async fn current_user_resolves_the_token_subject() {
        let user_id = UserId::new(USER_ID).expect("user id");
        let expected = user_id.clone();
        let mut users = MockUsersQuery::new();
        users
            .expect_current_user()
            .withf(move |id| *id == expected)
            .times(1)
            .returning(|_| Ok(daryl()));
        let state = HttpStateBuilder::new().users(users).build();
        let app = actix_test::init_service(test_app(state)).await;

        let request = actix_test::TestRequest::get()
            .uri("/api/v1/users/me")
            .insert_header(("Authorization", bearer_for(&user_id)))
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["name"], "Daryl");
    }

    #[actix_web::test]
    async fn current_user_requires_a_token() {
        let state = HttpStateBuilder::new().build();
        let app = actix_test::init_service(test_app(state)).await;
        let request = actix_test::TestRequest::get()
            .uri("/api/v1/users/me")
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn current_user_rejects_tokens_from_another_secret() {
        let other = crate::domain::TokenSigner::new(
            b"a-completely-different-secret-value",
            3600,
            std::sync::Arc::new(mockable::DefaultClock),
        )
        .expect("signer");
        let token = other.sign(&UserId::random()).expect("sign");
        assert!(test_signer().verify(&token).is_err());

        let state = HttpStateBuilder::new().build();
        let app = actix_test::init_service(test_app(state)).await;
        let request = actix_test::TestRequest::get()
            .uri("/api/v1/users/me")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
