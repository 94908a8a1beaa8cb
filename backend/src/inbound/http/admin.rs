//! Admin bootstrap, login, and logout handlers.
//!
//! ```text
//! POST /api/admin/setup {"email":"admin@example.com","name":"Admin","password":"secret"}
//! POST /api/admin/login {"email":"admin@example.com","password":"secret"}
//! POST /api/admin/logout
//! ```
//!
//! Setup follows a bootstrap-or-elevate policy: the endpoint is open while
//! no admin exists, and afterwards only an authenticated admin may mint
//! further admin accounts.

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{Error, LoginCredentials, LoginValidationError, UserId};

use super::state::HttpState;
use super::users::{RegisterRequest, RegisteredResponse, create_account};
use super::{ApiResult, MessageResponse, SessionContext};

/// Login request body for `POST /api/admin/login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.email, &value.password)
    }
}

/// Response body confirming a login and naming the admin account.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub message: String,
    pub user_id: UserId,
}

/// Create an administrator account.
///
/// Open for the first admin (bootstrap); afterwards callers must hold a
/// valid admin session, closing the mint-yourself-an-admin hole an
/// unconditionally open endpoint would leave.
#[utoipa::path(
    post,
    path = "/api/admin/setup",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Admin created", body = RegisteredResponse),
        (status = 400, description = "Validation failure or duplicate email", body = super::ApiError),
        (status = 401, description = "Setup locked and no session presented", body = super::ApiError),
        (status = 403, description = "Setup locked and session is not an admin", body = super::ApiError),
        (status = 500, description = "Internal server error")
    ),
    tags = ["admin"],
    operation_id = "adminSetup"
)]
#[post("/admin/setup")]
pub async fn setup(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let has_admin = state.users.admin_exists().await.map_err(Error::from)?;
    if has_admin {
        session.require_admin(&state).await?;
    }

    let body = payload.into_inner();
    let user = create_account(
        &state,
        body.email.as_deref(),
        body.name.as_deref(),
        body.password.as_deref(),
        true,
    )
    .await?;
    Ok(HttpResponse::Created().json(RegisteredResponse {
        message: "Admin user created successfully".to_owned(),
        user_id: user.id,
    }))
}

/// Authenticate an administrator and establish a session.
///
/// Unknown email, non-admin account, and wrong password all collapse to the
/// same 401 so the endpoint does not leak which addresses exist.
#[utoipa::path(
    post,
    path = "/api/admin/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = LoginResponse,
            headers(("Set-Cookie" = String, description = "Signed admin session cookie"))),
        (status = 400, description = "Invalid request", body = super::ApiError),
        (status = 401, description = "Invalid credentials", body = super::ApiError),
        (status = 500, description = "Internal server error")
    ),
    tags = ["admin"],
    operation_id = "adminLogin",
    security([])
)]
#[post("/admin/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(map_login_validation_error)?;

    let user = state
        .users
        .find_by_email(credentials.email())
        .await
        .map_err(Error::from)?;
    let Some(user) = user.filter(|user| user.is_admin) else {
        return Err(Error::unauthorized("invalid credentials").into());
    };

    let valid = state
        .passwords
        .verify(credentials.password(), &user.password_hash)
        .await?;
    if !valid {
        return Err(Error::unauthorized("invalid credentials").into());
    }

    session.persist_admin(&user.id)?;
    Ok(HttpResponse::Ok().json(LoginResponse {
        message: "Login successful".to_owned(),
        user_id: user.id,
    }))
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::InvalidEmail => Error::invalid_request("email must be a valid address")
            .with_details(json!({ "field": "email", "code": "invalid_email" })),
        LoginValidationError::EmptyPassword => Error::invalid_request("password must not be empty")
            .with_details(json!({ "field": "password", "code": "empty_password" })),
    }
}

/// Drop the admin session.
#[utoipa::path(
    post,
    path = "/api/admin/logout",
    responses(
        (status = 200, description = "Session cleared", body = MessageResponse)
    ),
    tags = ["admin"],
    operation_id = "adminLogout"
)]
#[post("/admin/logout")]
pub async fn logout(session: SessionContext) -> ApiResult<HttpResponse> {
    session.clear();
    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Logged out".to_owned(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{login_body, memory_state, register_body, test_session_middleware};
    use actix_web::http::StatusCode;
    use actix_web::{App, test, web};
    use serde_json::Value;

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
            .wrap(test_session_middleware())
            .service(web::scope("/api").service(setup).service(login).service(logout))
    }

    async fn bootstrap_admin<S, B>(app: &S)
    where
        S: actix_web::dev::Service<
                actix_http::Request,
                Response = actix_web::dev::ServiceResponse<B>,
                Error = actix_web::Error,
            >,
        B: actix_web::body::MessageBody,
    {
        let res = test::call_service(
            app,
            test::TestRequest::post()
                .uri("/api/admin/setup")
                .set_json(register_body("admin@example.com", "Admin", "secret"))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    #[actix_web::test]
    async fn first_setup_bootstraps_an_admin() {
        let state = memory_state();
        let app = test::init_service(test_app(state.clone())).await;
        bootstrap_admin(&app).await;
        assert!(state.users.admin_exists().await.expect("query admins"));
    }

    #[actix_web::test]
    async fn second_unauthenticated_setup_is_forbidden() {
        let app = test::init_service(test_app(memory_state())).await;
        bootstrap_admin(&app).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/admin/setup")
                .set_json(register_body("intruder@example.com", "Intruder", "pw"))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn logged_in_admin_may_create_further_admins() {
        let app = test::init_service(test_app(memory_state())).await;
        bootstrap_admin(&app).await;

        let login_res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/admin/login")
                .set_json(login_body("admin@example.com", "secret"))
                .to_request(),
        )
        .await;
        assert_eq!(login_res.status(), StatusCode::OK);
        let cookie = login_res
            .response()
            .cookies()
            .find(|c| c.name() == "admin_session")
            .expect("session cookie");

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/admin/setup")
                .cookie(cookie)
                .set_json(register_body("second@example.com", "Second", "pw"))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    #[actix_web::test]
    async fn wrong_password_and_unknown_email_are_indistinguishable() {
        let app = test::init_service(test_app(memory_state())).await;
        bootstrap_admin(&app).await;

        let mut bodies = Vec::new();
        for (email, password) in [
            ("admin@example.com", "wrong-password"),
            ("nobody@example.com", "whatever"),
        ] {
            let res = test::call_service(
                &app,
                test::TestRequest::post()
                    .uri("/api/admin/login")
                    .set_json(login_body(email, password))
                    .to_request(),
            )
            .await;
            assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
            let value: Value = test::read_body_json(res).await;
            bodies.push(value["message"].clone());
        }
        assert_eq!(bodies[0], bodies[1]);
    }

    #[actix_web::test]
    async fn non_admin_cannot_log_in() {
        let state = memory_state();
        let app = test::init_service(test_app(state.clone())).await;
        bootstrap_admin(&app).await;
        crate::test_support::seed_user(&state, "user@example.com", "pw", false).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/admin/login")
                .set_json(login_body("user@example.com", "pw"))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn login_rejects_blank_credentials_with_field_details() {
        let app = test::init_service(test_app(memory_state())).await;
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/admin/login")
                .set_json(login_body("admin@example.com", ""))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let value: Value = test::read_body_json(res).await;
        assert_eq!(value["details"]["field"], "password");
    }
}
