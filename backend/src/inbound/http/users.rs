//! User registration handler.
//!
//! ```text
//! POST /api/users/register {"email":"ada@example.com","name":"Ada","password":"secret"}
//! ```
//!
//! Registration is also exercised by the public submission page, which
//! creates a user record before posting feedback and tolerates failure with
//! a client-generated fallback id.

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::ports::PersistenceError;
use crate::domain::{EmailAddress, Error, NewUser, User, UserId};

use super::ApiResult;
use super::state::HttpState;
use super::validation::{FieldName, invalid_field_error, require_text};

/// Registration request body for `POST /api/users/register`.
///
/// Fields are optional at the serde layer so absences surface as
/// field-annotated validation errors rather than deserialisation failures.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
}

/// Response body carrying the id of a newly created account.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredResponse {
    pub message: String,
    pub user_id: UserId,
}

/// Validate an account payload and insert it through the user repository.
///
/// Shared by public registration and admin setup; the only difference
/// between the two is the admin flag. Duplicate emails map to a distinct
/// conflict error so clients can tell "taken" apart from "malformed".
pub(crate) async fn create_account(
    state: &HttpState,
    email: Option<&str>,
    name: Option<&str>,
    password: Option<&str>,
    is_admin: bool,
) -> Result<User, Error> {
    let email = require_text(email, FieldName::new("email"))?;
    let name = require_text(name, FieldName::new("name"))?;
    let password = require_text(password, FieldName::new("password"))?;

    let email = EmailAddress::new(email)
        .map_err(|err| invalid_field_error(FieldName::new("email"), err.to_string()))?;
    let password_hash = state.passwords.hash(password).await?;
    let user = NewUser::new(email, name, password_hash, is_admin)
        .map_err(|err| invalid_field_error(FieldName::new("name"), err.to_string()))?;

    match state.users.insert(user).await {
        Ok(user) => Ok(user),
        Err(PersistenceError::Conflict { .. }) => Err(Error::conflict(
            "email is already registered",
        )
        .with_details(json!({ "field": "email" }))),
        Err(err) => Err(err.into()),
    }
}

/// Register a feedback-submitting user account.
#[utoipa::path(
    post,
    path = "/api/users/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created", body = RegisteredResponse),
        (status = 400, description = "Validation failure or duplicate email", body = super::ApiError),
        (status = 500, description = "Internal server error")
    ),
    tags = ["users"],
    operation_id = "registerUser"
)]
#[post("/users/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let user = create_account(
        &state,
        body.email.as_deref(),
        body.name.as_deref(),
        body.password.as_deref(),
        false,
    )
    .await?;
    Ok(HttpResponse::Created().json(RegisteredResponse {
        message: "User registered successfully".to_owned(),
        user_id: user.id,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{memory_state, register_body, test_session_middleware};
    use actix_web::http::StatusCode;
    use actix_web::{App, test, web};
    use rstest::rstest;
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
            .service(web::scope("/api").service(register))
    }

    #[actix_web::test]
    async fn registration_returns_the_new_user_id() {
        let state = memory_state();
        let app = test::init_service(test_app(state.clone())).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/users/register")
                .set_json(register_body("Ada@Example.com", "Ada", "pw"))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let value: Value = test::read_body_json(res).await;
        assert_eq!(value["message"], "User registered successfully");
        let user_id = value["userId"].as_str().expect("user id present");

        // The email is normalised before the write.
        let stored = state
            .users
            .find_by_id(&UserId::new(user_id).expect("valid id"))
            .await
            .expect("lookup succeeds")
            .expect("user stored");
        assert_eq!(stored.email.as_str(), "ada@example.com");
        assert!(!stored.is_admin);
    }

    #[actix_web::test]
    async fn duplicate_email_is_a_conflict() {
        let app = test::init_service(test_app(memory_state())).await;

        for expected_code in ["created", "conflict"] {
            let res = test::call_service(
                &app,
                test::TestRequest::post()
                    .uri("/api/users/register")
                    .set_json(register_body("dup@example.com", "Dup", "pw"))
                    .to_request(),
            )
            .await;
            if expected_code == "created" {
                assert_eq!(res.status(), StatusCode::CREATED);
            } else {
                assert_eq!(res.status(), StatusCode::BAD_REQUEST);
                let value: Value = test::read_body_json(res).await;
                assert_eq!(value["code"], "conflict");
                assert_eq!(value["details"]["field"], "email");
            }
        }
    }

    #[rstest]
    #[case(None, Some("Ada"), Some("pw"), "email")]
    #[case(Some("ada@example.com"), None, Some("pw"), "name")]
    #[case(Some("ada@example.com"), Some("Ada"), None, "password")]
    #[actix_web::test]
    async fn missing_fields_are_annotated(
        #[case] email: Option<&str>,
        #[case] name: Option<&str>,
        #[case] password: Option<&str>,
        #[case] field: &str,
    ) {
        let app = test::init_service(test_app(memory_state())).await;
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/users/register")
                .set_json(RegisterRequest {
                    email: email.map(str::to_owned),
                    name: name.map(str::to_owned),
                    password: password.map(str::to_owned),
                })
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let value: Value = test::read_body_json(res).await;
        assert_eq!(value["code"], "invalid_request");
        assert_eq!(value["details"]["field"], field);
    }

    #[actix_web::test]
    async fn malformed_email_is_invalid_not_conflict() {
        let app = test::init_service(test_app(memory_state())).await;
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/users/register")
                .set_json(register_body("not-an-address", "Ada", "pw"))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let value: Value = test::read_body_json(res).await;
        assert_eq!(value["code"], "invalid_request");
        assert_eq!(value["details"]["field"], "email");
    }
}
