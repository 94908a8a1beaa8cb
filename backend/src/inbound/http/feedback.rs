//! Feedback API handlers.
//!
//! ```text
//! POST   /api/feedback          submit a rated comment
//! GET    /api/feedback          list, optionally filtered by category/status
//! PUT    /api/feedback/{id}     change status and/or attach a response
//! DELETE /api/feedback/{id}     remove an entry permanently
//! ```
//!
//! Reads are public; mutations require a verified administrator session.
//! New entries always start with status `open` and no response.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::PersistenceError;
use crate::domain::{
    Category, Error, Feedback, FeedbackFilter, FeedbackId, FeedbackPatch, FeedbackStatus,
    NewFeedback, Rating, UserId,
};

use super::state::HttpState;
use super::validation::{FieldName, invalid_field_error, missing_field_error, require_text};
use super::{ApiResult, MessageResponse, SessionContext};

/// Submission request body for `POST /api/feedback`.
///
/// `category` falls back to `general` when absent or unrecognised; every
/// other field is required. Fields are optional at the serde layer so
/// absences surface as field-annotated validation errors.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitFeedbackRequest {
    pub user_id: Option<String>,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
    pub rating: Option<i64>,
    pub comment: Option<String>,
    pub category: Option<String>,
}

/// Response body carrying the id of a newly created feedback entry.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedResponse {
    pub message: String,
    pub feedback_id: FeedbackId,
}

/// Query parameters accepted by `GET /api/feedback`.
///
/// The literal `all` (and the empty string) is a no-filter sentinel for
/// `category` and `status`, stripped before the store sees the filter.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ListFeedbackQuery {
    pub category: Option<String>,
    pub status: Option<String>,
    pub limit: Option<usize>,
}

/// Update request body for `PUT /api/feedback/{id}`.
///
/// Partial update semantics: omitted fields are untouched; an explicit empty
/// `adminResponse` clears the stored response.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFeedbackRequest {
    pub status: Option<String>,
    pub admin_response: Option<String>,
}

fn parse_filter(query: ListFeedbackQuery) -> Result<FeedbackFilter, Error> {
    let category = match strip_sentinel(query.category.as_deref()) {
        Some(raw) => Some(
            raw.parse::<Category>()
                .map_err(|err| invalid_field_error(FieldName::new("category"), err.to_string()))?,
        ),
        None => None,
    };
    let status = match strip_sentinel(query.status.as_deref()) {
        Some(raw) => Some(
            raw.parse::<FeedbackStatus>()
                .map_err(|err| invalid_field_error(FieldName::new("status"), err.to_string()))?,
        ),
        None => None,
    };
    Ok(FeedbackFilter {
        category,
        status,
        limit: query.limit,
    })
}

fn strip_sentinel(raw: Option<&str>) -> Option<&str> {
    raw.filter(|value| !value.is_empty() && *value != "all")
}

fn parse_id(raw: &str) -> Result<FeedbackId, Error> {
    FeedbackId::new(raw).map_err(|err| invalid_field_error(FieldName::new("id"), err.to_string()))
}

/// Map a repository miss on a known-id operation to a 404.
fn map_update_error(err: PersistenceError) -> Error {
    match err {
        PersistenceError::NotFound => Error::not_found("feedback entry not found"),
        other => other.into(),
    }
}

/// Submit a feedback entry.
#[utoipa::path(
    post,
    path = "/api/feedback",
    request_body = SubmitFeedbackRequest,
    responses(
        (status = 201, description = "Feedback created", body = SubmittedResponse),
        (status = 400, description = "Missing or out-of-range fields", body = super::ApiError),
        (status = 500, description = "Internal server error")
    ),
    tags = ["feedback"],
    operation_id = "submitFeedback"
)]
#[post("/feedback")]
pub async fn submit(
    state: web::Data<HttpState>,
    payload: web::Json<SubmitFeedbackRequest>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();

    let user_id = require_text(body.user_id.as_deref(), FieldName::new("userId"))?;
    let user_id = UserId::new(user_id.trim())
        .map_err(|err| invalid_field_error(FieldName::new("userId"), err.to_string()))?;
    let user_name = require_text(body.user_name.as_deref(), FieldName::new("userName"))?;
    let user_email = require_text(body.user_email.as_deref(), FieldName::new("userEmail"))?;
    let rating = body
        .rating
        .ok_or_else(|| missing_field_error(FieldName::new("rating")))?;
    let rating = Rating::new(rating)
        .map_err(|err| invalid_field_error(FieldName::new("rating"), err.to_string()))?;
    let comment = require_text(body.comment.as_deref(), FieldName::new("comment"))?;
    let category = Category::parse_lenient(body.category.as_deref());

    let feedback = NewFeedback::new(user_id, user_name, user_email, rating, comment, category)
        .map_err(|err| Error::invalid_request(err.to_string()))?;
    let created = state.feedback.insert(feedback).await.map_err(Error::from)?;

    Ok(HttpResponse::Created().json(SubmittedResponse {
        message: "Feedback submitted successfully".to_owned(),
        feedback_id: created.id,
    }))
}

/// List feedback entries, newest first.
#[utoipa::path(
    get,
    path = "/api/feedback",
    params(ListFeedbackQuery),
    responses(
        (status = 200, description = "Matching feedback entries", body = [Feedback]),
        (status = 400, description = "Unknown filter value", body = super::ApiError),
        (status = 500, description = "Internal server error")
    ),
    tags = ["feedback"],
    operation_id = "listFeedback"
)]
#[get("/feedback")]
pub async fn list(
    state: web::Data<HttpState>,
    query: web::Query<ListFeedbackQuery>,
) -> ApiResult<web::Json<Vec<Feedback>>> {
    let filter = parse_filter(query.into_inner())?;
    let entries = state.feedback.find(&filter).await.map_err(Error::from)?;
    Ok(web::Json(entries))
}

/// Change status and/or attach an administrator response.
#[utoipa::path(
    put,
    path = "/api/feedback/{id}",
    params(("id" = String, Path, description = "Feedback identifier")),
    request_body = UpdateFeedbackRequest,
    responses(
        (status = 200, description = "Feedback updated", body = MessageResponse),
        (status = 400, description = "Unknown status or empty update", body = super::ApiError),
        (status = 401, description = "No admin session", body = super::ApiError),
        (status = 403, description = "Session is not an admin", body = super::ApiError),
        (status = 404, description = "Unknown feedback id", body = super::ApiError),
        (status = 500, description = "Internal server error")
    ),
    tags = ["feedback"],
    operation_id = "updateFeedback"
)]
#[put("/feedback/{id}")]
pub async fn update(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UpdateFeedbackRequest>,
) -> ApiResult<HttpResponse> {
    session.require_admin(&state).await?;

    let id = parse_id(&path.into_inner())?;
    let body = payload.into_inner();
    let status = match body.status.as_deref() {
        Some(raw) => Some(
            raw.parse::<FeedbackStatus>()
                .map_err(|err| invalid_field_error(FieldName::new("status"), err.to_string()))?,
        ),
        None => None,
    };
    let patch = FeedbackPatch::new(status, body.admin_response)
        .map_err(|err| Error::invalid_request(err.to_string()))?;

    state
        .feedback
        .update(&id, &patch)
        .await
        .map_err(map_update_error)?;
    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Feedback updated successfully".to_owned(),
    }))
}

/// Remove a feedback entry permanently.
#[utoipa::path(
    delete,
    path = "/api/feedback/{id}",
    params(("id" = String, Path, description = "Feedback identifier")),
    responses(
        (status = 200, description = "Feedback deleted", body = MessageResponse),
        (status = 401, description = "No admin session", body = super::ApiError),
        (status = 403, description = "Session is not an admin", body = super::ApiError),
        (status = 404, description = "Unknown feedback id", body = super::ApiError),
        (status = 500, description = "Internal server error")
    ),
    tags = ["feedback"],
    operation_id = "deleteFeedback"
)]
#[delete("/feedback/{id}")]
pub async fn remove(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    session.require_admin(&state).await?;

    let id = parse_id(&path.into_inner())?;
    state
        .feedback
        .delete(&id)
        .await
        .map_err(map_update_error)?;
    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Feedback deleted successfully".to_owned(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{feedback_body, memory_state, test_session_middleware};
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
            .service(
                web::scope("/api")
                    .service(submit)
                    .service(list)
                    .service(update)
                    .service(remove),
            )
    }

    #[actix_web::test]
    async fn submission_starts_open_with_no_response() {
        let state = memory_state();
        let app = test::init_service(test_app(state.clone())).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/feedback")
                .set_json(feedback_body("u-1", "Alice", 4, "works well", Some("bug")))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let value: Value = test::read_body_json(res).await;
        assert_eq!(value["message"], "Feedback submitted successfully");
        let id = value["feedbackId"].as_str().expect("feedback id");

        let stored = state
            .feedback
            .find_by_id(&FeedbackId::new(id).expect("valid id"))
            .await
            .expect("lookup succeeds")
            .expect("entry stored");
        assert_eq!(stored.status, FeedbackStatus::Open);
        assert_eq!(stored.admin_response, None);
        assert_eq!(stored.category, Category::Bug);
    }

    #[rstest]
    #[case(0)]
    #[case(6)]
    #[actix_web::test]
    async fn out_of_range_ratings_are_rejected(#[case] rating: i64) {
        let app = test::init_service(test_app(memory_state())).await;
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/feedback")
                .set_json(feedback_body("u-1", "Alice", rating, "hello", None))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let value: Value = test::read_body_json(res).await;
        assert_eq!(value["details"]["field"], "rating");
    }

    #[actix_web::test]
    async fn blank_comment_is_rejected() {
        let app = test::init_service(test_app(memory_state())).await;
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/feedback")
                .set_json(feedback_body("u-1", "Alice", 3, "   ", None))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let value: Value = test::read_body_json(res).await;
        assert_eq!(value["details"]["field"], "comment");
    }

    #[actix_web::test]
    async fn unrecognised_category_defaults_to_general() {
        let state = memory_state();
        let app = test::init_service(test_app(state.clone())).await;
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/feedback")
                .set_json(feedback_body("u-1", "Alice", 3, "hello", Some("nonsense")))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let entries = state
            .feedback
            .find(&FeedbackFilter::default())
            .await
            .expect("query succeeds");
        assert_eq!(entries[0].category, Category::General);
    }

    #[actix_web::test]
    async fn status_all_sentinel_is_stripped() {
        let app = test::init_service(test_app(memory_state())).await;
        for comment in ["one", "two"] {
            let res = test::call_service(
                &app,
                test::TestRequest::post()
                    .uri("/api/feedback")
                    .set_json(feedback_body("u-1", "Alice", 3, comment, None))
                    .to_request(),
            )
            .await;
            assert_eq!(res.status(), StatusCode::CREATED);
        }

        for uri in ["/api/feedback?status=all", "/api/feedback"] {
            let res =
                test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
            assert_eq!(res.status(), StatusCode::OK);
            let entries: Vec<Value> = test::read_body_json(res).await;
            assert_eq!(entries.len(), 2, "{uri} must not filter");
        }
    }

    #[actix_web::test]
    async fn unknown_status_filter_is_rejected() {
        let app = test::init_service(test_app(memory_state())).await;
        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/feedback?status=pending")
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let value: Value = test::read_body_json(res).await;
        assert_eq!(value["details"]["field"], "status");
    }

    #[actix_web::test]
    async fn list_is_newest_first_and_limit_truncates() {
        let state = memory_state();
        let app = test::init_service(test_app(state)).await;
        for comment in ["first", "second", "third"] {
            let res = test::call_service(
                &app,
                test::TestRequest::post()
                    .uri("/api/feedback")
                    .set_json(feedback_body("u-1", "Alice", 3, comment, None))
                    .to_request(),
            )
            .await;
            assert_eq!(res.status(), StatusCode::CREATED);
        }

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/feedback?limit=2")
                .to_request(),
        )
        .await;
        let entries: Vec<Value> = test::read_body_json(res).await;
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["comment"], "third");
        assert_eq!(entries[1]["comment"], "second");
    }

    #[actix_web::test]
    async fn mutations_require_an_admin_session() {
        let app = test::init_service(test_app(memory_state())).await;

        let res = test::call_service(
            &app,
            test::TestRequest::put()
                .uri("/api/feedback/some-id")
                .set_json(UpdateFeedbackRequest {
                    status: Some("reviewed".to_owned()),
                    admin_response: None,
                })
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let res = test::call_service(
            &app,
            test::TestRequest::delete()
                .uri("/api/feedback/some-id")
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
