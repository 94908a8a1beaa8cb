//! OpenAPI documentation assembly.

use utoipa::OpenApi;

use crate::domain::{
    Category, Error, ErrorCode, Feedback, FeedbackId, FeedbackStatus, Rating, UserId,
};
use crate::inbound::http::admin::{LoginRequest, LoginResponse};
use crate::inbound::http::error::ApiError;
use crate::inbound::http::feedback::{SubmitFeedbackRequest, SubmittedResponse, UpdateFeedbackRequest};
use crate::inbound::http::users::{RegisterRequest, RegisteredResponse};
use crate::inbound::http::MessageResponse;

/// Aggregated OpenAPI document for the JSON API.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::admin::setup,
        crate::inbound::http::admin::login,
        crate::inbound::http::admin::logout,
        crate::inbound::http::feedback::submit,
        crate::inbound::http::feedback::list,
        crate::inbound::http::feedback::update,
        crate::inbound::http::feedback::remove,
        crate::inbound::http::health::live,
        crate::inbound::http::health::ready,
    ),
    components(schemas(
        ApiError,
        Category,
        Error,
        ErrorCode,
        Feedback,
        FeedbackId,
        FeedbackStatus,
        LoginRequest,
        LoginResponse,
        MessageResponse,
        Rating,
        RegisterRequest,
        RegisteredResponse,
        SubmitFeedbackRequest,
        SubmittedResponse,
        UpdateFeedbackRequest,
        UserId,
    )),
    tags(
        (name = "users", description = "Public registration"),
        (name = "admin", description = "Administrator bootstrap and sessions"),
        (name = "feedback", description = "Feedback lifecycle"),
        (name = "health", description = "Probes"),
    )
)]
pub struct ApiDoc;
