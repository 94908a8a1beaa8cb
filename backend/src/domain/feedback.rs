//! Feedback record model and lifecycle values.
//!
//! A feedback entry is created through the public submission flow with
//! status [`FeedbackStatus::Open`] and no administrator response, then
//! mutated from the dashboard: status transitions and response text. The
//! status enum is flat; any state is reachable from any other.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::user::UserId;

/// Validation errors returned by the feedback value constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedbackValidationError {
    EmptyId,
    RatingOutOfRange { value: i64 },
    EmptyComment,
    EmptyUserName,
    EmptyUserEmail,
    UnknownCategory,
    UnknownStatus,
    EmptyPatch,
}

impl fmt::Display for FeedbackValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "feedback id must not be empty"),
            Self::RatingOutOfRange { value } => {
                write!(f, "rating must be between 1 and 5, got {value}")
            }
            Self::EmptyComment => write!(f, "comment must not be empty"),
            Self::EmptyUserName => write!(f, "user name must not be empty"),
            Self::EmptyUserEmail => write!(f, "user email must not be empty"),
            Self::UnknownCategory => write!(f, "unknown feedback category"),
            Self::UnknownStatus => write!(f, "unknown feedback status"),
            Self::EmptyPatch => write!(f, "update must change at least one field"),
        }
    }
}

impl std::error::Error for FeedbackValidationError {}

/// Opaque feedback identifier assigned by the store on insert.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(try_from = "String", into = "String")]
pub struct FeedbackId(String);

impl FeedbackId {
    /// Validate and construct a [`FeedbackId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, FeedbackValidationError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    fn from_owned(id: String) -> Result<Self, FeedbackValidationError> {
        if id.trim().is_empty() || id.trim() != id {
            return Err(FeedbackValidationError::EmptyId);
        }
        Ok(Self(id))
    }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for FeedbackId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for FeedbackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<FeedbackId> for String {
    fn from(value: FeedbackId) -> Self {
        value.0
    }
}

impl TryFrom<String> for FeedbackId {
    type Error = FeedbackValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Star rating in the inclusive range 1–5.
///
/// # Examples
/// ```
/// use backend::domain::Rating;
///
/// assert!(Rating::new(5).is_ok());
/// assert!(Rating::new(0).is_err());
/// assert!(Rating::new(6).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "i64", into = "i64")]
pub struct Rating(u8);

impl Rating {
    /// Validate a raw rating value.
    pub fn new(value: i64) -> Result<Self, FeedbackValidationError> {
        if !(1..=5).contains(&value) {
            return Err(FeedbackValidationError::RatingOutOfRange { value });
        }
        Ok(Self(value as u8))
    }

    /// The underlying value, guaranteed to be within 1–5.
    pub fn value(self) -> u8 {
        self.0
    }
}

impl From<Rating> for i64 {
    fn from(value: Rating) -> Self {
        i64::from(value.0)
    }
}

impl TryFrom<i64> for Rating {
    type Error = FeedbackValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Feedback category chosen by the submitter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    General,
    Feature,
    Bug,
    Ui,
    Performance,
}

impl Category {
    /// Parse a submission-time category, falling back to [`Category::General`]
    /// when the value is absent or unrecognised.
    pub fn parse_lenient(raw: Option<&str>) -> Self {
        raw.and_then(|value| value.parse().ok()).unwrap_or_default()
    }

    /// Wire representation of the category.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Feature => "feature",
            Self::Bug => "bug",
            Self::Ui => "ui",
            Self::Performance => "performance",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = FeedbackValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "general" => Ok(Self::General),
            "feature" => Ok(Self::Feature),
            "bug" => Ok(Self::Bug),
            "ui" => Ok(Self::Ui),
            "performance" => Ok(Self::Performance),
            _ => Err(FeedbackValidationError::UnknownCategory),
        }
    }
}

/// Review status of a feedback entry.
///
/// `Open` is the documented initial state; `Closed` is a soft terminal state
/// (the record stays queryable). Physical deletion is a separate operation,
/// not a status.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackStatus {
    #[default]
    Open,
    Reviewed,
    Closed,
}

impl FeedbackStatus {
    /// Wire representation of the status.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Reviewed => "reviewed",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for FeedbackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeedbackStatus {
    type Err = FeedbackValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(Self::Open),
            "reviewed" => Ok(Self::Reviewed),
            "closed" => Ok(Self::Closed),
            _ => Err(FeedbackValidationError::UnknownStatus),
        }
    }
}

/// Stored feedback record as returned by queries.
///
/// `user_name` and `user_email` are denormalised copies captured at
/// submission time; they are not re-synced if the user record changes later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub id: FeedbackId,
    pub user_id: UserId,
    pub user_name: String,
    pub user_email: String,
    pub rating: Rating,
    pub comment: String,
    pub category: Category,
    pub status: FeedbackStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_response: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to insert a feedback record.
///
/// The status is always [`FeedbackStatus::Open`] and the response empty on
/// insert; neither is a caller choice.
#[derive(Debug, Clone, PartialEq)]
pub struct NewFeedback {
    user_id: UserId,
    user_name: String,
    user_email: String,
    rating: Rating,
    comment: String,
    category: Category,
}

impl NewFeedback {
    /// Validate and assemble an insertable feedback record.
    pub fn new(
        user_id: UserId,
        user_name: &str,
        user_email: &str,
        rating: Rating,
        comment: &str,
        category: Category,
    ) -> Result<Self, FeedbackValidationError> {
        let user_name = user_name.trim();
        if user_name.is_empty() {
            return Err(FeedbackValidationError::EmptyUserName);
        }
        let user_email = user_email.trim();
        if user_email.is_empty() {
            return Err(FeedbackValidationError::EmptyUserEmail);
        }
        let comment = comment.trim();
        if comment.is_empty() {
            return Err(FeedbackValidationError::EmptyComment);
        }
        Ok(Self {
            user_id,
            user_name: user_name.to_owned(),
            user_email: user_email.to_owned(),
            rating,
            comment: comment.to_owned(),
            category,
        })
    }

    /// Soft reference to the submitting user.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Submitter name captured at submission time.
    pub fn user_name(&self) -> &str {
        self.user_name.as_str()
    }

    /// Submitter email captured at submission time.
    pub fn user_email(&self) -> &str {
        self.user_email.as_str()
    }

    /// Validated star rating.
    pub fn rating(&self) -> Rating {
        self.rating
    }

    /// Non-empty comment text.
    pub fn comment(&self) -> &str {
        self.comment.as_str()
    }

    /// Chosen category.
    pub fn category(&self) -> Category {
        self.category
    }
}

/// Partial update applied by an administrator.
///
/// ## Invariants
/// - At least one field is present; empty patches are rejected rather than
///   issuing a no-op store update.
/// - `admin_response: Some(String::new())` clears the response text.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackPatch {
    status: Option<FeedbackStatus>,
    admin_response: Option<String>,
}

impl FeedbackPatch {
    /// Construct a patch, rejecting the empty case.
    pub fn new(
        status: Option<FeedbackStatus>,
        admin_response: Option<String>,
    ) -> Result<Self, FeedbackValidationError> {
        if status.is_none() && admin_response.is_none() {
            return Err(FeedbackValidationError::EmptyPatch);
        }
        Ok(Self {
            status,
            admin_response,
        })
    }

    /// Status to set, if any.
    pub fn status(&self) -> Option<FeedbackStatus> {
        self.status
    }

    /// Response text to set, if any.
    pub fn admin_response(&self) -> Option<&str> {
        self.admin_response.as_deref()
    }
}

/// Exact-match query over the feedback collection, newest first.
///
/// `None` fields match everything; `limit` truncates without a continuation
/// cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedbackFilter {
    pub category: Option<Category>,
    pub status: Option<FeedbackStatus>,
    pub limit: Option<usize>,
}
