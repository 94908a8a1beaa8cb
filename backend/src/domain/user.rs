//! User identity model.
//!
//! Purpose: strongly typed user values shared by the API handlers and the
//! persistence adapters. The store assigns record identifiers, so [`UserId`]
//! is an opaque string rather than a UUID; the submission flow may also carry
//! client-generated fallback ids that never correspond to a stored record.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Validation errors returned by the user value constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyId,
    EmptyEmail,
    InvalidEmail,
    EmptyName,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "user id must not be empty"),
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::InvalidEmail => write!(f, "email must contain a local part and a domain"),
            Self::EmptyName => write!(f, "name must not be empty"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Opaque user identifier assigned by the store on insert.
///
/// ## Invariants
/// - Non-empty and free of surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    fn from_owned(id: String) -> Result<Self, UserValidationError> {
        if id.trim().is_empty() || id.trim() != id {
            return Err(UserValidationError::EmptyId);
        }
        Ok(Self(id))
    }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Lower-cased email address.
///
/// ## Invariants
/// - Trimmed, non-empty, and lower-cased on construction.
/// - Contains exactly the shape `local@domain` with both sides non-empty.
///   Full RFC 5322 parsing stays with the store; this only catches values
///   that cannot possibly be addresses.
///
/// # Examples
/// ```
/// use backend::domain::EmailAddress;
///
/// let email = EmailAddress::new("Ada@Example.COM").expect("valid email");
/// assert_eq!(email.as_str(), "ada@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Normalise and validate an email address.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let normalized = raw.as_ref().trim().to_lowercase();
        if normalized.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        let Some((local, domain)) = normalized.split_once('@') else {
            return Err(UserValidationError::InvalidEmail);
        };
        if local.is_empty() || domain.is_empty() || domain.contains('@') {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(normalized))
    }

    /// Borrow the normalised address as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Stored user record.
///
/// `password_hash` never leaves the process; API responses only ever carry
/// the user id.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    pub email: EmailAddress,
    pub name: String,
    pub is_admin: bool,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to insert a user; id and timestamps are store-assigned.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    email: EmailAddress,
    name: String,
    is_admin: bool,
    password_hash: String,
}

impl NewUser {
    /// Validate and assemble an insertable user record.
    pub fn new(
        email: EmailAddress,
        name: &str,
        password_hash: String,
        is_admin: bool,
    ) -> Result<Self, UserValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(UserValidationError::EmptyName);
        }
        Ok(Self {
            email,
            name: name.to_owned(),
            is_admin,
            password_hash,
        })
    }

    /// Normalised email address.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Display name captured at registration.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Whether the record grants dashboard access.
    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    /// Salted hash of the registration password.
    pub fn password_hash(&self) -> &str {
        self.password_hash.as_str()
    }
}
