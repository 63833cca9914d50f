use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::AppError;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Trimmed, non-empty value or `None`. Whitespace-only input counts as
/// missing.
fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Request body for signup. Fields are optional so presence is checked
/// explicitly and reported per field before any business logic runs.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// A signup request that passed field validation: every field present,
/// email normalized to lowercase.
#[derive(Debug)]
pub struct ValidSignup {
    pub email: String,
    pub username: String,
    pub password: String,
}

impl SignupRequest {
    pub fn validate(self) -> Result<ValidSignup, AppError> {
        let email = present(self.email).ok_or(AppError::Validation {
            field: "email",
            message: "Email is required".into(),
        })?;
        let username = present(self.username).ok_or(AppError::Validation {
            field: "username",
            message: "Username is required".into(),
        })?;
        // Passwords are taken verbatim; only emptiness counts as missing.
        let password = self
            .password
            .filter(|p| !p.is_empty())
            .ok_or(AppError::Validation {
                field: "password",
                message: "Password is required".into(),
            })?;

        let email = email.to_lowercase();
        if !is_valid_email(&email) {
            return Err(AppError::Validation {
                field: "email",
                message: "Invalid email".into(),
            });
        }

        Ok(ValidSignup {
            email,
            username,
            password,
        })
    }
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug)]
pub struct ValidLogin {
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(self) -> Result<ValidLogin, AppError> {
        let username = present(self.username).ok_or(AppError::Validation {
            field: "username",
            message: "Username is required".into(),
        })?;
        let password = self
            .password
            .filter(|p| !p.is_empty())
            .ok_or(AppError::Validation {
                field: "password",
                message: "Password is required".into(),
            })?;
        Ok(ValidLogin { username, password })
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// The caller's own profile, in the wire shape the SPA expects.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub email: String,
    pub username: String,
    #[serde(rename = "createdAt", with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup(email: Option<&str>, username: Option<&str>, password: Option<&str>) -> SignupRequest {
        SignupRequest {
            email: email.map(String::from),
            username: username.map(String::from),
            password: password.map(String::from),
        }
    }

    #[test]
    fn valid_signup_passes() {
        let valid = signup(Some("a@x.com"), Some("alice"), Some("secret123"))
            .validate()
            .expect("should validate");
        assert_eq!(valid.email, "a@x.com");
        assert_eq!(valid.username, "alice");
        assert_eq!(valid.password, "secret123");
    }

    #[test]
    fn each_missing_field_is_reported_by_name() {
        let err = signup(None, Some("alice"), Some("pw")).validate().unwrap_err();
        assert_eq!(err.to_string(), "Email is required");

        let err = signup(Some("a@x.com"), None, Some("pw")).validate().unwrap_err();
        assert_eq!(err.to_string(), "Username is required");

        let err = signup(Some("a@x.com"), Some("alice"), None)
            .validate()
            .unwrap_err();
        assert_eq!(err.to_string(), "Password is required");
    }

    #[test]
    fn whitespace_only_counts_as_missing() {
        let err = signup(Some("   "), Some("alice"), Some("pw"))
            .validate()
            .unwrap_err();
        assert_eq!(err.to_string(), "Email is required");
    }

    #[test]
    fn email_is_trimmed_and_lowercased() {
        let valid = signup(Some("  A@X.Com "), Some("alice"), Some("pw"))
            .validate()
            .expect("should validate");
        assert_eq!(valid.email, "a@x.com");
    }

    #[test]
    fn email_shape_is_checked() {
        let err = signup(Some("not-an-email"), Some("alice"), Some("pw"))
            .validate()
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid email");
    }

    #[test]
    fn login_requires_both_fields() {
        let err = LoginRequest {
            username: None,
            password: Some("pw".into()),
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.to_string(), "Username is required");

        let err = LoginRequest {
            username: Some("alice".into()),
            password: Some(String::new()),
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.to_string(), "Password is required");
    }

    #[test]
    fn me_response_wire_shape() {
        let response = MeResponse {
            id: Uuid::new_v4(),
            email: "a@x.com".into(),
            username: "alice".into(),
            created_at: OffsetDateTime::now_utc(),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"_id\""));
        assert!(json.contains("\"createdAt\""));
        assert!(json.contains("\"alice\""));
    }
}
