use serde::Deserialize;

use crate::{
    auth::dto::{LoginRequest, SignupRequest, ValidLogin, ValidSignup},
    error::AppError,
};

/// Signup form fields. Presence is validated explicitly so an empty
/// submission yields a field-scoped message instead of a deserializer
/// rejection.
#[derive(Debug, Deserialize)]
pub struct SignupForm {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
}

impl SignupForm {
    pub fn validate(self) -> Result<ValidSignup, AppError> {
        let valid = SignupRequest {
            email: self.email,
            username: self.username,
            password: self.password,
        }
        .validate()?;

        let confirm = self
            .confirm_password
            .filter(|p| !p.is_empty())
            .ok_or(AppError::Validation {
                field: "confirm_password",
                message: "Confirm password is required".into(),
            })?;
        if valid.password != confirm {
            return Err(AppError::Validation {
                field: "confirm_password",
                message: "Passwords do not match".into(),
            });
        }

        Ok(valid)
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl LoginForm {
    pub fn validate(self) -> Result<ValidLogin, AppError> {
        LoginRequest {
            username: self.username,
            password: self.password,
        }
        .validate()
    }
}
