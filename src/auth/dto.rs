use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    auth::repo_types::{ProfilePatch, User},
    error::AppError,
};

pub const MIN_PASSWORD_LEN: usize = 6;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Request body for user registration.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub confirm_password: Option<String>,
}

/// Signup input after normalization and validation.
#[derive(Debug)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl SignupRequest {
    pub fn validate(self) -> Result<NewAccount, AppError> {
        let username = self.username.trim().to_string();
        let email = self.email.trim().to_lowercase();

        if username.is_empty() {
            return Err(AppError::validation("Username is required"));
        }
        if !is_valid_email(&email) {
            return Err(AppError::validation("Invalid Email"));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::validation(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters long"
            )));
        }
        if let Some(confirm) = &self.confirm_password {
            if *confirm != self.password {
                return Err(AppError::validation("Passwords do not match"));
            }
        }

        Ok(NewAccount {
            username,
            email,
            password: self.password,
        })
    }
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Returned after signup and login.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

impl From<&User> for PublicUser {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            username: u.username.clone(),
            email: u.email.clone(),
        }
    }
}

/// Everything about a user except the password hash.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub income: Option<f64>,
    pub currency: Option<String>,
    pub goal: Option<String>,
    pub goal_amount: Option<f64>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub goal_set_date: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<User> for UserProfile {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            income: u.income,
            currency: u.currency,
            goal: u.goal,
            goal_amount: u.goal_amount,
            goal_set_date: u.goal_set_date,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

/// Request body for `POST /auth/save`. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveProfileRequest {
    pub income: Option<f64>,
    pub currency: Option<String>,
    pub goal: Option<String>,
    pub goal_amount: Option<f64>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub goal_set_date: Option<OffsetDateTime>,
}

impl SaveProfileRequest {
    pub fn validate(self) -> Result<ProfilePatch, AppError> {
        for (name, value) in [("income", self.income), ("goalAmount", self.goal_amount)] {
            if let Some(v) = value {
                if !v.is_finite() || v < 0.0 {
                    return Err(AppError::validation(format!(
                        "{name} must be a non-negative number"
                    )));
                }
            }
        }
        let currency = self.currency.map(|c| c.trim().to_uppercase());
        if currency.as_deref() == Some("") {
            return Err(AppError::validation("currency must not be empty"));
        }

        Ok(ProfilePatch {
            income: self.income,
            currency,
            goal: self.goal.map(|g| g.trim().to_string()),
            goal_amount: self.goal_amount,
            goal_set_date: self.goal_set_date,
        })
    }
}
