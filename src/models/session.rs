// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session, authentication mode and the credentials draft.

use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use super::UserId;
use crate::error::ClientError;

/// Whether `authenticate` creates an account or logs into one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[serde(rename_all = "snake_case")]
pub enum AuthMode {
    #[default]
    Register,
    Login,
}

/// An established session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
pub struct Session {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub user_id: UserId,
    pub mode: AuthMode,
    pub email: String,
    pub name: Option<String>,
    /// False when registration created the account but the preferences
    /// submission failed.
    pub preferences_synced: bool,
}

/// Credentials as typed by the user.
#[derive(Clone, Default, Validate)]
pub struct Credentials {
    #[validate(length(min = 1, message = "Email is required."))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required."))]
    pub password: String,
    pub name: String,
}

// Keep the password out of logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .finish()
    }
}

impl Credentials {
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            name: name.into(),
        }
    }

    /// Trimmed copy, checked for non-empty email and password.
    pub fn validated(&self) -> Result<Self, ClientError> {
        let trimmed = Self {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            name: self.name.trim().to_string(),
        };
        trimmed.validate().map_err(|errors| {
            let mut messages: Vec<String> = errors
                .field_errors()
                .values()
                .flat_map(|errs| errs.iter())
                .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                .collect();
            messages.sort();
            ClientError::Validation(messages.join(" "))
        })?;
        Ok(trimmed)
    }

    pub(crate) fn register_request(&self) -> RegisterRequest<'_> {
        RegisterRequest {
            email: &self.email,
            password: &self.password,
            name: &self.name,
        }
    }

    pub(crate) fn login_request(&self) -> LoginRequest<'_> {
        LoginRequest {
            email: &self.email,
            password: &self.password,
        }
    }
}

/// Body of `POST /users`.
#[derive(Serialize)]
pub struct RegisterRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub name: &'a str,
}

/// Body of `POST /login`.
#[derive(Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Response of both `POST /users` and `POST /login`.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub user_id: UserId,
    pub email: Option<String>,
    pub name: Option<String>,
}
