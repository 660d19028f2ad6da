//! Claims Extractors
//!
//! Reads the identity claims headers injected by the auth layer. The
//! required form rejects unauthenticated requests; [`OptionalUser`] is for
//! routes that serve both shoppers and guests.

use axum::{extract::FromRequestParts, http::request::Parts};

use super::CurrentUser;
use crate::utils::AppError;

const USER_ID_HEADER: &str = "x-auth-user-id";
const USER_NAME_HEADER: &str = "x-auth-user-name";
const USER_EMAIL_HEADER: &str = "x-auth-user-email";

fn claims_from_parts(parts: &Parts) -> Option<CurrentUser> {
    let header = |name: &str| {
        parts
            .headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    let id = header(USER_ID_HEADER)?;
    let name = header(USER_NAME_HEADER)?;
    let email = header(USER_EMAIL_HEADER)?;
    Some(CurrentUser { id, name, email })
}

impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Check if already extracted on this request
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        match claims_from_parts(parts) {
            Some(user) => {
                parts.extensions.insert(user.clone());
                Ok(user)
            }
            None => {
                tracing::warn!(uri = %parts.uri, "Request without identity claims");
                Err(AppError::Unauthorized)
            }
        }
    }
}

/// Claims when present, `None` for anonymous shoppers
#[derive(Debug, Clone)]
pub struct OptionalUser(pub Option<CurrentUser>);

impl<S: Send + Sync> FromRequestParts<S> for OptionalUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(OptionalUser(Some(user.clone())));
        }

        let user = claims_from_parts(parts);
        if let Some(user) = &user {
            parts.extensions.insert(user.clone());
        }
        Ok(OptionalUser(user))
    }
}
