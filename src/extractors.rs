use axum::extract::{FromRequestParts, Path};
use axum::http::header;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::state::AppState;

/// Represents the currently authenticated user.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
}

/// Extractor that requires authentication.
/// Requests without a valid session cookie are redirected to `/login`.
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token =
            get_cookie_value(parts, state.sessions.cookie_name()).ok_or(AppError::LoginRequired)?;

        let claims = state.sessions.verify(token).ok_or_else(|| {
            tracing::debug!("Rejected invalid or expired session cookie");
            AppError::LoginRequired
        })?;

        Ok(CurrentUser {
            id: claims.uid,
            username: claims.username,
        })
    }
}

/// The `{entry_id}` path segment. Anything that is not an integer is a
/// missing entry rather than a bad request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntryId(pub i64);

impl<S> FromRequestParts<S> for EntryId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i64>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::EntryNotFound)?;
        Ok(EntryId(id))
    }
}

pub fn get_cookie_value<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts
        .headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|s| s.split(';'))
        .map(|s| s.trim())
        .find_map(|cookie| {
            let mut split = cookie.splitn(2, '=');
            let key = split.next()?.trim();
            let val = split.next()?.trim();
            if key == name && !val.is_empty() {
                Some(val)
            } else {
                None
            }
        })
}
