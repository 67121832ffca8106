//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use guardia_core::error::CoreError;
use guardia_core::roles::{ACCOUNT_DELETED, ACCOUNT_SUSPENDED};
use guardia_core::types::DbId;
use guardia_db::repositories::UserRepo;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated caller extracted from a JWT Bearer token in the
/// `Authorization` header.
///
/// Beyond token validation, the extractor resolves the account row and
/// rejects suspended or deleted accounts, so a handler that receives an
/// `AuthUser` knows the caller's account is in good standing and no state
/// transition will be attempted on behalf of a non-active account.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's internal database id (from `claims.sub`).
    pub user_id: DbId,
    /// The user's role name (e.g. `"citizen"`, `"officer"`, `"admin"`).
    pub role: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        let user = UserRepo::find_by_id(&state.pool, claims.sub)
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized("Unknown account".into()))
            })?;

        match user.account_status.as_str() {
            ACCOUNT_SUSPENDED => {
                return Err(AppError::Core(CoreError::Forbidden(
                    "Account is suspended and under review".into(),
                )))
            }
            ACCOUNT_DELETED => {
                return Err(AppError::Core(CoreError::Forbidden(
                    "Account has been deleted".into(),
                )))
            }
            _ => {}
        }

        Ok(AuthUser {
            user_id: user.id,
            role: user.role,
        })
    }
}
