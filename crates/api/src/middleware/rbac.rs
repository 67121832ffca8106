//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose role does
//! not meet the requirement. Use these in route handlers to enforce
//! authorization at the type level.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use guardia_core::error::CoreError;
use guardia_core::roles::{ROLE_ADMIN, ROLE_OFFICER};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `officer` role (admins qualify too). Rejects with 403
/// Forbidden otherwise.
///
/// ```ignore
/// async fn officers_only(RequireOfficer(user): RequireOfficer) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireOfficer(pub AuthUser);

impl FromRequestParts<AppState> for RequireOfficer {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_OFFICER && user.role != ROLE_ADMIN {
            return Err(AppError::Core(CoreError::Forbidden(
                "Officer role required".into(),
            )));
        }
        Ok(RequireOfficer(user))
    }
}
