use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequestParts, State},
    http::request::Parts,
};
use reqwest::StatusCode;

use crate::entities::user::UserRole;
use crate::middleware::mw_ctx::CtxState;

use super::auth_with_login_access::request_claims;
use super::ctx::Ctx;

/// Session whose role claim is `admin`.
#[derive(Debug)]
pub struct AuthWithAdminAccess {
    pub user_id: String,
    pub ctx: Ctx,
}

#[async_trait]
impl FromRequestParts<Arc<CtxState>> for AuthWithAdminAccess {
    type Rejection = StatusCode;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<CtxState>,
    ) -> Result<Self, Self::Rejection> {
        let State(app_state): State<Arc<CtxState>> = State::from_request_parts(parts, state)
            .await
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

        let claims = request_claims(parts, &app_state).ok_or(StatusCode::UNAUTHORIZED)?;
        if claims.role != UserRole::Admin {
            return Err(StatusCode::FORBIDDEN);
        }
        Ok(AuthWithAdminAccess {
            user_id: claims.auth.clone(),
            ctx: Ctx::from_claims(&claims),
        })
    }
}
