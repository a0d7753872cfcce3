use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequestParts, State},
    http::request::Parts,
};
use reqwest::StatusCode;

use crate::middleware::mw_ctx::CtxState;
use crate::middleware::utils::request_utils::session_token;
use crate::utils::jwt::Claims;

use super::ctx::Ctx;

#[derive(Debug)]
pub struct AuthWithLoginAccess {
    pub user_id: String,
    pub claims: Claims,
    pub ctx: Ctx,
}

pub(crate) fn request_claims(parts: &Parts, state: &CtxState) -> Option<Claims> {
    if let Some(claims) = parts.extensions.get::<Claims>() {
        return Some(claims.clone());
    }
    session_token(&parts.headers).and_then(|token| state.jwt.decode(&token).ok())
}

#[async_trait]
impl FromRequestParts<Arc<CtxState>> for AuthWithLoginAccess {
    type Rejection = StatusCode;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<CtxState>,
    ) -> Result<Self, Self::Rejection> {
        let State(app_state): State<Arc<CtxState>> = State::from_request_parts(parts, state)
            .await
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

        match request_claims(parts, &app_state) {
            Some(claims) => Ok(AuthWithLoginAccess {
                user_id: claims.auth.clone(),
                ctx: Ctx::from_claims(&claims),
                claims,
            }),
            None => Err(StatusCode::UNAUTHORIZED),
        }
    }
}
