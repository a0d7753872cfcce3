use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, State},
    http::request::Parts,
};
use reqwest::StatusCode;
use uuid::Uuid;

use super::error::{AppError, AppResult, CtxError, CtxResult};
use crate::entities::user::UserRole;
use crate::middleware::mw_ctx::CtxState;
use crate::middleware::utils::request_utils::session_token;
use crate::utils::jwt::Claims;

#[derive(Clone, Debug)]
pub struct Ctx {
    result_user_id: AppResult<String>,
    role: Option<UserRole>,
    req_id: Uuid,
}

impl Ctx {
    pub fn new(result_user_id: AppResult<String>) -> Self {
        Self {
            result_user_id,
            role: None,
            req_id: Uuid::new_v4(),
        }
    }

    pub fn from_claims(claims: &Claims) -> Self {
        Self {
            result_user_id: Ok(claims.auth.clone()),
            role: Some(claims.role),
            req_id: Uuid::new_v4(),
        }
    }

    pub fn user_id(&self) -> CtxResult<String> {
        self.result_user_id
            .clone()
            .map_err(|error| self.to_ctx_error(error))
    }

    pub fn role(&self) -> Option<UserRole> {
        self.role
    }

    pub fn is_admin(&self) -> bool {
        self.role == Some(UserRole::Admin)
    }

    pub fn req_id(&self) -> Uuid {
        self.req_id
    }

    pub fn to_ctx_error(&self, error: AppError) -> CtxError {
        CtxError {
            req_id: self.req_id,
            error,
        }
    }
}

#[async_trait]
impl FromRequestParts<Arc<CtxState>> for Ctx {
    type Rejection = StatusCode;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<CtxState>,
    ) -> Result<Self, Self::Rejection> {
        let State(app_state): State<Arc<CtxState>> = State::from_request_parts(parts, state)
            .await
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

        if let Some(claims) = parts.extensions.get::<Claims>() {
            return Ok(Ctx::from_claims(claims));
        }

        let ctx = match session_token(&parts.headers) {
            Some(token) => match app_state.jwt.decode(&token) {
                Ok(claims) => Ctx::from_claims(&claims),
                Err(source) => Ctx::new(Err(AppError::AuthFailJwtInvalid { source })),
            },
            None => Ctx::new(Err(AppError::AuthFailNoJwtCookie)),
        };
        Ok(ctx)
    }
}
