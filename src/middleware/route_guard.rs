use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use reqwest::Url;
use tracing::debug;

use crate::entities::user::UserRole;
use crate::middleware::mw_ctx::CtxState;
use crate::middleware::utils::request_utils::session_token;

pub const PROTECTED_PREFIXES: [&str; 5] = ["/admin", "/dashboard", "/profile", "/tasks", "/rewards"];
pub const ADMIN_LOGIN_PATH: &str = "/admin/login";
pub const LOGIN_PATH: &str = "/auth/login";

fn has_prefix(path: &str, prefix: &str) -> bool {
    path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}

pub fn is_protected(path: &str) -> bool {
    path != ADMIN_LOGIN_PATH && PROTECTED_PREFIXES.iter().any(|p| has_prefix(path, p))
}

pub fn login_redirect_location(callback: &str) -> String {
    match Url::parse_with_params("http://localhost/auth/login", &[("callbackUrl", callback)]) {
        Ok(url) => format!("{}?{}", url.path(), url.query().unwrap_or_default()),
        Err(_) => LOGIN_PATH.to_string(),
    }
}

/// Redirects unauthenticated page requests to the login page and non-admins away from `/admin`.
/// Verified claims are handed to the extractors through request extensions.
pub async fn route_guard(
    State(state): State<Arc<CtxState>>,
    mut req: Request,
    next: Next,
) -> Response {
    let path = req.uri().path().to_string();
    if !is_protected(&path) {
        return next.run(req).await;
    }

    let claims = session_token(req.headers()).and_then(|token| state.jwt.decode(&token).ok());

    if has_prefix(&path, "/admin") {
        return match claims {
            Some(claims) if claims.role == UserRole::Admin => {
                req.extensions_mut().insert(claims);
                next.run(req).await
            }
            _ => {
                debug!("->> {:<12} - {path} needs admin role", "GUARD");
                Redirect::temporary(ADMIN_LOGIN_PATH).into_response()
            }
        };
    }

    match claims {
        Some(claims) => {
            req.extensions_mut().insert(claims);
            next.run(req).await
        }
        None => {
            let callback = req
                .uri()
                .path_and_query()
                .map(|pq| pq.as_str().to_string())
                .unwrap_or(path);
            debug!("->> {:<12} - no session for {callback}", "GUARD");
            Redirect::temporary(&login_redirect_location(&callback)).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protects_prefixes_but_not_lookalikes() {
        assert!(is_protected("/admin"));
        assert!(is_protected("/admin/users"));
        assert!(is_protected("/tasks/abc/complete"));
        assert!(is_protected("/rewards"));
        assert!(!is_protected("/admin/login"));
        assert!(!is_protected("/administrator"));
        assert!(!is_protected("/api/auth/login"));
        assert!(!is_protected("/"));
    }

    #[test]
    fn callback_url_is_encoded() {
        assert_eq!(
            login_redirect_location("/dashboard"),
            "/auth/login?callbackUrl=%2Fdashboard"
        );
    }
}
