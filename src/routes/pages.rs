use std::collections::HashMap;
use std::sync::Arc;

use axum::{extract::Query, routing::get, Router};

use crate::middleware::mw_ctx::CtxState;

pub fn routes() -> Router<Arc<CtxState>> {
    Router::new()
        .route("/auth/login", get(login_page))
        .route("/admin/login", get(admin_login_page))
}

async fn login_page(Query(query): Query<HashMap<String, String>>) -> String {
    let next = query
        .get("callbackUrl")
        .map(|url| format!(" Continue to {url} afterwards."))
        .unwrap_or_default();
    format!("Sign in with POST /api/auth/login {{\"email\", \"password\"}}.{next}")
}

async fn admin_login_page() -> &'static str {
    "Admin sign in: POST /api/auth/login with an admin account."
}
