pub mod auth_with_admin_access;
pub mod auth_with_login_access;
pub mod ctx;
pub mod error;
pub mod mw_ctx;
pub mod route_guard;
pub mod utils;
