pub mod admin;
pub mod auth_routes;
pub mod currencies;
pub mod dashboard;
pub mod notifications;
pub mod pages;
pub mod profile;
pub mod tasks;
