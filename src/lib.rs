pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;


use std::sync::Arc;

use axum::Router;

use crate::{config::Config, db::UserStore, handlers::UserState, services::UserService};

/// Wire a fresh store and service into a router
pub fn build_app(config: &Config) -> Router {
    let user_store = Arc::new(UserStore::new());
    let user_service = Arc::new(UserService::new(user_store));

    routes::router(UserState {
        user_service,
        default_page_size: config.default_page_size,
    })
}
