use axum::{
    Router,
    routing::{get, patch, post},
};
use tower_http::trace::TraceLayer;

use crate::handlers::{UserState, user};

/// Build the HTTP router for the user API
pub fn router(state: UserState) -> Router {
    let user_routes = Router::new()
        .route("/", get(user::get_all_users).post(user::create_user))
        .route(
            "/{username}",
            get(user::get_user)
                .patch(user::update_user_details)
                .delete(user::delete_user),
        )
        .route("/{username}/status", patch(user::update_user_status))
        .route("/{username}/logins", post(user::increase_logins_counter));

    Router::new()
        .route("/", get(health))
        .nest("/users", user_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "User registry is running."
}
