use axum::{routing::{get, post}, Router, Extension};
use std::sync::Arc;

use crate::{AppState, health_with_pool};
use crate::{controllers, home};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(home::index))
        .route("/health", get(|Extension(state): Extension<Arc<AppState>>| async move {
            health_with_pool(&state.pool).await
        }))
        .route("/user", post(controllers::create_user))
        .route(
            "/user/:id",
            get(controllers::get_user)
                .put(controllers::update_user)
                .delete(controllers::delete_user),
        )
        .layer(Extension(state))
}
