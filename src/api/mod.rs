mod handlers;
mod middleware;

pub use middleware::{session_from_headers, SESSION_COOKIE};

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::store::Backend;

pub fn create_router(backend: Backend) -> Router {
    let api = Router::new()
        // Lists
        .route("/lists", get(handlers::list_lists).post(handlers::create_list))
        .route(
            "/lists/{id}",
            get(handlers::get_list)
                .put(handlers::rename_list)
                .delete(handlers::delete_list),
        )
        .route("/lists/{id}/complete_all", post(handlers::complete_all))
        // Todos
        .route("/lists/{id}/todos", post(handlers::create_todo))
        .route(
            "/lists/{id}/todos/{todo_id}",
            put(handlers::toggle_todo).delete(handlers::delete_todo),
        )
        // Health
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api/v1", api)
        .layer(axum::middleware::from_fn(middleware::session_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(backend)
}
