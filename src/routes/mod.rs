use axum::Router;

use crate::state::AppState;

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod comments;
pub mod doc;
pub mod health;
pub mod history;
pub mod params;
pub mod reactions;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/products", catalog::router())
        .nest("/comments", reactions::comment_router())
        .nest("/auth", auth::router())
        .nest("/cart", cart::router())
        .nest("/history", history::router())
        .merge(auth::profile_router())
}
