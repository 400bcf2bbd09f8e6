use axum::{
    Json, Router,
    extract::{Path, State},
    routing::post,
};
use uuid::Uuid;

use crate::{
    dto::reactions::ReactionOutcome,
    entity::reactions::ReactionKind,
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::reaction_service,
    state::AppState,
};

pub fn comment_router() -> Router<AppState> {
    Router::new()
        .route("/{id}/like", post(like_comment))
        .route("/{id}/dislike", post(dislike_comment))
}

#[utoipa::path(
    post,
    path = "/api/products/{slug}/like",
    params(("slug" = String, Path, description = "Product slug")),
    responses(
        (status = 200, description = "Like set, switched or retracted", body = ApiResponse<ReactionOutcome>),
        (status = 404, description = "Product not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Reactions"
)]
pub async fn like_product(
    State(state): State<AppState>,
    user: AuthUser,
    Path(slug): Path<String>,
) -> AppResult<Json<ApiResponse<ReactionOutcome>>> {
    let resp = reaction_service::react_to_product(&state, &user, &slug, ReactionKind::Like).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/products/{slug}/dislike",
    params(("slug" = String, Path, description = "Product slug")),
    responses(
        (status = 200, description = "Dislike set, switched or retracted", body = ApiResponse<ReactionOutcome>),
        (status = 404, description = "Product not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Reactions"
)]
pub async fn dislike_product(
    State(state): State<AppState>,
    user: AuthUser,
    Path(slug): Path<String>,
) -> AppResult<Json<ApiResponse<ReactionOutcome>>> {
    let resp = reaction_service::react_to_product(&state, &user, &slug, ReactionKind::Dislike).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/comments/{id}/like",
    params(("id" = Uuid, Path, description = "Comment ID")),
    responses(
        (status = 200, description = "Like set, switched or retracted", body = ApiResponse<ReactionOutcome>),
        (status = 404, description = "Comment not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Reactions"
)]
pub async fn like_comment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<ReactionOutcome>>> {
    let resp = reaction_service::react_to_comment(&state, &user, id, ReactionKind::Like).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/comments/{id}/dislike",
    params(("id" = Uuid, Path, description = "Comment ID")),
    responses(
        (status = 200, description = "Dislike set, switched or retracted", body = ApiResponse<ReactionOutcome>),
        (status = 404, description = "Comment not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Reactions"
)]
pub async fn dislike_comment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<ReactionOutcome>>> {
    let resp = reaction_service::react_to_comment(&state, &user, id, ReactionKind::Dislike).await?;
    Ok(Json(resp))
}
