use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    dto::comments::{CommentCreated, CreateCommentRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::comment_service,
    state::AppState,
};

#[utoipa::path(
    post,
    path = "/api/products/{slug}/comments",
    params(
        ("slug" = String, Path, description = "Product slug")
    ),
    request_body = CreateCommentRequest,
    responses(
        (status = 201, description = "Comment stored", body = ApiResponse<CommentCreated>),
        (status = 404, description = "Product not found"),
        (status = 422, description = "Empty or overlong content"),
    ),
    security(("bearer_auth" = [])),
    tag = "Comments"
)]
pub async fn add_comment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(slug): Path<String>,
    Json(payload): Json<CreateCommentRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<CommentCreated>>)> {
    let resp = comment_service::add_comment(&state, &user, &slug, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}
