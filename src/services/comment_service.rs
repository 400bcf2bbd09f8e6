use sea_orm::{ActiveModelTrait, ActiveValue::NotSet, Set};
use uuid::Uuid;

use crate::{
    audit,
    dto::{
        comments::{CommentCreated, CreateCommentRequest},
        navigation::Destination,
    },
    entity::comments::ActiveModel as CommentActive,
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Comment,
    response::{ApiResponse, Meta},
    services::catalog_service::find_product_by_slug,
    state::AppState,
};

pub const COMMENT_MAX_LEN: usize = 2000;

/// Returns the trimmed comment body, or a validation error describing the problem.
pub fn validate_comment(content: &str) -> AppResult<String> {
    let content = content.trim();
    if content.is_empty() {
        return Err(AppError::Validation("content is required".into()));
    }
    if content.chars().count() > COMMENT_MAX_LEN {
        return Err(AppError::Validation(format!(
            "content must be at most {COMMENT_MAX_LEN} characters"
        )));
    }
    Ok(content.to_string())
}

pub async fn add_comment(
    state: &AppState,
    user: &AuthUser,
    slug: &str,
    payload: CreateCommentRequest,
) -> AppResult<ApiResponse<CommentCreated>> {
    let product = find_product_by_slug(&state.orm, slug).await?;
    let content = validate_comment(&payload.content)?;

    let comment = CommentActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.user_id),
        product_id: Set(product.id),
        content: Set(content),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        &state.pool,
        user.user_id,
        "comment_create",
        "comments",
        serde_json::json!({ "comment_id": comment.id, "product_id": product.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Comment added",
        CommentCreated {
            comment: Comment::from(comment),
            redirect: Destination::product_detail(product.slug).into(),
        },
        Some(Meta::empty()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_valid_content() {
        assert_eq!(validate_comment("  great mug \n").unwrap(), "great mug");
    }

    #[test]
    fn rejects_blank_content() {
        assert!(matches!(validate_comment("   "), Err(AppError::Validation(_))));
    }

    #[test]
    fn rejects_overlong_content() {
        let body = "x".repeat(COMMENT_MAX_LEN + 1);
        assert!(matches!(validate_comment(&body), Err(AppError::Validation(_))));
        assert!(validate_comment(&"x".repeat(COMMENT_MAX_LEN)).is_ok());
    }
}
