use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{dto::navigation::Redirect, models::Comment};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCommentRequest {
    pub content: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CommentCreated {
    pub comment: Comment,
    pub redirect: Redirect,
}
