use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    models::{Comment, Product},
    reaction::{ReactionCounts, ReactionState},
};

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct ProductList {
    #[schema(value_type = Vec<Product>)]
    pub items: Vec<Product>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CommentView {
    #[serde(flatten)]
    pub comment: Comment,
    pub author: String,
    pub reactions: ReactionCounts,
    /// Present only when the request is authenticated.
    pub my_reaction: Option<ReactionState>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductDetail {
    pub product: Product,
    pub reactions: ReactionCounts,
    pub my_reaction: Option<ReactionState>,
    pub comments: Vec<CommentView>,
}
