use std::collections::HashMap;

use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use uuid::Uuid;

use crate::{
    dto::catalog::{CommentView, ProductDetail, ProductList},
    entity::{
        comments::{Column as CommentCol, Entity as Comments},
        products::{Column, Entity as Products, Model as ProductModel},
        reactions::{Column as ReactionCol, Entity as Reactions, ReactionKind, TargetKind},
        users::Entity as Users,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Comment, Product},
    reaction::{ReactionCounts, ReactionState},
    response::{ApiResponse, Meta},
    routes::params::{ProductQuery, ProductSortBy, SortOrder},
    state::AppState,
};

pub async fn find_product_by_slug<C: ConnectionTrait>(conn: &C, slug: &str) -> AppResult<ProductModel> {
    Products::find()
        .filter(Column::Slug.eq(slug))
        .one(conn)
        .await?
        .ok_or(AppError::NotFound)
}

pub async fn list_products(
    state: &AppState,
    query: ProductQuery,
) -> AppResult<ApiResponse<ProductList>> {
    let (page, limit, offset) = query.pagination().normalize();
    let mut condition = Condition::all();

    if let Some(search) = query.q.as_ref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search);
        condition = condition.add(
            Condition::any()
                .add(Expr::col(Column::Name).ilike(pattern.clone()))
                .add(Expr::col(Column::Description).ilike(pattern)),
        );
    }

    if let Some(min_price) = query.min_price {
        condition = condition.add(Column::Price.gte(min_price));
    }

    if let Some(max_price) = query.max_price {
        condition = condition.add(Column::Price.lte(max_price));
    }

    let sort_by = query.sort_by.unwrap_or(ProductSortBy::Name);
    let sort_order = query.sort_order.unwrap_or(SortOrder::Asc);
    let sort_col = match sort_by {
        ProductSortBy::CreatedAt => Column::CreatedAt,
        ProductSortBy::Price => Column::Price,
        ProductSortBy::Name => Column::Name,
    };

    let mut finder = Products::find().filter(condition);
    finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(sort_col),
        SortOrder::Desc => finder.order_by_desc(sort_col),
    };
    finder = finder.order_by_asc(Column::Slug);

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Product::from)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Products", ProductList { items }, Some(meta)))
}

/// Product page: the product, its comments and reaction tallies. The
/// viewer's own reactions are filled in only for authenticated requests.
pub async fn get_product_detail(
    state: &AppState,
    slug: &str,
    viewer: Option<&AuthUser>,
) -> AppResult<ApiResponse<ProductDetail>> {
    let product = find_product_by_slug(&state.orm, slug).await?;

    let comments = Comments::find()
        .filter(CommentCol::ProductId.eq(product.id))
        .order_by_asc(CommentCol::CreatedAt)
        .find_also_related(Users)
        .all(&state.orm)
        .await?;

    let comment_ids: Vec<Uuid> = comments.iter().map(|(c, _)| c.id).collect();
    let reactions = Reactions::find()
        .filter(
            Condition::any()
                .add(
                    Condition::all()
                        .add(ReactionCol::TargetKind.eq(TargetKind::Product))
                        .add(ReactionCol::TargetId.eq(product.id)),
                )
                .add(
                    Condition::all()
                        .add(ReactionCol::TargetKind.eq(TargetKind::Comment))
                        .add(ReactionCol::TargetId.is_in(comment_ids)),
                ),
        )
        .all(&state.orm)
        .await?;

    let mut counts: HashMap<(TargetKind, Uuid), ReactionCounts> = HashMap::new();
    let mut mine: HashMap<(TargetKind, Uuid), ReactionKind> = HashMap::new();
    for reaction in reactions {
        let key = (reaction.target_kind, reaction.target_id);
        counts.entry(key).or_default().add(reaction.kind);
        if viewer.is_some_and(|v| v.user_id == reaction.user_id) {
            mine.insert(key, reaction.kind);
        }
    }

    let my_state = |key: &(TargetKind, Uuid)| {
        viewer.map(|_| ReactionState::from_kind(mine.get(key).copied()))
    };

    let comment_views = comments
        .into_iter()
        .map(|(comment, author)| {
            let key = (TargetKind::Comment, comment.id);
            CommentView {
                reactions: counts.get(&key).copied().unwrap_or_default(),
                my_reaction: my_state(&key),
                author: author.map(|u| u.username).unwrap_or_default(),
                comment: Comment::from(comment),
            }
        })
        .collect();

    let product_key = (TargetKind::Product, product.id);
    let detail = ProductDetail {
        reactions: counts.get(&product_key).copied().unwrap_or_default(),
        my_reaction: my_state(&product_key),
        product: Product::from(product),
        comments: comment_views,
    };

    Ok(ApiResponse::success("Product", detail, None))
}

/// URL-safe identifier derived from a product name.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("Axum Hoodie"), "axum-hoodie");
        assert_eq!(slugify("E-book: Async Rust"), "e-book-async-rust");
        assert_eq!(slugify("  Ferris   Mug!! "), "ferris-mug");
    }

    #[test]
    fn slugify_drops_non_ascii() {
        assert_eq!(slugify("Café Crème"), "caf-cr-me");
    }
}
