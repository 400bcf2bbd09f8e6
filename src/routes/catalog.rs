use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};

use crate::{
    dto::catalog::{ProductDetail, ProductList},
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    routes::{comments, params::ProductQuery, reactions},
    services::catalog_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products))
        .route("/{slug}", get(get_product))
        .route("/{slug}/comments", post(comments::add_comment))
        .route("/{slug}/like", post(reactions::like_product))
        .route("/{slug}/dislike", post(reactions::dislike_product))
}

#[utoipa::path(
    get,
    path = "/api/products",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("q" = Option<String>, Query, description = "Search in name and description"),
        ("min_price" = Option<i64>, Query, description = "Lowest price"),
        ("max_price" = Option<i64>, Query, description = "Highest price"),
        ("sort_by" = Option<String>, Query, description = "created_at | price | name (default name)"),
        ("sort_order" = Option<String>, Query, description = "asc | desc (default asc)"),
    ),
    responses(
        (status = 200, description = "List products", body = ApiResponse<ProductList>)
    ),
    tag = "Products"
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let resp = catalog_service::list_products(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/products/{slug}",
    params(
        ("slug" = String, Path, description = "Product slug")
    ),
    responses(
        (status = 200, description = "Product with comments and reactions", body = ApiResponse<ProductDetail>),
        (status = 404, description = "Product not found"),
    ),
    tag = "Products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    viewer: Option<AuthUser>,
    Path(slug): Path<String>,
) -> AppResult<Json<ApiResponse<ProductDetail>>> {
    let resp = catalog_service::get_product_detail(&state, &slug, viewer.as_ref()).await?;
    Ok(Json(resp))
}
