use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};
use uuid::Uuid;

use crate::{
    dto::history::{BuyHistoryEntry, HistoryList},
    entity::{
        buy_histories::{Column as HistoryCol, Entity as BuyHistories, Model as HistoryModel},
        buy_history_products::{Column as HistoryProductCol, Entity as BuyHistoryProducts},
        products::Entity as Products,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::Product,
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    state::AppState,
};

/// The caller's purchase snapshots, most recent first.
pub async fn list_history(
    state: &AppState,
    user: &AuthUser,
    pagination: Pagination,
) -> AppResult<ApiResponse<HistoryList>> {
    let (page, limit, offset) = pagination.normalize();

    let finder = BuyHistories::find()
        .filter(HistoryCol::UserId.eq(user.user_id))
        .order_by_desc(HistoryCol::CreatedAt)
        .order_by_desc(HistoryCol::Id);

    let total = finder.clone().count(&state.orm).await? as i64;

    let histories = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;

    let items = load_entries(&state.orm, histories).await?;
    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("OK", HistoryList { items }, Some(meta)))
}

/// Attach purchased products to each snapshot, keeping the input order.
pub async fn load_entries<C: ConnectionTrait>(
    conn: &C,
    histories: Vec<HistoryModel>,
) -> AppResult<Vec<BuyHistoryEntry>> {
    if histories.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<Uuid> = histories.iter().map(|h| h.id).collect();
    let rows = BuyHistoryProducts::find()
        .filter(HistoryProductCol::BuyHistoryId.is_in(ids))
        .find_also_related(Products)
        .all(conn)
        .await?;

    let mut by_history: HashMap<Uuid, Vec<Product>> = HashMap::new();
    for (link, product) in rows {
        if let Some(product) = product {
            by_history
                .entry(link.buy_history_id)
                .or_default()
                .push(Product::from(product));
        }
    }

    let entries = histories
        .into_iter()
        .map(|history| {
            let mut products = by_history.remove(&history.id).unwrap_or_default();
            products.sort_by(|a, b| a.name.cmp(&b.name));
            BuyHistoryEntry {
                id: history.id,
                created_at: history.created_at.with_timezone(&Utc),
                products,
            }
        })
        .collect();

    Ok(entries)
}
