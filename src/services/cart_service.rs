use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use sea_orm::sea_query::{LockType, OnConflict};
use uuid::Uuid;

use crate::{
    audit,
    dto::{
        cart::{AddToCartRequest, CartUpdated, CartView, CheckoutResponse},
        navigation::Destination,
    },
    entity::{
        buy_histories::ActiveModel as HistoryActive,
        buy_history_products::{ActiveModel as HistoryProductActive, Entity as BuyHistoryProducts},
        cart_products::{ActiveModel as CartProductActive, Column as CartProductCol, Entity as CartProducts},
        carts::{Column as CartCol, Entity as Carts, Model as CartModel},
        products::Entity as Products,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Product,
    response::{ApiResponse, Meta},
    services::{catalog_service::find_product_by_slug, history_service::load_entries},
    state::AppState,
};

/// Every account gets a cart at registration, so a miss here is a server fault.
pub async fn cart_for_user<C: ConnectionTrait>(conn: &C, user_id: Uuid) -> AppResult<CartModel> {
    Carts::find()
        .filter(CartCol::UserId.eq(user_id))
        .one(conn)
        .await?
        .ok_or_else(|| AppError::Precondition(format!("user {user_id} has no cart")))
}

pub async fn basket_products<C: ConnectionTrait>(conn: &C, cart_id: Uuid) -> AppResult<Vec<Product>> {
    let products = Products::find()
        .inner_join(CartProducts)
        .filter(CartProductCol::CartId.eq(cart_id))
        .order_by_asc(CartProductCol::AddedAt)
        .all(conn)
        .await?
        .into_iter()
        .map(Product::from)
        .collect();
    Ok(products)
}

pub async fn view_cart(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<CartView>> {
    let cart = cart_for_user(&state.orm, user.user_id).await?;
    let items = basket_products(&state.orm, cart.id).await?;
    let meta = Meta::total(items.len() as i64);

    Ok(ApiResponse::success(
        "OK",
        CartView {
            cart_id: cart.id,
            items,
        },
        Some(meta),
    ))
}

/// Adding a product already in the basket leaves it unchanged.
pub async fn add_to_cart(
    state: &AppState,
    user: &AuthUser,
    payload: AddToCartRequest,
) -> AppResult<ApiResponse<CartUpdated>> {
    let product = Products::find_by_id(payload.product_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    let cart = cart_for_user(&state.orm, user.user_id).await?;

    let inserted = CartProducts::insert(CartProductActive {
        cart_id: Set(cart.id),
        product_id: Set(product.id),
        added_at: NotSet,
    })
    .on_conflict(
        OnConflict::columns([CartProductCol::CartId, CartProductCol::ProductId])
            .do_nothing()
            .to_owned(),
    )
    .exec_without_returning(&state.orm)
    .await?;

    tracing::debug!(cart_id = %cart.id, product_id = %product.id, inserted, "cart add");
    audit::record(
        &state.pool,
        user.user_id,
        "cart_add",
        "cart_products",
        serde_json::json!({ "product_id": product.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Added to cart",
        CartUpdated {
            product_id: product.id,
            redirect: Destination::ProductList.into(),
        },
        Some(Meta::empty()),
    ))
}

/// Removing a product that is not in the basket is a no-op.
pub async fn remove_from_cart(
    state: &AppState,
    user: &AuthUser,
    slug: &str,
) -> AppResult<ApiResponse<CartUpdated>> {
    let cart = cart_for_user(&state.orm, user.user_id).await?;
    let product = find_product_by_slug(&state.orm, slug).await?;

    let result = CartProducts::delete_many()
        .filter(CartProductCol::CartId.eq(cart.id))
        .filter(CartProductCol::ProductId.eq(product.id))
        .exec(&state.orm)
        .await?;

    if result.rows_affected > 0 {
        audit::record(
            &state.pool,
            user.user_id,
            "cart_remove",
            "cart_products",
            serde_json::json!({ "product_id": product.id }),
        )
        .await;
    }

    Ok(ApiResponse::success(
        "Removed from cart",
        CartUpdated {
            product_id: product.id,
            redirect: Destination::Cart.into(),
        },
        Some(Meta::empty()),
    ))
}

/// Snapshot the basket into a new purchase history entry and empty it, atomically.
pub async fn checkout(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<CheckoutResponse>> {
    let txn = state.orm.begin().await?;

    let cart = Carts::find()
        .filter(CartCol::UserId.eq(user.user_id))
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::Precondition(format!("user {} has no cart", user.user_id)))?;

    let product_ids: Vec<Uuid> = CartProducts::find()
        .filter(CartProductCol::CartId.eq(cart.id))
        .order_by_asc(CartProductCol::AddedAt)
        .all(&txn)
        .await?
        .into_iter()
        .map(|row| row.product_id)
        .collect();

    let history = HistoryActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.user_id),
        created_at: NotSet,
    }
    .insert(&txn)
    .await?;

    // An empty basket still yields a (empty) snapshot.
    if !product_ids.is_empty() {
        BuyHistoryProducts::insert_many(product_ids.iter().map(|product_id| HistoryProductActive {
            buy_history_id: Set(history.id),
            product_id: Set(*product_id),
        }))
        .exec_without_returning(&txn)
        .await?;
    }

    // clear cart
    CartProducts::delete_many()
        .filter(CartProductCol::CartId.eq(cart.id))
        .exec(&txn)
        .await?;

    let entry = load_entries(&txn, vec![history])
        .await?
        .pop()
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("purchase history not readable")))?;

    txn.commit().await?;

    tracing::info!(user_id = %user.user_id, history_id = %entry.id, items = product_ids.len(), "checkout");
    audit::record(
        &state.pool,
        user.user_id,
        "checkout",
        "buy_histories",
        serde_json::json!({ "buy_history_id": entry.id, "product_ids": product_ids }),
    )
    .await;

    Ok(ApiResponse::success(
        "Checkout success",
        CheckoutResponse {
            history: entry,
            redirect: Destination::Cart.into(),
        },
        Some(Meta::empty()),
    ))
}
