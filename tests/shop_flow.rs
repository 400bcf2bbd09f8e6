mod common;

use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use storefront_api::{
    dto::{auth::{LoginRequest, RegisterRequest}, cart::AddToCartRequest, navigation::Destination},
    entity::{
        buy_histories::{Column as HistoryCol, Entity as BuyHistories},
        carts::{Column as CartCol, Entity as Carts},
    },
    error::AppError,
    middleware::auth::decode_token,
    routes::params::Pagination,
    services::{auth_service, cart_service, history_service},
};
use uuid::Uuid;

// register -> add P1, P2 -> remove P1 -> checkout -> history holds P2, basket empty.
#[tokio::test]
async fn cart_and_checkout_flow() -> anyhow::Result<()> {
    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };

    let user = common::register(&state, "shopper").await?;
    let cart = Carts::find()
        .filter(CartCol::UserId.eq(user.user_id))
        .one(&state.orm)
        .await?;
    assert!(cart.is_some(), "registration must create a cart");

    let view = cart_service::view_cart(&state, &user).await?.data.unwrap();
    assert!(view.items.is_empty());

    let p1 = common::create_product(&state, "Widget One", 1000).await?;
    let p2 = common::create_product(&state, "Widget Two", 2500).await?;

    for product_id in [p1.id, p2.id, p2.id] {
        let resp = cart_service::add_to_cart(&state, &user, AddToCartRequest { product_id })
            .await?
            .data
            .unwrap();
        assert_eq!(resp.redirect.destination, Destination::ProductList);
    }

    let view = cart_service::view_cart(&state, &user).await?.data.unwrap();
    let mut ids: Vec<Uuid> = view.items.iter().map(|p| p.id).collect();
    ids.sort();
    let mut expected = vec![p1.id, p2.id];
    expected.sort();
    assert_eq!(ids, expected, "adding twice keeps a single copy");

    let removed = cart_service::remove_from_cart(&state, &user, &p1.slug)
        .await?
        .data
        .unwrap();
    assert_eq!(removed.redirect.destination, Destination::Cart);
    // second removal is a no-op
    cart_service::remove_from_cart(&state, &user, &p1.slug).await?;

    let view = cart_service::view_cart(&state, &user).await?.data.unwrap();
    assert_eq!(view.items.iter().map(|p| p.id).collect::<Vec<_>>(), vec![p2.id]);

    let checkout = cart_service::checkout(&state, &user).await?.data.unwrap();
    assert_eq!(
        checkout.history.products.iter().map(|p| p.id).collect::<Vec<_>>(),
        vec![p2.id]
    );
    assert_eq!(checkout.redirect.destination, Destination::Cart);

    let view = cart_service::view_cart(&state, &user).await?.data.unwrap();
    assert!(view.items.is_empty(), "checkout clears the basket");

    let history = history_service::list_history(&state, &user, Pagination::default())
        .await?
        .data
        .unwrap();
    assert_eq!(history.items.len(), 1);
    assert_eq!(history.items[0].id, checkout.history.id);
    assert_eq!(history.items[0].products[0].id, p2.id);

    // checking out an empty basket records an empty snapshot
    let again = cart_service::checkout(&state, &user).await?.data.unwrap();
    assert!(again.history.products.is_empty());
    let history = history_service::list_history(&state, &user, Pagination::default())
        .await?
        .data
        .unwrap();
    assert_eq!(history.items.len(), 2);
    assert_eq!(history.items[1].id, checkout.history.id);

    Ok(())
}

#[tokio::test]
async fn history_is_most_recent_first() -> anyhow::Result<()> {
    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };

    let user = common::register(&state, "collector").await?;
    let first = common::create_product(&state, "First Buy", 100).await?;
    let second = common::create_product(&state, "Second Buy", 200).await?;

    for product in [&first, &second] {
        cart_service::add_to_cart(&state, &user, AddToCartRequest { product_id: product.id }).await?;
        cart_service::checkout(&state, &user).await?;
    }

    let history = history_service::list_history(&state, &user, Pagination::default())
        .await?
        .data
        .unwrap();
    let firsts: Vec<Uuid> = history.items.iter().map(|h| h.products[0].id).collect();
    assert_eq!(firsts, vec![second.id, first.id]);

    let other = common::register(&state, "stranger").await?;
    let theirs = history_service::list_history(&state, &other, Pagination::default())
        .await?
        .data
        .unwrap();
    assert!(theirs.items.is_empty(), "history is per user");

    Ok(())
}

#[tokio::test]
async fn unknown_products_are_not_found() -> anyhow::Result<()> {
    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };

    let user = common::register(&state, "lost").await?;
    let add = cart_service::add_to_cart(
        &state,
        &user,
        AddToCartRequest {
            product_id: Uuid::new_v4(),
        },
    )
    .await;
    assert!(matches!(add, Err(AppError::NotFound)));

    let remove = cart_service::remove_from_cart(&state, &user, "no-such-product").await;
    assert!(matches!(remove, Err(AppError::NotFound)));

    Ok(())
}

#[tokio::test]
async fn register_and_login() -> anyhow::Result<()> {
    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };

    let user = common::register(&state, "member").await?;

    let duplicate = auth_service::register_user(
        &state,
        RegisterRequest {
            username: user.username.clone(),
            password: "another-pass".into(),
            password_confirm: "another-pass".into(),
        },
    )
    .await;
    assert!(matches!(duplicate, Err(AppError::BadRequest(_))));

    let wrong = auth_service::login_user(
        &state,
        LoginRequest {
            username: user.username.clone(),
            password: "wrong-password".into(),
        },
    )
    .await;
    assert!(matches!(wrong, Err(AppError::BadRequest(_))));

    let login = auth_service::login_user(
        &state,
        LoginRequest {
            username: user.username.clone(),
            password: "correct-horse".into(),
        },
    )
    .await?
    .data
    .unwrap();
    let token = login.token.trim_start_matches("Bearer ");
    let decoded = decode_token(&state.config.jwt_secret, token)?;
    assert_eq!(decoded.user_id, user.user_id);

    let profile = auth_service::profile(&state, &user).await?.data.unwrap();
    assert_eq!(profile.user.username, user.username);
    assert!(profile.basket.is_empty());

    Ok(())
}

#[tokio::test]
async fn account_without_cart_is_a_precondition_violation() -> anyhow::Result<()> {
    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };

    let user = common::register(&state, "cartless").await?;
    let product = common::create_product(&state, "Orphan Item", 400).await?;
    Carts::delete_many()
        .filter(CartCol::UserId.eq(user.user_id))
        .exec(&state.orm)
        .await?;

    let view = cart_service::view_cart(&state, &user).await;
    assert!(matches!(view, Err(AppError::Precondition(_))));

    let add = cart_service::add_to_cart(
        &state,
        &user,
        AddToCartRequest {
            product_id: product.id,
        },
    )
    .await;
    assert!(matches!(add, Err(AppError::Precondition(_))));

    let checkout = cart_service::checkout(&state, &user).await;
    assert!(matches!(checkout, Err(AppError::Precondition(_))));

    let snapshots = BuyHistories::find()
        .filter(HistoryCol::UserId.eq(user.user_id))
        .count(&state.orm)
        .await?;
    assert_eq!(snapshots, 0, "failed checkout leaves no purchase history");

    Ok(())
}
