mod common;

use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use storefront_api::{
    dto::{comments::CreateCommentRequest, navigation::Destination},
    entity::reactions::{Column as ReactionCol, Entity as Reactions, ReactionKind, TargetKind},
    error::AppError,
    reaction::{ReactionCounts, ReactionState, ReactionTarget},
    services::{catalog_service, comment_service, reaction_service},
};
use uuid::Uuid;

// like C -> LIKED; like C again -> NONE; dislike C -> DISLIKED.
#[tokio::test]
async fn comment_reaction_toggles() -> anyhow::Result<()> {
    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };

    let user = common::register(&state, "critic").await?;
    let product = common::create_product(&state, "Reviewed Mug", 900).await?;

    let created = comment_service::add_comment(
        &state,
        &user,
        &product.slug,
        CreateCommentRequest {
            content: "  Sturdy and warm  ".into(),
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(created.comment.content, "Sturdy and warm");
    assert_eq!(
        created.redirect.destination,
        Destination::product_detail(product.slug.clone())
    );
    let comment_id = created.comment.id;

    let liked = reaction_service::react_to_comment(&state, &user, comment_id, ReactionKind::Like)
        .await?
        .data
        .unwrap();
    assert_eq!(liked.state, ReactionState::Liked);
    assert_eq!(liked.counts, ReactionCounts { likes: 1, dislikes: 0 });
    assert_eq!(liked.target_kind, TargetKind::Comment);
    assert_eq!(
        liked.redirect.destination,
        Destination::product_detail(product.slug.clone())
    );

    let retracted = reaction_service::react_to_comment(&state, &user, comment_id, ReactionKind::Like)
        .await?
        .data
        .unwrap();
    assert_eq!(retracted.state, ReactionState::None);
    assert_eq!(retracted.counts, ReactionCounts::default());

    let disliked =
        reaction_service::react_to_comment(&state, &user, comment_id, ReactionKind::Dislike)
            .await?
            .data
            .unwrap();
    assert_eq!(disliked.state, ReactionState::Disliked);
    assert_eq!(disliked.counts, ReactionCounts { likes: 0, dislikes: 1 });

    let stored =
        reaction_service::current_state(&state.orm, user.user_id, ReactionTarget::Comment(comment_id))
            .await?;
    assert_eq!(stored, ReactionState::Disliked);

    Ok(())
}

#[tokio::test]
async fn product_reaction_switches_and_retracts() -> anyhow::Result<()> {
    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };

    let alice = common::register(&state, "alice").await?;
    let bob = common::register(&state, "bob").await?;
    let product = common::create_product(&state, "Popular Hoodie", 5000).await?;

    let outcome = reaction_service::react_to_product(&state, &alice, &product.slug, ReactionKind::Like)
        .await?
        .data
        .unwrap();
    assert_eq!(outcome.state, ReactionState::Liked);
    assert_eq!(outcome.redirect.destination, Destination::ProductList);

    let outcome =
        reaction_service::react_to_product(&state, &alice, &product.slug, ReactionKind::Dislike)
            .await?
            .data
            .unwrap();
    assert_eq!(outcome.state, ReactionState::Disliked);
    assert_eq!(outcome.counts, ReactionCounts { likes: 0, dislikes: 1 });

    let outcome = reaction_service::react_to_product(&state, &bob, &product.slug, ReactionKind::Like)
        .await?
        .data
        .unwrap();
    assert_eq!(outcome.state, ReactionState::Liked);
    assert_eq!(outcome.counts, ReactionCounts { likes: 1, dislikes: 1 });

    let outcome =
        reaction_service::react_to_product(&state, &alice, &product.slug, ReactionKind::Dislike)
            .await?
            .data
            .unwrap();
    assert_eq!(outcome.state, ReactionState::None);
    assert_eq!(outcome.counts, ReactionCounts { likes: 1, dislikes: 0 });

    let detail = catalog_service::get_product_detail(&state, &product.slug, Some(&bob))
        .await?
        .data
        .unwrap();
    assert_eq!(detail.reactions, ReactionCounts { likes: 1, dislikes: 0 });
    assert_eq!(detail.my_reaction, Some(ReactionState::Liked));

    let anonymous = catalog_service::get_product_detail(&state, &product.slug, None)
        .await?
        .data
        .unwrap();
    assert_eq!(anonymous.my_reaction, None);

    Ok(())
}

#[tokio::test]
async fn concurrent_first_clicks_leave_one_reaction() -> anyhow::Result<()> {
    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };

    let user = common::register(&state, "double-click").await?;
    let product = common::create_product(&state, "Contested Sticker", 300).await?;
    let target = ReactionTarget::Product(product.id);

    let (a, b) = tokio::join!(
        reaction_service::toggle(&state, user.user_id, target, ReactionKind::Like),
        reaction_service::toggle(&state, user.user_id, target, ReactionKind::Like),
    );
    a?;
    b?;

    let rows = Reactions::find()
        .filter(ReactionCol::UserId.eq(user.user_id))
        .filter(ReactionCol::TargetId.eq(product.id))
        .count(&state.orm)
        .await?;
    assert!(rows <= 1, "at most one reaction per user and target");

    Ok(())
}

#[tokio::test]
async fn comments_and_reactions_reject_bad_input() -> anyhow::Result<()> {
    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };

    let user = common::register(&state, "strict").await?;
    let product = common::create_product(&state, "Quiet Lamp", 700).await?;

    let blank = comment_service::add_comment(
        &state,
        &user,
        &product.slug,
        CreateCommentRequest {
            content: "   ".into(),
        },
    )
    .await;
    assert!(matches!(blank, Err(AppError::Validation(_))));

    let missing_product = comment_service::add_comment(
        &state,
        &user,
        "no-such-product",
        CreateCommentRequest {
            content: "hello".into(),
        },
    )
    .await;
    assert!(matches!(missing_product, Err(AppError::NotFound)));

    let missing_comment =
        reaction_service::react_to_comment(&state, &user, Uuid::new_v4(), ReactionKind::Like).await;
    assert!(matches!(missing_comment, Err(AppError::NotFound)));

    let missing_slug =
        reaction_service::react_to_product(&state, &user, "no-such-product", ReactionKind::Dislike)
            .await;
    assert!(matches!(missing_slug, Err(AppError::NotFound)));

    let detail = catalog_service::get_product_detail(&state, &product.slug, Some(&user))
        .await?
        .data
        .unwrap();
    assert!(detail.comments.is_empty(), "rejected comments are not stored");

    Ok(())
}
