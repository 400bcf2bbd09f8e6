use chrono::Utc;
use sea_orm::{
    ActiveValue::NotSet, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QuerySelect, Set,
    TransactionTrait,
};
use sea_orm::sea_query::{LockType, OnConflict};
use uuid::Uuid;

use crate::{
    audit,
    dto::{navigation::Destination, reactions::ReactionOutcome},
    entity::{
        comments::Entity as Comments,
        products::Entity as Products,
        reactions::{ActiveModel as ReactionActive, Column as ReactionCol, Entity as Reactions, ReactionKind},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    reaction::{ReactionCounts, ReactionState, ReactionTarget},
    response::{ApiResponse, Meta},
    services::catalog_service::find_product_by_slug,
    state::AppState,
};

pub async fn react_to_product(
    state: &AppState,
    user: &AuthUser,
    slug: &str,
    action: ReactionKind,
) -> AppResult<ApiResponse<ReactionOutcome>> {
    let product = find_product_by_slug(&state.orm, slug).await?;
    react(
        state,
        user,
        ReactionTarget::Product(product.id),
        Destination::ProductList,
        action,
    )
    .await
}

pub async fn react_to_comment(
    state: &AppState,
    user: &AuthUser,
    comment_id: Uuid,
    action: ReactionKind,
) -> AppResult<ApiResponse<ReactionOutcome>> {
    let target = ReactionTarget::Comment(comment_id);
    let destination = resolve_destination(&state.orm, target).await?;
    react(state, user, target, destination, action).await
}

/// Where the client goes after reacting: the listing for products, the
/// parent product's page for comments. Unknown targets are `NotFound`.
pub async fn resolve_destination<C: ConnectionTrait>(
    conn: &C,
    target: ReactionTarget,
) -> AppResult<Destination> {
    match target {
        ReactionTarget::Product(id) => {
            Products::find_by_id(id)
                .one(conn)
                .await?
                .ok_or(AppError::NotFound)?;
            Ok(Destination::ProductList)
        }
        ReactionTarget::Comment(id) => {
            let (_, product) = Comments::find_by_id(id)
                .find_also_related(Products)
                .one(conn)
                .await?
                .ok_or(AppError::NotFound)?;
            let product = product.ok_or(AppError::NotFound)?;
            Ok(Destination::product_detail(product.slug))
        }
    }
}

async fn react(
    state: &AppState,
    user: &AuthUser,
    target: ReactionTarget,
    destination: Destination,
    action: ReactionKind,
) -> AppResult<ApiResponse<ReactionOutcome>> {
    let (next, counts) = toggle(state, user.user_id, target, action).await?;

    tracing::debug!(
        user_id = %user.user_id,
        target_kind = ?target.kind(),
        target_id = %target.id(),
        ?action,
        state = ?next,
        "reaction toggled"
    );
    audit::record(
        &state.pool,
        user.user_id,
        "reaction_toggle",
        "reactions",
        serde_json::json!({
            "target_kind": target.kind(),
            "target_id": target.id(),
            "action": action,
            "state": next,
        }),
    )
    .await;

    Ok(ApiResponse::success(
        "Reaction updated",
        ReactionOutcome {
            target_kind: target.kind(),
            target_id: target.id(),
            state: next,
            counts,
            redirect: destination.into(),
        },
        Some(Meta::empty()),
    ))
}

/// Apply `action` to the caller's reaction on `target` and return the new
/// state with fresh tallies. The existing row is locked for the duration so
/// repeated clicks from one user serialize; the insert path is an upsert so
/// two first clicks racing cannot produce two rows.
pub async fn toggle(
    state: &AppState,
    user_id: Uuid,
    target: ReactionTarget,
    action: ReactionKind,
) -> AppResult<(ReactionState, ReactionCounts)> {
    let txn = state.orm.begin().await?;

    let existing = Reactions::find()
        .filter(ReactionCol::UserId.eq(user_id))
        .filter(ReactionCol::TargetKind.eq(target.kind()))
        .filter(ReactionCol::TargetId.eq(target.id()))
        .lock(LockType::Update)
        .one(&txn)
        .await?;

    let current = ReactionState::from_kind(existing.map(|r| r.kind));
    let next = current.apply(action);

    match next.kind() {
        Some(kind) => {
            Reactions::insert(ReactionActive {
                id: Set(Uuid::new_v4()),
                user_id: Set(user_id),
                target_kind: Set(target.kind()),
                target_id: Set(target.id()),
                kind: Set(kind),
                created_at: NotSet,
                updated_at: Set(Utc::now().into()),
            })
            .on_conflict(
                OnConflict::columns([
                    ReactionCol::UserId,
                    ReactionCol::TargetKind,
                    ReactionCol::TargetId,
                ])
                .update_columns([ReactionCol::Kind, ReactionCol::UpdatedAt])
                .to_owned(),
            )
            .exec_without_returning(&txn)
            .await?;
        }
        None => {
            Reactions::delete_many()
                .filter(ReactionCol::UserId.eq(user_id))
                .filter(ReactionCol::TargetKind.eq(target.kind()))
                .filter(ReactionCol::TargetId.eq(target.id()))
                .exec(&txn)
                .await?;
        }
    }

    let counts = counts_for(&txn, target).await?;
    txn.commit().await?;

    Ok((next, counts))
}

/// The state `user_id` currently holds for `target`.
pub async fn current_state<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
    target: ReactionTarget,
) -> AppResult<ReactionState> {
    let existing = Reactions::find()
        .filter(ReactionCol::UserId.eq(user_id))
        .filter(ReactionCol::TargetKind.eq(target.kind()))
        .filter(ReactionCol::TargetId.eq(target.id()))
        .one(conn)
        .await?;
    Ok(ReactionState::from_kind(existing.map(|r| r.kind)))
}

pub async fn counts_for<C: ConnectionTrait>(conn: &C, target: ReactionTarget) -> AppResult<ReactionCounts> {
    let rows = Reactions::find()
        .filter(ReactionCol::TargetKind.eq(target.kind()))
        .filter(ReactionCol::TargetId.eq(target.id()))
        .all(conn)
        .await?;

    let mut counts = ReactionCounts::default();
    for row in rows {
        counts.add(row.kind);
    }
    Ok(counts)
}
