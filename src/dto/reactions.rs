use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    dto::navigation::Redirect,
    entity::reactions::TargetKind,
    reaction::{ReactionCounts, ReactionState},
};

#[derive(Debug, Serialize, ToSchema)]
pub struct ReactionOutcome {
    pub target_kind: TargetKind,
    pub target_id: Uuid,
    pub state: ReactionState,
    pub counts: ReactionCounts,
    pub redirect: Redirect,
}
