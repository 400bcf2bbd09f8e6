//! Like/dislike toggling shared by products and comments.
//!
//! A user holds at most one reaction per target. Repeating the reaction the
//! user already holds retracts it; choosing the opposite one switches it.

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::reactions::{ReactionKind, TargetKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReactionState {
    #[default]
    None,
    Liked,
    Disliked,
}

impl ReactionState {
    pub fn from_kind(kind: Option<ReactionKind>) -> Self {
        match kind {
            None => ReactionState::None,
            Some(ReactionKind::Like) => ReactionState::Liked,
            Some(ReactionKind::Dislike) => ReactionState::Disliked,
        }
    }

    /// The reaction row this state is stored as, if any.
    pub fn kind(self) -> Option<ReactionKind> {
        match self {
            ReactionState::None => None,
            ReactionState::Liked => Some(ReactionKind::Like),
            ReactionState::Disliked => Some(ReactionKind::Dislike),
        }
    }

    pub fn apply(self, action: ReactionKind) -> Self {
        match (self, action) {
            (ReactionState::Liked, ReactionKind::Like) => ReactionState::None,
            (ReactionState::Disliked, ReactionKind::Dislike) => ReactionState::None,
            (_, ReactionKind::Like) => ReactionState::Liked,
            (_, ReactionKind::Dislike) => ReactionState::Disliked,
        }
    }
}

/// The entity a reaction is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReactionTarget {
    Product(Uuid),
    Comment(Uuid),
}

impl ReactionTarget {
    pub fn kind(&self) -> TargetKind {
        match self {
            ReactionTarget::Product(_) => TargetKind::Product,
            ReactionTarget::Comment(_) => TargetKind::Comment,
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            ReactionTarget::Product(id) | ReactionTarget::Comment(id) => *id,
        }
    }
}

/// Like/dislike totals for one target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct ReactionCounts {
    pub likes: i64,
    pub dislikes: i64,
}

impl ReactionCounts {
    pub fn add(&mut self, kind: ReactionKind) {
        match kind {
            ReactionKind::Like => self.likes += 1,
            ReactionKind::Dislike => self.dislikes += 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use ReactionKind::{Dislike, Like};
    use ReactionState::{Disliked, Liked, None};

    #[test]
    fn first_reaction_activates() {
        assert_eq!(None.apply(Like), Liked);
        assert_eq!(None.apply(Dislike), Disliked);
    }

    #[test]
    fn repeating_a_reaction_retracts_it() {
        assert_eq!(Liked.apply(Like), None);
        assert_eq!(Disliked.apply(Dislike), None);
    }

    #[test]
    fn opposite_reaction_switches() {
        assert_eq!(Liked.apply(Dislike), Disliked);
        assert_eq!(Disliked.apply(Like), Liked);
    }

    #[test]
    fn click_sequence_never_holds_both() {
        let clicks = [Like, Like, Dislike, Like, Dislike, Dislike, Like];
        let mut state = None;
        let mut seen = Vec::new();
        for click in clicks {
            state = state.apply(click);
            seen.push(state);
        }
        assert_eq!(
            seen,
            vec![Liked, None, Disliked, Liked, Disliked, None, Liked]
        );
    }

    #[test]
    fn state_round_trips_through_stored_kind() {
        for state in [None, Liked, Disliked] {
            assert_eq!(ReactionState::from_kind(state.kind()), state);
        }
    }

    #[test]
    fn target_exposes_kind_and_id() {
        let id = Uuid::new_v4();
        assert_eq!(ReactionTarget::Product(id).kind(), TargetKind::Product);
        assert_eq!(ReactionTarget::Comment(id).kind(), TargetKind::Comment);
        assert_eq!(ReactionTarget::Comment(id).id(), id);
    }

    #[test]
    fn counts_tally_by_kind() {
        let mut counts = ReactionCounts::default();
        counts.add(Like);
        counts.add(Like);
        counts.add(Dislike);
        assert_eq!(counts, ReactionCounts { likes: 2, dislikes: 1 });
    }
}
