//! Errors surfaced by the rules engine.
use thiserror::Error;

use crate::catalog::{Ability, GuestKind};
use crate::guest::GuestId;

/// Errors returned by command application.
///
/// Phase mismatches are not errors: an out-of-phase command returns the
/// state unchanged. Only ability misuse and catalog integrity problems are
/// reported here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RulesError {
    /// The catalog has no definition for an archetype it was asked to build.
    #[error("no catalog definition for archetype {0}")]
    UnknownArchetype(GuestKind),
    #[error("{0} has already used its ability this party")]
    AbilityAlreadyUsed(GuestId),
    #[error("invalid target for {actor}: {reason}")]
    InvalidTarget {
        actor: GuestId,
        reason: TargetProblem,
    },
    #[error("{0} has no ability that can be used on demand")]
    NoActiveAbility(GuestId),
    #[error("the house has no room for {ability}")]
    HouseFull { ability: Ability },
}

impl RulesError {
    /// Whether the caller may retry with a different command.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self, Self::UnknownArchetype(_))
    }

    pub(crate) const fn invalid(actor: GuestId, reason: TargetProblem) -> Self {
        Self::InvalidTarget { actor, reason }
    }
}

/// Why a target reference failed to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TargetProblem {
    #[error("the acting guest is not in the house")]
    ActorNotInHouse,
    #[error("target {0} is not in the house")]
    NotInHouse(GuestId),
    #[error("target {0} is not in the draw pile")]
    NotInPile(GuestId),
    #[error("the ability needs a target")]
    Missing,
    #[error("guests {0} and {1} are not next to each other")]
    NotAdjacent(GuestId, GuestId),
    #[error("a swap needs exactly one star and one non-star guest")]
    StarMismatch,
    #[error("target {0} has already been captured")]
    AlreadyBanked(GuestId),
}
