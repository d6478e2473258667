//! Commands accepted by the rules engine.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::catalog::GuestKind;
use crate::guest::GuestId;
use crate::state::Selection;

/// Target reference supplied with a targeted ability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "guests", rename_all = "snake_case")]
pub enum AbilityTarget {
    Guest(GuestId),
    Pair(GuestId, GuestId),
    #[default]
    None,
}

/// Every input the engine understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    StartGame,
    AdmitNextGuest,
    EndRound,
    SelectItem { selection: Selection },
    BanGuest { guest: GuestId },
    Dismiss,
    UseAbility { guest: GuestId },
    TargetAbility { guest: GuestId, target: AbilityTarget },
    AcceptPeek,
    RejectPeek,
    BuyGuest { kind: GuestKind },
    ExpandHouse,
    EndShop,
    AdvanceScenario,
}

impl Command {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::StartGame => "start_game",
            Self::AdmitNextGuest => "admit_next_guest",
            Self::EndRound => "end_round",
            Self::SelectItem { .. } => "select_item",
            Self::BanGuest { .. } => "ban_guest",
            Self::Dismiss => "dismiss",
            Self::UseAbility { .. } => "use_ability",
            Self::TargetAbility { .. } => "target_ability",
            Self::AcceptPeek => "accept_peek",
            Self::RejectPeek => "reject_peek",
            Self::BuyGuest { .. } => "buy_guest",
            Self::ExpandHouse => "expand_house",
            Self::EndShop => "end_shop",
            Self::AdvanceScenario => "advance_scenario",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
