//! Game state snapshot and its bookkeeping helpers.
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

use crate::abilities::Reward;
use crate::catalog::{Catalog, GuestKind, Scenario};
use crate::config::{Intermission, RulesConfig};
use crate::constants::{CAPTION_TITLE, JOURNAL_WINDOW};
use crate::guest::{GuestId, GuestInstance};

/// Lifecycle phase of a scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Title,
    Party,
    PartyEnded,
    Shutdown,
    Shop,
    ScenarioWon,
    ScenarioLost,
}

impl Phase {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Party => "party",
            Self::PartyEnded => "party_ended",
            Self::Shutdown => "shutdown",
            Self::Shop => "shop",
            Self::ScenarioWon => "scenario_won",
            Self::ScenarioLost => "scenario_lost",
        }
    }

    /// Scenario is over and only dismiss, advance, or restart apply.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::ScenarioWon | Self::ScenarioLost)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Item currently highlighted by the input collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "guest", rename_all = "snake_case")]
pub enum Selection {
    Guest(GuestId),
    #[default]
    EntryPoint,
    None,
}

/// Pending interaction inside a party.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "guest", rename_all = "snake_case")]
pub enum PartyAction {
    #[default]
    Idle,
    /// The head of the draw pile has been revealed and awaits accept/reject.
    Peeking(GuestId),
    /// The guest's targeted ability is armed and waits for a target.
    Targeting(GuestId),
}

/// Complete, immutable-by-convention snapshot of a scenario in progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub phase: Phase,
    pub scenario_index: usize,
    pub round: u32,
    pub round_limit: u32,
    pub turns_remaining: u32,
    pub popularity: i32,
    pub popularity_cap: i32,
    pub cash: i32,
    pub cash_cap: i32,
    pub house_size: u32,
    pub max_house_size: u32,
    pub next_expansion_cost: i32,
    /// Guests in the house in admission order.
    pub house: Vec<GuestId>,
    /// Every instance owned this scenario, banned ones included.
    pub rolodex: Vec<GuestInstance>,
    /// Remaining draw order; index 0 is the next guest through the door.
    pub draw_pile: Vec<GuestId>,
    pub stars_required: u32,
    pub star_count: u32,
    pub trouble_count: u32,
    pub trouble_limit: u32,
    pub selection: Selection,
    pub action: PartyAction,
    pub intermission: Intermission,
    /// Set on the title screen after a won scenario; unlocks `AdvanceScenario`.
    #[serde(default)]
    pub scenario_cleared: bool,
    pub caption: String,
    #[serde(default)]
    pub journal: Vec<String>,
}

impl GameState {
    /// Title-screen state before any scenario has started.
    #[must_use]
    pub fn title(config: &RulesConfig) -> Self {
        Self {
            phase: Phase::Title,
            scenario_index: 0,
            round: 0,
            round_limit: config.round_limit,
            turns_remaining: config.round_limit,
            popularity: 0,
            popularity_cap: config.popularity_cap,
            cash: 0,
            cash_cap: config.cash_cap,
            house_size: config.initial_house_size,
            max_house_size: config.max_house_size,
            next_expansion_cost: config.initial_expansion_cost,
            house: Vec::new(),
            rolodex: Vec::new(),
            draw_pile: Vec::new(),
            stars_required: config.stars_required,
            star_count: 0,
            trouble_count: 0,
            trouble_limit: config.trouble_limit,
            selection: Selection::EntryPoint,
            action: PartyAction::Idle,
            intermission: config.intermission,
            scenario_cleared: false,
            caption: String::from(CAPTION_TITLE),
            journal: Vec::new(),
        }
    }

    #[must_use]
    pub fn guest(&self, id: GuestId) -> Option<&GuestInstance> {
        self.rolodex.iter().find(|guest| guest.id == id)
    }

    pub(crate) fn guest_mut(&mut self, id: GuestId) -> Option<&mut GuestInstance> {
        self.rolodex.iter_mut().find(|guest| guest.id == id)
    }

    /// House roster in admission order.
    pub fn house_guests(&self) -> impl DoubleEndedIterator<Item = &GuestInstance> + '_ {
        self.house.iter().filter_map(|id| self.guest(*id))
    }

    #[must_use]
    pub fn in_house(&self, id: GuestId) -> bool {
        self.house.contains(&id)
    }

    #[must_use]
    pub fn in_pile(&self, id: GuestId) -> bool {
        self.draw_pile.contains(&id)
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.house.len() >= self.house_size as usize
    }

    #[must_use]
    pub fn free_slots(&self) -> u32 {
        let used = u32::try_from(self.house.len()).unwrap_or(u32::MAX);
        self.house_size.saturating_sub(used)
    }

    #[must_use]
    pub fn scenario<'a>(&self, catalog: &'a Catalog) -> Option<&'a Scenario> {
        catalog.scenario(self.scenario_index)
    }

    /// Number of instances of `kind` in the rolodex.
    #[must_use]
    pub fn owned_copies(&self, kind: GuestKind) -> u32 {
        let owned = self.rolodex.iter().filter(|guest| guest.kind == kind).count();
        u32::try_from(owned).unwrap_or(u32::MAX)
    }

    /// Non-banned rolodex guests, in rolodex order.
    #[must_use]
    pub fn eligible_guests(&self) -> Vec<GuestId> {
        self.rolodex
            .iter()
            .filter(|guest| !guest.banned)
            .map(|guest| guest.id)
            .collect()
    }

    /// Recompute the live trouble and star counters from the house roster.
    pub(crate) fn recount(&mut self) {
        let (trouble, stars) = self.house_guests().fold((0u32, 0u32), |(t, s), guest| {
            (
                t + u32::from(guest.has_active_trouble()),
                s + u32::from(guest.is_star),
            )
        });
        self.trouble_count = trouble;
        self.star_count = stars;
    }

    /// Add a reward to the running totals, clamped to `0..=cap`.
    pub(crate) fn bank(&mut self, reward: Reward) {
        self.popularity = self
            .popularity
            .saturating_add(reward.popularity)
            .clamp(0, self.popularity_cap.max(0));
        self.cash = self
            .cash
            .saturating_add(reward.cash)
            .clamp(0, self.cash_cap.max(0));
    }

    pub(crate) fn record(&mut self, key: impl Into<String>) {
        self.journal.push(key.into());
        if self.journal.len() > JOURNAL_WINDOW {
            let excess = self.journal.len() - JOURNAL_WINDOW;
            self.journal.drain(..excess);
        }
    }

    /// Verify the structural invariants every reachable state must satisfy.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        if self.house.len() > self.house_size as usize {
            return Err(InvariantViolation::HouseOverCapacity {
                guests: self.house.len(),
                capacity: self.house_size,
            });
        }
        let mut seen = HashSet::with_capacity(self.house.len() + self.draw_pile.len());
        for id in self.house.iter().chain(&self.draw_pile) {
            if !seen.insert(*id) {
                return Err(InvariantViolation::DuplicateMembership(*id));
            }
            if self.guest(*id).is_none() {
                return Err(InvariantViolation::UnknownGuest(*id));
            }
        }
        let trouble = self
            .house_guests()
            .filter(|guest| guest.has_active_trouble())
            .count();
        if trouble != self.trouble_count as usize {
            return Err(InvariantViolation::TroubleDrift {
                recorded: self.trouble_count,
                actual: trouble,
            });
        }
        let stars = self.house_guests().filter(|guest| guest.is_star).count();
        if stars != self.star_count as usize {
            return Err(InvariantViolation::StarDrift {
                recorded: self.star_count,
                actual: stars,
            });
        }
        if !(0..=self.popularity_cap).contains(&self.popularity)
            || !(0..=self.cash_cap).contains(&self.cash)
        {
            return Err(InvariantViolation::TotalsOutOfRange {
                popularity: self.popularity,
                cash: self.cash,
            });
        }
        Ok(())
    }
}

/// Structural invariant broken by a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("house holds {guests} guests but capacity is {capacity}")]
    HouseOverCapacity { guests: usize, capacity: u32 },
    #[error("{0} appears more than once across house and draw pile")]
    DuplicateMembership(GuestId),
    #[error("{0} is not in the rolodex")]
    UnknownGuest(GuestId),
    #[error("trouble count {recorded} does not match roster ({actual})")]
    TroubleDrift { recorded: u32, actual: usize },
    #[error("star count {recorded} does not match roster ({actual})")]
    StarDrift { recorded: u32, actual: usize },
    #[error("totals out of range: popularity {popularity}, cash {cash}")]
    TotalsOutOfRange { popularity: i32, cash: i32 },
}
