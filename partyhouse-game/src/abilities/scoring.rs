//! End-of-party scoring.
use serde::{Deserialize, Serialize};
use std::ops::AddAssign;

use crate::catalog::{Ability, GuestKind};
use crate::constants::{
    BARTENDER_CASH_PER_TROUBLE, COMEDIAN_FULL_HOUSE_BONUS, INTROVERT_BONUS_PER_EMPTY_SLOT,
    MASCOT_BONUS_PER_OLD_FRIEND, WRITER_POP_PER_TROUBLE,
};
use crate::guest::GuestInstance;

use super::spec;

/// Popularity and cash gained (or lost) in one go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Reward {
    pub popularity: i32,
    pub cash: i32,
}

impl Reward {
    #[must_use]
    pub const fn popularity(popularity: i32) -> Self {
        Self {
            popularity,
            cash: 0,
        }
    }

    #[must_use]
    pub const fn cash(cash: i32) -> Self {
        Self {
            popularity: 0,
            cash,
        }
    }
}

impl AddAssign for Reward {
    fn add_assign(&mut self, rhs: Self) {
        self.popularity = self.popularity.saturating_add(rhs.popularity);
        self.cash = self.cash.saturating_add(rhs.cash);
    }
}

/// Read-only view of the final house handed to scoring handlers.
#[derive(Debug, Clone, Copy)]
pub struct ScoringView<'a> {
    pub roster: &'a [&'a GuestInstance],
    pub house_size: u32,
}

impl ScoringView<'_> {
    #[must_use]
    pub fn count_kind(&self, kind: GuestKind) -> u32 {
        units_of(self.roster.iter().filter(|guest| guest.kind == kind).count())
    }

    #[must_use]
    pub fn active_trouble(&self) -> u32 {
        units_of(
            self.roster
                .iter()
                .filter(|guest| guest.has_active_trouble())
                .count(),
        )
    }

    #[must_use]
    pub fn empty_slots(&self) -> u32 {
        self.house_size.saturating_sub(units_of(self.roster.len()))
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.empty_slots() == 0
    }
}

fn units_of(count: usize) -> u32 {
    u32::try_from(count).unwrap_or(u32::MAX)
}

fn scaled(per_unit: i32, units: u32) -> i32 {
    per_unit.saturating_mul(i32::try_from(units).unwrap_or(i32::MAX))
}

/// Contextual bonuses for a roster, computed once per ability present.
#[must_use]
pub fn end_of_round_bonus(roster: &[&GuestInstance], house_size: u32) -> Reward {
    let view = ScoringView { roster, house_size };
    let mut total = Reward::default();
    for ability in Ability::ALL {
        let Some(handler) = spec(*ability).scoring else {
            continue;
        };
        let present = units_of(
            roster
                .iter()
                .filter(|guest| guest.ability == Some(*ability))
                .count(),
        );
        if present > 0 {
            total += handler(&view, present);
        }
    }
    total
}

/// Full end-of-party reward: each guest's own values (unless already banked)
/// plus the contextual bonuses.
#[must_use]
pub fn round_reward(roster: &[&GuestInstance], house_size: u32) -> Reward {
    let mut total = Reward::default();
    for guest in roster.iter().filter(|guest| !guest.reward_banked) {
        total += Reward {
            popularity: guest.popularity,
            cash: guest.cash,
        };
    }
    total += end_of_round_bonus(roster, house_size);
    total
}

/// Dancers score the square of their number, once for the whole group.
pub(super) fn dancer(_view: &ScoringView<'_>, present: u32) -> Reward {
    Reward::popularity(scaled(1, present.saturating_mul(present)))
}

pub(super) fn comedian(view: &ScoringView<'_>, present: u32) -> Reward {
    if view.is_full() {
        Reward::popularity(scaled(COMEDIAN_FULL_HOUSE_BONUS, present))
    } else {
        Reward::default()
    }
}

pub(super) fn mascot(view: &ScoringView<'_>, present: u32) -> Reward {
    let friends = view.count_kind(GuestKind::OldFriend);
    Reward::popularity(scaled(MASCOT_BONUS_PER_OLD_FRIEND, present.saturating_mul(friends)))
}

pub(super) fn introvert(view: &ScoringView<'_>, present: u32) -> Reward {
    let empty = view.empty_slots();
    Reward::popularity(scaled(
        INTROVERT_BONUS_PER_EMPTY_SLOT,
        present.saturating_mul(empty),
    ))
}

pub(super) fn bartender(view: &ScoringView<'_>, present: u32) -> Reward {
    let trouble = view.active_trouble();
    Reward::cash(scaled(
        BARTENDER_CASH_PER_TROUBLE,
        present.saturating_mul(trouble),
    ))
}

pub(super) fn writer(view: &ScoringView<'_>, present: u32) -> Reward {
    let trouble = view.active_trouble();
    Reward::popularity(scaled(WRITER_POP_PER_TROUBLE, present.saturating_mul(trouble)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::catalog;
    use crate::guest::GuestFactory;

    fn roster(kinds: &[GuestKind]) -> Vec<GuestInstance> {
        let mut factory = GuestFactory::starting_at(1);
        kinds
            .iter()
            .map(|kind| factory.instantiate(catalog(), *kind).unwrap())
            .collect()
    }

    fn refs(guests: &[GuestInstance]) -> Vec<&GuestInstance> {
        guests.iter().collect()
    }

    #[test]
    fn plain_guests_sum_their_values() {
        let mut guests = roster(&[GuestKind::OldFriend, GuestKind::RichPal]);
        guests[0].popularity = 2;
        guests[0].cash = 1;
        guests[1].popularity = 3;
        guests[1].cash = 0;
        let reward = round_reward(&refs(&guests), 5);
        assert_eq!(
            reward,
            Reward {
                popularity: 5,
                cash: 1
            }
        );
    }

    #[test]
    fn dancers_scale_quadratically() {
        for (count, expected) in [(1usize, 1), (2, 4), (3, 9), (4, 16)] {
            let guests = roster(&vec![GuestKind::Dancer; count]);
            let bonus = end_of_round_bonus(&refs(&guests), 10);
            assert_eq!(bonus.popularity, expected, "{count} dancers");
        }
    }

    #[test]
    fn comedian_needs_a_full_house() {
        let guests = roster(&[GuestKind::Comedian, GuestKind::OldFriend]);
        assert_eq!(end_of_round_bonus(&refs(&guests), 2).popularity, 5);
        assert_eq!(end_of_round_bonus(&refs(&guests), 3).popularity, 0);
    }

    #[test]
    fn mascot_and_introvert_count_context() {
        let guests = roster(&[
            GuestKind::Mascot,
            GuestKind::OldFriend,
            GuestKind::OldFriend,
            GuestKind::Introvert,
        ]);
        // mascot: 2 old friends, introvert: 3 empty slots of 7
        assert_eq!(end_of_round_bonus(&refs(&guests), 7).popularity, 5);
    }

    #[test]
    fn trouble_feeds_bartender_and_writer() {
        let mut guests = roster(&[
            GuestKind::Bartender,
            GuestKind::Writer,
            GuestKind::WildBuddy,
            GuestKind::WildBuddy,
        ]);
        assert_eq!(
            end_of_round_bonus(&refs(&guests), 5),
            Reward {
                popularity: 4,
                cash: 4
            }
        );
        guests[2].trouble_cancelled = true;
        assert_eq!(
            end_of_round_bonus(&refs(&guests), 5),
            Reward {
                popularity: 2,
                cash: 2
            }
        );
    }

    #[test]
    fn banked_rewards_are_not_counted_twice() {
        let mut guests = roster(&[GuestKind::Athlete, GuestKind::Caterer]);
        guests[0].reward_banked = true;
        let reward = round_reward(&refs(&guests), 5);
        assert_eq!(reward, Reward::cash(3));
    }
}
