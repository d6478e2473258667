//! Admission cascade and the effects that fire as a guest walks in.
use crate::catalog::Ability;
use crate::constants::{
    CLIMBER_POP_PER_LEVEL, LOG_GUEST_ADMITTED, LOG_GUEST_BROUGHT, LOG_PEEK_REVEALED,
    LOG_REWARD_BANKED, LOG_TROUBLE_CANCELLED,
};
use crate::engine::RulesContext;
use crate::guest::{ExtensionKind, GuestExtension, GuestId};
use crate::shuffle::pick;
use crate::state::{GameState, PartyAction};

use super::{Reward, spec};

/// Place a guest in the house and resolve its arrival effects.
///
/// The caller has already taken the guest out of the draw pile and checked
/// capacity. `slot` inserts at a specific house position instead of the end.
/// Shutdown is not evaluated here; callers check once the cascade settles.
pub(crate) fn admit_guest(
    state: &mut GameState,
    id: GuestId,
    ctx: &mut RulesContext<'_>,
    slot: Option<usize>,
) {
    match slot {
        Some(index) if index < state.house.len() => state.house.insert(index, id),
        _ => state.house.push(id),
    }
    state.record(LOG_GUEST_ADMITTED);

    let handler = state
        .guest(id)
        .and_then(|guest| guest.ability)
        .and_then(|ability| spec(ability).on_admit);
    if let Some(handler) = handler {
        log::trace!("resolving arrival effect for {id}");
        handler(state, id, ctx);
    }
    settle_cancellers(state);
    state.recount();
}

/// Pair every unspent canceller in the house with active trouble.
///
/// Cancellers are spent in admission order; each takes the most recently
/// admitted trouble guest still active. A canceller with nothing to cancel
/// stays armed for trouble arriving later in the party.
pub(crate) fn settle_cancellers(state: &mut GameState) {
    loop {
        let canceller = state
            .house_guests()
            .find(|guest| guest.ability == Some(Ability::CancelTrouble) && !guest.ability_used)
            .map(|guest| guest.id);
        let target = state
            .house
            .iter()
            .rev()
            .filter_map(|id| state.guest(*id))
            .find(|guest| guest.has_active_trouble())
            .map(|guest| guest.id);
        let (Some(canceller), Some(target)) = (canceller, target) else {
            break;
        };
        if let Some(guest) = state.guest_mut(target) {
            guest.trouble_cancelled = true;
            guest.cancelled_by = Some(canceller);
        }
        if let Some(guest) = state.guest_mut(canceller) {
            guest.ability_used = true;
        }
        log::trace!("{canceller} cancelled trouble from {target}");
        state.record(LOG_TROUBLE_CANCELLED);
    }
}

/// Undo cancellations that no longer hold once `departed` left the house.
///
/// A departing trouble guest loses its cancellation and hands the canceller
/// its charge back. A departing canceller takes its cancellations with it and
/// is armed again for its next admission. Callers settle cancellers and
/// recount afterwards.
pub(crate) fn release_departed(state: &mut GameState, departed: &[GuestId]) {
    for &id in departed {
        let Some(guest) = state.guest_mut(id) else {
            continue;
        };
        let canceller = guest.cancelled_by.take();
        guest.trouble_cancelled = false;
        let was_canceller = guest.ability == Some(Ability::CancelTrouble);
        if was_canceller {
            guest.ability_used = false;
        }
        if let Some(canceller) = canceller
            && let Some(record) = state.guest_mut(canceller)
        {
            record.ability_used = false;
        }
        if was_canceller {
            for guest in &mut state.rolodex {
                if guest.cancelled_by == Some(id) {
                    guest.cancelled_by = None;
                    guest.trouble_cancelled = false;
                }
            }
        }
    }
}

pub(super) fn arm_canceller(state: &mut GameState, _id: GuestId, _ctx: &mut RulesContext<'_>) {
    settle_cancellers(state);
}

pub(super) fn peek(state: &mut GameState, _id: GuestId, _ctx: &mut RulesContext<'_>) {
    if state.action != PartyAction::Idle {
        return;
    }
    if let Some(next) = state.draw_pile.first().copied() {
        state.action = PartyAction::Peeking(next);
        state.record(LOG_PEEK_REVEALED);
    }
}

pub(super) fn bring_one(state: &mut GameState, _id: GuestId, ctx: &mut RulesContext<'_>) {
    bring(state, ctx, 1);
}

pub(super) fn bring_two(state: &mut GameState, _id: GuestId, ctx: &mut RulesContext<'_>) {
    bring(state, ctx, 2);
}

/// Pull random guests from the pile straight into the house; extras beyond
/// capacity are dropped.
fn bring(state: &mut GameState, ctx: &mut RulesContext<'_>, count: usize) {
    for _ in 0..count {
        if state.is_full() {
            break;
        }
        let Some(index) = pick(&mut *ctx.ability, state.draw_pile.len()) else {
            break;
        };
        let guest = state.draw_pile.remove(index);
        state.record(LOG_GUEST_BROUGHT);
        admit_guest(state, guest, ctx, None);
    }
}

/// Admit the next guest from the pile and bank its reward on the spot.
pub(super) fn greet(state: &mut GameState, _id: GuestId, ctx: &mut RulesContext<'_>) {
    if state.is_full() || state.draw_pile.is_empty() {
        return;
    }
    let next = state.draw_pile.remove(0);
    admit_guest(state, next, ctx, None);
    let Some(guest) = state.guest_mut(next) else {
        return;
    };
    if guest.reward_banked {
        return;
    }
    guest.reward_banked = true;
    let reward = Reward {
        popularity: guest.popularity,
        cash: guest.cash,
    };
    state.bank(reward);
    state.record(LOG_REWARD_BANKED);
}

/// Climbers gain a level on each return in a later party.
pub(super) fn climb(state: &mut GameState, id: GuestId, ctx: &mut RulesContext<'_>) {
    let round = state.round;
    let cap = ctx.config.climber_max_level;
    let Some(guest) = state.guest_mut(id) else {
        return;
    };
    let mut climbed = false;
    if let Some(GuestExtension::Climb { level, last_round }) =
        guest.extension_mut(ExtensionKind::Climb)
    {
        if last_round.is_some_and(|last| round > last) && *level < cap {
            *level += 1;
            climbed = true;
        }
        *last_round = Some(round);
    }
    if climbed {
        guest.popularity = guest.popularity.saturating_add(CLIMBER_POP_PER_LEVEL);
    }
}

/// Werewolves cause trouble on every other appearance, starting with the first.
pub(super) fn howl(state: &mut GameState, id: GuestId, _ctx: &mut RulesContext<'_>) {
    let Some(guest) = state.guest_mut(id) else {
        return;
    };
    let mut troubled = None;
    if let Some(GuestExtension::Appearances { count }) =
        guest.extension_mut(ExtensionKind::Appearances)
    {
        troubled = Some(*count % 2 == 0);
        *count = count.saturating_add(1);
    }
    if let Some(troubled) = troubled {
        guest.trouble_active = troubled;
    }
}
