//! On-demand abilities issued by the player.
use crate::catalog::Ability;
use crate::command::AbilityTarget;
use crate::constants::{
    LOG_ABILITY_USED_PREFIX, LOG_GUEST_BOOTED, LOG_GUEST_FETCHED, LOG_REWARD_BANKED,
    STYLIST_POP_GAIN,
};
use crate::engine::RulesContext;
use crate::error::{RulesError, TargetProblem};
use crate::guest::GuestId;
use crate::shuffle::shuffle;
use crate::state::GameState;

use super::{AbilitySpec, Reward, admit_guest, release_departed, settle_cancellers, spec};

/// Check that `actor` is in the house with an unspent on-demand ability.
///
/// # Errors
///
/// `InvalidTarget` if the actor is not in the house, `NoActiveAbility` if its
/// ability is not player-activated, `AbilityAlreadyUsed` if it is spent.
pub(crate) fn validate_actor(
    state: &GameState,
    actor: GuestId,
) -> Result<&'static AbilitySpec, RulesError> {
    let guest = state
        .guest(actor)
        .filter(|_| state.in_house(actor))
        .ok_or(RulesError::invalid(actor, TargetProblem::ActorNotInHouse))?;
    let entry = guest
        .ability
        .map(spec)
        .filter(|entry| entry.is_on_demand())
        .ok_or(RulesError::NoActiveAbility(actor))?;
    if guest.ability_used {
        return Err(RulesError::AbilityAlreadyUsed(actor));
    }
    Ok(entry)
}

/// Resolve an on-demand ability and spend it.
///
/// # Errors
///
/// Propagates actor validation failures and target resolution failures. The
/// state is only touched once the target has resolved.
pub(crate) fn resolve_on_demand(
    state: &mut GameState,
    actor: GuestId,
    target: AbilityTarget,
    ctx: &mut RulesContext<'_>,
) -> Result<(), RulesError> {
    let entry = validate_actor(state, actor)?;
    let Some(handler) = entry.on_demand else {
        return Err(RulesError::NoActiveAbility(actor));
    };
    handler(state, actor, target, ctx)?;
    if let Some(guest) = state.guest_mut(actor) {
        guest.ability_used = true;
    }
    settle_cancellers(state);
    state.recount();
    log::trace!("{actor} used {}", entry.ability);
    state.record(format!("{LOG_ABILITY_USED_PREFIX}{}", entry.ability.key()));
    Ok(())
}

fn house_target(
    state: &GameState,
    actor: GuestId,
    target: AbilityTarget,
) -> Result<GuestId, RulesError> {
    match target {
        AbilityTarget::Guest(id) if state.in_house(id) => Ok(id),
        AbilityTarget::Guest(id) => Err(RulesError::invalid(actor, TargetProblem::NotInHouse(id))),
        AbilityTarget::Pair(..) | AbilityTarget::None => {
            Err(RulesError::invalid(actor, TargetProblem::Missing))
        }
    }
}

fn pair_target(actor: GuestId, target: AbilityTarget) -> Result<(GuestId, GuestId), RulesError> {
    match target {
        AbilityTarget::Pair(first, second) => Ok((first, second)),
        AbilityTarget::Guest(_) | AbilityTarget::None => {
            Err(RulesError::invalid(actor, TargetProblem::Missing))
        }
    }
}

/// Pull a named guest out of the draw pile into the house.
pub(super) fn fetch(
    state: &mut GameState,
    actor: GuestId,
    target: AbilityTarget,
    ctx: &mut RulesContext<'_>,
) -> Result<(), RulesError> {
    let id = match target {
        AbilityTarget::Guest(id) => id,
        AbilityTarget::Pair(..) | AbilityTarget::None => {
            return Err(RulesError::invalid(actor, TargetProblem::Missing));
        }
    };
    let Some(index) = state.draw_pile.iter().position(|queued| *queued == id) else {
        return Err(RulesError::invalid(actor, TargetProblem::NotInPile(id)));
    };
    if state.is_full() {
        return Err(RulesError::HouseFull {
            ability: Ability::Fetch,
        });
    }
    state.draw_pile.remove(index);
    state.record(LOG_GUEST_FETCHED);
    admit_guest(state, id, ctx, None);
    Ok(())
}

/// Remove one guest from the house for the rest of the party.
pub(super) fn boot(
    state: &mut GameState,
    actor: GuestId,
    target: AbilityTarget,
    _ctx: &mut RulesContext<'_>,
) -> Result<(), RulesError> {
    let id = house_target(state, actor, target)?;
    state.house.retain(|guest| *guest != id);
    release_departed(state, &[id]);
    state.record(LOG_GUEST_BOOTED);
    Ok(())
}

/// Remove two guests standing next to each other.
pub(super) fn boot_pair(
    state: &mut GameState,
    actor: GuestId,
    target: AbilityTarget,
    _ctx: &mut RulesContext<'_>,
) -> Result<(), RulesError> {
    let (first, second) = pair_target(actor, target)?;
    let position = |id: GuestId| state.house.iter().position(|guest| *guest == id);
    let a = position(first)
        .ok_or(RulesError::invalid(actor, TargetProblem::NotInHouse(first)))?;
    let b = position(second)
        .ok_or(RulesError::invalid(actor, TargetProblem::NotInHouse(second)))?;
    if a.abs_diff(b) != 1 {
        return Err(RulesError::invalid(
            actor,
            TargetProblem::NotAdjacent(first, second),
        ));
    }
    state.house.retain(|guest| *guest != first && *guest != second);
    release_departed(state, &[first, second]);
    state.record(LOG_GUEST_BOOTED);
    state.record(LOG_GUEST_BOOTED);
    Ok(())
}

/// Send everyone in the house back into the pile and reshuffle it.
pub(super) fn shuffle_out(
    state: &mut GameState,
    _actor: GuestId,
    _target: AbilityTarget,
    ctx: &mut RulesContext<'_>,
) -> Result<(), RulesError> {
    let mut pool = std::mem::take(&mut state.house);
    release_departed(state, &pool);
    pool.append(&mut state.draw_pile);
    state.draw_pile = shuffle(&mut *ctx.draw, &pool);
    Ok(())
}

/// Swap a star and a non-star between the house and the pile.
///
/// The pair may name the two guests in either order. The guest coming in
/// takes the departing guest's place and runs its own arrival effects.
pub(super) fn swap_star(
    state: &mut GameState,
    actor: GuestId,
    target: AbilityTarget,
    ctx: &mut RulesContext<'_>,
) -> Result<(), RulesError> {
    let (first, second) = pair_target(actor, target)?;
    let (leaving, arriving) = if state.in_house(first) {
        (first, second)
    } else {
        (second, first)
    };
    let Some(slot) = state.house.iter().position(|guest| *guest == leaving) else {
        return Err(RulesError::invalid(actor, TargetProblem::NotInHouse(leaving)));
    };
    let Some(pile_index) = state.draw_pile.iter().position(|guest| *guest == arriving) else {
        return Err(RulesError::invalid(actor, TargetProblem::NotInPile(arriving)));
    };
    let is_star = |id: GuestId| state.guest(id).is_some_and(|guest| guest.is_star);
    if is_star(leaving) == is_star(arriving) {
        return Err(RulesError::invalid(actor, TargetProblem::StarMismatch));
    }
    state.house.remove(slot);
    state.draw_pile[pile_index] = leaving;
    release_departed(state, &[leaving]);
    admit_guest(state, arriving, ctx, Some(slot));
    Ok(())
}

/// Permanently raise a guest's popularity.
pub(super) fn style(
    state: &mut GameState,
    actor: GuestId,
    target: AbilityTarget,
    _ctx: &mut RulesContext<'_>,
) -> Result<(), RulesError> {
    let id = house_target(state, actor, target)?;
    if let Some(guest) = state.guest_mut(id) {
        guest.popularity = guest.popularity.saturating_add(STYLIST_POP_GAIN);
    }
    Ok(())
}

/// Bank a guest's reward now; it no longer counts at the end of the party.
pub(super) fn photograph(
    state: &mut GameState,
    actor: GuestId,
    target: AbilityTarget,
    _ctx: &mut RulesContext<'_>,
) -> Result<(), RulesError> {
    let id = house_target(state, actor, target)?;
    let Some(guest) = state.guest_mut(id) else {
        return Err(RulesError::invalid(actor, TargetProblem::NotInHouse(id)));
    };
    if guest.reward_banked {
        return Err(RulesError::invalid(actor, TargetProblem::AlreadyBanked(id)));
    }
    guest.reward_banked = true;
    let reward = Reward {
        popularity: guest.popularity,
        cash: guest.cash,
    };
    state.bank(reward);
    state.record(LOG_REWARD_BANKED);
    Ok(())
}

/// Refresh every other guest's ability.
pub(super) fn cheer(
    state: &mut GameState,
    actor: GuestId,
    _target: AbilityTarget,
    _ctx: &mut RulesContext<'_>,
) -> Result<(), RulesError> {
    let others: Vec<GuestId> = state
        .house
        .iter()
        .copied()
        .filter(|id| *id != actor)
        .collect();
    for id in others {
        if let Some(guest) = state.guest_mut(id) {
            guest.ability_used = false;
        }
    }
    Ok(())
}

/// Cancel trouble on everyone in the house.
pub(super) fn counsel(
    state: &mut GameState,
    _actor: GuestId,
    _target: AbilityTarget,
    _ctx: &mut RulesContext<'_>,
) -> Result<(), RulesError> {
    let house = state.house.clone();
    for id in house {
        if let Some(guest) = state.guest_mut(id)
            && guest.trouble_active
        {
            guest.trouble_cancelled = true;
        }
    }
    Ok(())
}
