//! Party lifecycle state machine.
//!
//! [`apply_command`] is the only way game state changes. It never mutates its
//! input: the current snapshot is cloned, the command is applied to the
//! clone, and the clone is returned. Commands that make no sense in the
//! current phase return an unchanged copy rather than an error.
use crate::abilities::{
    TargetShape, admit_guest, has_available_action, resolve_on_demand, round_reward,
    validate_actor,
};
use crate::catalog::{Catalog, GuestKind};
use crate::command::{AbilityTarget, Command};
use crate::config::{Intermission, RulesConfig};
use crate::constants::{
    CAPTION_ALL_SCENARIOS, CAPTION_BANNED, CAPTION_CANT_AFFORD, CAPTION_CHOOSE_TARGET,
    CAPTION_FIRST_PARTY, CAPTION_FULL_WITH_ACTIONS, CAPTION_HOUSE_MAXED, CAPTION_LOST,
    CAPTION_NO_GUESTS, CAPTION_NOT_FOR_SALE, CAPTION_PARTY_FULL, CAPTION_SCENARIO_CLEARED,
    CAPTION_SHOP, CAPTION_SHUTDOWN, CAPTION_SOLD_OUT, CAPTION_WON, LOG_GUEST_BANNED,
    LOG_PARTY_ENDED, LOG_PARTY_SHUTDOWN, LOG_PARTY_STARTED, LOG_PEEK_REJECTED,
    LOG_SCENARIO_ADVANCED, LOG_SCENARIO_LOST, LOG_SCENARIO_STARTED, LOG_SCENARIO_WON,
    LOG_SHOP_EXPANSION, LOG_SHOP_OPENED, LOG_SHOP_PURCHASE,
};
use crate::error::{RulesError, TargetProblem};
use crate::guest::{GuestFactory, GuestId};
use crate::shuffle::{Shuffler, shuffle};
use crate::state::{GameState, PartyAction, Phase, Selection};

/// Collaborators a command may consult while it is applied.
pub struct RulesContext<'a> {
    pub catalog: &'a Catalog,
    pub config: &'a RulesConfig,
    pub factory: &'a mut GuestFactory,
    /// Stream used to shuffle draw piles.
    pub draw: &'a mut dyn Shuffler,
    /// Stream used for random ability picks.
    pub ability: &'a mut dyn Shuffler,
}

impl<'a> RulesContext<'a> {
    #[must_use]
    pub fn new(
        catalog: &'a Catalog,
        config: &'a RulesConfig,
        factory: &'a mut GuestFactory,
        draw: &'a mut dyn Shuffler,
        ability: &'a mut dyn Shuffler,
    ) -> Self {
        Self {
            catalog,
            config,
            factory,
            draw,
            ability,
        }
    }
}

/// Apply one command and return the next snapshot.
///
/// # Errors
///
/// Returns [`RulesError::AbilityAlreadyUsed`], [`RulesError::InvalidTarget`],
/// [`RulesError::NoActiveAbility`] or [`RulesError::HouseFull`] for ability and
/// ban commands that cannot resolve, and [`RulesError::UnknownArchetype`]
/// when the catalog cannot build a guest. The input state is never modified,
/// so callers keep the previous snapshot on error.
pub fn apply_command(
    state: &GameState,
    command: Command,
    ctx: &mut RulesContext<'_>,
) -> Result<GameState, RulesError> {
    let mut next = state.clone();
    let outcome = match command {
        Command::StartGame => start_scenario(&mut next, state.scenario_index, ctx),
        Command::AdmitNextGuest => {
            admit_next(&mut next, ctx);
            Ok(())
        }
        Command::EndRound => {
            end_round(&mut next);
            Ok(())
        }
        Command::SelectItem { selection } => {
            select(&mut next, selection);
            Ok(())
        }
        Command::BanGuest { guest } => ban(&mut next, guest),
        Command::Dismiss => dismiss(&mut next, ctx),
        Command::UseAbility { guest } => use_ability(&mut next, guest, ctx),
        Command::TargetAbility { guest, target } => target_ability(&mut next, guest, target, ctx),
        Command::AcceptPeek => {
            accept_peek(&mut next, ctx);
            Ok(())
        }
        Command::RejectPeek => {
            reject_peek(&mut next, ctx.catalog);
            Ok(())
        }
        Command::BuyGuest { kind } => buy_guest(&mut next, kind, ctx),
        Command::ExpandHouse => {
            expand_house(&mut next, ctx.config);
            Ok(())
        }
        Command::EndShop => {
            end_shop(&mut next, ctx);
            Ok(())
        }
        Command::AdvanceScenario => advance_scenario(&mut next, ctx),
    };
    if let Err(err) = &outcome {
        log::warn!("{command} rejected: {err}");
    }
    outcome?;
    if next.phase != state.phase {
        log::debug!("{command}: {} -> {}", state.phase, next.phase);
    }
    Ok(next)
}

fn guest_name(state: &GameState, catalog: &Catalog, id: GuestId) -> String {
    state
        .guest(id)
        .and_then(|guest| catalog.definition(guest.kind))
        .map_or_else(|| id.to_string(), |def| def.name.to_string())
        .to_uppercase()
}

fn start_scenario(
    state: &mut GameState,
    scenario_index: usize,
    ctx: &mut RulesContext<'_>,
) -> Result<(), RulesError> {
    let scenario_index = if ctx.catalog.scenario(scenario_index).is_some() {
        scenario_index
    } else {
        0
    };
    let rolodex = ctx.factory.starting_rolodex(ctx.catalog)?;
    *state = GameState::title(ctx.config);
    state.scenario_index = scenario_index;
    state.rolodex = rolodex;
    state.record(LOG_SCENARIO_STARTED);
    start_party(state, 1, ctx);
    state.caption = String::from(CAPTION_FIRST_PARTY);
    Ok(())
}

fn start_party(state: &mut GameState, round: u32, ctx: &mut RulesContext<'_>) {
    state.phase = Phase::Party;
    state.round = round;
    state.turns_remaining = state.round_limit.saturating_sub(round).saturating_add(1);
    state.house.clear();
    for guest in &mut state.rolodex {
        guest.reset_for_party();
    }
    let eligible = state.eligible_guests();
    state.draw_pile = shuffle(&mut *ctx.draw, &eligible);
    state.action = PartyAction::Idle;
    state.selection = Selection::EntryPoint;
    state.recount();
    state.caption = format!("PARTY {round} OF {}. LET'S GO!", state.round_limit);
    state.record(LOG_PARTY_STARTED);
}

fn admit_next(state: &mut GameState, ctx: &mut RulesContext<'_>) {
    if state.phase != Phase::Party || matches!(state.action, PartyAction::Peeking(_)) {
        return;
    }
    if state.is_full() {
        state.caption = String::from(CAPTION_PARTY_FULL);
        return;
    }
    if state.draw_pile.is_empty() {
        state.caption = String::from(CAPTION_NO_GUESTS);
        return;
    }
    let next = state.draw_pile.remove(0);
    state.action = PartyAction::Idle;
    admit_guest(state, next, ctx, None);
    settle_arrival(state, next, ctx.catalog);
}

/// Shutdown check and caption once an admission cascade has finished.
fn settle_arrival(state: &mut GameState, arrived: GuestId, catalog: &Catalog) {
    if enforce_shutdown(state) {
        return;
    }
    state.caption = if let PartyAction::Peeking(peeked) = state.action {
        format!("PEEKING AT {}. LET THEM IN?", guest_name(state, catalog, peeked))
    } else if state.is_full() {
        if has_available_action(state) {
            String::from(CAPTION_FULL_WITH_ACTIONS)
        } else {
            String::from(CAPTION_PARTY_FULL)
        }
    } else {
        format!("{} HAS ARRIVED!", guest_name(state, catalog, arrived))
    };
}

/// Drop a pending peek whose guest is no longer at the head of the pile, then
/// move to shutdown if trouble has reached the limit.
fn enforce_shutdown(state: &mut GameState) -> bool {
    if let PartyAction::Peeking(peeked) = state.action
        && state.draw_pile.first() != Some(&peeked)
    {
        state.action = PartyAction::Idle;
    }
    state.recount();
    if state.trouble_count < state.trouble_limit {
        return false;
    }
    state.phase = Phase::Shutdown;
    state.action = PartyAction::Idle;
    state.selection = state
        .house
        .first()
        .map_or(Selection::EntryPoint, |id| Selection::Guest(*id));
    state.caption = String::from(CAPTION_SHUTDOWN);
    state.record(LOG_PARTY_SHUTDOWN);
    true
}

fn end_round(state: &mut GameState) {
    if state.phase != Phase::Party {
        return;
    }
    state.action = PartyAction::Idle;
    if state.star_count >= state.stars_required {
        state.phase = Phase::ScenarioWon;
        state.caption = String::from(CAPTION_WON);
        state.record(LOG_SCENARIO_WON);
        return;
    }
    let roster: Vec<_> = state.house_guests().collect();
    let reward = round_reward(&roster, state.house_size);
    state.bank(reward);
    state.phase = Phase::PartyEnded;
    state.caption = format!(
        "YOU HAVE ENDED THE PARTY. +{} POP, +{} CASH",
        reward.popularity, reward.cash
    );
    state.record(LOG_PARTY_ENDED);
}

fn select(state: &mut GameState, selection: Selection) {
    if state.phase.is_terminal() {
        return;
    }
    state.selection = match selection {
        Selection::Guest(id) if state.guest(id).is_none() => Selection::EntryPoint,
        other => other,
    };
}

fn ban(state: &mut GameState, guest: GuestId) -> Result<(), RulesError> {
    if state.phase != Phase::Shutdown {
        return Ok(());
    }
    if !state.in_house(guest) {
        return Err(RulesError::invalid(guest, TargetProblem::NotInHouse(guest)));
    }
    if let Some(record) = state.guest_mut(guest) {
        record.banned = true;
    }
    state.phase = Phase::PartyEnded;
    state.selection = Selection::EntryPoint;
    state.caption = String::from(CAPTION_BANNED);
    state.record(LOG_GUEST_BANNED);
    Ok(())
}

fn dismiss(state: &mut GameState, ctx: &mut RulesContext<'_>) -> Result<(), RulesError> {
    match state.phase {
        Phase::PartyEnded if state.round >= state.round_limit => {
            state.phase = Phase::ScenarioLost;
            state.turns_remaining = 0;
            state.caption = String::from(CAPTION_LOST);
            state.record(LOG_SCENARIO_LOST);
        }
        Phase::PartyEnded if state.intermission == Intermission::Shop => {
            state.phase = Phase::Shop;
            state.selection = Selection::None;
            state.caption = String::from(CAPTION_SHOP);
            state.record(LOG_SHOP_OPENED);
        }
        Phase::PartyEnded => {
            let round = state.round + 1;
            start_party(state, round, ctx);
        }
        Phase::ScenarioWon | Phase::ScenarioLost => {
            let scenario_index = state.scenario_index;
            let cleared = state.phase == Phase::ScenarioWon;
            *state = GameState::title(ctx.config);
            state.scenario_index = scenario_index;
            state.scenario_cleared = cleared;
            if cleared {
                state.caption = String::from(CAPTION_SCENARIO_CLEARED);
            }
        }
        Phase::Title | Phase::Party | Phase::Shutdown | Phase::Shop => {}
    }
    Ok(())
}

fn use_ability(
    state: &mut GameState,
    guest: GuestId,
    ctx: &mut RulesContext<'_>,
) -> Result<(), RulesError> {
    if state.phase != Phase::Party || matches!(state.action, PartyAction::Peeking(_)) {
        return Ok(());
    }
    let entry = validate_actor(state, guest)?;
    if entry.target == TargetShape::None {
        return target_ability(state, guest, AbilityTarget::None, ctx);
    }
    state.action = PartyAction::Targeting(guest);
    state.selection = Selection::Guest(guest);
    state.caption = String::from(CAPTION_CHOOSE_TARGET);
    Ok(())
}

fn target_ability(
    state: &mut GameState,
    guest: GuestId,
    target: AbilityTarget,
    ctx: &mut RulesContext<'_>,
) -> Result<(), RulesError> {
    if state.phase != Phase::Party || matches!(state.action, PartyAction::Peeking(_)) {
        return Ok(());
    }
    state.action = PartyAction::Idle;
    resolve_on_demand(state, guest, target, ctx)?;
    if enforce_shutdown(state) {
        return Ok(());
    }
    let description = state
        .guest(guest)
        .and_then(|record| record.ability)
        .map_or("", |ability| ability.description());
    state.caption = format!("{}: {description}", guest_name(state, ctx.catalog, guest));
    Ok(())
}

fn accept_peek(state: &mut GameState, ctx: &mut RulesContext<'_>) {
    let PartyAction::Peeking(peeked) = state.action else {
        return;
    };
    if state.phase != Phase::Party {
        return;
    }
    if state.draw_pile.first() != Some(&peeked) {
        state.action = PartyAction::Idle;
        return;
    }
    if state.is_full() {
        state.caption = String::from(CAPTION_PARTY_FULL);
        return;
    }
    state.draw_pile.remove(0);
    state.action = PartyAction::Idle;
    admit_guest(state, peeked, ctx, None);
    settle_arrival(state, peeked, ctx.catalog);
}

fn reject_peek(state: &mut GameState, catalog: &Catalog) {
    let PartyAction::Peeking(peeked) = state.action else {
        return;
    };
    if state.phase != Phase::Party {
        return;
    }
    state.draw_pile.retain(|id| *id != peeked);
    state.draw_pile.push(peeked);
    state.action = PartyAction::Idle;
    state.caption = format!("{} WILL HAVE TO WAIT.", guest_name(state, catalog, peeked));
    state.record(LOG_PEEK_REJECTED);
}

fn buy_guest(
    state: &mut GameState,
    kind: GuestKind,
    ctx: &mut RulesContext<'_>,
) -> Result<(), RulesError> {
    if state.phase != Phase::Shop {
        return Ok(());
    }
    let def = ctx
        .catalog
        .definition(kind)
        .ok_or(RulesError::UnknownArchetype(kind))?;
    let offered = def.is_for_sale()
        && (!def.is_star
            || state
                .scenario(ctx.catalog)
                .is_some_and(|scenario| scenario.features_star(kind)));
    if !offered {
        state.caption = String::from(CAPTION_NOT_FOR_SALE);
        return Ok(());
    }
    if !def.allows_copy(state.owned_copies(kind)) {
        state.caption = String::from(CAPTION_SOLD_OUT);
        return Ok(());
    }
    if state.popularity < def.shop_cost {
        state.caption = String::from(CAPTION_CANT_AFFORD);
        return Ok(());
    }
    let guest = ctx.factory.instantiate(ctx.catalog, kind)?;
    state.popularity -= def.shop_cost;
    state.rolodex.push(guest);
    state.caption = format!("{} JOINED YOUR ROLODEX.", def.name.to_uppercase());
    state.record(LOG_SHOP_PURCHASE);
    Ok(())
}

fn expand_house(state: &mut GameState, config: &RulesConfig) {
    if state.phase != Phase::Shop {
        return;
    }
    if state.house_size >= state.max_house_size {
        state.caption = String::from(CAPTION_HOUSE_MAXED);
        return;
    }
    if state.cash < state.next_expansion_cost {
        state.caption = String::from(CAPTION_CANT_AFFORD);
        return;
    }
    state.cash -= state.next_expansion_cost;
    state.house_size += 1;
    state.next_expansion_cost = state
        .next_expansion_cost
        .saturating_add(config.expansion_cost_step)
        .min(config.expansion_cost_max);
    state.caption = format!("THE HOUSE NOW HOLDS {} GUESTS.", state.house_size);
    state.record(LOG_SHOP_EXPANSION);
}

fn end_shop(state: &mut GameState, ctx: &mut RulesContext<'_>) {
    if state.phase != Phase::Shop {
        return;
    }
    let round = state.round + 1;
    start_party(state, round, ctx);
}

fn advance_scenario(state: &mut GameState, ctx: &mut RulesContext<'_>) -> Result<(), RulesError> {
    if state.phase != Phase::Title || !state.scenario_cleared {
        return Ok(());
    }
    let next = state.scenario_index + 1;
    if next >= ctx.catalog.scenario_count() {
        *state = GameState::title(ctx.config);
        state.caption = String::from(CAPTION_ALL_SCENARIOS);
        state.record(LOG_SCENARIO_ADVANCED);
        return Ok(());
    }
    start_scenario(state, next, ctx)?;
    state.record(LOG_SCENARIO_ADVANCED);
    Ok(())
}
