use std::fmt;

use partyhouse_game::{
    Ability, AbilityTarget, Catalog, Command, GameState, GuestId, GuestInstance, GuestKind,
    PartyAction, Phase, TargetShape, spec,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Command chosen by a [`PlayerPolicy`] for the current snapshot.
#[derive(Debug, Clone)]
pub struct PolicyDecision {
    pub command: Command,
    pub rationale: Option<String>,
}

impl PolicyDecision {
    #[must_use]
    pub const fn new(command: Command) -> Self {
        Self {
            command,
            rationale: None,
        }
    }

    #[must_use]
    pub fn because(command: Command, rationale: impl Into<String>) -> Self {
        Self {
            command,
            rationale: Some(rationale.into()),
        }
    }
}

/// Policy interface for automated play strategies.
pub trait PlayerPolicy {
    /// Name used for logging/debug output.
    fn name(&self) -> &'static str;

    /// Pick the next command for `state`.
    fn decide(&mut self, state: &GameState, catalog: &Catalog) -> PolicyDecision;
}

/// Built-in strategies for automated runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Ends the party one trouble short of a shutdown.
    Cautious,
    /// Fills the house and spends everything in the shop.
    Greedy,
    /// Seeded random input, including invalid commands.
    Chaotic,
}

impl Strategy {
    pub const ALL: [Self; 3] = [Self::Cautious, Self::Greedy, Self::Chaotic];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Cautious => "Cautious",
            Self::Greedy => "Greedy",
            Self::Chaotic => "Chaotic",
        }
    }

    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "cautious" => Some(Self::Cautious),
            "greedy" => Some(Self::Greedy),
            "chaotic" | "random" => Some(Self::Chaotic),
            _ => None,
        }
    }

    #[must_use]
    pub fn create_policy(self, seed: u64) -> Box<dyn PlayerPolicy + Send> {
        match self {
            Self::Cautious => Box::new(CautiousPolicy),
            Self::Greedy => Box::new(GreedyPolicy),
            Self::Chaotic => Box::new(ChaoticPolicy::new(seed)),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

struct CautiousPolicy;
struct GreedyPolicy;

struct ChaoticPolicy {
    rng: ChaCha20Rng,
}

impl ChaoticPolicy {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }
}

impl PlayerPolicy for CautiousPolicy {
    fn name(&self) -> &'static str {
        "Cautious"
    }

    fn decide(&mut self, state: &GameState, catalog: &Catalog) -> PolicyDecision {
        if let Some(decision) = between_parties(state) {
            return decision;
        }
        if state.phase == Phase::Shop {
            return shop_step(state, catalog, cheapest_useful);
        }
        match state.action {
            PartyAction::Peeking(peeked) => {
                let risky = state.guest(peeked).is_some_and(GuestInstance::has_active_trouble)
                    || is_trouble_kind(state, peeked);
                if state.is_full() {
                    PolicyDecision::because(Command::EndRound, "house full while peeking")
                } else if risky && state.trouble_count + 1 >= state.trouble_limit {
                    PolicyDecision::because(Command::RejectPeek, "trouble at the door")
                } else {
                    PolicyDecision::new(Command::AcceptPeek)
                }
            }
            PartyAction::Targeting(_) => PolicyDecision::new(Command::EndRound),
            PartyAction::Idle => {
                if let Some(counselor) = usable(state, Ability::Counselor)
                    && state.trouble_count > 0
                {
                    return PolicyDecision::because(
                        Command::UseAbility { guest: counselor },
                        "calm the house",
                    );
                }
                if state.is_full()
                    || state.draw_pile.is_empty()
                    || state.trouble_count + 1 >= state.trouble_limit
                {
                    PolicyDecision::because(
                        Command::EndRound,
                        format!("trouble {}/{}", state.trouble_count, state.trouble_limit),
                    )
                } else {
                    PolicyDecision::new(Command::AdmitNextGuest)
                }
            }
        }
    }
}

impl PlayerPolicy for GreedyPolicy {
    fn name(&self) -> &'static str {
        "Greedy"
    }

    fn decide(&mut self, state: &GameState, catalog: &Catalog) -> PolicyDecision {
        if let Some(decision) = between_parties(state) {
            return decision;
        }
        if state.phase == Phase::Shop {
            return shop_step(state, catalog, priciest_affordable);
        }
        match state.action {
            PartyAction::Peeking(_) if state.is_full() => PolicyDecision::new(Command::EndRound),
            PartyAction::Peeking(_) => PolicyDecision::new(Command::AcceptPeek),
            PartyAction::Targeting(_) => PolicyDecision::new(Command::EndRound),
            PartyAction::Idle => {
                if let Some(cheerleader) = usable(state, Ability::Cheerleader)
                    && state.house_guests().any(|guest| guest.ability_used)
                {
                    return PolicyDecision::because(
                        Command::UseAbility { guest: cheerleader },
                        "refresh spent abilities",
                    );
                }
                if state.is_full() || state.draw_pile.is_empty() {
                    PolicyDecision::because(Command::EndRound, "nothing left to admit")
                } else {
                    PolicyDecision::new(Command::AdmitNextGuest)
                }
            }
        }
    }
}

impl PlayerPolicy for ChaoticPolicy {
    fn name(&self) -> &'static str {
        "Chaotic"
    }

    fn decide(&mut self, state: &GameState, catalog: &Catalog) -> PolicyDecision {
        let guest = |rng: &mut ChaCha20Rng| {
            if state.rolodex.is_empty() {
                return None;
            }
            Some(state.rolodex[rng.gen_range(0..state.rolodex.len())].id)
        };
        let command = match self.rng.gen_range(0..14) {
            0..=3 => Command::AdmitNextGuest,
            4 => Command::EndRound,
            5 => Command::Dismiss,
            6 => match guest(&mut self.rng) {
                Some(id) => Command::UseAbility { guest: id },
                None => Command::StartGame,
            },
            7 => match (guest(&mut self.rng), guest(&mut self.rng)) {
                (Some(actor), Some(target)) => Command::TargetAbility {
                    guest: actor,
                    target: chaotic_target(state, actor, target, guest(&mut self.rng)),
                },
                _ => Command::StartGame,
            },
            8 => {
                if self.rng.gen_bool(0.5) {
                    Command::AcceptPeek
                } else {
                    Command::RejectPeek
                }
            }
            9 => match guest(&mut self.rng) {
                Some(id) => Command::BanGuest { guest: id },
                None => Command::Dismiss,
            },
            10 => {
                let guests = catalog.guests();
                Command::BuyGuest {
                    kind: guests[self.rng.gen_range(0..guests.len())].kind,
                }
            }
            11 => Command::ExpandHouse,
            12 => Command::EndShop,
            _ => Command::AdvanceScenario,
        };
        PolicyDecision::new(command)
    }
}

/// Commands that do not depend on the strategy: title, shutdown and the end
/// of a scenario.
fn between_parties(state: &GameState) -> Option<PolicyDecision> {
    let command = match state.phase {
        Phase::Title if state.scenario_cleared => Command::AdvanceScenario,
        Phase::Title => Command::StartGame,
        Phase::PartyEnded | Phase::ScenarioWon | Phase::ScenarioLost => Command::Dismiss,
        Phase::Shutdown => {
            let culprit = state
                .house_guests()
                .rev()
                .find(|guest| guest.has_active_trouble())
                .or_else(|| state.house_guests().next())?;
            return Some(PolicyDecision::because(
                Command::BanGuest { guest: culprit.id },
                "ban the latest troublemaker",
            ));
        }
        Phase::Party | Phase::Shop => return None,
    };
    Some(PolicyDecision::new(command))
}

type ShopPick = fn(&GameState, &Catalog) -> Option<GuestKind>;

/// Buy one guest, else expand the house, else leave the shop.
fn shop_step(state: &GameState, catalog: &Catalog, choose: ShopPick) -> PolicyDecision {
    if let Some(kind) = choose(state, catalog) {
        return PolicyDecision::because(Command::BuyGuest { kind }, format!("buy {kind}"));
    }
    if state.house_size < state.max_house_size && state.cash >= state.next_expansion_cost {
        return PolicyDecision::because(Command::ExpandHouse, "more room");
    }
    PolicyDecision::new(Command::EndShop)
}

fn affordable<'a>(
    state: &'a GameState,
    catalog: &'a Catalog,
) -> impl Iterator<Item = (GuestKind, i32, bool)> + 'a {
    state
        .scenario(catalog)
        .into_iter()
        .flat_map(move |scenario| catalog.shop_offerings(scenario))
        .filter(move |def| {
            def.shop_cost <= state.popularity && def.allows_copy(state.owned_copies(def.kind))
        })
        .map(|def| (def.kind, def.shop_cost, def.is_star))
}

/// Stars first, then cancellers, never anything that brings trouble.
fn cheapest_useful(state: &GameState, catalog: &Catalog) -> Option<GuestKind> {
    let mut options: Vec<_> = affordable(state, catalog)
        .filter(|(kind, _, _)| {
            catalog
                .definition(*kind)
                .is_some_and(|def| def.ability != Some(Ability::Trouble))
        })
        .collect();
    if let Some((kind, _, _)) = options.iter().find(|(_, _, star)| *star) {
        return Some(*kind);
    }
    options.retain(|(kind, _, _)| {
        catalog
            .definition(*kind)
            .is_some_and(|def| def.ability == Some(Ability::CancelTrouble))
    });
    options.iter().min_by_key(|(_, cost, _)| *cost).map(|(kind, _, _)| *kind)
}

fn priciest_affordable(state: &GameState, catalog: &Catalog) -> Option<GuestKind> {
    affordable(state, catalog)
        .max_by_key(|(_, cost, star)| (*star, *cost))
        .map(|(kind, _, _)| kind)
}

fn usable(state: &GameState, ability: Ability) -> Option<GuestId> {
    state
        .house_guests()
        .find(|guest| guest.ability == Some(ability) && !guest.ability_used)
        .map(|guest| guest.id)
}

fn is_trouble_kind(state: &GameState, id: GuestId) -> bool {
    state
        .guest(id)
        .and_then(|guest| guest.ability)
        .is_some_and(|ability| matches!(ability, Ability::Trouble | Ability::Werewolf))
}

fn chaotic_target(
    state: &GameState,
    actor: GuestId,
    first: GuestId,
    second: Option<GuestId>,
) -> AbilityTarget {
    let shape = state
        .guest(actor)
        .and_then(|guest| guest.ability)
        .map_or(TargetShape::None, |ability| spec(ability).target);
    match (shape, second) {
        (TargetShape::None, _) => AbilityTarget::None,
        (TargetShape::Pair, Some(second)) => AbilityTarget::Pair(first, second),
        _ => AbilityTarget::Guest(first),
    }
}
