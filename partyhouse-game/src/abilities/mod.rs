//! Ability registry.
//!
//! Each ability tag maps to one [`AbilitySpec`]: its trigger timing, the kind
//! of target it needs, the runtime extension its instances carry, and the
//! handlers that implement it. The state machine only ever consults this
//! table, so new archetypes never require engine changes.

mod admit;
mod scoring;
mod targeted;

use serde::{Deserialize, Serialize};

use crate::catalog::Ability;
use crate::command::AbilityTarget;
use crate::engine::RulesContext;
use crate::error::RulesError;
use crate::guest::{ExtensionKind, GuestId};
use crate::state::GameState;

pub(crate) use admit::{admit_guest, release_departed, settle_cancellers};
pub use scoring::{Reward, ScoringView, end_of_round_bonus, round_reward};
pub(crate) use targeted::{resolve_on_demand, validate_actor};

/// When an ability takes effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    /// Fires as the guest enters the house.
    OnAdmit,
    /// Needs an explicit `UseAbility`/`TargetAbility` from the player.
    OnDemand,
    /// Contributes a contextual bonus when a party ends voluntarily.
    EndOfRound,
    /// Always in effect; evaluated as part of other commands.
    Passive,
}

/// Target an on-demand ability expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetShape {
    None,
    Guest,
    Pair,
}

pub(crate) type AdmitHandler = fn(&mut GameState, GuestId, &mut RulesContext<'_>);
pub(crate) type DemandHandler =
    fn(&mut GameState, GuestId, AbilityTarget, &mut RulesContext<'_>) -> Result<(), RulesError>;
pub(crate) type ScoringHandler = fn(&ScoringView<'_>, u32) -> Reward;

/// Registry entry for one ability tag.
#[derive(Clone, Copy)]
pub struct AbilitySpec {
    pub ability: Ability,
    pub trigger: Trigger,
    pub target: TargetShape,
    /// Runtime extension attached to instances at creation.
    pub extension: Option<ExtensionKind>,
    pub(crate) on_admit: Option<AdmitHandler>,
    pub(crate) on_demand: Option<DemandHandler>,
    pub(crate) scoring: Option<ScoringHandler>,
}

impl std::fmt::Debug for AbilitySpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AbilitySpec")
            .field("ability", &self.ability)
            .field("trigger", &self.trigger)
            .field("target", &self.target)
            .field("extension", &self.extension)
            .finish_non_exhaustive()
    }
}

impl AbilitySpec {
    const fn passive(ability: Ability) -> Self {
        Self {
            ability,
            trigger: Trigger::Passive,
            target: TargetShape::None,
            extension: None,
            on_admit: None,
            on_demand: None,
            scoring: None,
        }
    }

    const fn admit(ability: Ability, handler: AdmitHandler) -> Self {
        Self {
            trigger: Trigger::OnAdmit,
            on_admit: Some(handler),
            ..Self::passive(ability)
        }
    }

    const fn demand(ability: Ability, target: TargetShape, handler: DemandHandler) -> Self {
        Self {
            trigger: Trigger::OnDemand,
            target,
            on_demand: Some(handler),
            ..Self::passive(ability)
        }
    }

    const fn scoring(ability: Ability, handler: ScoringHandler) -> Self {
        Self {
            trigger: Trigger::EndOfRound,
            scoring: Some(handler),
            ..Self::passive(ability)
        }
    }

    const fn with_extension(mut self, extension: ExtensionKind) -> Self {
        self.extension = Some(extension);
        self
    }

    const fn with_admit(mut self, handler: AdmitHandler) -> Self {
        self.on_admit = Some(handler);
        self
    }

    /// Whether the player can activate this ability.
    #[must_use]
    pub const fn is_on_demand(&self) -> bool {
        matches!(self.trigger, Trigger::OnDemand)
    }
}

// Entries follow the declaration order of `Ability`.
static REGISTRY: [AbilitySpec; 23] = [
    AbilitySpec::passive(Ability::Trouble),
    AbilitySpec::admit(Ability::CancelTrouble, admit::arm_canceller),
    AbilitySpec::demand(Ability::Fetch, TargetShape::Guest, targeted::fetch),
    AbilitySpec::demand(Ability::Boot, TargetShape::Guest, targeted::boot),
    AbilitySpec::admit(Ability::Peek, admit::peek),
    AbilitySpec::demand(Ability::Shuffle, TargetShape::None, targeted::shuffle_out),
    AbilitySpec::admit(Ability::BringOne, admit::bring_one),
    AbilitySpec::admit(Ability::BringTwo, admit::bring_two),
    AbilitySpec::demand(Ability::Photographer, TargetShape::Guest, targeted::photograph),
    AbilitySpec::scoring(Ability::Comedian, scoring::comedian),
    AbilitySpec::scoring(Ability::Dancer, scoring::dancer),
    AbilitySpec::scoring(Ability::Mascot, scoring::mascot),
    AbilitySpec::scoring(Ability::Introvert, scoring::introvert),
    AbilitySpec::demand(Ability::Stylist, TargetShape::Guest, targeted::style),
    AbilitySpec::scoring(Ability::Bartender, scoring::bartender),
    AbilitySpec::scoring(Ability::Writer, scoring::writer),
    AbilitySpec::passive(Ability::Climber)
        .with_extension(ExtensionKind::Climb)
        .with_admit(admit::climb),
    AbilitySpec::demand(Ability::Cheerleader, TargetShape::None, targeted::cheer),
    AbilitySpec::admit(Ability::Greeter, admit::greet),
    AbilitySpec::demand(Ability::Magician, TargetShape::Pair, targeted::swap_star),
    AbilitySpec::demand(Ability::Cupid, TargetShape::Pair, targeted::boot_pair),
    AbilitySpec::demand(Ability::Counselor, TargetShape::None, targeted::counsel),
    AbilitySpec::admit(Ability::Werewolf, admit::howl).with_extension(ExtensionKind::Appearances),
];

/// Registry entry for an ability tag.
#[must_use]
pub fn spec(ability: Ability) -> &'static AbilitySpec {
    &REGISTRY[ability as usize]
}

/// Whether any guest in the house still has an unused on-demand ability.
#[must_use]
pub fn has_available_action(state: &GameState) -> bool {
    state.house_guests().any(|guest| {
        !guest.ability_used
            && guest
                .ability
                .is_some_and(|ability| spec(ability).is_on_demand())
    })
}
