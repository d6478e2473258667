//! Party House Rules Engine
//!
//! Platform-agnostic core rules for the Party House management game: guest
//! catalog, entity factory, randomizer, ability resolver, and the party
//! lifecycle state machine. Rendering and input live outside this crate;
//! collaborators submit [`Command`]s and read [`GameState`] snapshots.

pub mod abilities;
pub mod catalog;
pub mod command;
pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod guest;
pub mod session;
pub mod shuffle;
pub mod state;

#[cfg(test)]
mod testkit;

// Re-export commonly used types
pub use abilities::{
    AbilitySpec, Reward, ScoringView, TargetShape, Trigger, end_of_round_bonus,
    has_available_action, round_reward, spec,
};
pub use catalog::{
    Ability, Catalog, CatalogError, GuestDefinition, GuestKind, RolodexEntry, Scenario, catalog,
};
pub use command::{AbilityTarget, Command};
pub use config::{Intermission, RulesConfig, RulesConfigError};
pub use engine::{RulesContext, apply_command};
pub use error::{RulesError, TargetProblem};
pub use guest::{ExtensionKind, GuestExtension, GuestFactory, GuestId, GuestInstance};
pub use session::{PartySession, StreamDraws};
pub use shuffle::{CountingRng, IdentityShuffler, RngStreams, SeededShuffler, Shuffler, pick, shuffle};
pub use state::{GameState, InvariantViolation, PartyAction, Phase, Selection};
