//! Single-owner session that threads randomness, ids and reference data
//! through the engine and publishes shared snapshots.
use std::sync::Arc;

use crate::catalog::{Catalog, catalog};
use crate::command::Command;
use crate::config::{RulesConfig, RulesConfigError};
use crate::engine::{RulesContext, apply_command};
use crate::error::RulesError;
use crate::guest::GuestFactory;
use crate::shuffle::{RngStreams, Shuffler};
use crate::state::GameState;

/// Entropy consumed by each random stream so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StreamDraws {
    pub draw: u64,
    pub ability: u64,
}

/// High-level wrapper owning the current snapshot and everything needed to
/// produce the next one.
#[derive(Debug, Clone)]
pub struct PartySession {
    state: Arc<GameState>,
    catalog: &'static Catalog,
    config: RulesConfig,
    factory: GuestFactory,
    streams: RngStreams,
    seed: u64,
    commands_applied: u64,
}

impl PartySession {
    /// Session over the built-in catalog, parked on the title screen.
    ///
    /// # Errors
    ///
    /// Returns `RulesConfigError` if `config` fails validation.
    pub fn new(seed: u64, config: RulesConfig) -> Result<Self, RulesConfigError> {
        Self::with_catalog(seed, config, catalog())
    }

    /// Session over a caller-supplied catalog.
    ///
    /// # Errors
    ///
    /// Returns `RulesConfigError` if `config` fails validation.
    pub fn with_catalog(
        seed: u64,
        config: RulesConfig,
        catalog: &'static Catalog,
    ) -> Result<Self, RulesConfigError> {
        config.validate()?;
        Ok(Self {
            state: Arc::new(GameState::title(&config)),
            catalog,
            config,
            factory: GuestFactory::new(),
            streams: RngStreams::from_user_seed(seed),
            seed,
            commands_applied: 0,
        })
    }

    /// Replace the id allocator, e.g. with a fixed starting id for replays.
    #[must_use]
    pub fn with_factory(mut self, factory: GuestFactory) -> Self {
        self.factory = factory;
        self
    }

    /// Park the title screen on another scenario so `StartGame` begins there.
    #[must_use]
    pub fn with_scenario(mut self, scenario_index: usize) -> Self {
        Arc::make_mut(&mut self.state).scenario_index = scenario_index;
        self
    }

    /// Apply a command and publish the resulting snapshot.
    ///
    /// # Errors
    ///
    /// Returns the engine's `RulesError`; the current snapshot is kept.
    pub fn dispatch(&mut self, command: Command) -> Result<Arc<GameState>, RulesError> {
        let mut ctx = RulesContext::new(
            self.catalog,
            &self.config,
            &mut self.factory,
            &mut self.streams.draw,
            &mut self.streams.ability,
        );
        let next = apply_command(&self.state, command, &mut ctx)?;
        self.commands_applied = self.commands_applied.saturating_add(1);
        if *self.state != next {
            self.state = Arc::new(next);
        }
        Ok(Arc::clone(&self.state))
    }

    /// Shared handle to the current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<GameState> {
        Arc::clone(&self.state)
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    #[must_use]
    pub const fn config(&self) -> &RulesConfig {
        &self.config
    }

    #[must_use]
    pub const fn catalog(&self) -> &'static Catalog {
        self.catalog
    }

    #[must_use]
    pub const fn commands_applied(&self) -> u64 {
        self.commands_applied
    }

    #[must_use]
    pub fn draws(&self) -> StreamDraws {
        StreamDraws {
            draw: self.streams.draw.draws(),
            ability: self.streams.ability.draws(),
        }
    }
}
