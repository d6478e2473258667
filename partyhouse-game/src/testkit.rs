//! Deterministic fixtures shared by unit tests.
use crate::catalog::{GuestKind, catalog};
use crate::command::Command;
use crate::config::RulesConfig;
use crate::engine::{RulesContext, apply_command};
use crate::error::RulesError;
use crate::guest::GuestFactory;
use crate::shuffle::IdentityShuffler;
use crate::state::GameState;

/// Engine driver with identity shuffles and ids counted from 1.
pub(crate) struct Harness {
    pub config: RulesConfig,
    pub factory: GuestFactory,
    draw: IdentityShuffler,
    ability: IdentityShuffler,
}

impl Default for Harness {
    fn default() -> Self {
        Self {
            config: RulesConfig::default(),
            factory: GuestFactory::starting_at(1),
            draw: IdentityShuffler,
            ability: IdentityShuffler,
        }
    }
}

impl Harness {
    pub fn ctx(&mut self) -> RulesContext<'_> {
        RulesContext::new(
            catalog(),
            &self.config,
            &mut self.factory,
            &mut self.draw,
            &mut self.ability,
        )
    }

    pub fn apply(&mut self, state: &GameState, command: Command) -> Result<GameState, RulesError> {
        apply_command(state, command, &mut self.ctx())
    }

    /// First party of scenario 0 with the default rolodex.
    pub fn start(&mut self) -> GameState {
        let title = GameState::title(&self.config);
        self.apply(&title, Command::StartGame).unwrap()
    }

    /// First party whose rolodex and draw order are exactly `kinds`.
    pub fn party(&mut self, kinds: &[GuestKind]) -> GameState {
        let mut state = self.start();
        state.rolodex = kinds
            .iter()
            .map(|kind| self.factory.instantiate(catalog(), *kind).unwrap())
            .collect();
        state.draw_pile = state.eligible_guests();
        state.recount();
        state
    }

    /// Admit `count` guests one command at a time.
    pub fn admit(&mut self, state: &GameState, count: usize) -> GameState {
        let mut state = state.clone();
        for _ in 0..count {
            state = self.apply(&state, Command::AdmitNextGuest).unwrap();
        }
        state
    }
}
