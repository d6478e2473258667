use anyhow::{Result, bail};
use std::time::{Duration, Instant};

use partyhouse_game::{Command, GuestFactory, PartySession, Phase, RulesConfig};

use crate::logic::policy::{PolicyDecision, Strategy};

/// Consecutive no-op commands tolerated before a run counts as stuck.
const STALL_WINDOW: usize = 200;

/// Configuration for one automated run.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub seed: u64,
    pub strategy: Strategy,
    pub rules: RulesConfig,
    pub scenario: usize,
    pub max_commands: usize,
}

impl SimulationConfig {
    #[must_use]
    pub fn new(strategy: Strategy, seed: u64) -> Self {
        Self {
            seed,
            strategy,
            rules: RulesConfig::default(),
            scenario: 0,
            max_commands: 2_000,
        }
    }

    #[must_use]
    pub fn with_rules(mut self, rules: RulesConfig) -> Self {
        self.rules = rules;
        self
    }

    #[must_use]
    pub const fn with_scenario(mut self, scenario: usize) -> Self {
        self.scenario = scenario;
        self
    }

    #[must_use]
    pub const fn with_max_commands(mut self, max_commands: usize) -> Self {
        self.max_commands = max_commands;
        self
    }
}

/// A command the engine refused.
#[derive(Debug, Clone)]
pub struct RejectedCommand {
    pub round: u32,
    pub command: Command,
    pub reason: String,
    pub rationale: Option<String>,
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunEnding {
    Won,
    Lost,
    /// Hit the command budget before the scenario ended.
    Halted,
}

impl RunEnding {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Won => "won",
            Self::Lost => "lost",
            Self::Halted => "halted",
        }
    }
}

/// Everything a single run produced.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub seed: u64,
    pub scenario: usize,
    pub strategy: Strategy,
    pub ending: RunEnding,
    pub rounds_played: u32,
    pub popularity: i32,
    pub cash: i32,
    pub rolodex_size: usize,
    pub bans: usize,
    pub commands: usize,
    pub rejected: Vec<RejectedCommand>,
    pub draws: u64,
    pub duration: Duration,
}

/// Play one scenario with the strategy's policy, checking every snapshot.
///
/// # Errors
///
/// Fails on the first broken invariant, on an unrecoverable engine error, or
/// when the run stops making progress.
pub fn run_simulation(config: &SimulationConfig) -> Result<RunSummary> {
    let start = Instant::now();
    let mut session = PartySession::new(config.seed, config.rules.clone())?
        .with_factory(GuestFactory::starting_at(1))
        .with_scenario(config.scenario);
    let mut policy = config.strategy.create_policy(config.seed);
    let mut rejected = Vec::new();
    let mut idle_streak = 0;
    let mut commands = 0;

    session.dispatch(Command::StartGame)?;
    let ending = loop {
        let state = session.snapshot();
        match state.phase {
            Phase::ScenarioWon => break RunEnding::Won,
            Phase::ScenarioLost => break RunEnding::Lost,
            _ if commands >= config.max_commands => break RunEnding::Halted,
            _ => {}
        }
        let PolicyDecision { command, rationale } = policy.decide(&state, session.catalog());
        commands += 1;
        match session.dispatch(command) {
            Ok(next) => {
                if let Err(violation) = next.check_invariants() {
                    bail!(
                        "{} broke an invariant after {command} in round {}: {violation}",
                        policy.name(),
                        next.round
                    );
                }
                idle_streak = if *next == *state { idle_streak + 1 } else { 0 };
            }
            Err(err) if err.is_recoverable() => {
                log::debug!("{} rejected {command}: {err}", policy.name());
                rejected.push(RejectedCommand {
                    round: state.round,
                    command,
                    reason: err.to_string(),
                    rationale,
                });
                idle_streak += 1;
            }
            Err(err) => bail!("engine failed on {command}: {err}"),
        }
        if idle_streak >= STALL_WINDOW && config.strategy != Strategy::Chaotic {
            bail!(
                "{} stalled in {} for {STALL_WINDOW} commands",
                policy.name(),
                session.state().phase
            );
        }
    };

    let state = session.snapshot();
    Ok(RunSummary {
        seed: config.seed,
        scenario: state.scenario_index,
        strategy: config.strategy,
        ending,
        rounds_played: state.round,
        popularity: state.popularity,
        cash: state.cash,
        rolodex_size: state.rolodex.len(),
        bans: state.rolodex.iter().filter(|guest| guest.banned).count(),
        commands,
        rejected,
        draws: session.draws().draw + session.draws().ability,
        duration: start.elapsed(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use partyhouse_game::Intermission;

    #[test]
    fn cautious_run_reaches_an_ending() {
        let summary = run_simulation(&SimulationConfig::new(Strategy::Cautious, 1337)).unwrap();
        assert_ne!(summary.ending, RunEnding::Halted);
        assert!(summary.rounds_played >= 1);
        assert!(summary.rejected.is_empty());
    }

    #[test]
    fn greedy_run_with_shop_reaches_an_ending() {
        let rules = RulesConfig {
            intermission: Intermission::Shop,
            ..RulesConfig::default()
        };
        let config = SimulationConfig::new(Strategy::Greedy, 7).with_rules(rules);
        let summary = run_simulation(&config).unwrap();
        assert_ne!(summary.ending, RunEnding::Halted);
    }

    #[test]
    fn chaotic_runs_are_reproducible() {
        let config = SimulationConfig::new(Strategy::Chaotic, 21).with_max_commands(400);
        let first = run_simulation(&config).unwrap();
        let second = run_simulation(&config).unwrap();
        assert_eq!(first.commands, second.commands);
        assert_eq!(first.popularity, second.popularity);
        assert_eq!(first.rejected.len(), second.rejected.len());
        assert_eq!(first.draws, second.draws);
    }

    #[test]
    fn later_scenarios_can_be_played_directly() {
        let config = SimulationConfig::new(Strategy::Cautious, 5).with_scenario(3);
        let summary = run_simulation(&config).unwrap();
        assert_eq!(summary.scenario, 3);
    }

    #[test]
    fn command_budget_halts_the_run() {
        let config = SimulationConfig::new(Strategy::Cautious, 3).with_max_commands(5);
        let summary = run_simulation(&config).unwrap();
        assert_eq!(summary.ending, RunEnding::Halted);
        assert_eq!(summary.commands, 5);
    }
}
