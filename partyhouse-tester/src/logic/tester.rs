use colored::Colorize;
use partyhouse_game::RulesConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::logic::policy::Strategy;
use crate::logic::simulation::{RunEnding, RunSummary, SimulationConfig, run_simulation};

/// Aggregated outcome of every run for one strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyResult {
    pub strategy: String,
    pub passed: bool,
    pub runs: usize,
    pub wins: usize,
    pub losses: usize,
    pub halted: usize,
    pub rejected_commands: usize,
    pub mean_popularity: f64,
    pub mean_rounds: f64,
    pub failures: Vec<String>,
    #[serde(with = "duration_millis")]
    pub average_duration: Duration,
}

impl StrategyResult {
    #[must_use]
    pub fn win_rate(&self) -> f64 {
        if self.runs == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let rate = self.wins as f64 / self.runs as f64;
        rate
    }
}

/// Runs strategies over seeds and folds the summaries together.
pub struct LogicTester {
    rules: RulesConfig,
    scenario: usize,
    max_commands: usize,
    verbose: bool,
}

impl LogicTester {
    #[must_use]
    pub const fn new(rules: RulesConfig, scenario: usize, max_commands: usize, verbose: bool) -> Self {
        Self {
            rules,
            scenario,
            max_commands,
            verbose,
        }
    }

    #[must_use]
    pub fn run_strategy(&self, strategy: Strategy, seeds: &[u64], iterations: usize) -> StrategyResult {
        let mut summaries = Vec::new();
        let mut failures = Vec::new();

        for &seed in seeds {
            if self.verbose {
                println!(
                    "🧪 Strategy {} seed {}",
                    strategy.label().bright_white(),
                    seed
                );
            }
            for i in 0..iterations {
                let iteration_seed = seed.wrapping_add(u64::try_from(i).unwrap_or(u64::MAX));
                let config = SimulationConfig::new(strategy, iteration_seed)
                    .with_rules(self.rules.clone())
                    .with_scenario(self.scenario)
                    .with_max_commands(self.max_commands);
                match run_simulation(&config) {
                    Ok(summary) => {
                        if self.verbose {
                            println!(
                                "  ✅ Iteration {}/{} scenario {} {} after {} parties ({} commands, {:?})",
                                i + 1,
                                iterations,
                                summary.scenario,
                                summary.ending.label(),
                                summary.rounds_played,
                                summary.commands,
                                summary.duration
                            );
                            println!(
                                "     ↳ Popularity {} Cash {} | Rolodex {} ({} banned) | {} draws",
                                summary.popularity,
                                summary.cash,
                                summary.rolodex_size,
                                summary.bans,
                                summary.draws
                            );
                            if let Some(first) = summary.rejected.first() {
                                println!(
                                    "     ↳ {} rejected, first in party {}: {} ({}) [{}]",
                                    summary.rejected.len(),
                                    first.round,
                                    first.command,
                                    first.reason,
                                    first.rationale.as_deref().unwrap_or("-")
                                );
                            }
                        }
                        summaries.push(summary);
                    }
                    Err(err) => {
                        let message = format!("Iteration {} (seed {iteration_seed}): {err:#}", i + 1);
                        if self.verbose {
                            println!("  ❌ {}", message.clone().red());
                        }
                        failures.push(message);
                    }
                }
            }
        }

        summarize(strategy, &summaries, failures)
    }
}

fn summarize(strategy: Strategy, summaries: &[RunSummary], failures: Vec<String>) -> StrategyResult {
    let count = |ending: RunEnding| summaries.iter().filter(|s| s.ending == ending).count();
    let runs = summaries.len() + failures.len();
    let mean = |value: fn(&RunSummary) -> f64| {
        if summaries.is_empty() {
            0.0
        } else {
            #[allow(clippy::cast_precision_loss)]
            let len = summaries.len() as f64;
            summaries.iter().map(value).sum::<f64>() / len
        }
    };
    let average_duration = if summaries.is_empty() {
        Duration::ZERO
    } else {
        summaries.iter().map(|s| s.duration).sum::<Duration>()
            / u32::try_from(summaries.len()).unwrap_or(u32::MAX)
    };

    StrategyResult {
        strategy: strategy.label().to_string(),
        passed: failures.is_empty(),
        runs,
        wins: count(RunEnding::Won),
        losses: count(RunEnding::Lost),
        halted: count(RunEnding::Halted),
        rejected_commands: summaries.iter().map(|s| s.rejected.len()).sum(),
        mean_popularity: mean(|s| f64::from(s.popularity)),
        mean_rounds: mean(|s| f64::from(s.rounds_played)),
        failures,
        average_duration,
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_millis().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
