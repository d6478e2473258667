use anyhow::Result;
use colored::Colorize;
use std::io::Write;
use std::time::Duration;

use super::StrategyResult;

pub fn generate_console_report<W: Write + ?Sized>(
    out: &mut W,
    results: &[StrategyResult],
    total_duration: Duration,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Strategy Results Summary".bright_cyan().bold())?;
    writeln!(out, "{}", "===========================".cyan())?;

    let total = results.len();
    let passed = results.iter().filter(|r| r.passed).count();
    let runs: usize = results.iter().map(|r| r.runs).sum();

    writeln!(out, "Strategies: {total}")?;
    writeln!(out, "Passed: {}", passed.to_string().green())?;
    writeln!(out, "Failed: {}", (total - passed).to_string().red())?;
    writeln!(out, "Runs: {runs}")?;
    writeln!(out, "Total time: {total_duration:?}")?;
    writeln!(out)?;

    for result in results {
        let status = if result.passed {
            "✅ PASS".green()
        } else {
            "❌ FAIL".red()
        };
        writeln!(out, "{} {}", status, result.strategy.bold())?;
        writeln!(
            out,
            "   Won {} / Lost {} / Halted {} of {} runs ({:.1}% wins)",
            result.wins,
            result.losses,
            result.halted,
            result.runs,
            result.win_rate() * 100.0
        )?;
        writeln!(
            out,
            "   Mean popularity {:.1}, mean parties {:.1}, rejected commands {}",
            result.mean_popularity, result.mean_rounds, result.rejected_commands
        )?;
        writeln!(out, "   Average time: {:?}", result.average_duration)?;
        if !result.failures.is_empty() {
            writeln!(out, "   Failures:")?;
            for failure in &result.failures {
                writeln!(out, "     • {}", failure.red())?;
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

pub fn generate_json_report<W: Write + ?Sized>(out: &mut W, results: &[StrategyResult]) -> Result<()> {
    let json_output = serde_json::to_string_pretty(results)?;
    writeln!(out, "{json_output}")?;
    Ok(())
}
