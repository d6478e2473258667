mod logic;

use anyhow::{Context, Result, bail};
use clap::Parser;
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::Instant;

use logic::{LogicTester, Strategy, StrategyResult, resolve_seed_inputs, split_csv};
use partyhouse_game::{Intermission, RulesConfig};

#[derive(Debug, Parser)]
#[command(name = "partyhouse-tester", version = "0.1.0")]
#[command(about = "Automated playthroughs of the Party House rules engine with invariant checks")]
struct Args {
    /// Strategies to run (comma-separated: cautious, greedy, chaotic, or all)
    #[arg(long, default_value = "all")]
    strategies: String,

    /// Seeds to run (comma-separated integers or start..end ranges)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Number of iterations per seed
    #[arg(long, default_value_t = 10)]
    iterations: usize,

    /// Scenario index every run starts on
    #[arg(long, default_value_t = 0)]
    scenario: usize,

    /// Command budget for a single run
    #[arg(long, default_value_t = 2_000)]
    max_commands: usize,

    /// Rules overrides as a JSON file; unspecified fields keep their defaults
    #[arg(long)]
    rules: Option<PathBuf>,

    /// What happens between parties
    #[arg(long, value_parser = ["direct", "shop"])]
    intermission: Option<String>,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "console"])]
    report: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    announce_banner();

    let start_time = Instant::now();
    let rules = load_rules(&args)?;
    let strategies = expand_strategies(&args.strategies)?;
    let seeds = resolve_seed_inputs(&split_csv(&args.seeds))?;
    log::info!(
        "running {} strategies over {} seeds x {} iterations",
        strategies.len(),
        seeds.len(),
        args.iterations
    );

    let tester = LogicTester::new(rules, args.scenario, args.max_commands, args.verbose);
    let results: Vec<StrategyResult> = strategies
        .iter()
        .map(|strategy| tester.run_strategy(*strategy, &seeds, args.iterations))
        .collect();

    write_reports(&args, &results, start_time)?;

    if results.iter().any(|r| !r.passed) {
        std::process::exit(1);
    }
    Ok(())
}

fn announce_banner() {
    println!("{}", "🎉 Party House Automated Tester".bright_cyan().bold());
    println!("{}", "===============================".cyan());
}

fn load_rules(args: &Args) -> Result<RulesConfig> {
    let mut rules = match &args.rules {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            RulesConfig::from_json(&json)
                .with_context(|| format!("invalid rules in {}", path.display()))?
        }
        None => RulesConfig::default(),
    };
    if let Some(token) = &args.intermission {
        let Ok(intermission) = token.parse::<Intermission>() else {
            bail!("unknown intermission: {token}");
        };
        rules.intermission = intermission;
    }
    Ok(rules)
}

fn expand_strategies(arg: &str) -> Result<Vec<Strategy>> {
    let mut strategies = Vec::new();
    for token in split_csv(arg) {
        if token.eq_ignore_ascii_case("all") {
            strategies.extend(Strategy::ALL);
            continue;
        }
        let Some(strategy) = Strategy::parse(&token) else {
            bail!("unknown strategy: {token}");
        };
        strategies.push(strategy);
    }
    strategies.dedup();
    if strategies.is_empty() {
        strategies.extend(Strategy::ALL);
    }
    Ok(strategies)
}

fn write_reports(args: &Args, results: &[StrategyResult], start_time: Instant) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report.as_str() {
        "json" => logic::reports::generate_json_report(&mut output_target, results)?,
        _ => {
            logic::reports::generate_console_report(
                &mut output_target,
                results,
                start_time.elapsed(),
            )?;
            writeln!(&mut output_target, "🏁 Total time: {:?}", start_time.elapsed())?;
        }
    }
    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}
