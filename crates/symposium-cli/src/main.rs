//! Symposium CLI - seat a table of philosophers and let them dine

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser};
use symposium_core::{Dinner, DinnerConfig, DinnerReport};
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "symposium")]
#[command(about = "Symposium - dining philosophers with starvation-aware fork admission")]
struct Cli {
    /// Log filter used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Seat the philosophers and run the dinner (default)
    Dine(DineArgs),
    /// Check configuration validity
    Check {
        /// Configuration file path
        #[arg(short, long)]
        config: PathBuf,
    },
}

#[derive(Args, Default)]
struct DineArgs {
    /// Number of philosophers at the table
    #[arg(value_parser = parse_philosophers)]
    philosophers: Option<usize>,

    /// JSON configuration file; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Eat/think/talk cycles per philosopher
    #[arg(long)]
    steps: Option<u32>,

    /// Upper bound for eating and thinking, in milliseconds
    #[arg(long)]
    time_to_waste_ms: Option<u64>,

    /// Denials before a hungry philosopher starts starving
    #[arg(long)]
    waiting_bound: Option<u32>,

    /// Chance of asking to talk after each thought
    #[arg(long)]
    talk_probability: Option<f64>,

    /// Seed for reproducible timings
    #[arg(long)]
    seed: Option<u64>,

    /// Print the final report as JSON
    #[arg(long)]
    json: bool,
}

fn parse_philosophers(raw: &str) -> Result<usize, String> {
    match raw.parse::<i64>() {
        Ok(n) if n > 0 => usize::try_from(n).map_err(|e| e.to_string()),
        _ => Err(format!("\"{raw}\" is not a positive decimal integer")),
    }
}

fn build_config(args: &DineArgs) -> anyhow::Result<DinnerConfig> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => DinnerConfig::default(),
    };

    if let Some(n) = args.philosophers {
        config.table.philosophers = n;
    }
    if let Some(bound) = args.waiting_bound {
        config.table.waiting_bound = bound;
    }
    if let Some(steps) = args.steps {
        config.agent.dining_steps = steps;
    }
    if let Some(ms) = args.time_to_waste_ms {
        config.agent.time_to_waste_ms = ms;
    }
    if let Some(p) = args.talk_probability {
        config.agent.talk_probability = p;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    config.validate()?;
    Ok(config)
}

fn load_config(path: &Path) -> anyhow::Result<DinnerConfig> {
    DinnerConfig::from_path(path).with_context(|| format!("cannot load {}", path.display()))
}

async fn dine(args: DineArgs) -> anyhow::Result<()> {
    let config = build_config(&args)?;
    let dinner = Arc::new(Dinner::new(config)?);

    let mut runner = tokio::task::spawn_blocking({
        let dinner = Arc::clone(&dinner);
        move || dinner.run()
    });

    let joined = tokio::select! {
        joined = &mut runner => joined,
        signal = tokio::signal::ctrl_c() => {
            match signal {
                Ok(()) => {
                    warn!("Ctrl-C received, asking the philosophers to leave");
                    dinner.shutdown();
                }
                Err(err) => warn!("Cannot listen for Ctrl-C: {}", err),
            }
            runner.await
        }
    };
    let report = joined.context("dinner task failed")??;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report);
    }
    Ok(())
}

fn print_summary(report: &DinnerReport) {
    println!(
        "Dinner over after {} ms: {} meals, {} talks",
        report.elapsed_ms,
        report.total_meals(),
        report.total_talks()
    );
    for p in &report.philosophers {
        println!(
            "  Philosopher {}: {} meals, {} thoughts, {} talks ({:?})",
            p.id, p.meals, p.thoughts, p.talks, p.outcome
        );
    }
}

fn check(path: &Path) -> anyhow::Result<()> {
    let config = load_config(path)?;
    println!("Config OK: {}", path.display());
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_thread_names(true)
        .init();

    match cli.command {
        Some(Commands::Dine(args)) => dine(args).await,
        Some(Commands::Check { config }) => check(&config),
        None => dine(DineArgs::default()).await,
    }
}
