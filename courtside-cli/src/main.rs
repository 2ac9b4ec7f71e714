//! Courtside CLI - Command-line interface
//!
//! Commands:
//! - schedule: Generate a multi-round session schedule
//! - king: Generate a single king-of-the-court rotation
//! - swap: Swap two players in a generated rotation
//! - rate: Update player ratings from recorded scores

mod rate_cmd;
mod schedule_cmd;
mod swap_cmd;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "courtside")]
#[command(about = "Fair rotation scheduling and ratings for club sessions")]
struct Cli {
    /// Random seed for reproducible schedules
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a multi-round schedule
    Schedule(schedule_cmd::ScheduleArgs),
    /// Generate a single king-of-the-court rotation
    King(schedule_cmd::KingArgs),
    /// Swap two players in a rotation
    Swap(swap_cmd::SwapArgs),
    /// Rate players from recorded scores
    Rate(rate_cmd::RateArgs),
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so JSON on stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Schedule(args) => schedule_cmd::run(args, cli.seed),
        Commands::King(args) => schedule_cmd::run_king(args, cli.seed),
        Commands::Swap(args) => swap_cmd::run(args),
        Commands::Rate(args) => rate_cmd::run(args),
    }
}
