use crate::commands::{
    run_rebuild, run_schedule, run_select, run_totals, RebuildArgs, SelectArgs, TotalsArgs,
};
use clap::{Parser, Subcommand};
use sloty::config::EngineConfig;
use sloty::error::AppError;
use sloty::telemetry;

#[derive(Parser, Debug)]
#[command(
    name = "sloty",
    about = "Score publication records into evaluation points and slots",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Report the policy tier each record of a snapshot would be scored with
    Select(SelectArgs),
    /// Rebuild cached score rows for a snapshot and print them
    Rebuild(RebuildArgs),
    /// Per-discipline point and slot totals of one author
    Totals(TotalsArgs),
    /// Print the effective policy schedule
    Schedule,
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = EngineConfig::load()?;
    telemetry::init(&config.telemetry)?;

    match cli.command {
        Command::Select(args) => run_select(&config, args),
        Command::Rebuild(args) => run_rebuild(&config, args),
        Command::Totals(args) => run_totals(&config, args),
        Command::Schedule => run_schedule(&config),
    }
}
