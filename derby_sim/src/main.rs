// derby_sim/src/main.rs

mod car;
mod cli;
mod error;
mod ingest;
mod manual;
mod runner;
mod scenario;
mod scripted;

use clap::Parser;
use cli::{Cli, CliCommand};
use error::Result;
use log::{error, info};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run(Cli::parse()) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        CliCommand::Run(args) => {
            let scenario = scenario::Scenario::load(&args.scenario)?;
            info!(
                "running scenario '{}' with seed {}",
                args.scenario.display(),
                args.seed
            );
            let summary = runner::run(&scenario, args.seed, args.max_cycles, args.print_commands)?;
            info!(
                "cycles={} commands={} rejected={} balls={} finished={}",
                summary.cycles,
                summary.commands_sent,
                summary.rejected_cycles,
                summary.balls_delivered,
                summary.game_finished
            );
        }
        CliCommand::Drive(args) => {
            let command = manual::manual_command(&args);
            println!("{}", serde_json::to_string_pretty(&command)?);
        }
    }
    Ok(())
}
