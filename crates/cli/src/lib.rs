pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

use commands::invoke::Target;

#[derive(Debug, Parser)]
#[command(
    name = "mathwhiz",
    about = "Math Whiz operator CLI",
    long_about = "Exercise the Math Whiz skill locally, inspect configuration, and check readiness.",
    after_help = "Examples:\n  mathwhiz invoke math 12 divided by 4\n  mathwhiz invoke fact\n  mathwhiz doctor --json\n  mathwhiz config"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Send one request through the skill and print the platform response")]
    Invoke {
        #[command(subcommand)]
        target: Target,
    },
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
    #[command(about = "Validate config and skill catalog readiness")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Invoke { target } => commands::invoke::run(target),
        Command::Config => commands::config::run(),
        Command::Doctor { json } => {
            commands::CommandResult { exit_code: 0, output: commands::doctor::run(json) }
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
