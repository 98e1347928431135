pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "astra",
    about = "Astra operator CLI",
    long_about = "Operate the Astra assistant: inspect configuration, run readiness checks, and ask one-shot questions against live board data.",
    after_help = "Examples:\n  astra doctor --json\n  astra config\n  astra chat \"show me the deals pipeline\" --trace"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(
        about = "Inspect effective configuration values with secrets redacted"
    )]
    Config,
    #[command(about = "Validate config and external-service credential readiness")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Run one conversational turn and print the answer")]
    Chat {
        #[arg(help = "Natural-language question for the assistant")]
        query: String,
        #[arg(long, help = "Also print the execution trace")]
        trace: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => commands::doctor::run(json),
        Command::Chat { query, trace } => commands::chat::run(&query, trace),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
