//! Scenarist CLI - what-if scenario generation.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate {
            inputs,
            changes,
            prompt,
            interpreter,
            out_dir,
            zip,
            store,
            strict_kinds,
        } => commands::generate::run(
            inputs,
            changes,
            prompt,
            interpreter,
            out_dir,
            zip,
            store,
            strict_kinds,
            cli.verbose,
        ),

        Commands::Drivers { inputs, json } => commands::drivers::run(inputs, json),

        Commands::Interpret {
            prompt,
            inputs,
            interpreter,
        } => commands::interpret::run(prompt, inputs, interpreter),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
