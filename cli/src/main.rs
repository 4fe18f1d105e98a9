mod cli;
mod config;
mod dev_cycle;
mod error;
mod files;
mod migrations;
mod packaging;
mod progress;
mod project;
mod release;
mod screenshots;
mod ui;

#[cfg(test)]
mod test_support;

use clap::Parser;
use cli::{Cli, Commands, ReleaseMode};
use colored::Colorize;
use project::Project;
use release::ReleaseOptions;
use std::process;

fn run(cli: Cli) -> error::Result<()> {
    let project = Project::locate(cli.project)?;
    let yes = cli.yes;

    match cli.command {
        Commands::Release {
            publish,
            local,
            screenshots,
            verbose,
        } => release::execute(
            &project,
            ReleaseOptions {
                mode: ReleaseMode::from_flags(publish, local),
                screenshots,
                assume_yes: yes,
                verbose,
            },
        ),
        Commands::NewDevCycle { verbose } => dev_cycle::execute(&project, yes, verbose),
        Commands::NewMigration { verbose } => migrations::execute_new(&project, yes, verbose),
        Commands::UpdateMigration { verbose } => {
            migrations::execute_update(&project, false, yes, verbose)
        }
        Commands::UpdateVersions { verbose } => {
            migrations::execute_update(&project, true, yes, verbose)
        }
        Commands::Screenshots { verbose } => screenshots::execute(&project, yes, verbose),
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        eprintln!("{} {}", "Error:".bold().red(), err.user_message());
        process::exit(1);
    }
}
