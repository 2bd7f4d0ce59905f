//
//  releasehub-cli
//  main.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use releasehub_cli::cli::{Cli, Commands};
use releasehub_cli::exit_codes;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    init_logging();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Execute command
    let result = run(cli).await;

    // Handle result and exit
    match result {
        Ok(()) => std::process::exit(exit_codes::SUCCESS),
        Err(e) => {
            // Every failure leaves through the same notifier the screens use.
            releasehub_cli::notify::handle_error(&e);
            std::process::exit(exit_codes::ERROR);
        }
    }
}

/// Initialize logging based on environment
fn init_logging() {
    let filter = EnvFilter::try_from_env("RH_DEBUG").unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}

/// Main command dispatcher
async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Auth(cmd) => cmd.run(&cli.global).await,
        Commands::Iteration(cmd) => cmd.run(&cli.global).await,
        Commands::Window(cmd) => cmd.run(&cli.global).await,
        Commands::Repo(cmd) => cmd.run(&cli.global).await,
        Commands::Run(cmd) => cmd.run(&cli.global).await,
        Commands::Rule(cmd) => cmd.run(&cli.global).await,
        Commands::Policy(cmd) => cmd.run(&cli.global).await,
        Commands::Config(cmd) => cmd.run(&cli.global).await,
        Commands::Completion(cmd) => cmd.run(&cli.global).await,
        Commands::Version => {
            println!("rh version {}", releasehub_cli::VERSION);
            Ok(())
        }
    }
}
