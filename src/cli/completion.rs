//
//  releasehub-cli
//  cli/completion.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Shell completion generation.

use anyhow::Result;
use clap::{Args, CommandFactory};
use clap_complete::{generate, Shell};

use super::{Cli, GlobalOptions};

/// Generate shell completions
#[derive(Args, Debug)]
pub struct CompletionCommand {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,
}

impl CompletionCommand {
    pub async fn run(&self, _global: &GlobalOptions) -> Result<()> {
        let mut command = Cli::command();
        let name = command.get_name().to_string();
        generate(self.shell, &mut command, name, &mut std::io::stdout());
        Ok(())
    }
}
