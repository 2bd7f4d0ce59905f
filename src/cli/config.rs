//
//  releasehub-cli
//  cli/config.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Configuration commands.
//!
//! `rh config get`/`set` read and write the TOML config file; `rh config
//! list` shows everything. The locale preference set here persists
//! independently of the login session.

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::config::Config;

use super::{output_writer, GlobalOptions};

/// Read and write CLI configuration
#[derive(Args, Debug)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigSubcommand {
    /// Show a single setting
    Get(GetArgs),

    /// Change a setting
    Set(SetArgs),

    /// Show all settings
    List,

    /// Print the config file path
    Path,
}

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Setting name: base_url, locale, or perm_mode
    pub key: String,
}

#[derive(Args, Debug)]
pub struct SetArgs {
    /// Setting name: base_url, locale, or perm_mode
    pub key: String,

    /// New value
    pub value: String,
}

impl ConfigCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            ConfigSubcommand::Get(args) => self.get(args),
            ConfigSubcommand::Set(args) => self.set(args, global),
            ConfigSubcommand::List => self.list(global),
            ConfigSubcommand::Path => self.path(),
        }
    }

    fn get(&self, args: &GetArgs) -> Result<()> {
        let config = Config::load()?;
        match config.get(&args.key) {
            Some(value) => {
                println!("{value}");
                Ok(())
            }
            None => anyhow::bail!(
                "unknown config key: {} (expected base_url, locale, perm_mode)",
                args.key
            ),
        }
    }

    fn set(&self, args: &SetArgs, global: &GlobalOptions) -> Result<()> {
        let mut config = Config::load()?;
        config.set(&args.key, &args.value)?;
        config.save()?;
        output_writer(global).write_success(&format!("{} = {}", args.key, args.value));
        Ok(())
    }

    fn list(&self, global: &GlobalOptions) -> Result<()> {
        let config = Config::load()?;
        if global.json {
            crate::output::write_json(&config)?;
            return Ok(());
        }
        for key in ["base_url", "locale", "perm_mode"] {
            if let Some(value) = config.get(key) {
                println!("{key} = {value}");
            }
        }
        Ok(())
    }

    fn path(&self) -> Result<()> {
        println!("{}", Config::path()?.display());
        Ok(())
    }
}
