//
//  releasehub-cli
//  cli/auth.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Authentication commands.
//!
//! `rh auth login` exchanges credentials for a bearer token and stores it in
//! the system keyring; `rh auth status` shows who the stored token belongs
//! to; `rh auth logout` clears the session and the stored token.

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::api::auth::LoginPayload;
use crate::interactive::{prompt_input, prompt_password};
use crate::router::LOGIN_ROUTE;

use super::{output_writer, CommandContext, GlobalOptions};

/// Authenticate with ReleaseHub
#[derive(Args, Debug)]
pub struct AuthCommand {
    #[command(subcommand)]
    pub command: AuthSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum AuthSubcommand {
    /// Log in and store the bearer token
    Login(LoginArgs),

    /// Show the authenticated user
    Status,

    /// Log out and delete the stored token
    Logout,
}

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Username (prompted when omitted)
    #[arg(long, short = 'u')]
    pub username: Option<String>,

    /// Read the password from stdin instead of prompting
    #[arg(long)]
    pub password_stdin: bool,

    /// Ask the backend for an extended token lifetime
    #[arg(long)]
    pub remember_me: bool,
}

impl AuthCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            AuthSubcommand::Login(args) => self.login(args, global).await,
            AuthSubcommand::Status => self.status(global).await,
            AuthSubcommand::Logout => self.logout(global).await,
        }
    }

    /// Log in, store the token, and fetch the profile.
    async fn login(&self, args: &LoginArgs, global: &GlobalOptions) -> Result<()> {
        let ctx = CommandContext::connect(global, LOGIN_ROUTE)?;
        let writer = output_writer(global);

        // Mirrors the login-screen guard: an authenticated user goes home.
        if ctx.session.is_authenticated() {
            writer.write_warning("already logged in; run 'rh auth logout' to switch accounts");
            return Ok(());
        }

        let username = match &args.username {
            Some(username) => username.clone(),
            None if global.no_prompt => {
                anyhow::bail!("--username is required with --no-prompt")
            }
            None => prompt_input("Username")?,
        };
        let password = if args.password_stdin {
            read_password_from_stdin()?
        } else if global.no_prompt {
            anyhow::bail!("--password-stdin is required with --no-prompt")
        } else {
            prompt_password("Password")?
        };

        let payload = LoginPayload {
            username,
            password,
            remember_me: args.remember_me.then_some(true),
        };
        // A 401 here surfaces as the fixed authentication-failure error;
        // no session teardown or navigation is involved.
        ctx.session.login(&ctx.client, &payload).await?;
        ctx.session.fetch_me(&ctx.client).await?;

        let greeting = ctx
            .session
            .profile()
            .map(|profile| profile.display_name)
            .unwrap_or_else(|| payload_fallback(&payload));
        writer.write_success(&format!("logged in as {greeting}"));

        if let Some(redirect) = ctx.route.redirect_target() {
            writer.write_info(&format!("continue where you left off: {redirect}"));
        }
        Ok(())
    }

    /// Show the profile and permissions behind the stored token.
    async fn status(&self, global: &GlobalOptions) -> Result<()> {
        let ctx = CommandContext::open(global, "/").await?;
        let writer = output_writer(global);

        match ctx.session.profile() {
            Some(profile) => {
                if global.json {
                    crate::output::write_json(&profile)?;
                } else {
                    crate::output::print_field("user", &profile.username, writer.color());
                    crate::output::print_field("name", &profile.display_name, writer.color());
                    let permissions = ctx.session.permissions();
                    let rendered = if permissions.is_empty() {
                        "(none)".to_string()
                    } else {
                        permissions.join(", ")
                    };
                    crate::output::print_field("permissions", &rendered, writer.color());
                }
            }
            None => writer.write_warning("no profile loaded"),
        }
        Ok(())
    }

    /// Clear the session and the stored token.
    async fn logout(&self, global: &GlobalOptions) -> Result<()> {
        let ctx = CommandContext::connect(global, LOGIN_ROUTE)?;
        let writer = output_writer(global);

        if !ctx.session.is_authenticated() {
            writer.write_info("not logged in");
            return Ok(());
        }

        ctx.session.logout();
        writer.write_success("logged out");
        Ok(())
    }
}

/// Reads a password from the first line of stdin.
///
/// Supports piped input: `echo "$RH_PASSWORD" | rh auth login --password-stdin`.
fn read_password_from_stdin() -> Result<String> {
    use std::io::{self, BufRead};

    let stdin = io::stdin();
    let mut line = String::new();
    stdin.lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn payload_fallback(payload: &LoginPayload) -> String {
    payload.username.clone()
}
