//
//  releasehub-cli
//  interactive/prompt.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Interactive Prompts Module
//!
//! This module provides the prompt functions for gathering user input in
//! the terminal. It wraps the `dialoguer` crate to offer a consistent
//! interface for text input, password entry, confirmations, and selection.
//!
//! # Example
//!
//! ```no_run
//! use releasehub_cli::interactive::prompt::{prompt_input, prompt_password};
//!
//! let username = prompt_input("Username").unwrap();
//! let password = prompt_password("Password").unwrap();
//! ```

use anyhow::Result;
use dialoguer::{Confirm, Input, Password, Select};

/// Prompts the user for text input.
///
/// The prompt repeats until non-empty input is provided.
///
/// # Parameters
///
/// * `message` - The prompt message displayed to the user
///
/// # Returns
///
/// Returns `Ok(String)` containing the user's input, or `Err` if the
/// terminal interaction fails (e.g. stdin closed).
pub fn prompt_input(message: &str) -> Result<String> {
    let input: String = Input::new().with_prompt(message).interact_text()?;
    Ok(input)
}

/// Prompts the user for text input with a default value.
///
/// The user accepts the default by pressing Enter or types a new value.
pub fn prompt_input_with_default(message: &str, default: &str) -> Result<String> {
    let input: String = Input::new()
        .with_prompt(message)
        .default(default.to_string())
        .interact_text()?;
    Ok(input)
}

/// Prompts the user for optional text input.
///
/// Returns `None` when the user presses Enter without typing anything.
pub fn prompt_input_optional(message: &str) -> Result<Option<String>> {
    let input: String = Input::new()
        .with_prompt(message)
        .allow_empty(true)
        .interact_text()?;
    Ok(if input.is_empty() { None } else { Some(input) })
}

/// Prompts the user for a password with masked input.
pub fn prompt_password(message: &str) -> Result<String> {
    let password = Password::new().with_prompt(message).interact()?;
    Ok(password)
}

/// Prompts the user for a yes/no confirmation.
///
/// # Parameters
///
/// * `message` - The question displayed to the user
/// * `default` - The answer used when the user just presses Enter
pub fn prompt_confirm(message: &str, default: bool) -> Result<bool> {
    let confirmed = Confirm::new()
        .with_prompt(message)
        .default(default)
        .interact()?;
    Ok(confirmed)
}

/// Prompts the user to pick one item from a list.
///
/// Returns the index of the selected item.
pub fn prompt_select(message: &str, items: &[String]) -> Result<usize> {
    let index = Select::new()
        .with_prompt(message)
        .items(items)
        .default(0)
        .interact()?;
    Ok(index)
}
