//
//  releasehub-cli
//  interactive/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Interactive terminal UI components.
//!
//! Prompt helpers used by the form-driven commands. Everything here is a
//! thin wrapper over `dialoguer`; commands honor `--no-prompt` by not
//! calling into this module at all.

pub mod prompt;

pub use prompt::{
    prompt_confirm, prompt_input, prompt_input_optional, prompt_input_with_default,
    prompt_password, prompt_select,
};
