//
//  releasehub-cli
//  tests/cli_smoke.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Smoke tests of the binary surface.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn version_prints_the_crate_version() {
    Command::cargo_bin("rh")
        .unwrap()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn help_lists_the_screens() {
    Command::cargo_bin("rh")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("iteration"))
        .stdout(predicate::str::contains("window"))
        .stdout(predicate::str::contains("rule"))
        .stdout(predicate::str::contains("policy"));
}

#[test]
fn unknown_subcommands_fail_with_usage() {
    Command::cargo_bin("rh")
        .unwrap()
        .arg("frobnicate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}
