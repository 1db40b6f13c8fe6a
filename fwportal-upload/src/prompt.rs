// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Release type selection.
//!
//! The interactive menu and the operator's answer go over stderr/stdin so
//! the prompt never interleaves with the run report on stdout.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};

use fwportal_common::{BumpPolicy, FirmwareVersion};

/// Source of the bump decision for one run.
pub trait PolicySource {
    fn choose(&mut self, current: &FirmwareVersion) -> Result<BumpPolicy>;
}

/// Always answers with a fixed policy; backs the `--bump` flag.
pub struct FixedPolicy(pub BumpPolicy);

impl PolicySource for FixedPolicy {
    fn choose(&mut self, _current: &FirmwareVersion) -> Result<BumpPolicy> {
        Ok(self.0)
    }
}

/// One-shot menu on stderr, one line read back from stdin.
pub struct InteractivePrompt;

impl PolicySource for InteractivePrompt {
    fn choose(&mut self, current: &FirmwareVersion) -> Result<BumpPolicy> {
        let mut err = io::stderr().lock();
        write!(
            err,
            "current version is {current}\n\
               1) patch release\n\
               2) minor release\n\
               3) major release\n\
               4) reuse current version\n\
             release type [1]: "
        )
        .context("failed to write release prompt")?;
        err.flush().context("failed to flush release prompt")?;

        let mut line = String::new();
        io::stdin()
            .lock()
            .read_line(&mut line)
            .context("failed to read release choice")?;
        Ok(policy_for_choice(&line))
    }
}

/// Map the operator's answer to a policy.
///
/// Anything unrecognized, including an empty line, falls back to a patch
/// release; there is no re-prompt.
pub fn policy_for_choice(line: &str) -> BumpPolicy {
    match line.trim() {
        "2" => BumpPolicy::Minor,
        "3" => BumpPolicy::Major,
        "4" => BumpPolicy::Reuse,
        _ => BumpPolicy::Patch,
    }
}
