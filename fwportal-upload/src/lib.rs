// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Library surface of the uploader, split out so the release flow can be
//! driven in tests without spawning the binary.

pub mod cli;
pub mod commands;
pub mod prompt;
pub mod secrets;
pub mod transport;

pub use commands::{release, RunOutcome};
pub use transport::{PortalClient, PortalError};
