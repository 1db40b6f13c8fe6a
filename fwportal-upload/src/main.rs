// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Firmware upload tool for the device-management portal.
//!
//! Usage:
//!   fwportal-upload firmware.bin
//!   fwportal-upload firmware.bin --bump minor
//!   fwportal-upload firmware.bin --secrets include/secret_data.h --bump reuse

use std::process::ExitCode;

use clap::Parser;

use fwportal_upload::cli::{self, Cli};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();
    match cli::run(args) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
