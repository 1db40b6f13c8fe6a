// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Command-line interface definitions.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, ValueEnum};

use fwportal_common::BumpPolicy;

use crate::commands;
use crate::prompt::{FixedPolicy, InteractivePrompt, PolicySource};
use crate::secrets::{CredentialsProvider, HeaderCredentials};
use crate::transport::PortalClient;

/// Command-line arguments.
#[derive(Parser)]
#[command(name = "fwportal-upload")]
#[command(about = "Firmware upload tool for the device-management portal")]
pub struct Cli {
    /// Compiled firmware image to upload
    #[arg(value_name = "FIRMWARE")]
    pub firmware: PathBuf,

    /// Build header holding the portal address and device-type token
    #[arg(short, long, default_value = "include/secret_data.h", value_name = "HEADER")]
    pub secrets: PathBuf,

    /// Release type; asks interactively when omitted
    #[arg(short, long, value_enum)]
    pub bump: Option<BumpArg>,
}

/// Release type accepted on the command line.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum BumpArg {
    Patch,
    Minor,
    Major,
    Reuse,
}

impl From<BumpArg> for BumpPolicy {
    fn from(arg: BumpArg) -> Self {
        match arg {
            BumpArg::Patch => Self::Patch,
            BumpArg::Minor => Self::Minor,
            BumpArg::Major => Self::Major,
            BumpArg::Reuse => Self::Reuse,
        }
    }
}

/// Execute the upload flow for the parsed CLI.
pub fn run(cli: Cli) -> Result<ExitCode> {
    let credentials = HeaderCredentials::new(&cli.secrets).credentials()?;
    println!("Portal:   {}", credentials.server_address);
    println!("Token:    {}", credentials.device_type_token);

    let client = PortalClient::new(format!("https://{}", credentials.server_address))?;
    let mut policy_source: Box<dyn PolicySource> = match cli.bump {
        Some(arg) => Box::new(FixedPolicy(arg.into())),
        None => Box::new(InteractivePrompt),
    };

    let outcome = commands::release(
        &client,
        &credentials.device_type_token,
        policy_source.as_mut(),
        &cli.firmware,
    )?;
    Ok(outcome.exit_code())
}
