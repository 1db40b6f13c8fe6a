// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! The release flow: query, select, bump, upload, report.

use std::fs;
use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use indicatif::ProgressBar;
use tracing::info;

use fwportal_common::protocol::UploadOutcome;
use fwportal_common::{BumpPolicy, FirmwareVersion};

use crate::prompt::PolicySource;
use crate::transport::PortalClient;

/// Terminal state of one run.
#[derive(Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// Firmware stored under `version`.
    Updated { version: FirmwareVersion },
    /// No device registered for the token; nothing was uploaded.
    NoDevice,
    /// The portal rejected the upload; its reply was already shown.
    Rejected,
}

impl RunOutcome {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::Updated { .. } => ExitCode::SUCCESS,
            Self::NoDevice | Self::Rejected => ExitCode::FAILURE,
        }
    }
}

/// Run the whole release flow against one portal.
///
/// Soft endings (no device, rejected upload) come back as a [`RunOutcome`]
/// after being reported; configuration, transport, parse, and overflow
/// problems come back as errors, and an overflow aborts before any bytes
/// are sent.
pub fn release(
    client: &PortalClient,
    token: &str,
    policy_source: &mut dyn PolicySource,
    firmware: &Path,
) -> Result<RunOutcome> {
    let Some(current) = client.current_version(token)? else {
        println!("no board registered for token [{token}]");
        return Ok(RunOutcome::NoDevice);
    };
    println!("current build: {current}");

    let policy = policy_source.choose(&current)?;
    let next = current.bump(policy).context("refusing to upload")?;
    if policy == BumpPolicy::Reuse {
        info!("reusing current version {next}");
    } else {
        info!("releasing {next} ({policy:?} bump of {current})");
    }

    let bytes =
        fs::read(firmware).with_context(|| format!("failed to read {}", firmware.display()))?;
    let file_name = firmware
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "firmware.bin".to_string());
    println!("Firmware: {} ({} bytes)", firmware.display(), bytes.len());
    println!("Version:  {next}");

    let spinner = ProgressBar::new_spinner();
    spinner.set_message("uploading...");
    spinner.enable_steady_tick(Duration::from_millis(100));
    let outcome = client.upload(token, &next, bytes, &file_name);
    spinner.finish_and_clear();

    match outcome? {
        UploadOutcome::Accepted(message) => {
            println!();
            println!("=== update done ===");
            println!("{message}");
            Ok(RunOutcome::Updated { version: next })
        }
        UploadOutcome::Rejected(raw) => {
            println!("error on updating: {raw}");
            Ok(RunOutcome::Rejected)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::FixedPolicy;
    use mockito::{Matcher, Mock, Server, ServerGuard};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn firmware_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"firmware image bytes").unwrap();
        file
    }

    fn client_for(server: &ServerGuard) -> PortalClient {
        PortalClient::new(server.url()).unwrap()
    }

    fn version_mock(server: &mut ServerGuard, body: &str) -> Mock {
        server
            .mock("GET", "/ota/type/tok/version")
            .with_status(200)
            .with_body(body)
            .create()
    }

    #[test]
    fn test_patch_release_posts_bumped_version() {
        let mut server = Server::new();
        let _query = version_mock(&mut server, r#"{"version":"1.2.254"}"#);
        let upload = server
            .mock("POST", "/ota/upload")
            .match_body(Matcher::Regex(r"1\.2\.255".to_string()))
            .with_status(200)
            .with_body(r#"{"ok":"firmware 1.2.255 stored"}"#)
            .create();

        let firmware = firmware_file();
        let outcome = release(
            &client_for(&server),
            "tok",
            &mut FixedPolicy(BumpPolicy::Patch),
            firmware.path(),
        )
        .unwrap();

        assert_eq!(
            outcome,
            RunOutcome::Updated {
                version: "1.2.255".parse().unwrap()
            }
        );
        upload.assert();
    }

    #[test]
    fn test_overflow_aborts_before_upload() {
        let mut server = Server::new();
        let _query = version_mock(&mut server, r#"{"version":"1.2.255"}"#);
        let upload = server.mock("POST", "/ota/upload").expect(0).create();

        let firmware = firmware_file();
        let err = release(
            &client_for(&server),
            "tok",
            &mut FixedPolicy(BumpPolicy::Patch),
            firmware.path(),
        )
        .unwrap_err();

        assert!(err.to_string().contains("refusing to upload"));
        upload.assert();
    }

    #[test]
    fn test_unregistered_token_ends_without_upload() {
        let mut server = Server::new();
        let _query = version_mock(&mut server, "none");
        let upload = server.mock("POST", "/ota/upload").expect(0).create();

        let firmware = firmware_file();
        let outcome = release(
            &client_for(&server),
            "tok",
            &mut FixedPolicy(BumpPolicy::Patch),
            firmware.path(),
        )
        .unwrap();

        assert_eq!(outcome, RunOutcome::NoDevice);
        upload.assert();
    }

    #[test]
    fn test_rejected_upload_is_reported_not_raised() {
        let mut server = Server::new();
        let _query = version_mock(&mut server, r#"{"version":"1.2.3"}"#);
        let _upload = server
            .mock("POST", "/ota/upload")
            .with_status(500)
            .with_body(r#"{"error":"disk full"}"#)
            .create();

        let firmware = firmware_file();
        let outcome = release(
            &client_for(&server),
            "tok",
            &mut FixedPolicy(BumpPolicy::Patch),
            firmware.path(),
        )
        .unwrap();

        assert_eq!(outcome, RunOutcome::Rejected);
    }

    #[test]
    fn test_reuse_posts_current_version_unchanged() {
        let mut server = Server::new();
        let _query = version_mock(&mut server, r#"{"version":"1.0.5"}"#);
        let upload = server
            .mock("POST", "/ota/upload")
            .match_body(Matcher::Regex(r"1\.0\.5".to_string()))
            .with_status(200)
            .with_body(r#"{"ok":"stored"}"#)
            .create();

        let firmware = firmware_file();
        let outcome = release(
            &client_for(&server),
            "tok",
            &mut FixedPolicy(BumpPolicy::Reuse),
            firmware.path(),
        )
        .unwrap();

        assert_eq!(
            outcome,
            RunOutcome::Updated {
                version: "1.0.5".parse().unwrap()
            }
        );
        upload.assert();
    }

    #[test]
    fn test_major_release_zeroes_trailing_fields() {
        let mut server = Server::new();
        let _query = version_mock(&mut server, r#"{"version":"2.0.0"}"#);
        let upload = server
            .mock("POST", "/ota/upload")
            .match_body(Matcher::Regex(r"3\.0\.0".to_string()))
            .with_status(200)
            .with_body(r#"{"ok":"stored"}"#)
            .create();

        let firmware = firmware_file();
        let outcome = release(
            &client_for(&server),
            "tok",
            &mut FixedPolicy(BumpPolicy::Major),
            firmware.path(),
        )
        .unwrap();

        assert_eq!(
            outcome,
            RunOutcome::Updated {
                version: "3.0.0".parse().unwrap()
            }
        );
        upload.assert();
    }

    #[test]
    fn test_missing_firmware_file_aborts_before_upload() {
        let mut server = Server::new();
        let _query = version_mock(&mut server, r#"{"version":"1.2.3"}"#);
        let upload = server.mock("POST", "/ota/upload").expect(0).create();

        let err = release(
            &client_for(&server),
            "tok",
            &mut FixedPolicy(BumpPolicy::Patch),
            Path::new("/nonexistent/firmware.bin"),
        )
        .unwrap_err();

        assert!(err.to_string().contains("failed to read"));
        upload.assert();
    }
}
