// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Wire contract with the portal's OTA endpoints.
//!
//! `GET /ota/type/{token}/version` answers with the literal `none`, an
//! `{"error": <reason>}` object, or `{"version": "<dotted-decimal>"}`.
//! `POST /ota/upload` answers `{"ok": <message>}` when the image was
//! stored; any other reply is the portal's raw rejection text.

use serde::Deserialize;
use thiserror::Error;

use crate::version::{FirmwareVersion, VersionError};

/// Body sentinel meaning "no device registered for this token".
pub const NO_DEVICE_SENTINEL: &str = "none";

/// Multipart field carrying the device-type token.
pub const FIELD_TOKEN: &str = "token";
/// Multipart field carrying the dotted-decimal version string.
pub const FIELD_VERSION: &str = "version";
/// Multipart field carrying the firmware binary.
pub const FIELD_FILE: &str = "file";

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed version reply: {0}")]
    MalformedReply(#[from] serde_json::Error),

    #[error("version reply carries neither \"version\" nor \"error\": {body:?}")]
    UnrecognizedReply { body: String },

    #[error("unparsable version in reply: {0}")]
    BadVersion(#[from] VersionError),
}

/// Decoded body of a version query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionReply {
    /// The portal has no record for the token.
    NotRegistered,
    /// The portal refused the lookup; the reason is informational only
    /// and the outcome counts as not found.
    Refused(String),
    /// Version currently recorded for the token.
    Current(FirmwareVersion),
}

#[derive(Deserialize)]
struct VersionBody {
    version: Option<String>,
    error: Option<String>,
}

/// Decode the body of a version query.
pub fn decode_version_reply(body: &str) -> Result<VersionReply, ProtocolError> {
    if body.trim() == NO_DEVICE_SENTINEL {
        return Ok(VersionReply::NotRegistered);
    }

    let parsed: VersionBody = serde_json::from_str(body)?;
    if let Some(reason) = parsed.error {
        return Ok(VersionReply::Refused(reason));
    }
    match parsed.version {
        Some(version) => Ok(VersionReply::Current(version.parse()?)),
        None => Err(ProtocolError::UnrecognizedReply {
            body: body.to_string(),
        }),
    }
}

/// Outcome of one upload attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// The portal stored the image; the message is its confirmation text.
    Accepted(String),
    /// The portal rejected the upload; the raw body is shown verbatim.
    Rejected(String),
}

#[derive(Deserialize)]
struct UploadBody {
    ok: Option<String>,
}

/// Decode the body of an upload reply.
///
/// Only a success status whose JSON body carries an `ok` field counts as
/// accepted. Everything else, including a success status with a body the
/// portal got wrong, is a rejection carrying the raw text; the operator
/// reads it and decides whether to re-run.
pub fn decode_upload_reply(status_success: bool, body: &str) -> UploadOutcome {
    if status_success {
        if let Ok(UploadBody { ok: Some(message) }) = serde_json::from_str::<UploadBody>(body) {
            return UploadOutcome::Accepted(message);
        }
    }
    UploadOutcome::Rejected(body.to_string())
}
