// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Shared types for the fwportal tools: firmware version vectors, release
//! bump rules, and the portal's OTA wire contract. This crate is pure
//! logic; the HTTP transport lives in `fwportal-upload`.

pub mod protocol;
pub mod version;

// Re-export commonly used types
pub use protocol::{decode_upload_reply, decode_version_reply, ProtocolError};
pub use protocol::{UploadOutcome, VersionReply};
pub use version::{BumpPolicy, FirmwareVersion, VersionError, FIELD_MAX};
