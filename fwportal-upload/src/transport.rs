// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Blocking HTTP transport to the portal's OTA endpoints.

use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::Client;
use thiserror::Error;
use tracing::{debug, warn};

use fwportal_common::protocol::{self, UploadOutcome, VersionReply};
use fwportal_common::{FirmwareVersion, ProtocolError};

const USER_AGENT: &str = "fwportal-upload/0.2.0";

#[derive(Debug, Error)]
pub enum PortalError {
    #[error("portal request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

/// Blocking client for one portal.
pub struct PortalClient {
    base_url: String,
    client: Client,
}

impl PortalClient {
    /// `base_url` is scheme plus host, e.g. `https://192.168.1.40`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, PortalError> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Fetch the version currently recorded for `token`.
    ///
    /// `None` means the portal has no device registered under the token.
    /// A refused lookup logs the portal's reason and also counts as not
    /// found; a malformed reply or a transport failure is fatal.
    pub fn current_version(&self, token: &str) -> Result<Option<FirmwareVersion>, PortalError> {
        let url = format!("{}/ota/type/{}/version", self.base_url, token);
        debug!("querying {url}");

        let body = self.client.get(&url).send()?.text()?;
        match protocol::decode_version_reply(&body)? {
            VersionReply::NotRegistered => Ok(None),
            VersionReply::Refused(reason) => {
                warn!("portal refused version lookup: {reason}");
                Ok(None)
            }
            VersionReply::Current(version) => Ok(Some(version)),
        }
    }

    /// Upload `firmware` under `version` for `token`.
    ///
    /// Never retried: a success mutates the portal's version record, so
    /// only the operator decides whether to re-run.
    pub fn upload(
        &self,
        token: &str,
        version: &FirmwareVersion,
        firmware: Vec<u8>,
        file_name: &str,
    ) -> Result<UploadOutcome, PortalError> {
        let part = Part::bytes(firmware).file_name(file_name.to_string());
        let form = Form::new()
            .text(protocol::FIELD_TOKEN, token.to_string())
            .text(protocol::FIELD_VERSION, version.to_string())
            .part(protocol::FIELD_FILE, part);

        let url = format!("{}/ota/upload", self.base_url);
        debug!("uploading to {url}");

        let response = self.client.post(&url).multipart(form).send()?;
        let status_success = response.status().is_success();
        let body = response.text()?;
        Ok(protocol::decode_upload_reply(status_success, &body))
    }
}
