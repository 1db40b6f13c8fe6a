// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Build-header credential source.
//!
//! The firmware build embeds the portal address and the device-type token
//! as string constants in a header file. The uploader scans that header
//! instead of taking credentials on the command line.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Header symbol holding the portal address.
pub const SERVER_IP_KEY: &str = "PORTAL_SERVER_IP";
/// Header symbol holding the device-type token.
pub const DEVICE_TYPE_KEY: &str = "DEVICE_TYPE_ID";

/// Credentials for one portal and one device class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalCredentials {
    pub server_address: String,
    pub device_type_token: String,
}

/// Anything that can produce portal credentials.
pub trait CredentialsProvider {
    fn credentials(&self) -> Result<PortalCredentials>;
}

/// Reads credentials from the build's secret header.
pub struct HeaderCredentials {
    path: PathBuf,
}

impl HeaderCredentials {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CredentialsProvider for HeaderCredentials {
    fn credentials(&self) -> Result<PortalCredentials> {
        let text = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read credentials header {}", self.path.display()))?;

        let server_address = scan_assignment(&text, SERVER_IP_KEY)
            .with_context(|| format!("{SERVER_IP_KEY} not found in {}", self.path.display()))?;
        let device_type_token = scan_assignment(&text, DEVICE_TYPE_KEY)
            .with_context(|| format!("{DEVICE_TYPE_KEY} not found in {}", self.path.display()))?;

        Ok(PortalCredentials {
            server_address,
            device_type_token,
        })
    }
}

/// Find the quoted value of a `const char* KEY = "value";` assignment.
/// An assignment with an empty string counts as absent.
fn scan_assignment(text: &str, key: &str) -> Option<String> {
    for line in text.lines() {
        let Some(key_pos) = line.find(key) else {
            continue;
        };
        let rest = &line[key_pos + key.len()..];
        let Some(eq_pos) = rest.find('=') else {
            continue;
        };
        let rest = &rest[eq_pos + 1..];
        let Some(open) = rest.find('"') else {
            continue;
        };
        let rest = &rest[open + 1..];
        let Some(close) = rest.find('"') else {
            continue;
        };
        let value = &rest[..close];
        if !value.is_empty() {
            return Some(value.to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = r#"
#ifndef SECRET_DATA_H
#define SECRET_DATA_H

const char* PORTAL_SERVER_IP = "192.168.1.40";
const char *DEVICE_TYPE_ID = "fan-controller-v2";

#endif
"#;

    fn header_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_credentials_from_header() {
        let file = header_file(HEADER);
        let creds = HeaderCredentials::new(file.path()).credentials().unwrap();
        assert_eq!(creds.server_address, "192.168.1.40");
        assert_eq!(creds.device_type_token, "fan-controller-v2");
    }

    #[test]
    fn test_missing_token_is_configuration_error() {
        let file = header_file(r#"const char* PORTAL_SERVER_IP = "10.0.0.1";"#);
        let err = HeaderCredentials::new(file.path()).credentials().unwrap_err();
        assert!(err.to_string().contains(DEVICE_TYPE_KEY));
    }

    #[test]
    fn test_missing_address_is_configuration_error() {
        let file = header_file(r#"const char* DEVICE_TYPE_ID = "tok";"#);
        let err = HeaderCredentials::new(file.path()).credentials().unwrap_err();
        assert!(err.to_string().contains(SERVER_IP_KEY));
    }

    #[test]
    fn test_empty_value_counts_as_missing() {
        let file = header_file(
            r#"
const char* PORTAL_SERVER_IP = "";
const char* DEVICE_TYPE_ID = "tok";
"#,
        );
        let err = HeaderCredentials::new(file.path()).credentials().unwrap_err();
        assert!(err.to_string().contains(SERVER_IP_KEY));
    }

    #[test]
    fn test_missing_header_file_is_configuration_error() {
        let err = HeaderCredentials::new("/nonexistent/secret_data.h")
            .credentials()
            .unwrap_err();
        assert!(err.to_string().contains("credentials header"));
    }

    #[test]
    fn test_scan_ignores_commented_garbage_without_quotes() {
        let text = "// PORTAL_SERVER_IP = unset\nconst char* PORTAL_SERVER_IP = \"1.2.3.4\";";
        assert_eq!(scan_assignment(text, SERVER_IP_KEY).unwrap(), "1.2.3.4");
    }
}
