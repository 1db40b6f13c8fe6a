// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Firmware version vectors and release bump rules.
//!
//! A version is a dotted-decimal string with any number of fields
//! ("1.4", "0.2.7", "1.0.0.12"), each field in `0..=255`. Vectors are
//! immutable: a bump produces a fresh vector or fails, it never edits
//! the input in place.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Highest value a single version field can hold.
pub const FIELD_MAX: u8 = 255;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VersionError {
    #[error("version has no fields")]
    Empty,

    #[error("invalid version field {field:?} in {input:?}: fields are integers in 0..=255")]
    InvalidField { input: String, field: String },

    #[error("cannot increment {version}: field {index} is already at 255")]
    Overflow { version: FirmwareVersion, index: usize },
}

/// Which version field a release advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BumpPolicy {
    /// Increment the last field.
    Patch,
    /// Increment the second-to-last field, reset the last.
    Minor,
    /// Increment the first field, reset everything after it.
    Major,
    /// Keep the current version unchanged.
    Reuse,
}

impl BumpPolicy {
    /// Index of the field this policy increments in a vector of `len`
    /// fields, or `None` for [`BumpPolicy::Reuse`].
    ///
    /// On a single-field vector all three incrementing policies land on
    /// index 0.
    pub fn target_index(self, len: usize) -> Option<usize> {
        match self {
            Self::Patch => Some(len - 1),
            Self::Minor => Some(len.saturating_sub(2)),
            Self::Major => Some(0),
            Self::Reuse => None,
        }
    }
}

/// An immutable firmware version: one or more numeric fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirmwareVersion {
    fields: Vec<u8>,
}

impl FirmwareVersion {
    /// Build a version from raw fields. Fails on an empty vector.
    pub fn new(fields: Vec<u8>) -> Result<Self, VersionError> {
        if fields.is_empty() {
            return Err(VersionError::Empty);
        }
        Ok(Self { fields })
    }

    pub fn fields(&self) -> &[u8] {
        &self.fields
    }

    /// Compute the next version under `policy`.
    ///
    /// The targeted field is incremented and every field to its right is
    /// reset to zero; fields to the left are untouched. A targeted field
    /// already at [`FIELD_MAX`] is a hard stop: carrying into the
    /// neighbouring field would collide with an earlier release, so the
    /// bump fails instead of wrapping.
    pub fn bump(&self, policy: BumpPolicy) -> Result<Self, VersionError> {
        let Some(index) = policy.target_index(self.fields.len()) else {
            return Ok(self.clone());
        };

        if self.fields[index] == FIELD_MAX {
            return Err(VersionError::Overflow {
                version: self.clone(),
                index,
            });
        }

        let mut fields = self.fields.clone();
        fields[index] += 1;
        for field in &mut fields[index + 1..] {
            *field = 0;
        }
        Ok(Self { fields })
    }
}

impl fmt::Display for FirmwareVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", field)?;
        }
        Ok(())
    }
}

impl FromStr for FirmwareVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(VersionError::Empty);
        }
        let fields = s
            .split('.')
            .map(|part| {
                part.trim()
                    .parse::<u8>()
                    .map_err(|_| VersionError::InvalidField {
                        input: s.to_string(),
                        field: part.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(fields)
    }
}
