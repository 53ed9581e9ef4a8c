//! Document identifier validation
//!
//! A document is addressed by a version 4 UUID in its hyphenated `8-4-4-4-12`
//! form. The identifier is validated before any directory is created or any
//! request is sent, and the caller's text is then used verbatim in every
//! request URL and in the local directory name.

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;
use uuid::{Uuid, Variant, Version};

/// Length of the hyphenated UUID form
const HYPHENATED_LEN: usize = 36;

/// A validated document identifier
///
/// Keeps the text exactly as supplied (so `C9BF...` stays upper case in paths
/// and URLs) alongside the parsed value used for equality.
#[derive(Clone, Debug)]
pub struct DocumentId {
    raw: String,
    uuid: Uuid,
}

impl DocumentId {
    /// Parse and validate an identifier
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIdentifier`] when the text is not a hyphenated
    /// RFC 4122 version 4 UUID. Brace, URN and un-hyphenated forms are rejected
    /// even though they describe a valid UUID.
    ///
    /// # Examples
    ///
    /// ```
    /// use page_dl::identifier::DocumentId;
    ///
    /// let id = DocumentId::parse("C9BF9E57-1685-4C89-BAFB-FF5AF830BE8A").unwrap();
    /// assert_eq!(id.as_str(), "C9BF9E57-1685-4C89-BAFB-FF5AF830BE8A");
    /// assert!(DocumentId::parse("c9bf9e58").is_err());
    /// ```
    pub fn parse(input: &str) -> Result<Self> {
        let invalid = || Error::InvalidIdentifier(input.to_string());

        if input.len() != HYPHENATED_LEN {
            return Err(invalid());
        }

        let uuid = Uuid::parse_str(input).map_err(|_| invalid())?;

        if uuid.get_version() != Some(Version::Random) || uuid.get_variant() != Variant::RFC4122 {
            return Err(invalid());
        }

        // The canonical re-serialization must match the input, ignoring case
        let canonical = uuid.hyphenated().to_string();
        if !canonical.eq_ignore_ascii_case(input) {
            return Err(invalid());
        }

        Ok(Self {
            raw: input.to_string(),
            uuid,
        })
    }

    /// The identifier exactly as supplied
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The parsed UUID
    pub fn uuid(&self) -> Uuid {
        self.uuid
    }
}

/// Check whether `input` is an acceptable document identifier
#[must_use]
pub fn is_valid_identifier(input: &str) -> bool {
    DocumentId::parse(input).is_ok()
}

impl PartialEq for DocumentId {
    fn eq(&self, other: &Self) -> bool {
        self.uuid == other.uuid
    }
}

impl Eq for DocumentId {}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for DocumentId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
