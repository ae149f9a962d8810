//! SHA-1 digest newtype for artefact verification.
//!
//! Validates that the value is a 40-character hexadecimal string
//! representing a 160-bit hash digest. Version manifests are not consistent
//! about case, so both cases are accepted and comparison ignores case.

use super::error::{ArtefactError, Result};
use serde::Deserialize;
use std::fmt;

/// Expected length of a hex-encoded SHA-1 digest.
const DIGEST_HEX_LEN: usize = 40;

/// A validated hex-encoded SHA-1 digest string.
///
/// # Examples
///
/// ```
/// use server_fetcher::artefact::sha1_digest::Sha1Digest;
///
/// let digest: Sha1Digest = "da39a3ee5e6b4b0d3255bfef95601890afd80709"
///     .try_into()
///     .expect("valid digest");
/// assert!(digest.matches("DA39A3EE5E6B4B0D3255BFEF95601890AFD80709"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct Sha1Digest(String);

impl Sha1Digest {
    /// Return the digest as a hex string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Return whether `other` names the same digest, ignoring ASCII case.
    #[must_use]
    pub fn matches(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other)
    }
}

impl TryFrom<&str> for Sha1Digest {
    type Error = ArtefactError;

    fn try_from(value: &str) -> Result<Self> {
        validate_sha1(value)?;
        Ok(Self(value.to_owned()))
    }
}

impl TryFrom<String> for Sha1Digest {
    type Error = ArtefactError;

    fn try_from(value: String) -> Result<Self> {
        validate_sha1(&value)?;
        Ok(Self(value))
    }
}

impl fmt::Display for Sha1Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validate that `value` is a well-formed hex-encoded SHA-1 digest.
fn validate_sha1(value: &str) -> Result<()> {
    if value.len() != DIGEST_HEX_LEN {
        return Err(ArtefactError::InvalidSha1Digest {
            reason: format!(
                "expected {DIGEST_HEX_LEN} hex characters, got {}",
                value.len()
            ),
        });
    }
    if let Some(bad) = value.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(ArtefactError::InvalidSha1Digest {
            reason: format!("non-hex character '{bad}'"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const EMPTY_SHA1: &str = "da39a3ee5e6b4b0d3255bfef95601890afd80709";

    #[test]
    fn accepts_valid_forty_char_hex() {
        let digest = Sha1Digest::try_from(EMPTY_SHA1);
        assert!(digest.is_ok());
    }

    #[test]
    fn accepts_uppercase_hex() {
        let upper = EMPTY_SHA1.to_ascii_uppercase();
        let digest = Sha1Digest::try_from(upper.as_str()).expect("uppercase is accepted");
        assert_eq!(digest.as_str(), upper);
    }

    #[rstest]
    #[case::too_short("abcdef".to_owned())]
    #[case::too_long("a".repeat(41))]
    #[case::sha256_length("a".repeat(64))]
    #[case::empty(String::new())]
    fn rejects_wrong_length(#[case] value: String) {
        let err = Sha1Digest::try_from(value).expect_err("wrong length");
        assert!(err.to_string().contains("expected 40 hex characters"));
    }

    #[test]
    fn rejects_non_hex_characters() {
        let mut bad = "a".repeat(39);
        bad.push('g');
        let err = Sha1Digest::try_from(bad.as_str()).expect_err("non-hex");
        assert!(err.to_string().contains("non-hex character 'g'"));
    }

    #[rstest]
    #[case::same(EMPTY_SHA1, true)]
    #[case::upper("DA39A3EE5E6B4B0D3255BFEF95601890AFD80709", true)]
    #[case::different("0000000000000000000000000000000000000000", false)]
    fn matches_ignores_case(#[case] other: &str, #[case] expected: bool) {
        let digest = Sha1Digest::try_from(EMPTY_SHA1).expect("known good");
        assert_eq!(digest.matches(other), expected);
    }

    #[test]
    fn deserializes_through_validation() {
        let ok: Sha1Digest =
            serde_json::from_str(&format!("\"{EMPTY_SHA1}\"")).expect("valid digest");
        assert_eq!(ok.as_str(), EMPTY_SHA1);

        let bad = serde_json::from_str::<Sha1Digest>("\"short\"");
        assert!(bad.is_err());
    }

    #[test]
    fn display_shows_full_digest() {
        let digest = Sha1Digest::try_from(EMPTY_SHA1).expect("known good");
        assert_eq!(format!("{digest}"), EMPTY_SHA1);
    }
}
