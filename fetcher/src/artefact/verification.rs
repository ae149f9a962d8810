//! Integrity verification for downloaded artefacts.
//!
//! Digests are computed by streaming the file through SHA-1 in fixed-size
//! blocks, so memory use does not depend on the artefact size.

use super::sha1_digest::Sha1Digest;
use sha1::{Digest, Sha1};
use std::fs;
use std::io::{self, Read};
use std::path::Path;

/// Block size used when re-reading a file for hashing.
pub const HASH_BLOCK_SIZE: usize = 64 * 1024;

/// The result of comparing a file's digest with the expected checksum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    /// The computed digest equals the expected checksum.
    Match {
        /// The computed lowercase hex digest.
        digest: String,
    },
    /// The computed digest differs from the expected checksum.
    Mismatch {
        /// The checksum recorded in the manifest.
        expected: String,
        /// The computed lowercase hex digest.
        actual: String,
    },
}

/// Compute the lowercase hex SHA-1 digest of everything `reader` yields.
///
/// # Errors
///
/// Returns any I/O error raised by `reader`.
///
/// # Examples
///
/// ```
/// use server_fetcher::artefact::verification::compute_sha1_from;
///
/// let digest = compute_sha1_from(&b""[..]).expect("in-memory read");
/// assert_eq!(digest, "da39a3ee5e6b4b0d3255bfef95601890afd80709");
/// ```
pub fn compute_sha1_from(mut reader: impl Read) -> io::Result<String> {
    let mut hasher = Sha1::new();
    let mut buffer = vec![0u8; HASH_BLOCK_SIZE];
    loop {
        let bytes_read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(buffer.get(..bytes_read).unwrap_or_default());
    }
    Ok(format!("{:x}", hasher.finalize()))
}

/// Compute the lowercase hex SHA-1 digest of the file at `path`.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be opened or read.
pub fn compute_sha1(path: &Path) -> io::Result<String> {
    let file = fs::File::open(path)?;
    compute_sha1_from(file)
}

/// Hash the file at `path` and compare it with `expected`, ignoring case.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be opened or read.
pub fn verify_file(path: &Path, expected: &Sha1Digest) -> io::Result<Verification> {
    let actual = compute_sha1(path)?;
    if expected.matches(&actual) {
        Ok(Verification::Match { digest: actual })
    } else {
        Ok(Verification::Mismatch {
            expected: expected.to_string(),
            actual,
        })
    }
}
