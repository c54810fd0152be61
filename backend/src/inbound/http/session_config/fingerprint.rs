//! Session secret fingerprinting for operational visibility.
//!
//! Operators compare the fingerprint logged at startup against their records
//! to confirm which signing secret is active without exposing the secret.

use sha2::{Digest, Sha256};

/// Length of the fingerprint in bytes before hex encoding.
const FINGERPRINT_BYTES: usize = 8;

/// First 8 bytes of the SHA-256 of `secret`, as 16 lowercase hex characters.
///
/// # Examples
///
/// ```rust
/// use sentinela::inbound::http::session_config::fingerprint::secret_fingerprint;
///
/// let fp = secret_fingerprint(b"an example signing secret of 32b");
/// assert_eq!(fp.len(), 16);
/// assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
/// ```
#[must_use]
pub fn secret_fingerprint(secret: &[u8]) -> String {
    let digest = Sha256::digest(secret);
    hex::encode(&digest[..FINGERPRINT_BYTES])
}
