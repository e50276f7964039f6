//! Interview code generation.
//!
//! Codes look like `INT-7QK2M9XA`. A candidate is re-drawn while it
//! collides with an existing code, up to [`MAX_DRAWS`] times. If the
//! lookup itself fails, or every draw collides, a date-based fallback
//! (`INT-20240615-3FA9`) is returned so issuance always terminates.

use chrono::{DateTime, Utc};
use rand::Rng;
use sha2::{Digest, Sha256};

use crate::error::CoreError;

/// Prefix shared by every interview code.
pub const CODE_PREFIX: &str = "INT-";

/// Number of random characters after the prefix.
pub const RANDOM_PART_LENGTH: usize = 8;

/// Upper bound on collision re-draws before falling back.
pub const MAX_DRAWS: usize = 10;

/// Existence check against already issued codes.
#[async_trait::async_trait]
pub trait CodeLookup: Send + Sync {
    async fn code_exists(&self, code: &str) -> Result<bool, CoreError>;
}

/// Draw a random `INT-XXXXXXXX` candidate.
pub fn random_code() -> String {
    let suffix: String = rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(RANDOM_PART_LENGTH)
        .map(|b| char::from(b).to_ascii_uppercase())
        .collect();
    format!("{CODE_PREFIX}{suffix}")
}

/// Date-based fallback code, `INT-YYYYMMDD-XXXX`, where `XXXX` comes from
/// a SHA-256 digest of the instant.
pub fn fallback_code(now: DateTime<Utc>) -> String {
    let nanos = now.timestamp_nanos_opt().unwrap_or_else(|| now.timestamp_micros());
    let digest = Sha256::digest(nanos.to_be_bytes());
    let tail: String = digest
        .iter()
        .take(2)
        .map(|b| format!("{b:02X}"))
        .collect();
    format!("{CODE_PREFIX}{}-{tail}", now.format("%Y%m%d"))
}

/// Issue a code that `lookup` does not know about.
pub async fn generate<L: CodeLookup + ?Sized>(lookup: &L) -> String {
    for _ in 0..MAX_DRAWS {
        let candidate = random_code();
        match lookup.code_exists(&candidate).await {
            Ok(false) => return candidate,
            Ok(true) => continue,
            Err(_) => break,
        }
    }
    fallback_code(Utc::now())
}
