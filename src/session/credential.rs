//! Local, unverified inspection of the session credential.
//!
//! The credential is a three-segment signed token. Only the middle segment
//! (the claims) is decoded here, and only to read `exp`. The signature is
//! never checked: the backend remains the sole authority on whether a
//! credential is genuine. Anything decided from this module is an
//! optimization for page navigation, never an authorization decision.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use serde::Serialize;
use serde_json::Value;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// URL-safe base64 that accepts both padded and unpadded input.
const CLAIMS_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Why a credential could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    #[error("expected 3 segments, found {0}")]
    Segments(usize),

    #[error("claims segment is not base64url: {0}")]
    Encoding(String),

    #[error("claims segment is not a JSON object: {0}")]
    Payload(String),

    #[error("missing or non-numeric exp claim")]
    Expiry,
}

/// Claims read from a credential. `exp` is the only one the gateway uses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Claims {
    /// Expiry, seconds since the epoch.
    pub exp: f64,
    /// The full decoded payload, for diagnostics.
    pub payload: Value,
}

/// Local verdict on a credential.
#[derive(Debug, Clone, PartialEq)]
pub enum CredentialStatus {
    /// Decoded and not past expiry + grace.
    Valid(Claims),
    /// Decoded, but `exp` is older than the grace window.
    Expired(Claims),
    /// Could not be decoded at all.
    Invalid(CredentialError),
}

/// Decode the claims segment of `token` without verifying it.
pub fn decode_claims(token: &str) -> Result<Claims, CredentialError> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return Err(CredentialError::Segments(segments.len()));
    }

    let bytes = CLAIMS_ENGINE
        .decode(segments[1])
        .map_err(|e| CredentialError::Encoding(e.to_string()))?;
    let payload: Value =
        serde_json::from_slice(&bytes).map_err(|e| CredentialError::Payload(e.to_string()))?;

    let exp = payload
        .get("exp")
        .and_then(Value::as_f64)
        .filter(|exp| exp.is_finite())
        .ok_or(CredentialError::Expiry)?;

    Ok(Claims { exp, payload })
}

/// Classify `token` at time `now` (seconds since the epoch).
///
/// A credential counts as expired once `exp < now - grace_secs`.
pub fn inspect(token: &str, now: i64, grace_secs: i64) -> CredentialStatus {
    match decode_claims(token) {
        Ok(claims) if claims.exp < (now - grace_secs) as f64 => CredentialStatus::Expired(claims),
        Ok(claims) => CredentialStatus::Valid(claims),
        Err(e) => CredentialStatus::Invalid(e),
    }
}

/// Current time in whole seconds since the epoch.
pub fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}
