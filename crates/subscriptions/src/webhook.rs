//! Payment callback authentication.
//!
//! Callbacks carry an `x-signature: ts=<unix secs>,v1=<hex hmac>` header where the
//! MAC is HMAC-SHA256 over `"{ts}.{raw body}"` keyed with the shared webhook secret.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

pub const SIGNATURE_HEADER: &str = "x-signature";

/// Maximum clock distance between the signed timestamp and now.
pub const SIGNATURE_TOLERANCE_SECS: i64 = 300;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SignatureError {
    #[error("missing signature header")]
    Missing,
    #[error("malformed signature header")]
    Malformed,
    #[error("signature mismatch")]
    Mismatch,
    #[error("signature timestamp outside tolerance")]
    Stale,
    #[error("unusable webhook secret")]
    InvalidKey,
}

fn mac(secret: &str, timestamp: i64, payload: &[u8]) -> Result<HmacSha256, SignatureError> {
    let mut mac = <HmacSha256 as Mac>::new_from_slice(secret.as_bytes())
        .map_err(|_| SignatureError::InvalidKey)?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    Ok(mac)
}

/// Header value for `payload` signed at `timestamp`.
pub fn sign_webhook_payload(
    payload: &[u8],
    secret: &str,
    timestamp: DateTime<Utc>,
) -> Result<String, SignatureError> {
    let ts = timestamp.timestamp();
    let sig = mac(secret, ts, payload)?.finalize().into_bytes();
    Ok(format!("ts={ts},v1={}", hex::encode(sig)))
}

/// Check a callback's signature header against its raw body.
pub fn verify_webhook_signature(
    payload: &[u8],
    header: Option<&str>,
    secret: &str,
    now: DateTime<Utc>,
) -> Result<(), SignatureError> {
    let header = header.ok_or(SignatureError::Missing)?;

    let mut timestamp = None;
    let mut signature = None;
    for part in header.split(',') {
        let part = part.trim();
        if let Some(t) = part.strip_prefix("ts=") {
            timestamp = Some(t);
        } else if let Some(v) = part.strip_prefix("v1=") {
            signature = Some(v);
        }
    }
    let (Some(timestamp), Some(signature)) = (timestamp, signature) else {
        return Err(SignatureError::Malformed);
    };
    let ts: i64 = timestamp.parse().map_err(|_| SignatureError::Malformed)?;
    let expected = hex::decode(signature).map_err(|_| SignatureError::Malformed)?;

    // verify_slice compares in constant time.
    mac(secret, ts, payload)?
        .verify_slice(&expected)
        .map_err(|_| SignatureError::Mismatch)?;

    if (now.timestamp() - ts).abs() > SIGNATURE_TOLERANCE_SECS {
        return Err(SignatureError::Stale);
    }
    Ok(())
}
