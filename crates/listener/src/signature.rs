//! Webhook request signing.
//!
//! The sender signs `v0:<timestamp>:<raw body>` with HMAC-SHA256 under the
//! shared signing secret and sends `v0=<hex digest>` in `X-Slack-Signature`,
//! with the timestamp in `X-Slack-Request-Timestamp`.

use std::fmt;

use axum::http::HeaderMap;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

pub const SIGNATURE_HEADER: &str = "x-slack-signature";
pub const TIMESTAMP_HEADER: &str = "x-slack-request-timestamp";
pub const SIGNATURE_VERSION: &str = "v0";

/// Default freshness window for signed requests.
pub const DEFAULT_MAX_AGE_SECS: u64 = 300;

fn signing_mac(secret: &str, timestamp: &str, body: &[u8]) -> Option<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(SIGNATURE_VERSION.as_bytes());
    mac.update(b":");
    mac.update(timestamp.as_bytes());
    mac.update(b":");
    mac.update(body);
    Some(mac)
}

/// Computes the `v0=<hex>` header value for a request.
#[must_use]
pub fn compute_signature(secret: &str, timestamp: &str, body: &[u8]) -> Option<String> {
    let digest = signing_mac(secret, timestamp, body)?.finalize().into_bytes();
    Some(format!("{SIGNATURE_VERSION}={}", hex::encode(digest)))
}

/// Checks a `v0=<hex>` header value against the expected signature.
///
/// The comparison is constant-time.
#[must_use]
pub fn verify_signature(secret: &str, timestamp: &str, body: &[u8], header: &str) -> bool {
    let Some(hex_signature) = header
        .strip_prefix(SIGNATURE_VERSION)
        .and_then(|rest| rest.strip_prefix('='))
    else {
        return false;
    };
    let Ok(provided) = hex::decode(hex_signature) else {
        return false;
    };
    let Some(mac) = signing_mac(secret, timestamp, body) else {
        return false;
    };
    let computed = mac.finalize().into_bytes();
    computed.as_slice().ct_eq(&provided).into()
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureRejection {
    #[error("missing X-Slack-Signature header")]
    MissingSignature,

    #[error("missing or malformed X-Slack-Request-Timestamp header")]
    InvalidTimestamp,

    #[error("request timestamp is {age_secs}s away from now")]
    Stale { age_secs: i64 },

    #[error("signature mismatch")]
    Mismatch,
}

/// Whether inbound webhooks must carry a valid signature.
///
/// `Disabled` accepts every request unverified and must be chosen
/// explicitly; it is never inferred from a missing secret.
#[derive(Clone)]
pub enum SignatureVerification {
    Enforced {
        secret: String,
        /// Reject requests whose timestamp is further than this from now.
        max_age_secs: Option<u64>,
    },
    Disabled,
}

impl fmt::Debug for SignatureVerification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enforced { max_age_secs, .. } => f
                .debug_struct("Enforced")
                .field("secret", &"<redacted>")
                .field("max_age_secs", max_age_secs)
                .finish(),
            Self::Disabled => f.write_str("Disabled"),
        }
    }
}

impl SignatureVerification {
    pub fn enforced(secret: impl Into<String>) -> Self {
        Self::Enforced {
            secret: secret.into(),
            max_age_secs: Some(DEFAULT_MAX_AGE_SECS),
        }
    }

    pub fn is_enforced(&self) -> bool {
        matches!(self, Self::Enforced { .. })
    }

    /// Verifies a request against its headers. `now` is Unix seconds.
    pub fn check(&self, headers: &HeaderMap, body: &[u8], now: i64) -> Result<(), SignatureRejection> {
        let Self::Enforced {
            secret,
            max_age_secs,
        } = self
        else {
            return Ok(());
        };

        let signature = headers
            .get(SIGNATURE_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or(SignatureRejection::MissingSignature)?;
        let timestamp = headers
            .get(TIMESTAMP_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or(SignatureRejection::InvalidTimestamp)?;
        let sent_at: i64 = timestamp
            .trim()
            .parse()
            .map_err(|_| SignatureRejection::InvalidTimestamp)?;

        if let Some(max_age) = max_age_secs {
            let age_secs = now.saturating_sub(sent_at);
            if age_secs.unsigned_abs() > *max_age {
                return Err(SignatureRejection::Stale { age_secs });
            }
        }

        if verify_signature(secret, timestamp, body, signature) {
            Ok(())
        } else {
            Err(SignatureRejection::Mismatch)
        }
    }
}
