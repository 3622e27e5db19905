// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Replay-protection tokens for admin actions.
//!
//! A token is an HMAC-SHA256 signature over `action|time-window`,
//! hex-encoded and wrapped in URL-safe base64. Verification accepts the
//! current and the previous window, so a freshly rendered form stays
//! valid for at least one full window.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use sha2::Sha256;

// Type alias for HMAC-SHA256
type HmacSha256 = Hmac<Sha256>;

/// Length of one validity window.
const NONCE_WINDOW_SECS: i64 = 12 * 60 * 60;

/// Issues and verifies admin action tokens.
#[derive(Clone)]
pub struct NonceService {
    mac: HmacSha256,
}

impl NonceService {
    pub fn new(key: &[u8]) -> Self {
        // HMAC accepts keys of any length
        let mac = HmacSha256::new_from_slice(key).expect("HMAC accepts any key length");
        Self { mac }
    }

    /// Issue a token tied to an action for the current time window.
    pub fn issue(&self, action: &str) -> String {
        self.issue_at(action, chrono::Utc::now().timestamp())
    }

    /// Check a token against the current and previous window.
    pub fn verify(&self, action: &str, token: &str) -> bool {
        self.verify_at(action, token, chrono::Utc::now().timestamp())
    }

    fn issue_at(&self, action: &str, now: i64) -> String {
        let window = now.div_euclid(NONCE_WINDOW_SECS);
        URL_SAFE_NO_PAD.encode(self.sign(action, window))
    }

    fn verify_at(&self, action: &str, token: &str, now: i64) -> bool {
        let Ok(decoded) = URL_SAFE_NO_PAD.decode(token) else {
            return false;
        };
        let Ok(signature) = String::from_utf8(decoded) else {
            return false;
        };

        let window = now.div_euclid(NONCE_WINDOW_SECS);
        signature == self.sign(action, window) || signature == self.sign(action, window - 1)
    }

    fn sign(&self, action: &str, window: i64) -> String {
        let mut mac = self.mac.clone();
        mac.update(format!("{}|{:x}", action, window).as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }
}
