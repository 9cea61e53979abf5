//! Time-based one-time passwords (RFC 6238) for brokerage second factors.
//!
//! HMAC-SHA1 over a 30 second counter, truncated to 6 digits. Secrets are
//! the base32 strings brokers hand out when 2FA is enabled.

use hmac::{Hmac, Mac};
use sha1::Sha1;

use crate::errors::BrokerError;

type HmacSha1 = Hmac<Sha1>;

const STEP_SECONDS: u64 = 30;
const DIGITS_MODULUS: u32 = 1_000_000;

/// One-time password for the current time.
pub fn totp_now(secret: &str) -> Result<String, BrokerError> {
    totp_at(secret, chrono::Utc::now().timestamp())
}

/// One-time password for `unix_seconds`.
pub fn totp_at(secret: &str, unix_seconds: i64) -> Result<String, BrokerError> {
    let key = decode_base32(secret)?;
    let counter = unix_seconds.max(0) as u64 / STEP_SECONDS;

    let mut mac = HmacSha1::new_from_slice(&key)
        .map_err(|e| BrokerError::InvalidSecret(format!("Invalid HMAC key: {}", e)))?;
    mac.update(&counter.to_be_bytes());
    let digest = mac.finalize().into_bytes();

    let offset = (digest[digest.len() - 1] & 0x0f) as usize;
    let code = u32::from_be_bytes([
        digest[offset] & 0x7f,
        digest[offset + 1],
        digest[offset + 2],
        digest[offset + 3],
    ]);
    Ok(format!("{:06}", code % DIGITS_MODULUS))
}

/// RFC 4648 base32, case-insensitive. Padding and whitespace are ignored.
fn decode_base32(secret: &str) -> Result<Vec<u8>, BrokerError> {
    let mut buffer: u64 = 0;
    let mut bits = 0u32;
    let mut out = Vec::with_capacity(secret.len() * 5 / 8);

    for c in secret.chars().filter(|c| !c.is_whitespace() && *c != '=') {
        let value = match c.to_ascii_uppercase() {
            upper @ 'A'..='Z' => upper as u8 - b'A',
            digit @ '2'..='7' => digit as u8 - b'2' + 26,
            other => {
                return Err(BrokerError::InvalidSecret(format!(
                    "unexpected character '{}'",
                    other
                )))
            }
        };
        buffer = (buffer << 5) | u64::from(value);
        bits += 5;
        if bits >= 8 {
            bits -= 8;
            out.push((buffer >> bits) as u8);
            buffer &= (1 << bits) - 1;
        }
    }

    if out.is_empty() {
        return Err(BrokerError::InvalidSecret("secret is empty".to_string()));
    }
    Ok(out)
}
