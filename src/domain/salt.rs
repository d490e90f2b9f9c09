//! Strategy salts.
//!
//! A salt is 32 opaque bytes carried in the payload. Operators may pass one
//! explicitly (hex, or a short label); otherwise a fresh salt is generated
//! for every dispatch.

use alloy_primitives::B256;
use rand::RngCore;

use super::error::DomainError;

/// Longest text label that still leaves a terminating zero byte.
const MAX_LABEL_LEN: usize = 31;

/// Parse an operator-supplied salt.
///
/// `0x`-prefixed hex is left-padded with zeros to 32 bytes. Anything else
/// is treated as a UTF-8 label and right-padded with zeros.
///
/// # Errors
///
/// Returns [`DomainError::Malformed`] for hex that is invalid or longer than
/// 32 bytes, and for labels of 32 bytes or more.
pub fn parse_salt(input: &str) -> Result<B256, DomainError> {
    if let Some(hex) = input.strip_prefix("0x").or_else(|| input.strip_prefix("0X")) {
        let padded = if hex.len() % 2 == 1 {
            format!("0{hex}")
        } else {
            hex.to_string()
        };
        let raw = alloy_primitives::hex::decode(&padded).map_err(|e| DomainError::Malformed {
            field: "salt",
            reason: e.to_string(),
        })?;
        if raw.len() > 32 {
            return Err(DomainError::Malformed {
                field: "salt",
                reason: format!("{} bytes exceeds 32", raw.len()),
            });
        }
        return Ok(B256::left_padding_from(&raw));
    }

    let label = input.as_bytes();
    if label.len() > MAX_LABEL_LEN {
        return Err(DomainError::Malformed {
            field: "salt",
            reason: format!("label is {} bytes, at most {MAX_LABEL_LEN} allowed", label.len()),
        });
    }
    Ok(B256::right_padding_from(label))
}

/// Fresh salt: unix seconds in the first 8 bytes, random bytes after.
///
/// The timestamp keeps salts sortable in logs. The random tail keeps two
/// dispatches within the same second distinct.
#[must_use]
pub fn generate_salt(unix_secs: u64) -> B256 {
    let mut bytes = [0u8; 32];
    bytes[..8].copy_from_slice(&unix_secs.to_be_bytes());
    rand::thread_rng().fill_bytes(&mut bytes[8..]);
    B256::from(bytes)
}
