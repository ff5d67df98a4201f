//! Short code codec.
//!
//! Translates record ids to and from base62 short codes. The mapping is a plain
//! positional numeral conversion over a fixed alphabet, so it needs no stored state
//! and the same id always yields the same code.

use crate::error::AppError;
use serde_json::json;
use thiserror::Error;

/// Digits of the base62 numeral system, lowest value first.
pub const ALPHABET: &[u8; 62] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

const BASE: i64 = ALPHABET.len() as i64;

/// Longest code `encode` can produce for an `i64` id.
pub const MAX_CODE_LEN: usize = 11;

/// Reasons a string is not a valid short code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("short code is empty")]
    Empty,
    #[error("invalid character {ch:?} at position {position}")]
    InvalidCharacter { ch: char, position: usize },
    #[error("short code is out of range")]
    Overflow,
}

/// Encodes a record id as a short code.
///
/// Codes have no padding: `0` encodes as `"0"`, `61` as `"Z"`, `62` as `"10"`.
///
/// # Examples
///
/// ```
/// use urlshort::utils::short_code::{decode, encode};
///
/// let code = encode(125);
/// assert_eq!(code, "21");
/// assert_eq!(decode(&code), Ok(125));
/// ```
pub fn encode(id: i64) -> String {
    debug_assert!(id >= 0, "record ids are never negative");

    let base = BASE as u64;
    let mut n = id as u64;
    let mut digits = Vec::with_capacity(MAX_CODE_LEN);

    loop {
        digits.push(ALPHABET[(n % base) as usize]);
        n /= base;
        if n == 0 {
            break;
        }
    }

    digits.into_iter().rev().map(char::from).collect()
}

/// Decodes a short code back into the record id it names.
///
/// # Errors
///
/// - [`CodecError::Empty`] for an empty string
/// - [`CodecError::InvalidCharacter`] for any character outside [`ALPHABET`]
/// - [`CodecError::Overflow`] when the value does not fit an `i64`
pub fn decode(code: &str) -> Result<i64, CodecError> {
    if code.is_empty() {
        return Err(CodecError::Empty);
    }

    code.chars()
        .enumerate()
        .try_fold(0i64, |acc, (position, ch)| {
            let digit = digit_value(ch).ok_or(CodecError::InvalidCharacter { ch, position })?;

            acc.checked_mul(BASE)
                .and_then(|v| v.checked_add(digit))
                .ok_or(CodecError::Overflow)
        })
}

fn digit_value(ch: char) -> Option<i64> {
    let value = match ch {
        '0'..='9' => ch as u32 - '0' as u32,
        'a'..='z' => ch as u32 - 'a' as u32 + 10,
        'A'..='Z' => ch as u32 - 'A' as u32 + 36,
        _ => return None,
    };

    Some(i64::from(value))
}

/// Validates a caller-chosen alias and returns the record id it claims.
///
/// # Rules
///
/// - Must decode (only alphabet characters, fits an `i64`)
/// - Must name a positive id
/// - Must be the canonical encoding of that id, so `"0range"` cannot shadow `"range"`
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any rule is violated.
pub fn validate_custom_alias(alias: &str) -> Result<i64, AppError> {
    let id = decode(alias).map_err(|e| {
        AppError::bad_request(
            "Custom alias is not a valid short code",
            json!({ "alias": alias, "reason": e.to_string() }),
        )
    })?;

    if id == 0 {
        return Err(AppError::bad_request(
            "Custom alias must not consist of zeros only",
            json!({ "alias": alias }),
        ));
    }

    let canonical = encode(id);
    if canonical != alias {
        return Err(AppError::bad_request(
            "Custom alias must not have leading zeros",
            json!({ "alias": alias, "canonical": canonical }),
        ));
    }

    Ok(id)
}
