//! Instrument code rewrite adapters.
//!
//! The canonical identifier is `<numeric>.<EXCHANGE_SUFFIX>`, e.g.
//! `600000.XSHG`. Upstream files use two other spellings: a prefix style
//! (`SH600000`) and a suffix style (`600000.SH` or `600000SH`). Both are pure
//! string rewrites at the boundary; nothing downstream ever sees them.

use crate::error::{DataError, Result};

const EXCHANGES: [(&str, &str); 3] = [("SH", "XSHG"), ("SZ", "XSHE"), ("BJ", "BJSE")];

/// Rewrite a prefix-style code (`SH600000`) to canonical form.
pub fn from_prefixed(code: &str) -> Result<String> {
    let (prefix, digits) = code.split_at_checked(2).unwrap_or(("", code));
    for (short, suffix) in EXCHANGES {
        if prefix == short && is_numeric(digits) {
            return Ok(format!("{digits}.{suffix}"));
        }
    }
    Err(DataError::InvalidCode(code.to_string()))
}

/// Rewrite a suffix-style code (`600000.SH` or `600000SH`) to canonical form.
pub fn from_suffixed(code: &str) -> Result<String> {
    for (short, suffix) in EXCHANGES {
        let digits = code
            .strip_suffix(short)
            .map(|rest| rest.strip_suffix('.').unwrap_or(rest));
        if let Some(digits) = digits {
            if is_numeric(digits) {
                return Ok(format!("{digits}.{suffix}"));
            }
        }
    }
    Err(DataError::InvalidCode(code.to_string()))
}

/// True if `code` is already in canonical `<numeric>.<EXCHANGE_SUFFIX>` form.
pub fn is_canonical(code: &str) -> bool {
    match code.split_once('.') {
        Some((digits, suffix)) => {
            is_numeric(digits) && matches!(suffix, "XSHG" | "XSHE" | "BJSE")
        }
        None => false,
    }
}

fn is_numeric(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
