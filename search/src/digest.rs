//! Canonical JSON bytes and domain-separated SHA-256 content hashes.
//!
//! Every digest in the workspace goes through this module: traces, policies
//! and bundle artifacts are rendered with [`canonical_json_bytes`] and hashed
//! with [`content_hash`].
//!
//! # Canonical form
//!
//! 1. Object keys sorted by byte order.
//! 2. Compact: no whitespace between tokens.
//! 3. Strings escaped the way `serde_json` escapes them.
//! 4. Numbers must be `i64` or `u64`. Floats are rejected so digests never
//!    depend on float formatting.

use sha2::{Digest, Sha256};

/// Domain prefix for search trace digests.
pub const DOMAIN_SEARCH_TRACE: &[u8] = b"WAYMARK::SEARCH_TRACE::V1\0";

/// Domain prefix for bundle artifact content hashes.
pub const DOMAIN_BUNDLE_ARTIFACT: &[u8] = b"WAYMARK::BUNDLE_ARTIFACT::V1\0";

/// Domain prefix for the bundle digest over normative artifacts.
pub const DOMAIN_BUNDLE_DIGEST: &[u8] = b"WAYMARK::BUNDLE_DIGEST::V1\0";

/// Failure to produce canonical JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanonError {
    /// A JSON number was not an integer.
    NonIntegerNumber { raw: String },
    /// The underlying JSON writer failed.
    Write { detail: String },
}

impl std::fmt::Display for CanonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonIntegerNumber { raw } => {
                write!(f, "non-integer number in canonical JSON: {raw}")
            }
            Self::Write { detail } => write!(f, "canonical JSON write failed: {detail}"),
        }
    }
}

impl std::error::Error for CanonError {}

/// Render `value` in canonical form.
///
/// # Errors
///
/// Returns [`CanonError::NonIntegerNumber`] if any number is not an integer.
pub fn canonical_json_bytes(value: &serde_json::Value) -> Result<Vec<u8>, CanonError> {
    let mut buf = Vec::new();
    write_value(&mut buf, value)?;
    Ok(buf)
}

fn write_value(buf: &mut Vec<u8>, value: &serde_json::Value) -> Result<(), CanonError> {
    match value {
        serde_json::Value::Number(n) if !(n.is_i64() || n.is_u64()) => {
            Err(CanonError::NonIntegerNumber { raw: n.to_string() })
        }
        serde_json::Value::Array(items) => {
            buf.push(b'[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    buf.push(b',');
                }
                write_value(buf, item)?;
            }
            buf.push(b']');
            Ok(())
        }
        serde_json::Value::Object(map) => {
            let mut entries: Vec<(&String, &serde_json::Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));
            buf.push(b'{');
            for (i, (key, item)) in entries.into_iter().enumerate() {
                if i > 0 {
                    buf.push(b',');
                }
                serde_json::to_writer(&mut *buf, key.as_str()).map_err(write_error)?;
                buf.push(b':');
                write_value(buf, item)?;
            }
            buf.push(b'}');
            Ok(())
        }
        scalar => serde_json::to_writer(&mut *buf, scalar).map_err(write_error),
    }
}

#[allow(clippy::needless_pass_by_value)]
fn write_error(e: serde_json::Error) -> CanonError {
    CanonError::Write {
        detail: e.to_string(),
    }
}

/// A content-addressed hash in `"algorithm:hex_digest"` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentHash {
    full: String,
    colon: usize,
}

impl ContentHash {
    /// Parse `"algorithm:hex"`. Returns `None` if either side is empty or the
    /// separator is missing.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let colon = s.find(':')?;
        if colon == 0 || colon + 1 == s.len() {
            return None;
        }
        Some(Self {
            full: s.to_string(),
            colon,
        })
    }

    /// The algorithm part, e.g. `sha256`.
    #[must_use]
    pub fn algorithm(&self) -> &str {
        &self.full[..self.colon]
    }

    /// The hex digest part.
    #[must_use]
    pub fn hex_digest(&self) -> &str {
        &self.full[self.colon + 1..]
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.full
    }
}

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.full)
    }
}

/// `sha256(domain || data)`, rendered as `sha256:<hex>`.
#[must_use]
pub fn content_hash(domain: &[u8], data: &[u8]) -> ContentHash {
    let mut hasher = Sha256::new();
    hasher.update(domain);
    hasher.update(data);
    let hex = hex::encode(hasher.finalize());
    ContentHash {
        colon: "sha256".len(),
        full: format!("sha256:{hex}"),
    }
}
