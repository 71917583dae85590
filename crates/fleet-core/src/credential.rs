//! Bearer credential handling.
//!
//! A `Credential` is an immutable value threaded explicitly into the client —
//! there is no process-wide credential singleton. The store
//! (`crate::store::ConsoleStore`) is the single source of truth; everything
//! else holds a copy.

use serde::{Deserialize, Serialize};

use crate::error::{FleetError, Result};

/// Token prefixes accepted at the login boundary. Anything else is rejected
/// before a credential is ever stored or forwarded.
pub const TOKEN_PREFIXES: &[&str] = &["fo1_", "fm1_"];

/// Organization slug used when none was configured at login.
pub const DEFAULT_ORG: &str = "personal";

// ---------------------------------------------------------------------------
// Credential
// ---------------------------------------------------------------------------

/// An opaque API token plus the organization it operates under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub token: String,
    pub org_slug: String,
}

impl Credential {
    /// Validate the token prefix and build a credential.
    ///
    /// `org_slug` falls back to [`DEFAULT_ORG`] when `None` or empty.
    pub fn new(token: impl Into<String>, org_slug: Option<&str>) -> Result<Self> {
        let token = token.into();
        if !is_recognized_token(token.trim()) {
            return Err(FleetError::UnrecognizedToken);
        }
        let org_slug = match org_slug {
            Some(s) if !s.trim().is_empty() => s.trim().to_string(),
            _ => DEFAULT_ORG.to_string(),
        };
        Ok(Self {
            token: token.trim().to_string(),
            org_slug,
        })
    }

    /// The token formatted for an `Authorization` header, with exactly one
    /// `Bearer ` prefix.
    pub fn authorization_value(&self) -> String {
        normalize_bearer(&self.token)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// `true` iff the (already trimmed) token starts with a recognized prefix.
pub fn is_recognized_token(token: &str) -> bool {
    TOKEN_PREFIXES.iter().any(|p| token.starts_with(p))
}

/// Normalize a raw token into `Bearer <token>` with exactly one prefix.
///
/// Strips surrounding whitespace and every leading case-insensitive
/// `Bearer ` prefix (tokens pasted from other tools often arrive
/// pre-prefixed, sometimes twice), then re-applies the prefix once.
pub fn normalize_bearer(raw: &str) -> String {
    let mut token = raw.trim();
    while token.len() > 6
        && token[..6].eq_ignore_ascii_case("bearer")
        && token.as_bytes()[6].is_ascii_whitespace()
    {
        token = token[6..].trim_start();
    }
    format!("Bearer {token}")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
