//! Single-slot bearer token cache.
//!
//! The cache holds at most one token. A new entry is built completely before
//! it replaces the old one, and the lock is only held for that swap or for a
//! timestamp comparison, never across a network call. Two concurrent misses
//! may both refresh; the last write wins and the slot always holds one whole,
//! valid-at-write-time entry.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use tracing::debug;

/// Seconds shaved off every token lifetime so a token never expires mid-flight.
pub const EXPIRY_SAFETY_MARGIN_SECS: i64 = 30;

/// Upper bound on a token lifetime accepted from the token endpoint (30 days).
pub const MAX_TOKEN_LIFETIME_SECS: i64 = 30 * 24 * 60 * 60;

// ============================================================================
// Cached Token
// ============================================================================

/// A bearer token together with the instant it stops being usable.
#[derive(Clone, PartialEq, Eq)]
pub struct CachedToken {
    /// The bearer token.
    pub token: String,
    /// First instant at which the token is no longer used.
    pub expires_at: DateTime<Utc>,
}

impl CachedToken {
    /// Builds an entry for a token issued at `issued_at` with a lifetime of
    /// `lifetime_secs`, minus the safety margin (never negative).
    ///
    /// Lifetimes above [`MAX_TOKEN_LIFETIME_SECS`] are clamped to it.
    pub fn issued(token: impl Into<String>, lifetime_secs: i64, issued_at: DateTime<Utc>) -> Self {
        let usable = lifetime_secs
            .min(MAX_TOKEN_LIFETIME_SECS)
            .saturating_sub(EXPIRY_SAFETY_MARGIN_SECS)
            .max(0);

        let expires_at = Duration::try_seconds(usable)
            .and_then(|lifetime| issued_at.checked_add_signed(lifetime))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        Self {
            token: token.into(),
            expires_at,
        }
    }

    /// Returns true if the token may be used at `now`.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

impl fmt::Debug for CachedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedToken")
            .field("token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

// ============================================================================
// Token Cache
// ============================================================================

/// Holds at most one [`CachedToken`].
#[derive(Debug, Default)]
pub struct TokenCache {
    slot: RwLock<Option<CachedToken>>,
}

impl TokenCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached token if it is still valid at `now`.
    pub async fn valid_token_at(&self, now: DateTime<Utc>) -> Option<String> {
        let slot = self.slot.read().await;
        slot.as_ref()
            .filter(|entry| entry.is_valid_at(now))
            .map(|entry| entry.token.clone())
    }

    /// Replaces the cached entry.
    pub async fn store(&self, entry: CachedToken) {
        debug!(expires_at = %entry.expires_at, "Caching bearer token");
        *self.slot.write().await = Some(entry);
    }

    /// Returns a copy of the current entry, valid or not.
    #[cfg(test)]
    pub(crate) async fn current(&self) -> Option<CachedToken> {
        self.slot.read().await.clone()
    }
}

// ============================================================================
// Tests
// ============================================================================
