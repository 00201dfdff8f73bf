//! Caller identity.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;

/// Opaque identity of an already-authenticated caller.
///
/// Authentication itself happens in the hosting environment; this type only
/// records that it did.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallerIdentity(String);

impl CallerIdentity {
    /// Wraps a caller uid. Blank ids are rejected.
    pub fn new(uid: impl Into<String>) -> Option<Self> {
        let uid = uid.into();
        let trimmed = uid.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Returns the caller uid.
    pub fn uid(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CallerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Per-call context handed to every entry point.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    /// Identity of the caller, if the host established one.
    pub caller: Option<CallerIdentity>,
}

impl CallContext {
    /// Context for a signed-in caller.
    pub fn authenticated(caller: CallerIdentity) -> Self {
        Self {
            caller: Some(caller),
        }
    }

    /// Context without a caller identity.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Returns the caller identity or fails with [`CoreError::Unauthenticated`].
    pub fn require_caller(&self) -> Result<&CallerIdentity, CoreError> {
        self.caller.as_ref().ok_or(CoreError::Unauthenticated)
    }
}
