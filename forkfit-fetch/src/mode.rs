//! Authentication mode selection.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Which authentication protocol(s) a call may use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AuthMode {
    /// Bearer-token protocol only.
    Modern,
    /// Signed-request protocol only.
    Legacy,
    /// Modern first, legacy on any failure.
    #[default]
    Automatic,
}

impl AuthMode {
    /// Parses a configured mode. Unknown or missing values mean automatic.
    ///
    /// Accepts `oauth2`/`modern`, `oauth1`/`legacy`, case-insensitively.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("oauth2" | "modern") => Self::Modern,
            Some("oauth1" | "legacy") => Self::Legacy,
            _ => Self::Automatic,
        }
    }

    /// Configuration spelling of this mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Modern => "oauth2",
            Self::Legacy => "oauth1",
            Self::Automatic => "auto",
        }
    }
}

impl FromStr for AuthMode {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(Some(s)))
    }
}

impl fmt::Display for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
