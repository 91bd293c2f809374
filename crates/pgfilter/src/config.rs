//! Builder configuration.

use serde::Deserialize;

/// LIMIT substituted when an OFFSET is given without a LIMIT.
pub const DEFAULT_LIMIT: u64 = 10;

/// Pagination settings for [`QueryBuilder`](crate::QueryBuilder).
///
/// Deserializable with every field optional, so it can sit inside an
/// application's TOML/JSON config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// LIMIT used when `offset` is set and `limit` is not.
    pub default_limit: u64,
    /// Upper bound applied to every emitted LIMIT (explicit or defaulted).
    pub max_limit: Option<u64>,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
            max_limit: None,
        }
    }
}

impl BuilderConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the LIMIT implied by a bare OFFSET.
    pub fn default_limit(mut self, limit: u64) -> Self {
        self.default_limit = limit;
        self
    }

    /// Clamp every emitted LIMIT to `max`.
    pub fn max_limit(mut self, max: u64) -> Self {
        self.max_limit = Some(max);
        self
    }

    /// The LIMIT to emit for the given builder state, if any.
    pub(crate) fn effective_limit(&self, limit: Option<u64>, offset: Option<u64>) -> Option<u64> {
        let limit = match (limit, offset) {
            (Some(limit), _) => Some(limit),
            (None, Some(_)) => Some(self.default_limit),
            (None, None) => None,
        }?;
        Some(match self.max_limit {
            Some(max) => limit.min(max),
            None => limit,
        })
    }
}
