//! Builder configuration.

use serde::Deserialize;

/// How a malformed `offset` spec is handled by `get` / `query`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitPolicy {
    /// Raise [`BuildError::InvalidShape`](crate::BuildError::InvalidShape).
    #[default]
    Strict,
    /// Fall back to [`BuilderConfig::fallback_page`], or omit the LIMIT.
    Lenient,
}

/// A `LIMIT <offset>, <limit>` window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Page {
    pub offset: i64,
    pub limit: i64,
}

impl Page {
    pub fn new(offset: i64, limit: i64) -> Self {
        Self { offset, limit }
    }
}

/// Configuration shared by every statement built through a
/// [`SqlMapper`](crate::SqlMapper).
///
/// # Example
/// ```ignore
/// use mapsql::config::{BuilderConfig, Page};
///
/// // Malformed offsets become `LIMIT 0, 50` instead of an error.
/// let config = BuilderConfig::lenient().with_fallback_page(Page::new(0, 50));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    pub limit_policy: LimitPolicy,
    pub fallback_page: Option<Page>,
}

impl BuilderConfig {
    pub fn strict() -> Self {
        Self::default()
    }

    pub fn lenient() -> Self {
        Self {
            limit_policy: LimitPolicy::Lenient,
            fallback_page: None,
        }
    }

    pub fn with_limit_policy(mut self, policy: LimitPolicy) -> Self {
        self.limit_policy = policy;
        self
    }

    pub fn with_fallback_page(mut self, page: Page) -> Self {
        self.fallback_page = Some(page);
        self
    }

    pub fn is_lenient(&self) -> bool {
        self.limit_policy == LimitPolicy::Lenient
    }
}
