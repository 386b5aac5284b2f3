use serde::Deserialize;

use crate::config::PaginationConfig;
use crate::error::{CoreError, CoreResult};

/// A validated `LIMIT`/`OFFSET` window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    offset: u32,
    limit: u32,
}

impl Page {
    /// ## Summary
    /// Builds a page window, rejecting a limit outside `1..=max_limit`.
    ///
    /// ## Errors
    /// Returns `CoreError::ValidationError` when the limit is out of bounds.
    pub fn new(offset: u32, limit: u32, max_limit: u32) -> CoreResult<Self> {
        if limit == 0 || limit > max_limit {
            return Err(CoreError::ValidationError(format!(
                "limit must be between 1 and {max_limit}"
            )));
        }
        Ok(Self { offset, limit })
    }

    #[must_use]
    pub const fn offset(self) -> u32 {
        self.offset
    }

    #[must_use]
    pub const fn limit(self) -> u32 {
        self.limit
    }
}

/// Raw `skip`/`limit` query parameters as they arrive over the wire.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageParams {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

impl PageParams {
    /// ## Summary
    /// Resolves the raw parameters against the configured bounds.
    ///
    /// ## Errors
    /// Returns `CoreError::ValidationError` for a negative `skip` or a `limit`
    /// outside `1..=max_limit`.
    pub fn resolve(self, config: PaginationConfig) -> CoreResult<Page> {
        let skip = self.skip.unwrap_or(0);
        let offset = u32::try_from(skip).map_err(|_err| {
            CoreError::ValidationError("skip must be a non-negative integer".to_string())
        })?;

        let limit = self.limit.unwrap_or(i64::from(config.default_limit));
        let limit = u32::try_from(limit).map_err(|_err| {
            CoreError::ValidationError(format!(
                "limit must be between 1 and {}",
                config.max_limit
            ))
        })?;

        Page::new(offset, limit, config.max_limit)
    }
}
