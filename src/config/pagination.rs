//! Page sizes for list screens.

use std::env;

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Fixed page size per list screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationConfig {
    pub deals_page_size: usize,
    pub users_page_size: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            deals_page_size: DEFAULT_PAGE_SIZE,
            users_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PaginationConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self {
            deals_page_size: page_size_var("PIPELINE_DEALS_PAGE_SIZE"),
            users_page_size: page_size_var("PIPELINE_USERS_PAGE_SIZE"),
        }
    }
}

// Zero would make every page empty, so it falls back like garbage input does.
fn page_size_var(name: &str) -> usize {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .filter(|size: &usize| *size > 0)
        .unwrap_or(DEFAULT_PAGE_SIZE)
}
