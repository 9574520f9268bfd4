//! This modules defines the common functionality for paging data.

/// The config for pagination
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// The page number to default to when not specified in a request.
    pub default_page: u64,
    /// The maximum transactions to return per page when not specified in a request.
    pub default_page_size: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page: 1,
            default_page_size: 10,
        }
    }
}

/// A one-based page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// The page number, starting at 1.
    pub number: u64,
    /// The maximum number of results on a page.
    pub size: u64,
}

impl Page {
    /// Create a page from optional request parameters, falling back to the
    /// defaults in `config`.
    ///
    /// Page zero is treated as the first page.
    pub fn new(number: Option<u64>, size: Option<u64>, config: &PaginationConfig) -> Self {
        Self {
            number: number.unwrap_or(config.default_page).max(1),
            size: size.unwrap_or(config.default_page_size),
        }
    }

    /// The number of results to skip.
    pub fn offset(&self) -> u64 {
        (self.number - 1).saturating_mul(self.size)
    }

    /// The maximum number of results to return.
    pub fn limit(&self) -> u64 {
        self.size
    }
}
