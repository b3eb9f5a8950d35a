//! This modules defines the common functionality for paging data.

use serde::Serialize;

use crate::Error;

/// The config for pagination
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// The page number to default to when not specified in a request.
    pub default_page: u64,
    /// The maximum records to return per page when not specified in a request.
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

/// A validated request for one page of records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// The 1-based page number.
    pub page: u64,
    /// The maximum number of records on a page.
    pub limit: u64,
}

impl PageRequest {
    /// Build a page request from optional query parameters, filling gaps from `config`.
    ///
    /// # Errors
    /// Returns [Error::InvalidPagination] if `page` or `limit` is zero.
    pub fn new(
        page: Option<u64>,
        limit: Option<u64>,
        config: &PaginationConfig,
    ) -> Result<Self, Error> {
        let page = page.unwrap_or(config.default_page);
        let limit = limit.unwrap_or(config.default_page_size);

        if page == 0 {
            return Err(Error::InvalidPagination("page"));
        }

        if limit == 0 {
            return Err(Error::InvalidPagination("limit"));
        }

        Ok(Self { page, limit })
    }

    /// Like [PageRequest::new], but only when the client asked for a page.
    ///
    /// Returns `Ok(None)` when neither `page` nor `limit` were given.
    pub fn optional(
        page: Option<u64>,
        limit: Option<u64>,
        config: &PaginationConfig,
    ) -> Result<Option<Self>, Error> {
        if page.is_none() && limit.is_none() {
            return Ok(None);
        }

        Self::new(page, limit, config).map(Some)
    }

    /// The number of records to skip to reach this page.
    ///
    /// Saturates at [u64::MAX] for pages past the end of any table.
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }
}

/// The pagination details sent alongside a page of records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// The number of records matching the filter across all pages.
    pub total: u64,
    /// The current page.
    pub page: u64,
    /// The maximum number of records on a page.
    pub limit: u64,
    /// The number of pages needed to show all the records.
    pub total_page: u64,
}

impl Pagination {
    /// Describe `request` given that `total` records matched.
    pub fn new(request: PageRequest, total: u64) -> Self {
        Self {
            total,
            page: request.page,
            limit: request.limit,
            total_page: total.div_ceil(request.limit),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        Error,
        pagination::{PageRequest, Pagination, PaginationConfig},
    };

    #[test]
    fn uses_defaults_when_missing() {
        let config = PaginationConfig {
            default_page: 1,
            default_page_size: 25,
        };

        let request = PageRequest::new(None, None, &config).unwrap();

        assert_eq!(request, PageRequest { page: 1, limit: 25 });
    }

    #[test]
    fn optional_returns_none_without_parameters() {
        let got = PageRequest::optional(None, None, &PaginationConfig::default());

        assert_eq!(got, Ok(None));
    }

    #[test]
    fn optional_fills_missing_limit() {
        let got = PageRequest::optional(Some(3), None, &PaginationConfig::default());

        assert_eq!(got, Ok(Some(PageRequest { page: 3, limit: 10 })));
    }

    #[test]
    fn rejects_zero_page() {
        let got = PageRequest::new(Some(0), Some(10), &PaginationConfig::default());

        assert_eq!(got, Err(Error::InvalidPagination("page")));
    }

    #[test]
    fn rejects_zero_limit() {
        let got = PageRequest::new(Some(1), Some(0), &PaginationConfig::default());

        assert_eq!(got, Err(Error::InvalidPagination("limit")));
    }

    #[test]
    fn offset_skips_previous_pages() {
        let request = PageRequest { page: 3, limit: 20 };

        assert_eq!(request.offset(), 40);
    }

    #[test]
    fn offset_saturates_for_huge_pages() {
        let request = PageRequest {
            page: u64::MAX,
            limit: u64::MAX,
        };

        assert_eq!(request.offset(), u64::MAX);
    }

    #[test]
    fn total_page_rounds_up() {
        let pagination = Pagination::new(PageRequest { page: 1, limit: 10 }, 21);

        assert_eq!(pagination.total_page, 3);
    }

    #[test]
    fn total_page_is_zero_without_records() {
        let pagination = Pagination::new(PageRequest { page: 1, limit: 10 }, 0);

        assert_eq!(pagination.total_page, 0);
    }
}
