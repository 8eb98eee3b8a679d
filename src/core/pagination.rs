//! Ordered, paginated listing shared by every `list_*` operation.

use crate::errors::{Error, Result};
use sea_orm::{ConnectionTrait, PaginatorTrait, SelectorTrait};
use serde::Serialize;

/// A 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Page number, starting at 1
    pub page: u64,
    /// Rows per page, at least 1
    pub per_page: u64,
}

impl PageRequest {
    /// Builds a request, rejecting page 0 and empty pages.
    pub fn new(page: u64, per_page: u64) -> Result<Self> {
        if page == 0 {
            return Err(Error::validation("page numbers start at 1"));
        }
        if per_page == 0 {
            return Err(Error::validation("per_page must be at least 1"));
        }
        Ok(Self { page, per_page })
    }
}

/// One page of results plus the totals needed to render navigation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    /// Rows on this page
    pub items: Vec<T>,
    /// Page number, starting at 1
    pub page: u64,
    /// Requested rows per page
    pub per_page: u64,
    /// Rows across all pages
    pub total_items: u64,
    /// Number of pages
    pub total_pages: u64,
}

impl<T> Page<T> {
    /// Whether a following page exists.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Runs an already ordered query and returns the requested page.
///
/// A page past the end yields an empty `items` vector with correct totals.
pub async fn fetch_page<'db, C, P>(
    query: P,
    db: &'db C,
    request: PageRequest,
) -> Result<Page<<P::Selector as SelectorTrait>::Item>>
where
    C: ConnectionTrait,
    P: PaginatorTrait<'db, C>,
{
    let paginator = query.paginate(db, request.per_page);
    let totals = paginator.num_items_and_pages().await?;
    let items = paginator.fetch_page(request.page - 1).await?;

    Ok(Page {
        items,
        page: request.page,
        per_page: request.per_page,
        total_items: totals.number_of_items,
        total_pages: totals.number_of_pages,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_rejects_zero() {
        assert!(PageRequest::new(0, 10).is_err());
        assert!(PageRequest::new(1, 0).is_err());
        assert_eq!(
            PageRequest::new(2, 10).ok(),
            Some(PageRequest {
                page: 2,
                per_page: 10
            })
        );
    }

    #[test]
    fn test_has_next() {
        let page = Page::<u8> {
            items: vec![],
            page: 1,
            per_page: 10,
            total_items: 11,
            total_pages: 2,
        };
        assert!(page.has_next());
        assert!(!Page { page: 2, ..page }.has_next());
    }
}
