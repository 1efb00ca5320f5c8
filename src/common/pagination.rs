use serde::{Deserialize, Serialize};

/// A page of results and whether another page follows it.
///
/// # Example
/// ```
/// use roster::common::PaginatedDto;
///
/// // 15 records, 10 per page: page 1 of 2
/// let page = PaginatedDto::new(vec![1, 2, 3], 1, 10, 15);
/// assert!(page.has_next_page);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedDto<T> {
    pub data: T,
    pub has_next_page: bool,
}

impl<T> PaginatedDto<T> {
    /// `page_number` is 1-based.
    pub fn new(data: T, page_number: u32, items_per_page: u32, total_count: usize) -> Self {
        Self {
            data,
            has_next_page: (page_number as usize) < page_count(total_count, items_per_page),
        }
    }
}

/// Number of pages needed for `total_count` records, rounding up.
/// Zero items per page yields zero pages.
pub fn page_count(total_count: usize, items_per_page: u32) -> usize {
    match items_per_page as usize {
        0 => 0,
        per_page => total_count.div_ceil(per_page),
    }
}
