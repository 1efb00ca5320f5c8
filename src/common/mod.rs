pub mod pagination;

pub use pagination::{PaginatedDto, page_count};
