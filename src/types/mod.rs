//! Shared response and paging types.

mod pagination;
mod response;

pub use pagination::{Paginated, PaginationParams};
pub use response::{Created, MessageResponse, NoContent};
