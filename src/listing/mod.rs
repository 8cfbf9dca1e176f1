//! Sorting and pagination of the job table, shared by the browser-facing
//! view state and the paged `GET /api/jobs` query.

pub mod pagination;
pub mod sort;
pub mod view;

pub use pagination::{PageSize, Pager};
pub use sort::{sort_jobs, SortDirection, SortKey, SortState};
pub use view::JobListView;
