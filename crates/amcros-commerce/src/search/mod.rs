//! Search module.
//!
//! Storefront product search: free-text and style filters with sorting.

mod filter;
mod query;

pub use filter::Filter;
pub use query::{SearchQuery, SortOption};
