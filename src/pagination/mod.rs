//! Pagination module
//!
//! Accumulates successive pages of a paginated endpoint into one growing
//! list.
//!
//! # Overview
//!
//! `PaginatedAccumulator` asks the caching fetcher for the page after the
//! last one it holds and appends the result. A `null` response resets the
//! accumulated state, and so does `invalidate_data`. Each merge runs against
//! the state current when the fetch completes, not when it started.

mod accumulator;

pub use accumulator::{
    merge_page, InFlightPolicy, PaginatedAccumulator, PaginatedTransactions, PaginationState,
};
