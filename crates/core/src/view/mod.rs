//! Derived views over the task list
//!
//! Filtering, sorting, overview counters and the debounced search box.

pub mod debounce;
pub mod filter;
pub mod stats;

pub use debounce::{SearchDebouncer, DEFAULT_SEARCH_DEBOUNCE};
pub use filter::{apply, apply_refs, PriorityFilter, SortKey, StatusFilter, TaskQuery};
pub use stats::TaskStats;
