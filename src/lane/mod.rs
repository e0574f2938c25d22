//! Lane module: the bounded per-column buffers the router fills and the
//! renderer drains.

mod store;

pub use store::{Admission, Lane, LaneStore, DEFAULT_HISTORY_CAPACITY, DEFAULT_OVERFLOW_CAP};
