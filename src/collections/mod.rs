//! Algorithms over caller-owned sequences.

mod selection;

pub use selection::{find_kth_largest, find_kth_largest_f64};
