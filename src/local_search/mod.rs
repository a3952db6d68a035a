//! Local search operators for improving a constructed route set.
//!
//! - [`two_opt`] — intra-route 2-opt edge reversal, applied per route.

pub mod two_opt;
