//! Constructive heuristics for building an initial feasible route set.
//!
//! - [`clarke_wright`] — Clarke-Wright savings construction (1964) plus
//!   reduction to a target vehicle count, `O(n^2 log n)`.

pub mod clarke_wright;
