//! Candidate-edge pruning: cuts the quadratic arc set each route would
//! otherwise contribute to the optimization model down to the edges a
//! near-optimal route is actually likely to use.
//!
//! - [`mst`] — minimum spanning tree over the full distance graph.
//! - [`candidate`] — per-customer neighbor lists and the per-route
//!   [`candidate::CandidateMatrix`].
//!
//! # Pipeline
//!
//! 1. Build one MST over all `n` nodes ([`mst::Mst::build`]).
//! 2. Derive each customer's `k` nearest candidate neighbors
//!    ([`candidate::neighbor_lists`]), falling back to the distance matrix
//!    when the tree alone doesn't supply enough.
//! 3. For each route, assemble a [`candidate::CandidateMatrix`] containing
//!    the depot-boundary edges, the route's own consecutive edges, and
//!    every customer-to-candidate-neighbor edge.

pub mod candidate;
pub mod mst;

use crate::error::Result;
use crate::instance::Instance;
use crate::route::Route;
use candidate::CandidateMatrix;
use mst::Mst;

/// Runs the full candidate-edge pipeline for one route set: builds the MST,
/// derives `k`-nearest neighbor lists, and assembles a candidate matrix per
/// route.
///
/// Returns the matrices paired with the route slot they were built for, in
/// the same order `routes` was given.
pub fn build(
    inst: &Instance,
    routes: &[(usize, &Route)],
    k: usize,
) -> Result<Vec<(usize, CandidateMatrix)>> {
    let tree = Mst::build(inst);
    let lists = candidate::neighbor_lists(inst, &tree, k)?;
    Ok(candidate::build_candidate_matrices(inst, routes, &lists))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_end_to_end() {
        let inst = Instance::new(
            100,
            vec![0, 10, 10, 10],
            vec![
                0, 1, 2, 3, //
                1, 0, 1, 2, //
                2, 1, 0, 1, //
                3, 2, 1, 0, //
            ],
        );
        let route = Route::new(vec![1, 2, 3]);
        let matrices = build(&inst, &[(0, &route)], 1).unwrap();
        assert_eq!(matrices.len(), 1);
        let (slot, m) = &matrices[0];
        assert_eq!(*slot, 0);
        assert!(m.has_edge(0, 1));
    }
}
