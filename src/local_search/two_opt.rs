//! Intra-route 2-opt improvement.
//!
//! # Algorithm
//!
//! For each route, repeatedly scan every pair of positions `0 <= i < j <
//! len`, computing the cost delta of reversing the closed subrange
//! `seq[i..=j]`:
//!
//! ```text
//! delta = d(a, c) + d(b, d) - d(a, b) - d(c, d)
//! ```
//!
//! where `(a, b) = (seq[i-1], seq[i])` and `(c, d) = (seq[j], seq[j+1])`,
//! substituting the depot for out-of-range indices. The single best
//! improving reversal found in a full pass is applied, then the pass
//! restarts; the route is locally optimal once a full pass finds no
//! improving reversal.
//!
//! Because distances are integers, "improving" is an exact `delta < 0`
//! comparison — no epsilon tolerance is needed, unlike a floating-point
//! formulation.
//!
//! # Complexity
//!
//! `O(n^2)` per pass; polynomially many passes in practice.
//!
//! # Reference
//!
//! Croes, G.A. (1958). "A method for solving traveling salesman problems",
//! *Operations Research* 6(6), 791-812.

use crate::instance::Instance;
use crate::route::Route;
use crate::route_set::RouteSet;

/// Applies 2-opt improvement to every route in `routes`, in place.
///
/// # Examples
///
/// ```
/// use cvrp_hybrid::instance::Instance;
/// use cvrp_hybrid::route::Route;
/// use cvrp_hybrid::route_set::RouteSet;
/// use cvrp_hybrid::local_search::two_opt;
///
/// let inst = Instance::new(
///     100,
///     vec![0, 10, 10, 10],
///     vec![
///         0, 1, 2, 3,
///         1, 0, 1, 2,
///         2, 1, 0, 1,
///         3, 2, 1, 0,
///     ],
/// );
/// let mut routes = RouteSet::new(inst.n());
/// routes.insert(Route::new(vec![1, 3, 2]));
/// two_opt::improve(&mut routes, &inst);
/// assert_eq!(routes.total_cost(&inst), 6);
/// ```
pub fn improve(routes: &mut RouteSet, inst: &Instance) {
    let slots: Vec<usize> = routes.iter().map(|(slot, _)| slot).collect();
    for slot in slots {
        let before = routes.get(slot).expect("occupied").seq().to_vec();
        let after = improve_route(&before, inst);
        if after != before {
            routes.replace(slot, Route::new(after));
        }
    }
}

fn improve_route(seq: &[usize], inst: &Instance) -> Vec<usize> {
    let mut current = seq.to_vec();

    loop {
        let n = current.len();
        if n < 2 {
            return current;
        }

        let mut best: Option<(i64, usize, usize)> = None;
        for i in 0..n - 1 {
            for j in i + 1..n {
                let delta = two_opt_delta(&current, inst, i, j);
                let improves = match best {
                    Some((best_delta, _, _)) => delta < best_delta,
                    None => delta < 0,
                };
                if delta < 0 && improves {
                    best = Some((delta, i, j));
                }
            }
        }

        match best {
            Some((_, i, j)) => current[i..=j].reverse(),
            None => return current,
        }
    }
}

/// Cost delta of reversing `seq[i..=j]`, using the depot (`0`) for the
/// neighbor of an out-of-range endpoint.
fn two_opt_delta(seq: &[usize], inst: &Instance, i: usize, j: usize) -> i64 {
    let n = seq.len();
    let prev_i = if i == 0 { 0 } else { seq[i - 1] };
    let next_j = if j == n - 1 { 0 } else { seq[j + 1] };

    let old_cost = inst.distance(prev_i, seq[i]) + inst.distance(seq[j], next_j);
    let new_cost = inst.distance(prev_i, seq[j]) + inst.distance(seq[i], next_j);

    new_cost - old_cost
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    const CUSTOMERS: usize = 5;
    const N: usize = CUSTOMERS + 1;
    const PAIRS: usize = N * (N - 1) / 2;

    /// Builds a symmetric, zero-diagonal `N x N` distance matrix from the
    /// upper-triangular weights `upper` (one per unordered node pair).
    fn symmetric_matrix(upper: &[i64]) -> Vec<i64> {
        let mut m = vec![0i64; N * N];
        let mut idx = 0;
        for i in 0..N {
            for j in (i + 1)..N {
                m[i * N + j] = upper[idx];
                m[j * N + i] = upper[idx];
                idx += 1;
            }
        }
        m
    }

    /// Turns `swaps` (one swap-target index per position) into a
    /// permutation of the customers `1..=CUSTOMERS` via Fisher-Yates.
    fn permutation(swaps: &[usize]) -> Vec<usize> {
        let mut seq: Vec<usize> = (1..=CUSTOMERS).collect();
        for i in (1..seq.len()).rev() {
            seq.swap(i, swaps[i] % (i + 1));
        }
        seq
    }

    proptest! {
        #[test]
        fn prop_two_opt_never_increases_route_cost(
            upper in proptest::collection::vec(1i64..50, PAIRS),
            swaps in proptest::collection::vec(0usize..CUSTOMERS, CUSTOMERS),
        ) {
            let inst = Instance::new(i64::MAX, vec![0; N], symmetric_matrix(&upper));
            let mut routes = RouteSet::new(inst.n());
            routes.insert(Route::new(permutation(&swaps)));

            let before = routes.total_cost(&inst);
            improve(&mut routes, &inst);
            let after = routes.total_cost(&inst);

            prop_assert!(after <= before);
        }
    }
}
