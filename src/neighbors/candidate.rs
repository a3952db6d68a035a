//! Per-customer neighbor lists and the per-route candidate edge matrix.

use crate::error::{CvrpError, Result};
use crate::instance::Instance;
use crate::neighbors::mst::Mst;
use crate::route::Route;

/// Computes, for every customer, its `k` nearest candidate neighbors.
///
/// The list is seeded from the customer's minimum-spanning-tree edges
/// (sorted by weight, ties broken by neighbor index ascending) and, if that
/// leaves fewer than `k` entries, padded from the full distance matrix row
/// — nearest first, skipping anything already chosen. The depot is a valid
/// candidate neighbor, matching how boundary edges are already written
/// separately into the candidate matrix.
///
/// # Errors
///
/// Returns [`CvrpError::NeighborsUnavailable`] for any customer that still
/// has fewer than `k` distinct neighbors after the fallback (possible only
/// on instances with fewer than `k + 1` total nodes).
pub fn neighbor_lists(inst: &Instance, mst: &Mst, k: usize) -> Result<Vec<Vec<usize>>> {
    let n = inst.n();
    let mut lists = vec![Vec::new(); n];

    for c in inst.customers() {
        let mut chosen: Vec<usize> = Vec::with_capacity(k);

        let mut tree_neighbors: Vec<(i64, usize)> =
            mst.neighbors(c).iter().map(|&(nb, w)| (w, nb)).collect();
        tree_neighbors.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)));
        for (_, nb) in tree_neighbors {
            if chosen.len() == k {
                break;
            }
            chosen.push(nb);
        }

        if chosen.len() < k {
            let mut row: Vec<(i64, usize)> = (0..n)
                .filter(|&v| v != c)
                .map(|v| (inst.distance(c, v), v))
                .collect();
            row.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)));
            for (_, v) in row {
                if chosen.len() == k {
                    break;
                }
                if !chosen.contains(&v) {
                    chosen.push(v);
                }
            }
        }

        if chosen.len() < k {
            return Err(CvrpError::NeighborsUnavailable {
                customer: c,
                needed: k,
                found: chosen.len(),
            });
        }

        lists[c] = chosen;
    }

    Ok(lists)
}

/// A sparse candidate edge matrix for a single route: dense storage, `-1`
/// marking an absent (pruned) edge, `0` on the diagonal.
///
/// An edge is present if it is a depot-boundary edge, a consecutive edge on
/// the route, or connects a customer to one of its candidate neighbors.
#[derive(Debug, Clone)]
pub struct CandidateMatrix {
    n: usize,
    data: Vec<i64>,
}

impl CandidateMatrix {
    fn new(n: usize) -> Self {
        let mut data = vec![-1; n * n];
        for i in 0..n {
            data[i * n + i] = 0;
        }
        Self { n, data }
    }

    fn set_sym(&mut self, i: usize, j: usize, weight: i64) {
        self.data[i * self.n + j] = weight;
        self.data[j * self.n + i] = weight;
    }

    /// Returns the edge weight between `i` and `j`, or `-1` if the edge is
    /// pruned.
    pub fn get(&self, i: usize, j: usize) -> i64 {
        self.data[i * self.n + j]
    }

    /// Returns `true` if the `(i, j)` edge survived pruning.
    pub fn has_edge(&self, i: usize, j: usize) -> bool {
        self.get(i, j) >= 0
    }

    /// Node count spanned by the matrix (depot plus all customers).
    pub fn n(&self) -> usize {
        self.n
    }
}

/// Builds one [`CandidateMatrix`] per route in `routes`, indexed the same
/// way as [`RouteSet::iter`](crate::route_set::RouteSet::iter) (by slot).
pub fn build_candidate_matrices(
    inst: &Instance,
    routes: &[(usize, &Route)],
    neighbor_lists: &[Vec<usize>],
) -> Vec<(usize, CandidateMatrix)> {
    let n = inst.n();
    let mut matrices = Vec::with_capacity(routes.len());

    for &(slot, route) in routes {
        let mut m = CandidateMatrix::new(n);

        if let (Some(first), Some(last)) = (route.first(), route.last()) {
            m.set_sym(0, first, inst.distance(0, first));
            m.set_sym(0, last, inst.distance(0, last));

            for w in route.seq().windows(2) {
                m.set_sym(w[0], w[1], inst.distance(w[0], w[1]));
            }

            for &c in route.seq() {
                for &v in &neighbor_lists[c] {
                    m.set_sym(c, v, inst.distance(c, v));
                }
            }
        }

        matrices.push((slot, m));
    }

    matrices
}
