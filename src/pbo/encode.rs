//! Builds the pseudo-Boolean model for a restricted CVRP over a set of
//! per-vehicle candidate matrices.
//!
//! Variable families:
//! - `w_{i}_{j}_{v}` — vehicle `v` traverses arc `i -> j`.
//! - `t_{i}_{v}` — vehicle `v` visits node `i` (including the depot).
//! - `u_{i}_{b}_{v}` — bit `b` of customer `i`'s visit order on vehicle
//!   `v`, used for Miller-Tucker-Zemlin subtour elimination. Binary-coded
//!   rather than a single integer variable, since pseudo-Boolean models
//!   only admit 0/1 variables.
//!
//! MTZ is used instead of the transitive-closure form because its
//! constraint count is quadratic in `n` per vehicle rather than cubic.

use crate::instance::Instance;
use crate::neighbors::candidate::CandidateMatrix;
use crate::pbo::model::PboModel;

/// Number of bits needed to represent values `0..m` (i.e. `ceil(log2(m))`,
/// with `ceil(log2(0)) = ceil(log2(1)) = 0`).
fn order_bits(m: usize) -> u32 {
    let mut bits = 0;
    let mut cap: usize = 1;
    while cap < m {
        cap <<= 1;
        bits += 1;
    }
    bits
}

/// Encodes a restricted CVRP into a [`PboModel`], one vehicle per entry of
/// `matrices` (so `matrices.len()` is the fleet size `V`).
pub fn encode(inst: &Instance, matrices: &[CandidateMatrix]) -> PboModel {
    let n = inst.n();
    let v_count = matrices.len();
    let bits = order_bits(n.saturating_sub(1));

    let mut model = PboModel::new();
    let w = |i: usize, j: usize, v: usize| format!("w_{i}_{j}_{v}");
    let t = |i: usize, v: usize| format!("t_{i}_{v}");
    let u = |i: usize, b: u32, v: usize| format!("u_{i}_{b}_{v}");

    // 1. Each vehicle leaves the depot exactly once.
    for v in 0..v_count {
        let terms: Vec<(i64, i64)> = (1..n).map(|j| (1, model.var(&w(0, j, v)))).collect();
        model.add_constraint_eq(&terms, 1);
    }

    // 2. Each vehicle returns to the depot exactly once.
    for v in 0..v_count {
        let terms: Vec<(i64, i64)> = (1..n).map(|i| (1, model.var(&w(i, 0, v)))).collect();
        model.add_constraint_eq(&terms, 1);
    }

    // 3. Each customer has exactly one outgoing arc across all vehicles.
    for i in 1..n {
        let mut terms = Vec::new();
        for v in 0..v_count {
            for j in 0..n {
                if j != i {
                    terms.push((1, model.var(&w(i, j, v))));
                }
            }
        }
        model.add_constraint_eq(&terms, 1);
    }

    // 4. Each customer has exactly one incoming arc across all vehicles.
    for j in 1..n {
        let mut terms = Vec::new();
        for v in 0..v_count {
            for i in 0..n {
                if i != j {
                    terms.push((1, model.var(&w(i, j, v))));
                }
            }
        }
        model.add_constraint_eq(&terms, 1);
    }

    // 5. Anti-parallel edge exclusion.
    for i in 0..n {
        for j in (i + 1)..n {
            for v in 0..v_count {
                let wij = model.var(&w(i, j, v));
                let wji = model.var(&w(j, i, v));
                model.add_constraint_geq(&[(1, -wij), (1, -wji)], 1);
            }
        }
    }

    // 6. Arc implies visit, for customer-to-customer arcs.
    for i in 1..n {
        for j in 1..n {
            if i == j {
                continue;
            }
            for v in 0..v_count {
                let wij = model.var(&w(i, j, v));
                let ti = model.var(&t(i, v));
                let tj = model.var(&t(j, v));
                model.add_constraint_geq(&[(1, -wij), (1, ti)], 1);
                model.add_constraint_geq(&[(1, -wij), (1, tj)], 1);
            }
        }
    }

    // 7. Depot-boundary arcs imply visit.
    for j in 1..n {
        for v in 0..v_count {
            let w0j = model.var(&w(0, j, v));
            let tj = model.var(&t(j, v));
            model.add_constraint_geq(&[(1, -w0j), (1, tj)], 1);
        }
    }
    for i in 1..n {
        for v in 0..v_count {
            let wi0 = model.var(&w(i, 0, v));
            let ti = model.var(&t(i, v));
            model.add_constraint_geq(&[(1, -wi0), (1, ti)], 1);
        }
    }

    // 8. A customer is visited by at most one vehicle.
    for i in 1..n {
        for v in 0..v_count {
            for v2 in (v + 1)..v_count {
                let tiv = model.var(&t(i, v));
                let tiv2 = model.var(&t(i, v2));
                model.add_constraint_geq(&[(1, -tiv), (1, -tiv2)], 1);
            }
        }
    }

    // 9. Capacity per vehicle.
    for v in 0..v_count {
        let terms: Vec<(i64, i64)> = (0..n)
            .map(|i| (-inst.demand(i), model.var(&t(i, v))))
            .collect();
        model.add_constraint_geq(&terms, -inst.capacity());
    }

    // 10. MTZ subtour elimination over binary-coded order variables, plus
    // the domain bound `0 <= U(i,v) <= n-2` the inequality relies on (the
    // natural upper bound of a `bits`-wide binary counter is `2^bits - 1`,
    // which can exceed `n-2` when `n-1` isn't a power of two, so it must be
    // clamped explicitly or an unvisited customer's free order variable
    // could violate the inequality against a zero arc).
    for i in 1..n {
        for j in 1..n {
            if i == j {
                continue;
            }
            for v in 0..v_count {
                let mut terms = Vec::new();
                for b in 0..bits {
                    terms.push((-(1i64 << b), model.var(&u(i, b, v))));
                }
                for b in 0..bits {
                    terms.push((1i64 << b, model.var(&u(j, b, v))));
                }
                let wij = model.var(&w(i, j, v));
                terms.push((-((n as i64) - 1), wij));
                model.add_constraint_geq(&terms, -((n as i64) - 2));
            }
        }
    }
    for i in 1..n {
        for v in 0..v_count {
            let terms: Vec<(i64, i64)> = (0..bits)
                .map(|b| (1i64 << b, model.var(&u(i, b, v))))
                .collect();
            if !terms.is_empty() {
                model.add_constraint_leq(&terms, (n as i64) - 2);
            }
        }
    }

    // 11. Candidate-mask pruning.
    for v in 0..v_count {
        for i in 0..n {
            for j in 0..n {
                if i == j {
                    continue;
                }
                if !matrices[v].has_edge(i, j) {
                    let wij = model.var(&w(i, j, v));
                    model.add_constraint_eq(&[(1, wij)], 0);
                }
            }
        }
    }

    // Objective: minimize total traveled distance.
    for v in 0..v_count {
        for i in 0..n {
            for j in 0..n {
                if i == j {
                    continue;
                }
                let wij = model.var(&w(i, j, v));
                model.add_objective_term(inst.distance(i, j), wij);
            }
        }
    }

    model
}
