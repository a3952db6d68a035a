//! Clarke-Wright savings construction and reduction to a target fleet size.
//!
//! # Algorithm
//!
//! Parallel Clarke & Wright (1964) savings heuristic. Each customer starts
//! on its own depot-round-trip route; routes are merged in decreasing order
//! of
//!
//! ```text
//! s(i, j) = d(0, i) + d(0, j) - d(i, j)
//! ```
//!
//! as long as `i` and `j` sit at mergeable route endpoints and the combined
//! demand fits the vehicle capacity. Once no further savings-driven merge
//! applies, routes are reduced down to the target vehicle count `K` by
//! repeatedly eliminating the smallest route and re-inserting its customers
//! into the cheapest-fitting remaining route.
//!
//! # Complexity
//!
//! `O(n^2 log n)`, dominated by sorting the savings list.
//!
//! # Reference
//!
//! Clarke, G. & Wright, J.W. (1964). "Scheduling of Vehicles from a Central
//! Depot to a Number of Delivery Points", *Operations Research* 12(4),
//! 568-581.

use crate::error::{CvrpError, Result};
use crate::instance::Instance;
use crate::route::Route;
use crate::route_set::RouteSet;

/// Runs Clarke-Wright construction followed by reduction to exactly
/// `target_vehicles` routes.
///
/// # Errors
///
/// Returns [`CvrpError::ReductionInfeasible`] if the route count cannot be
/// brought down to `target_vehicles` without violating capacity anywhere.
///
/// # Examples
///
/// ```
/// use cvrp_hybrid::instance::Instance;
/// use cvrp_hybrid::constructive::clarke_wright;
///
/// let inst = Instance::new(
///     10,
///     vec![0, 1, 1, 1],
///     vec![
///         0, 10, 10, 10,
///         10, 0, 1, 1,
///         10, 1, 0, 1,
///         10, 1, 1, 0,
///     ],
/// );
/// let routes = clarke_wright::build(&inst, 1).unwrap();
/// assert_eq!(routes.len(), 1);
/// ```
pub fn build(inst: &Instance, target_vehicles: usize) -> Result<RouteSet> {
    let n = inst.n();
    let mut routes = RouteSet::new(n);

    if n <= 1 {
        return Ok(routes);
    }

    for c in inst.customers() {
        routes.insert(Route::new(vec![c]));
    }

    let savings = savings_list(inst);
    log::debug!("clarke-wright: {} savings pairs computed", savings.len());

    merge_routes(&mut routes, inst, &savings);
    log::debug!(
        "clarke-wright: {} routes after savings merge",
        routes.len()
    );

    reduce_to_k(&mut routes, inst, target_vehicles)?;
    log::info!(
        "clarke-wright: reduced to {} routes (target {})",
        routes.len(),
        target_vehicles
    );

    Ok(routes)
}

/// Savings `(s, i, j)` for every unordered customer pair, sorted by
/// decreasing `s` with ties broken lexicographically on `(i, j)` ascending,
/// so runs are reproducible given the same instance.
fn savings_list(inst: &Instance) -> Vec<(i64, usize, usize)> {
    let n = inst.n();
    let mut savings = Vec::with_capacity(n.saturating_sub(1) * n.saturating_sub(2) / 2);
    for i in 1..n {
        for j in (i + 1)..n {
            let s = inst.distance(0, i) + inst.distance(0, j) - inst.distance(i, j);
            savings.push((s, i, j));
        }
    }
    savings.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)).then(a.2.cmp(&b.2)));
    savings
}

fn merge_routes(routes: &mut RouteSet, inst: &Instance, savings: &[(i64, usize, usize)]) {
    for &(s, i, j) in savings {
        if s < 0 {
            continue;
        }

        let (ri, rj) = match (routes.route_of(i), routes.route_of(j)) {
            (Some(ri), Some(rj)) if ri != rj => (ri, rj),
            _ => continue,
        };

        let mut route_i = routes.get(ri).expect("ri is occupied").clone();
        let mut route_j = routes.get(rj).expect("rj is occupied").clone();

        if route_i.first() == Some(i) {
            route_i.reverse();
        }
        if route_j.last() == Some(j) {
            route_j.reverse();
        }

        if route_i.last() != Some(i) || route_j.first() != Some(j) {
            continue;
        }

        if route_i.demand(inst) + route_j.demand(inst) > inst.capacity() {
            continue;
        }

        let merged = route_i.merge(&route_j);
        routes.take(rj);
        routes.replace(ri, merged);
    }
}

/// Sum of depot distances for every customer currently on the route at
/// `slot` — the "total depot-radial load" ordering key used to prefer
/// least-loaded routes first when redistributing an eliminated route's
/// customers.
fn radial_load(routes: &RouteSet, slot: usize, inst: &Instance) -> i64 {
    routes
        .get(slot)
        .expect("slot occupied")
        .seq()
        .iter()
        .map(|&c| inst.distance(c, 0))
        .sum()
}

fn reduce_to_k(routes: &mut RouteSet, inst: &Instance, target: usize) -> Result<()> {
    while routes.len() > target {
        let mut candidates: Vec<usize> = routes.iter().map(|(slot, _)| slot).collect();
        candidates.sort_by_key(|&slot| (routes.get(slot).expect("occupied").len(), slot));

        let mut succeeded = false;
        for &victim in &candidates {
            if let Some(trial) = try_eliminate(routes, inst, victim) {
                *routes = trial;
                succeeded = true;
                break;
            }
        }

        if !succeeded {
            return Err(CvrpError::ReductionInfeasible {
                target,
                remaining: routes.len(),
            });
        }
    }
    Ok(())
}

/// Attempts to remove the route at `victim` and redistribute its customers
/// into the cheapest-fitting remaining route, working on a scratch clone so
/// a failed attempt leaves `routes` untouched.
fn try_eliminate(routes: &RouteSet, inst: &Instance, victim: usize) -> Option<RouteSet> {
    let mut trial = routes.clone();
    let removed = trial.take(victim);

    for &customer in removed.seq() {
        let mut slots: Vec<usize> = trial.iter().map(|(slot, _)| slot).collect();
        slots.sort_by(|&a, &b| {
            radial_load(&trial, a, inst)
                .cmp(&radial_load(&trial, b, inst))
                .then(a.cmp(&b))
        });

        let mut placed = false;
        for slot in slots {
            let mut candidate = trial.get(slot).expect("occupied").clone();
            if candidate.demand(inst) + inst.demand(customer) <= inst.capacity() {
                candidate.append(customer);
                trial.replace(slot, candidate);
                placed = true;
                break;
            }
        }

        if !placed {
            return None;
        }
    }

    Some(trial)
}
