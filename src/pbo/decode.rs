//! Parses the external solver's stdout and reconstructs routes from the
//! selected arc set.

use std::collections::{HashMap, HashSet};

use crate::error::{CvrpError, Result};
use crate::pbo::model::PboModel;

/// A solved model: the objective value the solver reported and the
/// per-vehicle route reconstructed from its arc selection.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedSolution {
    pub optimum: f64,
    pub routes: Vec<Vec<usize>>,
}

/// Decodes solver stdout (`output`, one line per entry) into a
/// [`DecodedSolution`] for a model built with `v_count` vehicles over `n`
/// nodes.
///
/// # Errors
///
/// - [`CvrpError::Unsatisfiable`] if the solver reports `s UNSATISFIABLE`.
/// - [`CvrpError::InconsistentSolution`] if the arc set doesn't decompose
///   into `v_count` depot-rooted simple chains covering every customer
///   exactly once.
pub fn decode(
    model: &PboModel,
    output: &[String],
    v_count: usize,
    n: usize,
) -> Result<DecodedSolution> {
    let mut optimum = 0.0f64;
    let mut literals: Vec<i64> = Vec::new();

    for line in output {
        if line.starts_with("s UNSATISFIABLE") {
            return Err(CvrpError::Unsatisfiable);
        }
        if let Some(rest) = line.strip_prefix("o ") {
            optimum = rest.trim().parse().map_err(|_| {
                CvrpError::InconsistentSolution(format!("unparseable objective line: {line}"))
            })?;
        }
        if let Some(rest) = line.strip_prefix("v ") {
            for token in rest.split_whitespace() {
                let cleaned = token.replace('x', "").replace('c', "");
                if let Ok(value) = cleaned.parse::<i64>() {
                    literals.push(value);
                }
            }
        }
    }

    let mut successors: Vec<HashMap<usize, usize>> = vec![HashMap::new(); v_count];

    for lit in literals {
        if lit <= 0 {
            continue;
        }
        let Some(name) = model.name_of(lit) else {
            continue;
        };
        let Some(rest) = name.strip_prefix("w_") else {
            continue;
        };
        let parts: Vec<&str> = rest.split('_').collect();
        if parts.len() != 3 {
            continue;
        }
        let (Ok(i), Ok(j), Ok(v)) = (
            parts[0].parse::<usize>(),
            parts[1].parse::<usize>(),
            parts[2].parse::<usize>(),
        ) else {
            continue;
        };
        if v >= v_count {
            return Err(CvrpError::InconsistentSolution(format!(
                "arc references vehicle {v}, but only {v_count} vehicles exist"
            )));
        }
        if successors[v].insert(i, j).is_some() {
            return Err(CvrpError::InconsistentSolution(format!(
                "vehicle {v} has more than one arc leaving node {i}"
            )));
        }
    }

    let mut routes = Vec::with_capacity(v_count);
    let mut seen: HashSet<usize> = HashSet::new();

    for (v, succ) in successors.iter().enumerate() {
        let mut seq = Vec::new();
        let mut cur = 0usize;
        loop {
            let Some(&next) = succ.get(&cur) else {
                return Err(CvrpError::InconsistentSolution(format!(
                    "vehicle {v}'s chain is broken at node {cur}"
                )));
            };
            if next == 0 {
                break;
            }
            if !seen.insert(next) {
                return Err(CvrpError::InconsistentSolution(format!(
                    "customer {next} appears in more than one route"
                )));
            }
            seq.push(next);
            cur = next;
        }
        routes.push(seq);
    }

    let total_customers: usize = routes.iter().map(|r| r.len()).sum();
    if total_customers != n.saturating_sub(1) {
        return Err(CvrpError::InconsistentSolution(format!(
            "decoded {total_customers} customers, expected {}",
            n.saturating_sub(1)
        )));
    }

    Ok(DecodedSolution { optimum, routes })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pbo::model::PboModel;

    fn model_with_arcs(arcs: &[(usize, usize, usize)]) -> (PboModel, Vec<i64>) {
        let mut model = PboModel::new();
        let mut literals = Vec::new();
        for &(i, j, v) in arcs {
            literals.push(model.var(&format!("w_{i}_{j}_{v}")));
        }
        (model, literals)
    }

    #[test]
    fn test_unsatisfiable_line_raises_error() {
        let model = PboModel::new();
        let output = vec!["s UNSATISFIABLE".to_string()];
        let err = decode(&model, &output, 1, 3).unwrap_err();
        assert!(matches!(err, CvrpError::Unsatisfiable));
    }

    #[test]
    fn test_decodes_single_vehicle_triangle() {
        let arcs = [(0, 1, 0), (1, 2, 0), (2, 0, 0)];
        let (model, lits) = model_with_arcs(&arcs);
        let v_line = format!("v {} {} {}", lits[0], lits[1], lits[2]);
        let output = vec!["o 12".to_string(), v_line];
        let decoded = decode(&model, &output, 1, 3).unwrap();
        assert_eq!(decoded.optimum, 12.0);
        assert_eq!(decoded.routes, vec![vec![1, 2]]);
    }

    #[test]
    fn test_missing_arc_raises_inconsistent_solution() {
        // depot -> 1, but no arc leaving 1: broken chain.
        let arcs = [(0, 1, 0)];
        let (model, lits) = model_with_arcs(&arcs);
        let v_line = format!("v {}", lits[0]);
        let output = vec![v_line];
        let err = decode(&model, &output, 1, 3).unwrap_err();
        assert!(matches!(err, CvrpError::InconsistentSolution(_)));
    }

    #[test]
    fn test_two_vehicles_each_reconstructed_independently() {
        let arcs = [(0, 1, 0), (1, 0, 0), (0, 2, 1), (2, 0, 1)];
        let (model, lits) = model_with_arcs(&arcs);
        let v_line = format!("v {} {} {} {}", lits[0], lits[1], lits[2], lits[3]);
        let output = vec![v_line];
        let decoded = decode(&model, &output, 2, 3).unwrap();
        assert_eq!(decoded.routes, vec![vec![1], vec![2]]);
    }

    #[test]
    fn test_negative_literals_are_ignored() {
        let arcs = [(0, 1, 0), (1, 0, 0)];
        let (model, lits) = model_with_arcs(&arcs);
        let v_line = format!("v -{} {} {}", lits[0] + 99, lits[0], lits[1]);
        let output = vec![v_line];
        let decoded = decode(&model, &output, 1, 2).unwrap();
        assert_eq!(decoded.routes, vec![vec![1]]);
    }
}
