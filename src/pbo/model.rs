//! The pseudo-Boolean optimization model: literal bookkeeping, linear
//! constraints, and OPB-style text serialization.

use std::collections::HashMap;
use std::fmt;

/// Comparator of a linear pseudo-Boolean constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    Eq,
    Leq,
    Geq,
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Comparator::Eq => "=",
            Comparator::Leq => "<=",
            Comparator::Geq => ">=",
        };
        f.write_str(s)
    }
}

/// A linear pseudo-Boolean model: variables, constraints, and a
/// minimization objective, built incrementally and serialized to the
/// OPB-like text format the external solver expects.
///
/// Variables are named symbolically (`"w_1_2_0"`) and assigned a literal
/// (a positive integer) the first time they're mentioned; the mapping is
/// kept bidirectional so decoding can translate solver output back to
/// variable names.
#[derive(Debug, Default)]
pub struct PboModel {
    counter: i64,
    mapping: HashMap<String, i64>,
    mapping_inv: HashMap<i64, String>,
    constraints: Vec<String>,
    objective: Vec<(i64, i64)>,
}

impl PboModel {
    pub fn new() -> Self {
        Self {
            counter: 1,
            mapping: HashMap::new(),
            mapping_inv: HashMap::new(),
            constraints: Vec::new(),
            objective: Vec::new(),
        }
    }

    /// Returns the literal for `name`, assigning a fresh one on first use.
    pub fn var(&mut self, name: &str) -> i64 {
        if let Some(&lit) = self.mapping.get(name) {
            return lit;
        }
        let lit = self.counter;
        self.mapping.insert(name.to_string(), lit);
        self.mapping_inv.insert(lit, name.to_string());
        self.counter += 1;
        lit
    }

    /// Returns the variable name bound to `literal`, if any.
    pub fn name_of(&self, literal: i64) -> Option<&str> {
        self.mapping_inv.get(&literal).map(|s| s.as_str())
    }

    fn encode_literal(factor: i64, literal: i64) -> String {
        let sign = if literal >= 0 { "" } else { "~" };
        format!("{factor} {sign}x{}", literal.abs())
    }

    /// Adds a linear constraint `sum(factor * literal) <cmp> rhs`.
    ///
    /// A negative `literal` in `terms` means the term is the negation of
    /// that variable (`~x`); a negative `factor` is a plain negative
    /// coefficient, as used by e.g. the capacity constraint.
    pub fn add_constraint(&mut self, terms: &[(i64, i64)], cmp: Comparator, rhs: i64) {
        let body = terms
            .iter()
            .map(|&(factor, literal)| Self::encode_literal(factor, literal))
            .collect::<Vec<_>>()
            .join(" ");
        self.constraints.push(format!("{body} {cmp} {rhs} ;"));
    }

    pub fn add_constraint_eq(&mut self, terms: &[(i64, i64)], rhs: i64) {
        self.add_constraint(terms, Comparator::Eq, rhs);
    }

    pub fn add_constraint_leq(&mut self, terms: &[(i64, i64)], rhs: i64) {
        self.add_constraint(terms, Comparator::Leq, rhs);
    }

    pub fn add_constraint_geq(&mut self, terms: &[(i64, i64)], rhs: i64) {
        self.add_constraint(terms, Comparator::Geq, rhs);
    }

    /// Adds `factor * literal` to the minimization objective.
    pub fn add_objective_term(&mut self, factor: i64, literal: i64) {
        self.objective.push((factor, literal));
    }

    pub fn num_variables(&self) -> i64 {
        self.counter - 1
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Serializes the model to the OPB-like text format: a header comment,
    /// a `min:` objective line, then one constraint per line.
    pub fn serialize(&self) -> String {
        let objective = self
            .objective
            .iter()
            .map(|&(factor, literal)| Self::encode_literal(factor, literal))
            .collect::<Vec<_>>()
            .join(" ");

        let mut out = format!(
            "* #variable= {} #constraint= {}\n",
            self.num_variables(),
            self.num_constraints()
        );
        out.push_str(&format!("min: {objective} ;\n"));
        for line in &self.constraints {
            out.push_str(line);
            out.push('\n');
        }
        out
    }
}
