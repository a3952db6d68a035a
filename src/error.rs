//! Error types for the hybrid CVRP solver core.

use std::fmt;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, CvrpError>;

/// A stage of the solver pipeline, attached to an error so callers can
/// report where a run failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Clarke-Wright construction and reduction to `K` routes.
    ClarkeWright,
    /// 2-opt intra-route improvement.
    TwoOpt,
    /// MST + k-nearest-neighbor candidate edge pruning.
    KNeighbors,
    /// PBO model encoding.
    Encode,
    /// External PBO solver invocation.
    Solve,
    /// PBO output decoding and route reconstruction.
    Decode,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::ClarkeWright => "clarke_wright",
            Stage::TwoOpt => "two_opt",
            Stage::KNeighbors => "k_neighbors",
            Stage::Encode => "encode",
            Stage::Solve => "solve",
            Stage::Decode => "decode",
        };
        f.write_str(s)
    }
}

/// Errors the solver core can raise. `InstanceMalformed` is deliberately
/// absent: that error is surfaced by an external TSPLIB parser, not by
/// this crate.
#[derive(Debug, thiserror::Error)]
pub enum CvrpError {
    /// Clarke-Wright could not reduce the route count down to the target
    /// vehicle count under capacity.
    #[error(
        "cannot reduce to {target} routes: {remaining} routes left, capacity blocks further merges"
    )]
    ReductionInfeasible {
        /// Requested vehicle count.
        target: usize,
        /// Route count at the point reduction got stuck.
        remaining: usize,
    },

    /// Fewer than `k` neighbors could be assembled for some customer, even
    /// after falling back to the full distance matrix.
    #[error("customer {customer} needs {needed} neighbors, only {found} available")]
    NeighborsUnavailable {
        /// The customer that ran short.
        customer: usize,
        /// Requested neighbor count `k`.
        needed: usize,
        /// Neighbors actually available (bounded by `n - 1`).
        found: usize,
    },

    /// The external solver process failed to run or produced no usable
    /// output.
    #[error("external solver failed: {0}")]
    SolveFailed(String),

    /// The solver proved the encoded model infeasible.
    #[error("model is unsatisfiable")]
    Unsatisfiable,

    /// The solver's output does not decode into a valid partition of
    /// customers into `V` depot-rooted simple cycles.
    #[error("solver output is inconsistent: {0}")]
    InconsistentSolution(String),
}

/// An error paired with the pipeline stage that produced it.
#[derive(Debug, thiserror::Error)]
#[error("{stage}: {source}")]
pub struct StagedError {
    /// The stage that failed.
    pub stage: Stage,
    /// The underlying error.
    #[source]
    pub source: CvrpError,
}

impl CvrpError {
    /// Attaches a pipeline stage to this error.
    pub fn at(self, stage: Stage) -> StagedError {
        StagedError {
            stage,
            source: self,
        }
    }
}
