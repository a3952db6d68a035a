//! Orchestrates the full pipeline: construction, local search, candidate
//! pruning, PBO encoding, external solve, and decoding.

use std::io::Write;
use std::process::Command;
use std::time::Duration;

use tempfile::Builder;

use crate::constructive::clarke_wright;
use crate::error::{CvrpError, Result, Stage, StagedError};
use crate::instance::Instance;
use crate::local_search::two_opt;
use crate::neighbors;
use crate::pbo::{self, DecodedSolution};

/// Settings for invoking the external PBO solver.
///
/// Holds no global/ambient state: every [`SolverDriver`] run is threaded
/// through explicitly from a fresh `SolverConfig`.
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Path or name of the solver executable.
    pub command: String,
    /// Extra arguments passed before the input file path (e.g. solver-specific
    /// flags, including any time-limit flag the solver understands — this
    /// crate does not invent one on the caller's behalf).
    pub args: Vec<String>,
    /// Advisory wall-clock budget, logged but not enforced here; a solver
    /// that honors its own time-limit flag (passed via `args`) returns its
    /// best-found solution instead of timing out silently.
    pub time_limit: Option<Duration>,
}

impl SolverConfig {
    /// Creates a config that invokes `command` with no extra arguments.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            args: Vec::new(),
            time_limit: None,
        }
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }
}

/// Drives one end-to-end solve: Clarke-Wright, 2-opt, candidate-edge
/// pruning, PBO encoding, external solve, decoding.
pub struct SolverDriver {
    config: SolverConfig,
}

impl SolverDriver {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    /// Runs the full pipeline for `inst`, targeting `target_vehicles`
    /// routes with `k` candidate neighbors per customer.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`CvrpError`] tagged with the [`Stage`] that
    /// produced it, so callers can report exactly where a run failed.
    pub fn run(
        &self,
        inst: &Instance,
        target_vehicles: usize,
        k: usize,
    ) -> std::result::Result<DecodedSolution, StagedError> {
        let mut routes =
            clarke_wright::build(inst, target_vehicles).map_err(|e| e.at(Stage::ClarkeWright))?;
        log::info!("clarke-wright produced {} routes", routes.len());

        two_opt::improve(&mut routes, inst);
        log::info!("two-opt cost: {}", routes.total_cost(inst));

        let slots: Vec<(usize, &crate::route::Route)> = routes.iter().collect();
        let mut matrices = neighbors::build(inst, &slots, k).map_err(|e| e.at(Stage::KNeighbors))?;
        matrices.sort_by_key(|(slot, _)| *slot);
        let matrices: Vec<_> = matrices.into_iter().map(|(_, m)| m).collect();

        let model = pbo::encode_model(inst, &matrices);
        log::info!(
            "encoded model: {} variables, {} constraints",
            model.num_variables(),
            model.num_constraints()
        );

        let output = self
            .invoke_solver(&model.serialize())
            .map_err(|e| e.at(Stage::Solve))?;

        pbo::decode_solution(&model, &output, matrices.len(), inst.n())
            .map_err(|e| e.at(Stage::Decode))
    }

    /// Writes `input_text` to a uniquely-named temp file, runs the solver
    /// on it with stdout captured to a second temp file, and returns the
    /// captured output split into lines. Both temp files are removed once
    /// this function returns, on every path, via `tempfile`'s drop-based
    /// cleanup.
    fn invoke_solver(&self, input_text: &str) -> Result<Vec<String>> {
        let mut input_file = Builder::new()
            .prefix("cvrp-input-")
            .suffix(".txt")
            .tempfile()
            .map_err(|e| CvrpError::SolveFailed(format!("cannot create input file: {e}")))?;
        input_file
            .write_all(input_text.as_bytes())
            .map_err(|e| CvrpError::SolveFailed(format!("cannot write input file: {e}")))?;
        input_file
            .flush()
            .map_err(|e| CvrpError::SolveFailed(format!("cannot flush input file: {e}")))?;

        let output_file = Builder::new()
            .prefix("cvrp-output-")
            .suffix(".txt")
            .tempfile()
            .map_err(|e| CvrpError::SolveFailed(format!("cannot create output file: {e}")))?;
        let output_handle = output_file
            .reopen()
            .map_err(|e| CvrpError::SolveFailed(format!("cannot reopen output file: {e}")))?;

        if let Some(limit) = self.config.time_limit {
            log::info!("invoking solver with advisory time limit {limit:?}");
        }

        let status = Command::new(&self.config.command)
            .args(&self.config.args)
            .arg(input_file.path())
            .stdout(output_handle)
            .status()
            .map_err(|e| CvrpError::SolveFailed(format!("failed to spawn solver: {e}")))?;

        if !status.success() {
            return Err(CvrpError::SolveFailed(format!(
                "solver exited with status {status}"
            )));
        }

        let contents = std::fs::read_to_string(output_file.path())
            .map_err(|e| CvrpError::SolveFailed(format!("cannot read solver output: {e}")))?;

        Ok(contents.lines().map(str::to_string).collect())
    }
}
