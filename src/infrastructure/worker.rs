// Dedicated solve worker
// Each solve runs on its own named thread so a slow or crashing backend
// cannot take the calling thread down with it

use std::any::Any;
use std::sync::Arc;
use std::thread;

use crate::domain::models::{OptimizationProblem, ProgramSolution};
use crate::domain::solver_service::{Result, SolverError, SolverService};

pub struct SolveWorker {
    solver: Arc<dyn SolverService>,
}

impl SolveWorker {
    pub fn new(solver: Arc<dyn SolverService>) -> Self {
        Self { solver }
    }

    pub fn solver_name(&self) -> &str {
        self.solver.name()
    }

    /// Solve `problem` on a fresh thread and wait for it.
    ///
    /// A panic inside the backend comes back as `ExecutionFailed`.
    pub fn run(&self, problem: Arc<OptimizationProblem>) -> Result<ProgramSolution> {
        let solver = Arc::clone(&self.solver);
        let handle = thread::Builder::new()
            .name("shiftopt-solve".to_string())
            .spawn(move || solver.solve(&problem))
            .map_err(|e| {
                SolverError::ExecutionFailed(format!("could not start solver worker: {}", e))
            })?;

        match handle.join() {
            Ok(result) => result,
            Err(payload) => Err(SolverError::ExecutionFailed(format!(
                "{} panicked: {}",
                self.solver.name(),
                panic_message(payload.as_ref())
            ))),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
