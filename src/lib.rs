//Dcmst
//Copyright (C) 2022-2023 A. Dubray
//
//This program is free software: you can redistribute it and/or modify
//it under the terms of the GNU Affero General Public License as published by
//the Free Software Foundation, either version 3 of the License, or
//(at your option) any later version.
//
//This program is distributed in the hope that it will be useful,
//but WITHOUT ANY WARRANTY; without even the implied warranty of
//MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//GNU Affero General Public License for more details.
//
//You should have received a copy of the GNU Affero General Public License
//along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Exact solver for the degree-constrained minimum spanning tree problem: given an undirected
//! graph with edge costs and a maximum degree for each vertex, find a spanning tree of minimum
//! cost in which no vertex exceeds its maximum degree, or prove that none exists.
//!
//! The solver is a depth-first branch-and-bound on the edges of the graph. The search state is
//! a graph domain (mandatory and possible edges) stored on a reversible trail, narrowed by a
//! degree propagator and by a spanning tree propagator that bounds the cost of the tree with a
//! minimum spanning tree relaxation.

// Re-export the modules
mod branching;
mod propagator;
mod solver;
mod statistics;
pub mod args;
pub mod common;
pub mod core;
pub mod error;
pub mod logger;
pub mod parameters;
pub mod parser;

pub use common::*;
pub use crate::core::instance::Instance;
pub use error::{DcmstError, InstanceError};
pub use parameters::{SolverParameters, DEFAULT_SOLUTION_LIMIT, DEFAULT_TIMEOUT};
pub use solver::{SolveReport, Solver};
pub use statistics::Counters;

use peak_alloc::PeakAlloc;
#[global_allocator]
pub static PEAK_ALLOC: PeakAlloc = PeakAlloc;

/// Solves the instance with the benchmark configuration (bottom-up policy, at most two
/// solutions) and the given time limit, in seconds
pub fn solve(instance: &Instance, time_limit_seconds: u64) -> SolveResult {
    let parameters = SolverParameters::new(time_limit_seconds, DEFAULT_SOLUTION_LIMIT, ObjectivePolicy::BottomUp);
    solve_with_parameters(instance, parameters).result
}

/// Solves the instance and returns the full report of the run
pub fn solve_with_parameters(instance: &Instance, parameters: SolverParameters) -> SolveReport {
    solve_with_listener(instance, parameters, |_| {})
}

/// Solves the instance, calling `listener` on each event as soon as it happens, and returns the
/// full report of the run
pub fn solve_with_listener<F: FnMut(&SearchEvent)>(instance: &Instance, parameters: SolverParameters, listener: F) -> SolveReport {
    if parameters.statistics() {
        Solver::<true>::new(instance, parameters).with_listener(listener).solve()
    } else {
        Solver::<false>::new(instance, parameters).with_listener(listener).solve()
    }
}

/// Checks the outcome of a benchmark run. The benchmark instances are all feasible: a run that
/// exhausts the search space without finding any tree denotes a broken instance.
pub fn check_benchmark(report: &SolveReport) -> Result<(), DcmstError> {
    if report.result == SolveResult::ProvenInfeasible {
        return Err(DcmstError::ContradictoryBenchmark { elapsed: report.elapsed.as_secs_f64() });
    }
    Ok(())
}
