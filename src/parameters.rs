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

use std::time::{Duration, Instant};

use crate::args::Args;
use crate::common::ObjectivePolicy;

/// Time limit of the benchmark runs, in seconds (4 hours)
pub const DEFAULT_TIMEOUT: u64 = 14_400;
/// Number of solutions after which the benchmark runs stop
pub const DEFAULT_SOLUTION_LIMIT: usize = 2;

/// Parameters of a run of the solver
#[derive(Debug, Clone)]
pub struct SolverParameters {
    /// Time limit for the search, in seconds
    timeout: u64,
    /// The search stops after this number of solutions (0 for no limit)
    solution_limit: usize,
    /// How the objective is bounded during the search
    policy: ObjectivePolicy,
    /// Collect stats during the search
    statistics: bool,
    /// Time at which the solving started
    start: Instant,
}

impl SolverParameters {

    pub fn new(timeout: u64, solution_limit: usize, policy: ObjectivePolicy) -> Self {
        Self {
            timeout,
            solution_limit,
            policy,
            statistics: false,
            start: Instant::now(),
        }
    }

    pub fn with_statistics(mut self, statistics: bool) -> Self {
        self.statistics = statistics;
        self
    }

    pub fn timeout(&self) -> u64 {
        self.timeout
    }

    pub fn solution_limit(&self) -> usize {
        self.solution_limit
    }

    pub fn policy(&self) -> ObjectivePolicy {
        self.policy
    }

    pub fn statistics(&self) -> bool {
        self.statistics
    }

    pub fn start(&self) -> Instant {
        self.start
    }

    /// Returns the instant after which the search must stop, if it can be represented
    pub fn deadline(&self) -> Option<Instant> {
        self.start.checked_add(Duration::from_secs(self.timeout))
    }
}

impl Default for SolverParameters {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT, DEFAULT_SOLUTION_LIMIT, ObjectivePolicy::BottomUp)
    }
}

impl From<&Args> for SolverParameters {
    fn from(args: &Args) -> Self {
        Self::new(args.timeout(), args.solutions(), args.policy()).with_statistics(args.statistics())
    }
}
