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

use clap::ValueEnum;
use std::fmt;

/// Cost of an edge, or of a (partial) tree
pub type Cost = usize;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum ObjectivePolicy {
    /// Searches for a tree whose cost equals the proven lower bound, raising the bound when
    /// the search fails. The first tree found is optimal.
    BottomUp,
    /// Classical branch-and-bound: each solution tightens the upper bound
    TopDown,
}

impl fmt::Display for ObjectivePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectivePolicy::BottomUp => write!(f, "bottom-up"),
            ObjectivePolicy::TopDown => write!(f, "top-down"),
        }
    }
}

/// A spanning tree found by the solver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    /// Edges of the tree, as 0-indexed (u, v, cost) triplets with u < v
    edges: Vec<(usize, usize, Cost)>,
    /// Sum of the cost of the edges
    cost: Cost,
    /// Number of milliseconds, since the start of the search, at which the solution was found
    time_found: u128,
}

impl Solution {

    pub fn new(mut edges: Vec<(usize, usize, Cost)>, time_found: u128) -> Self {
        edges.sort_unstable();
        let cost = edges.iter().map(|e| e.2).sum();
        Self {
            edges,
            cost,
            time_found,
        }
    }

    pub fn cost(&self) -> Cost {
        self.cost
    }

    pub fn edges(&self) -> &[(usize, usize, Cost)] {
        &self.edges
    }

    pub fn time_found(&self) -> u128 {
        self.time_found
    }

    /// Returns the degree of each vertex of the tree, for a graph of n vertices
    pub fn degrees(&self, n: usize) -> Vec<usize> {
        let mut degrees = vec![0; n];
        for &(u, v, _) in self.edges.iter() {
            degrees[u] += 1;
            degrees[v] += 1;
        }
        degrees
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Tree of cost {} with {} edges found in {} ms", self.cost, self.edges.len(), self.time_found)
    }
}

/// Outcome of a run of the solver
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveResult {
    /// The tree is proven to be of minimum cost
    Optimal(Solution),
    /// The search space has been exhausted without finding any spanning tree satisfying the
    /// degree bounds
    ProvenInfeasible,
    /// A limit was reached before a proof could be done. Holds the best tree found, if any
    Inconclusive(Option<Solution>),
}

impl SolveResult {

    /// Returns the best tree known at the end of the run
    pub fn best(&self) -> Option<&Solution> {
        match self {
            SolveResult::Optimal(solution) => Some(solution),
            SolveResult::Inconclusive(best) => best.as_ref(),
            SolveResult::ProvenInfeasible => None,
        }
    }

    pub fn is_optimal(&self) -> bool {
        matches!(self, SolveResult::Optimal(_))
    }
}

impl fmt::Display for SolveResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SolveResult::Optimal(solution) => write!(f, "Optimal: {}", solution),
            SolveResult::ProvenInfeasible => write!(f, "Infeasible: no spanning tree satisfies the degree bounds"),
            SolveResult::Inconclusive(Some(solution)) => write!(f, "Inconclusive: best {}", solution),
            SolveResult::Inconclusive(None) => write!(f, "Inconclusive: no tree found within the limits"),
        }
    }
}

/// Events emitted by the search, in the order they happen
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SearchEvent {
    /// A tree strictly cheaper than the previous ones was found
    Solution { cost: Cost, elapsed_ms: u128 },
    /// The proven lower bound on the optimal cost increased
    LowerBound { lb: Cost },
}
