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

//! This module provides the main structure of the solver. It is responsible for orchestring
//! all the different parts and glue them together.
//! The algorithm starts by doing an initial propagation of the domain built from the instance,
//! and then explores the search tree recursively. At each node, the edge selector gives the
//! edge on which to branch; the edge is first forced in the tree, then excluded from it. Each
//! decision is propagated to its fixpoint and a wipeout simply closes the branch. The state of
//! the reversible domain is saved before each decision and restored after it.
//!
//! The cost of the tree is bounded according to the objective policy:
//!     - Bottom-up: the search looks for a tree whose cost equals the proven lower bound. When
//!       the search space is exhausted, the lower bound is raised to the smallest cost pruned
//!       during that search. If nothing was pruned because of its cost, no tree exists at all.
//!     - Top-down: each tree found sets the upper bound to its cost minus one, the last tree
//!       found is optimal once the search space is exhausted.
//! The search also stops when the time limit or the solution limit is reached.
//!
//! Events (new trees, raised lower bounds) are handed to the listener of the solver as soon as
//! they are drained, and are also kept in the final report.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use log::{debug, info, trace};
use search_trail::{SaveAndRestore, StateManager};

use crate::branching::{EdgeSelector, Phase};
use crate::common::*;
use crate::core::graph::GraphDomain;
use crate::core::instance::Instance;
use crate::parameters::SolverParameters;
use crate::propagator::{CostBound, Decision, Propagator, Wipeout};
use crate::statistics::{Counters, Statistics};

/// Reasons for which the exploration stops before exhausting the search space
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Stop {
    /// A tree whose cost equals the proven lower bound was found
    Optimal,
    Timeout,
    SolutionLimit,
}

type SearchResult = Result<(), Stop>;

/// Everything known at the end of a run
#[derive(Debug, Clone)]
pub struct SolveReport {
    pub result: SolveResult,
    /// Events emitted during the search, in chronological order
    pub events: Vec<SearchEvent>,
    pub statistics: Counters,
    /// True iff the search space was exhausted (or optimality proven)
    pub exhausted: bool,
    pub elapsed: Duration,
}

/// The branch-and-bound solver. It has a constant parameter that tells if statistics must be
/// recorded or not.
pub struct Solver<'a, const S: bool> {
    /// Graph variable of the problem
    domain: GraphDomain,
    /// State manager that allows to retrieve previous values when backtracking in the search tree
    state: StateManager,
    propagator: Propagator,
    /// Upper bound on the cost of the trees searched
    bound: CostBound,
    /// Heuristic that decides on which edge to branch next
    selector: EdgeSelector,
    /// Statistics collectors
    statistics: Statistics<S>,
    parameters: SolverParameters,
    deadline: Option<Instant>,
    /// No tree has a cost lower than this bound
    proven_lb: Cost,
    best: Option<Solution>,
    number_solutions: usize,
    /// Events not yet handled by the driver
    pending: VecDeque<SearchEvent>,
    events: Vec<SearchEvent>,
    /// Called on each event, in chronological order, while the search runs
    listener: Box<dyn FnMut(&SearchEvent) + 'a>,
}

impl<'a, const S: bool> Solver<'a, S> {

    pub fn new(instance: &Instance, parameters: SolverParameters) -> Self {
        let mut state = StateManager::default();
        let domain = GraphDomain::from_instance(instance, &mut state);
        let propagator = Propagator::new(&domain);
        let (lb, ub) = instance.cost_bounds();
        let deadline = parameters.deadline();
        Self {
            domain,
            state,
            propagator,
            bound: CostBound::new(ub),
            selector: EdgeSelector::default(),
            statistics: Statistics::default(),
            parameters,
            deadline,
            proven_lb: lb,
            best: None,
            number_solutions: 0,
            pending: VecDeque::new(),
            events: vec![],
            listener: Box::new(|_: &SearchEvent| {}),
        }
    }

    /// Sets the function called on each event of the search
    pub fn with_listener<F: FnMut(&SearchEvent) + 'a>(mut self, listener: F) -> Self {
        self.listener = Box::new(listener);
        self
    }

    fn is_timed_out(&self) -> bool {
        self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }

    /// Handles the pending events
    fn drain_events(&mut self) {
        while let Some(event) = self.pending.pop_front() {
            match event {
                SearchEvent::Solution { cost, elapsed_ms } => info!("Solution of cost {} found after {} ms", cost, elapsed_ms),
                SearchEvent::LowerBound { lb } => info!("Lower bound raised to {}", lb),
            }
            (self.listener)(&event);
            self.events.push(event);
        }
    }

    fn raise_proven_lb(&mut self, lb: Cost) {
        if lb > self.proven_lb {
            self.proven_lb = lb;
            self.pending.push_back(SearchEvent::LowerBound { lb });
        }
    }

    /// Solves the instance and returns the report of the run
    pub fn solve(mut self) -> SolveReport {
        info!("Solving an instance with {} vertices and {} edges, {} policy, bounds [{}, {}]",
            self.domain.number_vertices(),
            self.domain.number_edges(),
            self.parameters.policy(),
            self.proven_lb,
            self.bound.upper());
        let outcome = match self.root_propagation() {
            Err(Wipeout) => {
                debug!("The root propagation failed");
                self.statistics.failure();
                Ok(())
            },
            Ok(()) => match self.parameters.policy() {
                ObjectivePolicy::BottomUp => self.bottom_up(),
                ObjectivePolicy::TopDown => self.top_down(),
            },
        };
        self.drain_events();

        let result = match (outcome, self.best.take()) {
            (Ok(()), None) => SolveResult::ProvenInfeasible,
            (Ok(()), Some(best)) | (Err(Stop::Optimal), Some(best)) => SolveResult::Optimal(best),
            (Err(Stop::SolutionLimit), Some(best)) if best.cost() <= self.proven_lb => SolveResult::Optimal(best),
            (Err(_), best) => SolveResult::Inconclusive(best),
        };
        let exhausted = matches!(outcome, Ok(()) | Err(Stop::Optimal));
        info!("{}", result);
        self.statistics.finish(self.propagator.rounds());
        self.statistics.print();
        SolveReport {
            result,
            events: self.events,
            statistics: self.statistics.counters().clone(),
            exhausted,
            elapsed: self.parameters.start().elapsed(),
        }
    }

    fn root_propagation(&mut self) -> Result<(), Wipeout> {
        self.propagator.init(&mut self.domain, &mut self.state, &mut self.bound)?;
        debug!("Root propagation: {} mandatory edges, {} undecided edges, lower bound {}",
            self.domain.number_mandatory(&self.state),
            self.domain.number_undecided(&self.state),
            self.domain.lower_bound(&self.state));
        self.pending.push_back(SearchEvent::LowerBound { lb: self.proven_lb });
        let lb = self.domain.lower_bound(&self.state);
        self.raise_proven_lb(lb);
        self.drain_events();
        Ok(())
    }

    fn bottom_up(&mut self) -> SearchResult {
        loop {
            if self.is_timed_out() {
                return Err(Stop::Timeout);
            }
            self.bound.reset(self.proven_lb);
            debug!("Searching for a tree of cost {}", self.proven_lb);
            self.search_window()?;
            match self.bound.lowest_pruned() {
                None => return Ok(()),
                Some(lb) => self.raise_proven_lb(lb),
            };
            self.drain_events();
        }
    }

    fn top_down(&mut self) -> SearchResult {
        self.search_window()?;
        if let Some(cost) = self.best.as_ref().map(|best| best.cost()) {
            self.raise_proven_lb(cost);
        }
        Ok(())
    }

    /// Explores the whole search space, with the current cost bound
    fn search_window(&mut self) -> SearchResult {
        self.statistics.window();
        self.state.save_state();
        let result = match self.propagator.propagate(&mut self.domain, &mut self.state, &mut self.bound) {
            Ok(()) => self.explore(0),
            Err(Wipeout) => {
                self.statistics.failure();
                Ok(())
            },
        };
        self.state.restore_state();
        result
    }

    fn explore(&mut self, depth: usize) -> SearchResult {
        self.statistics.node(depth);
        if self.is_timed_out() {
            return Err(Stop::Timeout);
        }
        if self.domain.is_solution(&self.state) {
            return self.on_solution();
        }
        let edge = match self.selector.branch_on(&self.domain, &self.state) {
            Some(edge) => edge,
            None => return Ok(()),
        };
        trace!("Branching on edge {:?} at depth {}", self.domain[edge].endpoints(), depth);
        for decision in [Decision::Force(edge), Decision::Exclude(edge)] {
            self.state.save_state();
            let result = match self.propagator.apply(decision, &mut self.domain, &mut self.state, &mut self.bound) {
                Ok(()) => {
                    self.drain_events();
                    self.explore(depth + 1)
                },
                Err(Wipeout) => {
                    self.statistics.failure();
                    self.selector.on_failure(decision.edge());
                    Ok(())
                },
            };
            self.state.restore_state();
            result?;
        }
        Ok(())
    }

    /// Records the tree formed by the mandatory edges and tightens the bound
    fn on_solution(&mut self) -> SearchResult {
        let elapsed_ms = self.parameters.start().elapsed().as_millis();
        let solution = Solution::new(self.domain.mandatory_edges(&self.state), elapsed_ms);
        let cost = solution.cost();
        self.statistics.solution();
        self.number_solutions += 1;
        if self.selector.phase() == Phase::FindFirst {
            debug!("First solution found, switching to the improvement heuristic");
        }
        self.selector.on_solution();
        self.pending.push_back(SearchEvent::Solution { cost, elapsed_ms });
        self.best = Some(solution);
        self.drain_events();
        if cost <= self.proven_lb {
            return Err(Stop::Optimal);
        }
        let limit = self.parameters.solution_limit();
        if limit > 0 && self.number_solutions >= limit {
            return Err(Stop::SolutionLimit);
        }
        self.bound.tighten(cost - 1);
        Ok(())
    }
}
