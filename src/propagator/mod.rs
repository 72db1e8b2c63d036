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

//! This module gives the implementation of the propagation used during the search.
//! It is called once at the creation of the solver, to do an initial propagation, and then
//! after every branching decision.
//! The propagation runs two propagators until none of them changes the domain (fixpoint):
//!     - The degree propagator, which enforces the maximum degree of each vertex and its
//!       connection to the tree
//!     - The spanning tree propagator, which maintains a minimum spanning tree relaxation of
//!       the domain, bounds its cost and filters the edges using the reduced costs of the
//!       relaxation
//! Any inconsistency raises a `Wipeout` and ends the propagation immediately. The domain is
//! then left in an unspecified state and the search must restore the trail.

pub mod dcmst;
pub mod degree;

use search_trail::StateManager;

use crate::common::Cost;
use crate::core::graph::{EdgeIndex, GraphDomain};
use dcmst::SpanningTreeCostPropagator;
use degree::DegreePropagator;

/// The domain does not contain any solution anymore
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Wipeout;

pub type PropagationResult<T = ()> = Result<T, Wipeout>;

/// A branching decision on an edge
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Decision {
    Force(EdgeIndex),
    Exclude(EdgeIndex),
}

impl Decision {
    pub fn edge(&self) -> EdgeIndex {
        match self {
            Decision::Force(edge) | Decision::Exclude(edge) => *edge,
        }
    }
}

/// Upper bound on the cost of the trees searched in the current node. It also records the
/// smallest bound that was used to prune a part of the search space: no tree has been removed
/// by the cost reasoning if its cost was lower than this value.
#[derive(Debug, Clone)]
pub struct CostBound {
    upper: Cost,
    lowest_pruned: Option<Cost>,
}

impl CostBound {

    pub fn new(upper: Cost) -> Self {
        Self {
            upper,
            lowest_pruned: None,
        }
    }

    pub fn upper(&self) -> Cost {
        self.upper
    }

    /// Lowers the upper bound. Higher values are ignored
    pub fn tighten(&mut self, upper: Cost) {
        self.upper = self.upper.min(upper);
    }

    /// Replaces the upper bound, for a new search window
    pub fn reset(&mut self, upper: Cost) {
        self.upper = upper;
        self.lowest_pruned = None;
    }

    /// Records that trees of cost at least `bound` (with `bound > upper`) have been pruned
    pub fn pruned(&mut self, bound: Cost) {
        debug_assert!(bound > self.upper);
        self.lowest_pruned = Some(self.lowest_pruned.map_or(bound, |b| b.min(bound)));
    }

    pub fn lowest_pruned(&self) -> Option<Cost> {
        self.lowest_pruned
    }
}

pub struct Propagator {
    degree: DegreePropagator,
    spanning_tree: SpanningTreeCostPropagator,
    /// Number of fixpoint iterations done so far
    rounds: usize,
}

impl Propagator {

    pub fn new(domain: &GraphDomain) -> Self {
        Self {
            degree: DegreePropagator::default(),
            spanning_tree: SpanningTreeCostPropagator::new(domain),
            rounds: 0,
        }
    }

    /// Root propagation. Removes the edges that can never be used because of the degree bounds
    /// and runs the propagators until the fixpoint.
    pub fn init(&mut self, domain: &mut GraphDomain, state: &mut StateManager, bound: &mut CostBound) -> PropagationResult {
        self.degree.init(domain, state)?;
        self.propagate(domain, state, bound)
    }

    /// Applies the decision on the domain and propagates it
    pub fn apply(&mut self, decision: Decision, domain: &mut GraphDomain, state: &mut StateManager, bound: &mut CostBound) -> PropagationResult {
        match decision {
            Decision::Force(edge) => domain.force_mandatory(edge, state)?,
            Decision::Exclude(edge) => domain.exclude(edge, state)?,
        };
        self.propagate(domain, state, bound)
    }

    /// Runs the propagators until none of them changes the domain
    pub fn propagate(&mut self, domain: &mut GraphDomain, state: &mut StateManager, bound: &mut CostBound) -> PropagationResult {
        loop {
            self.rounds += 1;
            let mut changed = self.degree.propagate(domain, state)?;
            changed |= self.spanning_tree.propagate(domain, state, bound)?;
            if !changed {
                return Ok(());
            }
        }
    }

    pub fn rounds(&self) -> usize {
        self.rounds
    }
}

#[cfg(test)]
mod test_propagator {

    use search_trail::{SaveAndRestore, StateManager};
    use crate::core::graph::{EdgeIndex, EdgeStatus, GraphDomain};
    use crate::propagator::*;

    #[test]
    pub fn cost_bound_records_lowest_pruning() {
        let mut bound = CostBound::new(10);
        assert_eq!(None, bound.lowest_pruned());
        bound.pruned(14);
        bound.pruned(12);
        bound.pruned(13);
        assert_eq!(Some(12), bound.lowest_pruned());
        bound.tighten(11);
        bound.tighten(20);
        assert_eq!(10, bound.upper());
        bound.reset(12);
        assert_eq!(12, bound.upper());
        assert_eq!(None, bound.lowest_pruned());
    }

    #[test]
    pub fn triangle_root_propagation() {
        // 0 -1- 1, 0 -2- 2, 1 -3- 2 with an upper bound of 3: the edge (1, 2) would give a
        // tree of cost at least 4
        let mut state = StateManager::default();
        let mut domain = GraphDomain::new(&[2, 2, 2], &mut state);
        domain.add_possible(0, 1, 1, &mut state).unwrap();
        domain.add_possible(0, 2, 2, &mut state).unwrap();
        domain.add_possible(1, 2, 3, &mut state).unwrap();
        let mut propagator = Propagator::new(&domain);
        let mut bound = CostBound::new(3);
        propagator.init(&mut domain, &mut state, &mut bound).unwrap();
        assert!(domain.is_solution(&state));
        assert_eq!(EdgeStatus::Excluded, domain[EdgeIndex(2)].status(&state));
        assert_eq!(3, domain.lower_bound(&state));
        assert_eq!(Some(4), bound.lowest_pruned());
    }

    #[test]
    pub fn decisions_are_propagated_and_restored() {
        // A square 0-1-2-3-0 with unit costs
        let mut state = StateManager::default();
        let mut domain = GraphDomain::new(&[2, 2, 2, 2], &mut state);
        for (u, v) in [(0, 1), (1, 2), (2, 3), (0, 3)] {
            domain.add_possible(u, v, 1, &mut state).unwrap();
        }
        let mut propagator = Propagator::new(&domain);
        let mut bound = CostBound::new(100);
        propagator.init(&mut domain, &mut state, &mut bound).unwrap();
        assert_eq!(4, domain.number_undecided(&state));

        state.save_state();
        propagator.apply(Decision::Exclude(EdgeIndex(0)), &mut domain, &mut state, &mut bound).unwrap();
        // Every other edge became a bridge
        assert!(domain.is_solution(&state));
        assert_eq!(3, domain.mandatory_cost(&state));
        state.restore_state();

        assert_eq!(4, domain.number_undecided(&state));
        assert_eq!(0, domain.number_mandatory(&state));
        assert!(propagator.rounds() > 0);
    }

    #[test]
    pub fn upper_bound_below_relaxation_is_a_wipeout() {
        let mut state = StateManager::default();
        let mut domain = GraphDomain::new(&[2, 2], &mut state);
        domain.add_possible(0, 1, 5, &mut state).unwrap();
        let mut propagator = Propagator::new(&domain);
        let mut bound = CostBound::new(4);
        assert_eq!(Err(Wipeout), propagator.init(&mut domain, &mut state, &mut bound));
        assert_eq!(Some(5), bound.lowest_pruned());
    }
}
