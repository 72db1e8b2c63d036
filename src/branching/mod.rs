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

//! This module provides the branching heuristics of the solver. A branching decision is always
//! binary on an undecided edge: the edge is first forced in the tree, and then excluded from it.
//! The heuristic used depends on the phase of the search:
//!     - Before the first solution (`Phase::FindFirst`), the cheapest undecided edge is
//!       selected. This quickly builds a cheap tree, which is used to bound the rest of the
//!       search.
//!     - After the first solution (`Phase::Improve`), the solver selects the vertex with the
//!       smallest possible degree that still has undecided edges, and branches on its most
//!       expensive undecided edge. On top of that, the last edge whose decision failed is
//!       selected first as long as it is undecided (last-conflict).
//! The selection functions only depend on the phase and the domain.

use search_trail::StateManager;

use crate::core::graph::{EdgeIndex, GraphDomain};

mod last_conflict;

pub use last_conflict::LastConflict;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Phase {
    FindFirst,
    Improve,
}

/// Returns the cheapest undecided edge. Ties are broken by edge index
pub fn cheapest_edge(domain: &GraphDomain, state: &StateManager) -> Option<EdgeIndex> {
    domain.undecided_iter(state).min_by_key(|e| (domain[*e].cost(), *e))
}

/// Returns the most expensive undecided edge incident to the vertex with the smallest possible
/// degree (among the vertices with undecided edges)
pub fn min_degree_edge(domain: &GraphDomain, state: &StateManager) -> Option<EdgeIndex> {
    let mut best_vertex: Option<usize> = None;
    let mut best_degree = usize::MAX;
    for vertex in domain.vertices_iter() {
        let degree = domain.possible_degree(vertex, state);
        if degree < best_degree && domain.incident_undecided_iter(vertex, state).next().is_some() {
            best_degree = degree;
            best_vertex = Some(vertex);
        }
    }
    best_vertex.and_then(|vertex| {
        domain.incident_undecided_iter(vertex, state).max_by_key(|e| (domain[*e].cost(), std::cmp::Reverse(*e)))
    })
}

/// Edge selection, parametrized by the current phase of the search
pub struct EdgeSelector {
    phase: Phase,
    last_conflict: LastConflict,
}

impl Default for EdgeSelector {
    fn default() -> Self {
        Self {
            phase: Phase::FindFirst,
            last_conflict: LastConflict::default(),
        }
    }
}

impl EdgeSelector {

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns the edge on which to branch next, or None if all the edges are decided
    pub fn branch_on(&self, domain: &GraphDomain, state: &StateManager) -> Option<EdgeIndex> {
        match self.phase {
            Phase::FindFirst => cheapest_edge(domain, state),
            Phase::Improve => self.last_conflict.select(domain, state).or_else(|| min_degree_edge(domain, state)),
        }
    }

    /// Switches to the improvement heuristic
    pub fn on_solution(&mut self) {
        self.phase = Phase::Improve;
    }

    /// Records that a decision on the edge directly led to a wipeout
    pub fn on_failure(&mut self, edge: EdgeIndex) {
        if self.phase == Phase::Improve {
            self.last_conflict.on_failure(edge);
        }
    }
}

#[cfg(test)]
mod test_branching {

    use search_trail::StateManager;
    use crate::core::graph::{EdgeIndex, GraphDomain};
    use crate::branching::*;

    // Star centered on 0 (costs 3, 1, 2) plus (2, 3) of cost 5
    fn get_domain(state: &mut StateManager) -> GraphDomain {
        let mut domain = GraphDomain::new(&[3, 3, 3, 3], state);
        domain.add_possible(0, 1, 3, state).unwrap();
        domain.add_possible(0, 2, 1, state).unwrap();
        domain.add_possible(0, 3, 2, state).unwrap();
        domain.add_possible(2, 3, 5, state).unwrap();
        domain
    }

    #[test]
    pub fn cheapest_first() {
        let mut state = StateManager::default();
        let mut domain = get_domain(&mut state);
        assert_eq!(Some(EdgeIndex(1)), cheapest_edge(&domain, &state));
        domain.force_mandatory(EdgeIndex(1), &mut state).unwrap();
        assert_eq!(Some(EdgeIndex(2)), cheapest_edge(&domain, &state));
    }

    #[test]
    pub fn min_degree_vertex_most_expensive_edge() {
        let mut state = StateManager::default();
        let mut domain = get_domain(&mut state);
        // Vertex 1 has a single possible edge
        assert_eq!(Some(EdgeIndex(0)), min_degree_edge(&domain, &state));
        domain.force_mandatory(EdgeIndex(0), &mut state).unwrap();
        // Vertices 2 and 3 have degree 2, the most expensive edge of 2 is (2, 3)
        assert_eq!(Some(EdgeIndex(3)), min_degree_edge(&domain, &state));
    }

    #[test]
    pub fn no_undecided_edges() {
        let mut state = StateManager::default();
        let mut domain = GraphDomain::new(&[1, 1], &mut state);
        domain.add_possible(0, 1, 1, &mut state).unwrap();
        domain.force_mandatory(EdgeIndex(0), &mut state).unwrap();
        assert_eq!(None, cheapest_edge(&domain, &state));
        assert_eq!(None, min_degree_edge(&domain, &state));
    }

    #[test]
    pub fn phases_and_last_conflict() {
        let mut state = StateManager::default();
        let domain = get_domain(&mut state);
        let mut selector = EdgeSelector::default();
        assert_eq!(Phase::FindFirst, selector.phase());
        // Failures are not recorded before the first solution
        selector.on_failure(EdgeIndex(2));
        assert_eq!(Some(EdgeIndex(1)), selector.branch_on(&domain, &state));
        selector.on_solution();
        assert_eq!(Phase::Improve, selector.phase());
        assert_eq!(Some(EdgeIndex(0)), selector.branch_on(&domain, &state));
        selector.on_failure(EdgeIndex(2));
        assert_eq!(Some(EdgeIndex(2)), selector.branch_on(&domain, &state));
    }
}
