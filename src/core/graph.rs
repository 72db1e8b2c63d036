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

//! The graph domain is the variable of the problem. It represents the set of spanning trees
//! that are still reachable from the current search node by two sets of edges:
//!     - The mandatory edges (M), that must be in any solution of the sub-tree
//!     - The possible edges (P), that may be in a solution. M is always a subset of P.
//! An edge that is in P but not in M is said to be undecided. An edge removed from P is
//! excluded.
//!
//! All the search-time information (status of the edges, degrees of the vertices, counters)
//! is stored in reversible primitives of the search_trail crate, hence restoring the trail
//! restores the domain of the parent node exactly.
//!
//! The domain checks the invariants that can be verified locally when an edge is forced or
//! excluded (no mandatory cycle, degree bounds, connectivity of P). The global reasoning is
//! done by the propagators.

use rustc_hash::FxHashMap;
use search_trail::{BoolManager, ReversibleBool, ReversibleUsize, StateManager, UsizeManager};

use crate::common::Cost;
use crate::core::instance::{check_cost, Instance};
use crate::core::sparse_set::SparseSet;
use crate::error::InstanceError;
use crate::propagator::{PropagationResult, Wipeout};

/// Abstraction used as a typesafe way of retrieving an `Edge` in the `GraphDomain` structure
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct EdgeIndex(pub usize);

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum EdgeStatus {
    Undecided,
    Mandatory,
    Excluded,
}

/// Data structure that actually holds the data of an edge of the input graph
#[derive(Debug)]
pub struct Edge {
    /// Smallest endpoint
    u: usize,
    /// Largest endpoint
    v: usize,
    cost: Cost,
    mandatory: ReversibleBool,
    excluded: ReversibleBool,
}

impl Edge {

    pub fn endpoints(&self) -> (usize, usize) {
        (self.u, self.v)
    }

    pub fn cost(&self) -> Cost {
        self.cost
    }

    /// Returns the endpoint of the edge which is not `vertex`
    pub fn other(&self, vertex: usize) -> usize {
        if self.u == vertex { self.v } else { self.u }
    }

    pub fn is_mandatory(&self, state: &StateManager) -> bool {
        state.get_bool(self.mandatory)
    }

    pub fn is_excluded(&self, state: &StateManager) -> bool {
        state.get_bool(self.excluded)
    }

    pub fn status(&self, state: &StateManager) -> EdgeStatus {
        if self.is_mandatory(state) {
            EdgeStatus::Mandatory
        } else if self.is_excluded(state) {
            EdgeStatus::Excluded
        } else {
            EdgeStatus::Undecided
        }
    }
}

#[derive(Debug)]
struct Vertex {
    max_degree: usize,
    /// Number of mandatory edges incident to the vertex
    mandatory_degree: ReversibleUsize,
    /// Number of incident edges that are not excluded (mandatory ones included)
    possible_degree: ReversibleUsize,
    incident: Vec<EdgeIndex>,
}

#[derive(Debug)]
pub struct GraphDomain {
    edges: Vec<Edge>,
    vertices: Vec<Vertex>,
    /// Maps an unordered pair (u < v) to its edge
    pairs: FxHashMap<(usize, usize), EdgeIndex>,
    /// Edges that are neither mandatory nor excluded
    undecided: SparseSet,
    number_mandatory: ReversibleUsize,
    number_possible: ReversibleUsize,
    /// Lower bound on the cost of any solution of the current node
    lower_bound: ReversibleUsize,
    /// Scratch buffers for the graph traversals
    visited: Vec<bool>,
    queue: Vec<usize>,
}

impl GraphDomain {

    // --- DOMAIN CREATION --- //

    /// Creates a domain on `max_degrees.len()` vertices, without any edge
    pub fn new(max_degrees: &[usize], state: &mut StateManager) -> Self {
        let vertices = max_degrees.iter().copied().map(|max_degree| Vertex {
            max_degree,
            mandatory_degree: state.manage_usize(0),
            possible_degree: state.manage_usize(0),
            incident: vec![],
        }).collect::<Vec<Vertex>>();
        let n = vertices.len();
        Self {
            edges: vec![],
            vertices,
            pairs: FxHashMap::default(),
            undecided: SparseSet::new(0, state),
            number_mandatory: state.manage_usize(0),
            number_possible: state.manage_usize(0),
            lower_bound: state.manage_usize(0),
            visited: vec![false; n],
            queue: Vec::with_capacity(n),
        }
    }

    /// Creates the domain in which every edge of the instance is possible and none is mandatory.
    /// The instance already rejected the invalid edges.
    pub fn from_instance(instance: &Instance, state: &mut StateManager) -> Self {
        let mut domain = Self::new(instance.max_degrees(), state);
        for edge in instance.edges_iter() {
            domain.push_edge((edge.from, edge.to), edge.cost, state);
        }
        domain
    }

    /// Registers the edge (u, v) as possible. This can only be done before the search starts
    pub fn add_possible(&mut self, u: usize, v: usize, cost: Cost, state: &mut StateManager) -> Result<EdgeIndex, InstanceError> {
        let n = self.number_vertices();
        if u >= n || v >= n {
            return Err(InstanceError::VertexOutOfRange { vertex: u.max(v) + 1, number_vertices: n });
        }
        if u == v {
            return Err(InstanceError::SelfLoop { vertex: u + 1 });
        }
        check_cost(n, u, v, cost)?;
        let pair = (u.min(v), u.max(v));
        if self.pairs.contains_key(&pair) {
            return Err(InstanceError::DuplicateEdge { from: pair.0 + 1, to: pair.1 + 1 });
        }
        Ok(self.push_edge(pair, cost, state))
    }

    fn push_edge(&mut self, pair: (usize, usize), cost: Cost, state: &mut StateManager) -> EdgeIndex {
        let edge = EdgeIndex(self.undecided.push(state));
        debug_assert_eq!(edge.0, self.edges.len());
        self.edges.push(Edge {
            u: pair.0,
            v: pair.1,
            cost,
            mandatory: state.manage_bool(false),
            excluded: state.manage_bool(false),
        });
        self.pairs.insert(pair, edge);
        for w in [pair.0, pair.1] {
            self.vertices[w].incident.push(edge);
            state.increment_usize(self.vertices[w].possible_degree);
        }
        state.increment_usize(self.number_possible);
        edge
    }

    // --- DOMAIN NARROWING --- //

    /// Forces the edge to be in the tree. Returns true if the domain changed.
    /// Fails if the edge is excluded, if it closes a cycle of mandatory edges or if one of its
    /// endpoint already has its maximum number of mandatory edges.
    pub fn force_mandatory(&mut self, edge: EdgeIndex, state: &mut StateManager) -> PropagationResult<bool> {
        match self[edge].status(state) {
            EdgeStatus::Mandatory => return Ok(false),
            EdgeStatus::Excluded => return Err(Wipeout),
            EdgeStatus::Undecided => {},
        };
        let (u, v) = self[edge].endpoints();
        if self.mandatory_degree(u, state) >= self.max_degree(u) || self.mandatory_degree(v, state) >= self.max_degree(v) {
            return Err(Wipeout);
        }
        if self.reachable(u, v, true, state) {
            return Err(Wipeout);
        }
        state.set_bool(self.edges[edge.0].mandatory, true);
        self.undecided.remove(edge.0, state);
        state.increment_usize(self.vertices[u].mandatory_degree);
        state.increment_usize(self.vertices[v].mandatory_degree);
        state.increment_usize(self.number_mandatory);
        Ok(true)
    }

    /// Removes the edge from the possible edges. Returns true if the domain changed.
    /// Fails if the edge is mandatory, if there are not enough possible edges left to span the
    /// graph, or if its endpoints are not connected anymore by the possible edges.
    pub fn exclude(&mut self, edge: EdgeIndex, state: &mut StateManager) -> PropagationResult<bool> {
        if !self.remove_possible(edge, state)? {
            return Ok(false);
        }
        let (u, v) = self[edge].endpoints();
        if !self.reachable(u, v, false, state) {
            return Err(Wipeout);
        }
        Ok(true)
    }

    /// Removes the edge from the possible edges without checking the connectivity of the
    /// possible graph. The caller must ensure that a spanning tree of the possible edges not
    /// using `edge` exists.
    pub(crate) fn remove_possible(&mut self, edge: EdgeIndex, state: &mut StateManager) -> PropagationResult<bool> {
        match self[edge].status(state) {
            EdgeStatus::Excluded => return Ok(false),
            EdgeStatus::Mandatory => return Err(Wipeout),
            EdgeStatus::Undecided => {},
        };
        let (u, v) = self[edge].endpoints();
        state.set_bool(self.edges[edge.0].excluded, true);
        self.undecided.remove(edge.0, state);
        state.decrement_usize(self.vertices[u].possible_degree);
        state.decrement_usize(self.vertices[v].possible_degree);
        state.decrement_usize(self.number_possible);
        if self.number_possible(state) + 1 < self.number_vertices() {
            return Err(Wipeout);
        }
        Ok(true)
    }

    /// Raises the lower bound of the node. Lower values are ignored.
    pub fn raise_lower_bound(&mut self, lb: Cost, state: &mut StateManager) {
        if lb > self.lower_bound(state) {
            state.set_usize(self.lower_bound, lb);
        }
    }

    /// Returns true iff `target` can be reached from `source` using only mandatory edges
    /// (`mandatory_only`) or only non-excluded edges.
    fn reachable(&mut self, source: usize, target: usize, mandatory_only: bool, state: &StateManager) -> bool {
        if source == target {
            return true;
        }
        self.visited.fill(false);
        self.queue.clear();
        self.visited[source] = true;
        self.queue.push(source);
        let mut found = false;
        while let Some(x) = self.queue.pop() {
            for edge in self.vertices[x].incident.iter().copied() {
                let e = &self.edges[edge.0];
                let usable = if mandatory_only { e.is_mandatory(state) } else { !e.is_excluded(state) };
                if !usable {
                    continue;
                }
                let y = e.other(x);
                if y == target {
                    found = true;
                    break;
                }
                if !self.visited[y] {
                    self.visited[y] = true;
                    self.queue.push(y);
                }
            }
            if found {
                break;
            }
        }
        found
    }

    // --- QUERIES --- //

    pub fn number_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn number_edges(&self) -> usize {
        self.edges.len()
    }

    /// Returns true iff the mandatory edges form a spanning tree
    pub fn is_solution(&self, state: &StateManager) -> bool {
        self.number_mandatory(state) + 1 == self.number_vertices()
    }

    pub fn number_mandatory(&self, state: &StateManager) -> usize {
        state.get_usize(self.number_mandatory)
    }

    pub fn number_possible(&self, state: &StateManager) -> usize {
        state.get_usize(self.number_possible)
    }

    pub fn number_undecided(&self, state: &StateManager) -> usize {
        self.undecided.len(state)
    }

    pub fn lower_bound(&self, state: &StateManager) -> Cost {
        state.get_usize(self.lower_bound)
    }

    pub fn max_degree(&self, vertex: usize) -> usize {
        self.vertices[vertex].max_degree
    }

    pub fn mandatory_degree(&self, vertex: usize, state: &StateManager) -> usize {
        state.get_usize(self.vertices[vertex].mandatory_degree)
    }

    pub fn possible_degree(&self, vertex: usize, state: &StateManager) -> usize {
        state.get_usize(self.vertices[vertex].possible_degree)
    }

    pub fn edge_between(&self, u: usize, v: usize) -> Option<EdgeIndex> {
        self.pairs.get(&(u.min(v), u.max(v))).copied()
    }

    /// Sum of the costs of the mandatory edges
    pub fn mandatory_cost(&self, state: &StateManager) -> Cost {
        self.mandatory_iter(state).map(|e| self[e].cost()).sum()
    }

    /// Returns the mandatory edges as (u, v, cost) triplets
    pub fn mandatory_edges(&self, state: &StateManager) -> Vec<(usize, usize, Cost)> {
        self.mandatory_iter(state).map(|e| {
            let (u, v) = self[e].endpoints();
            (u, v, self[e].cost())
        }).collect()
    }

    // --- ITERATORS --- //

    pub fn edges_iter(&self) -> impl Iterator<Item = EdgeIndex> + use<> {
        (0..self.edges.len()).map(EdgeIndex)
    }

    pub fn vertices_iter(&self) -> std::ops::Range<usize> {
        0..self.vertices.len()
    }

    pub fn undecided_iter<'a>(&'a self, state: &'a StateManager) -> impl Iterator<Item = EdgeIndex> + 'a {
        self.undecided.iter(state).map(EdgeIndex)
    }

    pub fn mandatory_iter<'a>(&'a self, state: &'a StateManager) -> impl Iterator<Item = EdgeIndex> + 'a {
        self.edges_iter().filter(move |e| self[*e].is_mandatory(state))
    }

    /// Iterates over the edges incident to `vertex`, whatever their status
    pub fn incident_iter(&self, vertex: usize) -> impl Iterator<Item = EdgeIndex> + '_ {
        self.vertices[vertex].incident.iter().copied()
    }

    /// Iterates over the undecided edges incident to `vertex`
    pub fn incident_undecided_iter<'a>(&'a self, vertex: usize, state: &'a StateManager) -> impl Iterator<Item = EdgeIndex> + 'a {
        self.incident_iter(vertex).filter(move |e| self.undecided.contains(e.0, state))
    }
}

// --- Indexing the domain with the edge indexes --- //

impl std::ops::Index<EdgeIndex> for GraphDomain {
    type Output = Edge;

    fn index(&self, index: EdgeIndex) -> &Self::Output {
        &self.edges[index.0]
    }
}
