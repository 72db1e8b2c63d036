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

//! An instance of the degree-constrained minimum spanning tree problem. It only holds the
//! input data (vertices, weighted edges and degree bounds) and is independent of any search
//! state. The `GraphDomain` used during the search is built from it.

use rustc_hash::FxHashSet;

use crate::common::Cost;
use crate::error::InstanceError;

/// Checks that `cost` times the number of vertices fits in a `Cost`. The bounds computed during
/// the search never exceed this product, at most n-1 tree edges plus one candidate edge.
pub(crate) fn check_cost(number_vertices: usize, from: usize, to: usize, cost: Cost) -> Result<(), InstanceError> {
    match cost.checked_mul(number_vertices.max(1)) {
        Some(_) => Ok(()),
        None => Err(InstanceError::CostOverflow { from: from + 1, to: to + 1, cost: i64::try_from(cost).unwrap_or(i64::MAX) }),
    }
}

/// An undirected, weighted edge of the input graph. Endpoints are 0-indexed and stored such
/// that `from < to`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct WeightedEdge {
    pub from: usize,
    pub to: usize,
    pub cost: Cost,
}

#[derive(Debug, Clone)]
pub struct Instance {
    /// Number of vertices in the graph
    number_vertices: usize,
    /// Edges of the graph, in insertion order
    edges: Vec<WeightedEdge>,
    /// Maximum degree of each vertex in the spanning tree
    max_degrees: Vec<usize>,
    /// Unordered pairs already defined
    pairs: FxHashSet<(usize, usize)>,
}

impl Instance {

    /// Creates an instance with `number_vertices` vertices, no edges, and no degree restriction
    pub fn new(number_vertices: usize) -> Self {
        Self {
            number_vertices,
            edges: vec![],
            max_degrees: vec![usize::MAX; number_vertices],
            pairs: FxHashSet::default(),
        }
    }

    /// Adds the undirected edge (from, to) with the given cost. A pair can only be defined once,
    /// whatever the orientation, and the cost must be small enough for the sum of n costs to
    /// fit in a `Cost`.
    pub fn add_edge(&mut self, from: usize, to: usize, cost: Cost) -> Result<(), InstanceError> {
        if from >= self.number_vertices || to >= self.number_vertices {
            return Err(InstanceError::VertexOutOfRange { vertex: from.max(to) + 1, number_vertices: self.number_vertices });
        }
        if from == to {
            return Err(InstanceError::SelfLoop { vertex: from + 1 });
        }
        check_cost(self.number_vertices, from, to, cost)?;
        let pair = (from.min(to), from.max(to));
        if !self.pairs.insert(pair) {
            return Err(InstanceError::DuplicateEdge { from: pair.0 + 1, to: pair.1 + 1 });
        }
        self.edges.push(WeightedEdge { from: pair.0, to: pair.1, cost });
        Ok(())
    }

    /// Sets the maximum degree of the given vertex
    pub fn set_max_degree(&mut self, vertex: usize, max_degree: usize) -> Result<(), InstanceError> {
        if vertex >= self.number_vertices {
            return Err(InstanceError::VertexOutOfRange { vertex: vertex + 1, number_vertices: self.number_vertices });
        }
        self.max_degrees[vertex] = max_degree;
        Ok(())
    }

    pub fn number_vertices(&self) -> usize {
        self.number_vertices
    }

    pub fn number_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn edges_iter(&self) -> impl Iterator<Item = WeightedEdge> + '_ {
        self.edges.iter().copied()
    }

    pub fn max_degree(&self, vertex: usize) -> usize {
        self.max_degrees[vertex]
    }

    pub fn max_degrees(&self) -> &[usize] {
        &self.max_degrees
    }

    /// Returns the cost of the edge between u and v, if any
    pub fn cost(&self, u: usize, v: usize) -> Option<Cost> {
        let pair = (u.min(v), u.max(v));
        self.edges.iter().find(|e| (e.from, e.to) == pair).map(|e| e.cost)
    }

    /// Returns the a-priori bounds on the cost of any spanning tree: (n-1) times the cheapest,
    /// respectively the most expensive, edge of the graph.
    pub fn cost_bounds(&self) -> (Cost, Cost) {
        let span = self.number_vertices.saturating_sub(1);
        let min = self.edges.iter().map(|e| e.cost).min().unwrap_or(0);
        let max = self.edges.iter().map(|e| e.cost).max().unwrap_or(0);
        (span * min, span * max)
    }
}
