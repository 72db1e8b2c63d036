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

//! Propagator enforcing the degree bounds of the vertices. For each vertex v:
//!     - If v has as many mandatory edges as its maximum degree, all its undecided edges are
//!       excluded
//!     - If v has no possible edge left, it can not be spanned (wipeout)
//!     - If v has exactly one possible edge left, this edge is mandatory
//! The last two rules only apply when the graph has more than one vertex.

use search_trail::StateManager;

use crate::core::graph::{EdgeIndex, GraphDomain};
use super::{PropagationResult, Wipeout};

#[derive(Default)]
pub struct DegreePropagator {
    buffer: Vec<EdgeIndex>,
}

impl DegreePropagator {

    /// Removes the edges that can not be part of any spanning tree because of the degree
    /// bounds. With more than two vertices, an edge between two vertices of maximum degree 1
    /// would be a connected component on its own.
    pub fn init(&mut self, domain: &mut GraphDomain, state: &mut StateManager) -> PropagationResult {
        let n = domain.number_vertices();
        if n > 1 && domain.vertices_iter().any(|v| domain.max_degree(v) == 0) {
            return Err(Wipeout);
        }
        if n > 2 {
            self.buffer.clear();
            self.buffer.extend(domain.edges_iter().filter(|e| {
                let (u, v) = domain[*e].endpoints();
                domain.max_degree(u) == 1 && domain.max_degree(v) == 1
            }));
            for edge in self.buffer.iter().copied() {
                domain.exclude(edge, state)?;
            }
        }
        Ok(())
    }

    /// Applies the degree rules on every vertex. Returns true if the domain changed
    pub fn propagate(&mut self, domain: &mut GraphDomain, state: &mut StateManager) -> PropagationResult<bool> {
        if domain.number_vertices() <= 1 {
            return Ok(false);
        }
        let mut changed = false;
        for vertex in domain.vertices_iter() {
            let mandatory = domain.mandatory_degree(vertex, state);
            if mandatory > domain.max_degree(vertex) {
                return Err(Wipeout);
            }
            if mandatory == domain.max_degree(vertex) {
                self.buffer.clear();
                self.buffer.extend(domain.incident_undecided_iter(vertex, state));
                for edge in self.buffer.iter().copied() {
                    changed |= domain.exclude(edge, state)?;
                }
            }
            let possible = domain.possible_degree(vertex, state);
            if possible == 0 {
                return Err(Wipeout);
            }
            if possible == 1 && mandatory == 0 {
                let last = domain.incident_iter(vertex).find(|e| !domain[*e].is_excluded(state));
                match last {
                    Some(edge) => changed |= domain.force_mandatory(edge, state)?,
                    None => return Err(Wipeout),
                }
            }
        }
        Ok(changed)
    }
}
