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

//! Propagator for the degree-constrained minimum spanning tree constraint, without the degree
//! part (which is handled by the degree propagator).
//!
//! At each call, a minimum spanning tree T containing all the mandatory edges and only
//! possible edges is computed with Kruskal's algorithm. Its cost is a lower bound (lb) on the
//! cost of any solution of the node since it relaxes the degree bounds. If T does not exist,
//! the possible edges do not span the graph. If lb > ub, the node can not contain an
//! improving solution.
//!
//! Then the edges are filtered with the reduced costs of T:
//!     - For an undecided edge f = (a, b) not in T, the cheapest tree containing f is obtained
//!       by replacing the most expensive non-mandatory edge on the path from a to b in T. If
//!       there is no such edge, f would close a cycle of mandatory edges. Otherwise, if
//!       lb + c(f) - c(max) > ub, f is excluded.
//!     - For an undecided edge e in T, the cheapest tree without e replaces it by the cheapest
//!       possible edge whose tree path goes through e. If there is none, e is a bridge of the
//!       possible graph and is mandatory. Otherwise, if lb - c(e) + c(replacement) > ub, e is
//!       mandatory.
//! The replacement edges are computed for all the tree edges at once by processing the
//! non-tree edges by increasing cost and marking the unmarked tree edges on their path,
//! skipping the already marked ones with a path-compressed jump pointer.

use search_trail::StateManager;

use crate::common::Cost;
use crate::core::graph::{EdgeIndex, GraphDomain};
use crate::core::union_find::UnionFind;
use super::{CostBound, PropagationResult, Wipeout};

pub struct SpanningTreeCostPropagator {
    /// All the edges, sorted by increasing cost
    sorted: Vec<EdgeIndex>,
    union_find: UnionFind,
    /// Edges of the current minimum spanning tree
    tree: Vec<EdgeIndex>,
    in_tree: Vec<bool>,
    tree_adjacency: Vec<Vec<EdgeIndex>>,
    /// Parent of each vertex when the tree is rooted on vertex 0, and the edge leading to it
    parent: Vec<usize>,
    parent_edge: Vec<Option<EdgeIndex>>,
    depth: Vec<usize>,
    /// Highest ancestor of each vertex reachable through already replaced tree edges
    jump: Vec<usize>,
    /// Cost of the cheapest replacement of each tree edge
    replacement: Vec<Option<Cost>>,
    queue: Vec<usize>,
    buffer: Vec<EdgeIndex>,
}

impl SpanningTreeCostPropagator {

    pub fn new(domain: &GraphDomain) -> Self {
        let n = domain.number_vertices();
        let m = domain.number_edges();
        let mut sorted = domain.edges_iter().collect::<Vec<EdgeIndex>>();
        sorted.sort_by_key(|e| (domain[*e].cost(), *e));
        Self {
            sorted,
            union_find: UnionFind::new(n),
            tree: Vec::with_capacity(n),
            in_tree: vec![false; m],
            tree_adjacency: vec![vec![]; n],
            parent: vec![0; n],
            parent_edge: vec![None; n],
            depth: vec![0; n],
            jump: vec![0; n],
            replacement: vec![None; m],
            queue: Vec::with_capacity(n),
            buffer: vec![],
        }
    }

    /// Propagates the constraint. Returns true if the domain changed
    pub fn propagate(&mut self, domain: &mut GraphDomain, state: &mut StateManager, bound: &mut CostBound) -> PropagationResult<bool> {
        if domain.number_vertices() == 0 {
            return Ok(false);
        }
        let lb = self.compute_tree(domain, state)?;
        domain.raise_lower_bound(lb, state);
        if domain.lower_bound(state) > bound.upper() {
            bound.pruned(domain.lower_bound(state));
            return Err(Wipeout);
        }
        self.root_tree(domain);
        let mut changed = self.force_tree_edges(domain, state, bound, lb)?;
        changed |= self.remove_non_tree_edges(domain, state, bound, lb)?;
        Ok(changed)
    }

    /// Kruskal's algorithm, taking the mandatory edges first. Returns the cost of the tree.
    fn compute_tree(&mut self, domain: &GraphDomain, state: &StateManager) -> PropagationResult<Cost> {
        self.union_find.reset();
        for edge in self.tree.drain(..) {
            self.in_tree[edge.0] = false;
        }
        let mut cost = 0;
        for edge in domain.mandatory_iter(state) {
            let (u, v) = domain[edge].endpoints();
            if !self.union_find.union(u, v) {
                return Err(Wipeout);
            }
            self.tree.push(edge);
            self.in_tree[edge.0] = true;
            cost += domain[edge].cost();
        }
        for edge in self.sorted.iter().copied() {
            if self.union_find.number_sets() == 1 {
                break;
            }
            if domain[edge].is_excluded(state) || domain[edge].is_mandatory(state) {
                continue;
            }
            let (u, v) = domain[edge].endpoints();
            if self.union_find.union(u, v) {
                self.tree.push(edge);
                self.in_tree[edge.0] = true;
                cost += domain[edge].cost();
            }
        }
        if self.union_find.number_sets() > 1 {
            return Err(Wipeout);
        }
        Ok(cost)
    }

    /// Roots the current tree on vertex 0
    fn root_tree(&mut self, domain: &GraphDomain) {
        for adjacency in self.tree_adjacency.iter_mut() {
            adjacency.clear();
        }
        for edge in self.tree.iter().copied() {
            let (u, v) = domain[edge].endpoints();
            self.tree_adjacency[u].push(edge);
            self.tree_adjacency[v].push(edge);
        }
        self.queue.clear();
        self.queue.push(0);
        self.parent[0] = 0;
        self.parent_edge[0] = None;
        self.depth[0] = 0;
        let mut head = 0;
        while head < self.queue.len() {
            let x = self.queue[head];
            head += 1;
            for edge in self.tree_adjacency[x].iter().copied() {
                if self.parent_edge[x] == Some(edge) {
                    continue;
                }
                let y = domain[edge].other(x);
                self.parent[y] = x;
                self.parent_edge[y] = Some(edge);
                self.depth[y] = self.depth[x] + 1;
                self.queue.push(y);
            }
        }
    }

    fn find_jump(&mut self, mut x: usize) -> usize {
        while self.jump[x] != x {
            self.jump[x] = self.jump[self.jump[x]];
            x = self.jump[x];
        }
        x
    }

    /// Computes the cheapest replacement of every tree edge and forces the undecided tree edges
    /// that are bridges, or whose replacement costs too much.
    fn force_tree_edges(&mut self, domain: &mut GraphDomain, state: &mut StateManager, bound: &mut CostBound, lb: Cost) -> PropagationResult<bool> {
        for (i, j) in self.jump.iter_mut().enumerate() {
            *j = i;
        }
        for edge in self.tree.iter().copied() {
            self.replacement[edge.0] = None;
        }
        for k in 0..self.sorted.len() {
            let edge = self.sorted[k];
            if self.in_tree[edge.0] || domain[edge].is_excluded(state) {
                continue;
            }
            let cost = domain[edge].cost();
            let (u, v) = domain[edge].endpoints();
            let mut a = self.find_jump(u);
            let mut b = self.find_jump(v);
            while a != b {
                if self.depth[a] < self.depth[b] {
                    std::mem::swap(&mut a, &mut b);
                }
                if let Some(tree_edge) = self.parent_edge[a] {
                    self.replacement[tree_edge.0] = Some(cost);
                }
                self.jump[a] = self.parent[a];
                a = self.find_jump(a);
            }
        }

        self.buffer.clear();
        for edge in self.tree.iter().copied() {
            if domain[edge].is_mandatory(state) {
                continue;
            }
            match self.replacement[edge.0] {
                None => self.buffer.push(edge),
                Some(replacement) => {
                    let without = lb - domain[edge].cost() + replacement;
                    if without > bound.upper() {
                        bound.pruned(without);
                        self.buffer.push(edge);
                    }
                },
            }
        }
        let mut changed = false;
        for edge in self.buffer.iter().copied() {
            changed |= domain.force_mandatory(edge, state)?;
        }
        Ok(changed)
    }

    /// Returns the most expensive non-mandatory edge on the tree path between u and v
    fn max_replaceable_on_path(&self, domain: &GraphDomain, state: &StateManager, u: usize, v: usize) -> Option<Cost> {
        let mut a = u;
        let mut b = v;
        let mut best: Option<Cost> = None;
        while a != b {
            if self.depth[a] < self.depth[b] {
                std::mem::swap(&mut a, &mut b);
            }
            if let Some(edge) = self.parent_edge[a] {
                if !domain[edge].is_mandatory(state) {
                    let cost = domain[edge].cost();
                    best = Some(best.map_or(cost, |c| c.max(cost)));
                }
            }
            a = self.parent[a];
        }
        best
    }

    /// Removes the undecided non-tree edges that can not be in an improving solution
    fn remove_non_tree_edges(&mut self, domain: &mut GraphDomain, state: &mut StateManager, bound: &mut CostBound, lb: Cost) -> PropagationResult<bool> {
        self.buffer.clear();
        for edge in domain.undecided_iter(state) {
            if self.in_tree[edge.0] {
                continue;
            }
            let (u, v) = domain[edge].endpoints();
            match self.max_replaceable_on_path(domain, state, u, v) {
                None => self.buffer.push(edge),
                Some(removed) => {
                    let with = lb + domain[edge].cost() - removed;
                    if with > bound.upper() {
                        bound.pruned(with);
                        self.buffer.push(edge);
                    }
                },
            }
        }
        let mut changed = false;
        for edge in self.buffer.iter().copied() {
            changed |= domain.remove_possible(edge, state)?;
        }
        Ok(changed)
    }
}

#[cfg(test)]
mod test_spanning_tree_propagator {

    use search_trail::StateManager;
    use crate::core::graph::{EdgeIndex, EdgeStatus, GraphDomain};
    use crate::propagator::{CostBound, Wipeout};
    use crate::propagator::dcmst::*;

    //        1
    //   0 ------- 1
    //   |  \      |
    // 4 |   \ 2   | 3
    //   |    \    |
    //   3 ------- 2
    //        5
    fn get_domain(state: &mut StateManager) -> GraphDomain {
        let mut domain = GraphDomain::new(&[3, 3, 3, 3], state);
        domain.add_possible(0, 1, 1, state).unwrap();
        domain.add_possible(0, 2, 2, state).unwrap();
        domain.add_possible(1, 2, 3, state).unwrap();
        domain.add_possible(0, 3, 4, state).unwrap();
        domain.add_possible(2, 3, 5, state).unwrap();
        domain
    }

    #[test]
    pub fn relaxation_cost() {
        let mut state = StateManager::default();
        let mut domain = get_domain(&mut state);
        let mut propagator = SpanningTreeCostPropagator::new(&domain);
        let mut bound = CostBound::new(100);
        assert_eq!(Ok(false), propagator.propagate(&mut domain, &mut state, &mut bound));
        assert_eq!(7, domain.lower_bound(&state));
        assert_eq!(None, bound.lowest_pruned());
    }

    #[test]
    pub fn mandatory_edges_are_taken_first() {
        let mut state = StateManager::default();
        let mut domain = get_domain(&mut state);
        domain.force_mandatory(EdgeIndex(4), &mut state).unwrap();
        let mut propagator = SpanningTreeCostPropagator::new(&domain);
        let mut bound = CostBound::new(100);
        propagator.propagate(&mut domain, &mut state, &mut bound).unwrap();
        assert_eq!(8, domain.lower_bound(&state));
    }

    #[test]
    pub fn filtering_with_tight_upper_bound() {
        let mut state = StateManager::default();
        let mut domain = get_domain(&mut state);
        let mut propagator = SpanningTreeCostPropagator::new(&domain);
        let mut bound = CostBound::new(7);
        assert_eq!(Ok(true), propagator.propagate(&mut domain, &mut state, &mut bound));
        // No tree edge can be replaced within the bound
        for e in [0, 1, 3] {
            assert_eq!(EdgeStatus::Mandatory, domain[EdgeIndex(e)].status(&state));
        }
        // (1, 2) and (2, 3) would close a mandatory cycle
        for e in [2, 4] {
            assert_eq!(EdgeStatus::Excluded, domain[EdgeIndex(e)].status(&state));
        }
        assert!(domain.is_solution(&state));
        assert_eq!(Some(8), bound.lowest_pruned());
    }

    #[test]
    pub fn filtering_with_loose_upper_bound() {
        let mut state = StateManager::default();
        let mut domain = get_domain(&mut state);
        let mut propagator = SpanningTreeCostPropagator::new(&domain);
        let mut bound = CostBound::new(8);
        assert_eq!(Ok(true), propagator.propagate(&mut domain, &mut state, &mut bound));
        // Replacing (0, 1) by (1, 2) gives a tree of cost 9, the other edges fit in the bound
        assert_eq!(EdgeStatus::Mandatory, domain[EdgeIndex(0)].status(&state));
        for e in 1..5 {
            assert_eq!(EdgeStatus::Undecided, domain[EdgeIndex(e)].status(&state));
        }
        assert_eq!(Some(9), bound.lowest_pruned());
    }

    #[test]
    pub fn disconnected_graph_is_a_wipeout() {
        let mut state = StateManager::default();
        let mut domain = GraphDomain::new(&[2, 2, 2, 2], &mut state);
        domain.add_possible(0, 1, 1, &mut state).unwrap();
        domain.add_possible(2, 3, 1, &mut state).unwrap();
        let mut propagator = SpanningTreeCostPropagator::new(&domain);
        let mut bound = CostBound::new(100);
        assert_eq!(Err(Wipeout), propagator.propagate(&mut domain, &mut state, &mut bound));
        assert_eq!(None, bound.lowest_pruned());
    }
}
