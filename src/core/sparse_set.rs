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


//! This module implements a reversible sparse-set over dense identifiers in [0, capacity).
//! It is used to iterate over the edges that are still undecided (neither mandatory nor
//! excluded) without visiting the decided ones.
//! A sparse-set is composed of three elements:
//!     1. A plain vector, containing the elements of the set
//!     2. A position vector, giving for each element its index in the plain vector
//!     3. The current size of the sparse set
//!
//! Removing an element swaps it with the last element of the live prefix and decrements the
//! size. Removed elements stay in the suffix of the plain vector, in removal order.
//! Since the size is a ReversibleUsize from the search_trail crate, restoring the state of the
//! trail makes the removed elements reappear in O(1): the swaps do not need to be undone
//! because any permutation of the live prefix represents the same set.

use search_trail::{StateManager, ReversibleUsize, UsizeManager};

#[derive(Debug)]
pub struct SparseSet {
    /// Vectors containing the elements in the set
    plain: Vec<usize>,
    /// Index of each element in the plain vector
    positions: Vec<usize>,
    /// Size of the set
    size: ReversibleUsize,
}

impl SparseSet {

    /// Creates a sparse-set containing every element of [0, capacity)
    pub fn new(capacity: usize, state: &mut StateManager) -> Self {
        Self {
            plain: (0..capacity).collect(),
            positions: (0..capacity).collect(),
            size: state.manage_usize(capacity),
        }
    }

    /// Adds a new element at the end of the set. It must be called before any removal.
    pub fn push(&mut self, state: &mut StateManager) -> usize {
        let elem = self.plain.len();
        debug_assert_eq!(elem, self.len(state));
        self.plain.push(elem);
        self.positions.push(elem);
        state.increment_usize(self.size);
        elem
    }

    /// Returns true iff `elem` is in the set
    pub fn contains(&self, elem: usize, state: &StateManager) -> bool {
        self.positions[elem] < self.len(state)
    }

    /// Removes element `elem` from the sparse-set. Returns false if it was already removed
    pub fn remove(&mut self, elem: usize, state: &mut StateManager) -> bool {
        if !self.contains(elem, state) {
            return false;
        }
        let last_idx = self.len(state) - 1;
        let cur_idx = self.positions[elem];
        self.plain.swap(cur_idx, last_idx);
        self.positions[self.plain[cur_idx]] = cur_idx;
        self.positions[self.plain[last_idx]] = last_idx;
        state.decrement_usize(self.size);
        true
    }

    /// Iterates over the current elements of the sparse-set
    pub fn iter(&self, state: &StateManager) -> impl Iterator<Item = usize> + '_ {
        self.plain[0..self.len(state)].iter().copied()
    }

    /// Returns the current size of the sparse-set
    pub fn len(&self, state: &StateManager) -> usize {
        state.get_usize(self.size)
    }
}
