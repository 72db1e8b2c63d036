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

//! Last-conflict reasoning: the edge whose decision most recently led to a failure is selected
//! again, as long as it is undecided, before the default heuristic is consulted.

use search_trail::StateManager;

use crate::core::graph::{EdgeIndex, EdgeStatus, GraphDomain};

#[derive(Default, Debug)]
pub struct LastConflict {
    edge: Option<EdgeIndex>,
}

impl LastConflict {

    pub fn on_failure(&mut self, edge: EdgeIndex) {
        self.edge = Some(edge);
    }

    /// Returns the conflicting edge if it is still undecided
    pub fn select(&self, domain: &GraphDomain, state: &StateManager) -> Option<EdgeIndex> {
        self.edge.filter(|e| domain[*e].status(state) == EdgeStatus::Undecided)
    }
}

#[cfg(test)]
mod test_last_conflict {

    use search_trail::{SaveAndRestore, StateManager};
    use crate::core::graph::{EdgeIndex, GraphDomain};
    use crate::branching::last_conflict::*;

    #[test]
    pub fn conflict_is_selected_while_undecided() {
        let mut state = StateManager::default();
        let mut domain = GraphDomain::new(&[2, 2, 2], &mut state);
        domain.add_possible(0, 1, 1, &mut state).unwrap();
        domain.add_possible(1, 2, 1, &mut state).unwrap();
        domain.add_possible(0, 2, 1, &mut state).unwrap();
        let mut conflict = LastConflict::default();
        assert_eq!(None, conflict.select(&domain, &state));
        conflict.on_failure(EdgeIndex(1));
        assert_eq!(Some(EdgeIndex(1)), conflict.select(&domain, &state));
        state.save_state();
        domain.force_mandatory(EdgeIndex(1), &mut state).unwrap();
        assert_eq!(None, conflict.select(&domain, &state));
        state.restore_state();
        assert_eq!(Some(EdgeIndex(1)), conflict.select(&domain, &state));
        conflict.on_failure(EdgeIndex(2));
        assert_eq!(Some(EdgeIndex(2)), conflict.select(&domain, &state));
    }
}
