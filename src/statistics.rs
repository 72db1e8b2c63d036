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

use std::fmt;

use crate::PEAK_ALLOC;

/// Counters of the search. They are only updated if the statistics are enabled
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Counters {
    pub nodes: usize,
    pub failures: usize,
    pub solutions: usize,
    pub windows: usize,
    pub max_depth: usize,
    pub propagation_rounds: usize,
    pub peak_memory: f32,
}

/// Implements a bunch of statistics that are collected during the search
#[derive(Default)]
pub struct Statistics<const B: bool> {
    counters: Counters,
}

impl<const B: bool> Statistics<B> {
    pub fn node(&mut self, depth: usize) {
        if B {
            self.counters.nodes += 1;
            self.counters.max_depth = self.counters.max_depth.max(depth);
        }
    }

    pub fn failure(&mut self) {
        if B {
            self.counters.failures += 1;
        }
    }

    pub fn solution(&mut self) {
        if B {
            self.counters.solutions += 1;
        }
    }

    pub fn window(&mut self) {
        if B {
            self.counters.windows += 1;
        }
    }

    /// Records the final state of the search
    pub fn finish(&mut self, propagation_rounds: usize) {
        if B {
            self.counters.propagation_rounds = propagation_rounds;
            self.counters.peak_memory = PEAK_ALLOC.peak_usage_as_mb();
        }
    }

    pub fn counters(&self) -> &Counters {
        &self.counters
    }

    pub fn print(&self) {
        if B {
            println!("{}", self);
        }
    }
}

impl<const B: bool> fmt::Display for Statistics<B> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if B {
            let c = &self.counters;
            writeln!(f,
                "nodes {} | failures {} | solutions {} | windows {} | max depth {} | propagation rounds {} | peak memory {:.3} MB",
                c.nodes,
                c.failures,
                c.solutions,
                c.windows,
                c.max_depth,
                c.propagation_rounds,
                c.peak_memory)
        } else {
            write!(f, "")
        }
    }
}
