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

//! Errors that can be reported to the caller of the solver. Domain wipeouts are not part of
//! this module: they are the internal backtracking signal of the search and never escape it
//! (see `propagator::Wipeout`).

use thiserror::Error;

/// Problems found while reading or building an instance. The run is aborted, no search is
/// attempted.
#[derive(Debug, Error)]
pub enum InstanceError {
    #[error("could not read the instance: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: expected {expected}, found end of input")]
    UnexpectedEof { line: usize, expected: &'static str },
    #[error("line {line}: `{token}` is not an integer")]
    NotAnInteger { line: usize, token: String },
    #[error("line {line}: expected {expected} values, found {found}")]
    WrongArity { line: usize, expected: usize, found: usize },
    #[error("an instance must have at least one vertex")]
    NoVertex,
    #[error("vertex {vertex} is out of range (the graph has {number_vertices} vertices)")]
    VertexOutOfRange { vertex: usize, number_vertices: usize },
    #[error("self loop on vertex {vertex}")]
    SelfLoop { vertex: usize },
    #[error("edge ({from}, {to}) has a negative cost {cost}")]
    NegativeCost { from: usize, to: usize, cost: i64 },
    #[error("edge ({from}, {to}) has a cost {cost} too large: the cost of a tree could overflow")]
    CostOverflow { from: usize, to: usize, cost: i64 },
    #[error("edge ({from}, {to}) is defined more than once")]
    DuplicateEdge { from: usize, to: usize },
    #[error("line {line}: degree record for vertex {expected} expected, found vertex {found}")]
    DegreeOutOfOrder { line: usize, expected: usize, found: i64 },
    #[error("vertex {vertex} has a negative maximum degree {degree}")]
    NegativeDegree { vertex: usize, degree: i64 },
}

#[derive(Debug, Error)]
pub enum DcmstError {
    #[error("invalid instance: {0}")]
    InvalidInstance(#[from] InstanceError),
    /// The search space was exhausted without any spanning tree, before the time limit. The
    /// benchmark instances are generated feasible, so this denotes a broken instance.
    #[error("no spanning tree found after {elapsed:.3}s although the time limit was not reached: the benchmark instance is expected to be feasible")]
    ContradictoryBenchmark { elapsed: f64 },
}
