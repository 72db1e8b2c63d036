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

//! This module provides the parser of the instance files. An example of valid file is given
//! next
//!
//! 3 3
//! 1 2 1
//! 1 3 2
//! 2 3 3
//! 1 2
//! 2 2
//! 3 2
//!
//! The first line gives the number of vertices n and the number of edges m. Then each of the m
//! following lines defines an undirected edge by its two endpoints and its cost. Finally, the n
//! last lines give the maximum degree of each vertex, in the order 1, 2, ..., n.
//! The vertices are 1-indexed in the file and 0-indexed in the solver. Blank lines are ignored.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::common::Cost;
use crate::core::instance::Instance;
use crate::error::InstanceError;

/// Iterator over the non-empty lines of the input, with their (1-based) line number
struct Lines<R: BufRead> {
    lines: std::io::Lines<R>,
    number: usize,
}

impl<R: BufRead> Lines<R> {

    fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            number: 0,
        }
    }

    /// Reads the next non-empty line and parses exactly `arity` integers from it
    fn next_record(&mut self, arity: usize, expected: &'static str) -> Result<(usize, Vec<i64>), InstanceError> {
        loop {
            let line = match self.lines.next() {
                None => return Err(InstanceError::UnexpectedEof { line: self.number + 1, expected }),
                Some(line) => line?,
            };
            self.number += 1;
            if line.trim().is_empty() {
                continue;
            }
            let values = line.split_whitespace().map(|token| {
                token.parse::<i64>().map_err(|_| InstanceError::NotAnInteger { line: self.number, token: token.to_string() })
            }).collect::<Result<Vec<i64>, InstanceError>>()?;
            if values.len() != arity {
                return Err(InstanceError::WrongArity { line: self.number, expected: arity, found: values.len() });
            }
            return Ok((self.number, values));
        }
    }
}

/// Converts a 1-indexed vertex of the file to a 0-indexed vertex
fn vertex(value: i64, number_vertices: usize) -> Result<usize, InstanceError> {
    if value < 1 || value as u64 > number_vertices as u64 {
        return Err(InstanceError::VertexOutOfRange { vertex: value.max(0) as usize, number_vertices });
    }
    Ok(value as usize - 1)
}

fn count(value: i64, line: usize) -> Result<usize, InstanceError> {
    usize::try_from(value).map_err(|_| InstanceError::NotAnInteger { line, token: value.to_string() })
}

/// Reads an instance from any buffered reader
pub fn instance_from_reader<R: BufRead>(reader: R) -> Result<Instance, InstanceError> {
    let mut lines = Lines::new(reader);
    let (line, header) = lines.next_record(2, "the number of vertices and edges")?;
    let n = count(header[0], line)?;
    let m = count(header[1], line)?;
    if n == 0 {
        return Err(InstanceError::NoVertex);
    }
    let mut instance = Instance::new(n);
    for _ in 0..m {
        let (_, edge) = lines.next_record(3, "an edge")?;
        let from = vertex(edge[0], n)?;
        let to = vertex(edge[1], n)?;
        if edge[2] < 0 {
            return Err(InstanceError::NegativeCost { from: from + 1, to: to + 1, cost: edge[2] });
        }
        let cost = Cost::try_from(edge[2]).map_err(|_| InstanceError::CostOverflow { from: from + 1, to: to + 1, cost: edge[2] })?;
        instance.add_edge(from, to, cost)?;
    }
    for v in 0..n {
        let (line, degree) = lines.next_record(2, "a degree record")?;
        if degree[0] != v as i64 + 1 {
            return Err(InstanceError::DegreeOutOfOrder { line, expected: v + 1, found: degree[0] });
        }
        if degree[1] < 0 {
            return Err(InstanceError::NegativeDegree { vertex: v + 1, degree: degree[1] });
        }
        instance.set_max_degree(v, degree[1] as usize)?;
    }
    Ok(instance)
}

/// Reads an instance from a file
pub fn instance_from_file<P: AsRef<Path>>(path: P) -> Result<Instance, InstanceError> {
    let file = File::open(path)?;
    instance_from_reader(BufReader::new(file))
}

#[cfg(test)]
mod test_parser {

    use std::io::Write;
    use crate::error::InstanceError;
    use crate::parser::*;

    fn parse(content: &str) -> Result<Instance, InstanceError> {
        instance_from_reader(content.as_bytes())
    }

    #[test]
    pub fn parse_valid_instance() {
        let instance = parse("3 3\n1 2 1\n1 3 2\n\n2 3 3\n1 2\n2 2\n3 1\n").unwrap();
        assert_eq!(3, instance.number_vertices());
        assert_eq!(3, instance.number_edges());
        assert_eq!(Some(1), instance.cost(0, 1));
        assert_eq!(Some(3), instance.cost(2, 1));
        assert_eq!(1, instance.max_degree(2));
        assert_eq!((2, 6), instance.cost_bounds());
    }

    #[test]
    pub fn parse_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "2 1\n1 2 7\n1 1\n2 1\n").unwrap();
        let instance = instance_from_file(file.path()).unwrap();
        assert_eq!(Some(7), instance.cost(0, 1));
        assert_eq!((7, 7), instance.cost_bounds());
    }

    #[test]
    pub fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(instance_from_file(dir.path().join("none.txt")), Err(InstanceError::Io(_))));
    }

    #[test]
    pub fn duplicate_edge_in_any_orientation() {
        let result = parse("3 2\n1 2 1\n2 1 4\n1 2\n2 2\n3 2\n");
        assert!(matches!(result, Err(InstanceError::DuplicateEdge { from: 1, to: 2 })));
    }

    #[test]
    pub fn degree_records_out_of_order() {
        let result = parse("2 1\n1 2 1\n2 1\n1 1\n");
        assert!(matches!(result, Err(InstanceError::DegreeOutOfOrder { line: 3, expected: 1, found: 2 })));
    }

    #[test]
    pub fn invalid_values() {
        assert!(matches!(parse("2 1\n1 2 -3\n1 1\n2 1\n"), Err(InstanceError::NegativeCost { cost: -3, .. })));
        assert!(matches!(parse("2 1\n1 2 3\n1 -1\n2 1\n"), Err(InstanceError::NegativeDegree { vertex: 1, degree: -1 })));
        assert!(matches!(parse("2 1\n1 3 3\n1 1\n2 1\n"), Err(InstanceError::VertexOutOfRange { vertex: 3, number_vertices: 2 })));
        assert!(matches!(parse("2 1\n1 1 3\n1 1\n2 1\n"), Err(InstanceError::SelfLoop { vertex: 1 })));
        assert!(matches!(parse("2 1\n1 x 3\n1 1\n2 1\n"), Err(InstanceError::NotAnInteger { line: 2, .. })));
        assert!(matches!(parse("2 1\n1 2\n1 1\n2 1\n"), Err(InstanceError::WrongArity { line: 2, expected: 3, found: 2 })));
        assert!(matches!(parse("0 0\n"), Err(InstanceError::NoVertex)));
    }

    #[test]
    pub fn costs_too_large_for_a_tree() {
        // 4 * 2^62 does not fit in 64 bits
        let result = parse("4 3\n1 2 4611686018427387904\n2 3 4611686018427387904\n3 4 1\n1 2\n2 2\n3 2\n4 2\n");
        assert!(matches!(result, Err(InstanceError::CostOverflow { from: 1, to: 2, cost: 4611686018427387904 })));
        let result = parse("3 1\n1 3 9223372036854775807\n1 1\n2 1\n3 1\n");
        assert!(matches!(result, Err(InstanceError::CostOverflow { .. })));
    }

    #[test]
    pub fn truncated_input() {
        assert!(matches!(parse(""), Err(InstanceError::UnexpectedEof { line: 1, .. })));
        assert!(matches!(parse("2 1\n1 2 1\n1 1\n"), Err(InstanceError::UnexpectedEof { line: 4, .. })));
    }
}
