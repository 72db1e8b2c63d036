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

use clap::Parser;

use std::path::PathBuf;

use crate::common::ObjectivePolicy;
use crate::parameters::{DEFAULT_SOLUTION_LIMIT, DEFAULT_TIMEOUT};

#[derive(Debug, Parser)]
#[clap(name="Dcmst", version, author, about)]
pub struct Args {
    /// The instance file
    #[clap(value_parser)]
    input: PathBuf,
    /// Stops the search after timeout seconds
    #[clap(short, long, default_value_t=DEFAULT_TIMEOUT)]
    timeout: u64,
    /// Stops the search after this number of solutions (0 for no limit)
    #[clap(short, long, default_value_t=DEFAULT_SOLUTION_LIMIT)]
    solutions: usize,
    /// How the cost of the tree is bounded during the search
    #[clap(short, long, value_enum, default_value_t=ObjectivePolicy::BottomUp)]
    policy: ObjectivePolicy,
    /// Collect stats during the search
    #[clap(long, action)]
    statistics: bool,
    /// Verbosity of the logs (-v, -vv, -vvv)
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {

    pub fn input(&self) -> &PathBuf {
        &self.input
    }

    pub fn timeout(&self) -> u64 {
        self.timeout
    }

    pub fn solutions(&self) -> usize {
        self.solutions
    }

    pub fn policy(&self) -> ObjectivePolicy {
        self.policy
    }

    pub fn statistics(&self) -> bool {
        self.statistics
    }

    pub fn verbose(&self) -> u8 {
        self.verbose
    }
}

#[cfg(test)]
mod test_args {

    use clap::Parser;
    use crate::args::*;

    #[test]
    pub fn defaults() {
        let args = Args::parse_from(["dcmst", "instance.txt"]);
        assert_eq!(&PathBuf::from("instance.txt"), args.input());
        assert_eq!(14_400, args.timeout());
        assert_eq!(2, args.solutions());
        assert_eq!(ObjectivePolicy::BottomUp, args.policy());
        assert!(!args.statistics());
        assert_eq!(0, args.verbose());
    }

    #[test]
    pub fn verbosity_is_counted() {
        let args = Args::parse_from(["dcmst", "-vv", "instance.txt"]);
        assert_eq!(2, args.verbose());
    }

    #[test]
    pub fn exactly_one_instance_is_required() {
        assert!(Args::try_parse_from(["dcmst"]).is_err());
        assert!(Args::try_parse_from(["dcmst", "a.txt", "b.txt"]).is_err());
    }
}
