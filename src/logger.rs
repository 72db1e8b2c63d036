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

//! Initialisation of the logs of the command line tool. The library only uses the `log`
//! macros; it is up to the binary to install a backend.

use log::{LevelFilter, SetLoggerError};

/// Maps the number of `-v` flags to a level. Without flag, only the warnings are shown
pub fn level_for_verbosity(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Installs env_logger with the given verbosity. `RUST_LOG` takes precedence when set.
/// Fails if a logger is already installed.
pub fn init_logger(verbose: u8) -> Result<(), SetLoggerError> {
    env_logger::Builder::new()
        .filter_level(level_for_verbosity(verbose))
        .parse_default_env()
        .format_timestamp_millis()
        .try_init()
}

#[cfg(test)]
mod test_logger {

    use log::LevelFilter;
    use crate::logger::*;

    #[test]
    pub fn verbosity_levels() {
        assert_eq!(LevelFilter::Warn, level_for_verbosity(0));
        assert_eq!(LevelFilter::Info, level_for_verbosity(1));
        assert_eq!(LevelFilter::Debug, level_for_verbosity(2));
        assert_eq!(LevelFilter::Trace, level_for_verbosity(7));
    }

    #[test]
    pub fn second_initialisation_is_an_error() {
        let _ = init_logger(0);
        assert!(init_logger(3).is_err());
    }
}
