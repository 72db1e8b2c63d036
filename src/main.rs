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

use anyhow::Context;
use clap::Parser;

use dcmst::args::Args;
use dcmst::logger::init_logger;
use dcmst::parser::instance_from_file;
use dcmst::{check_benchmark, solve_with_listener, DcmstError, SearchEvent, SolverParameters};

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logger(args.verbose()).context("while installing the logger")?;
    let instance = instance_from_file(args.input())
        .map_err(DcmstError::from)
        .with_context(|| format!("while reading {}", args.input().display()))?;
    let parameters = SolverParameters::from(&args);
    let report = solve_with_listener(&instance, parameters, |event| {
        if let SearchEvent::Solution { cost, .. } = event {
            println!("Solution: {}", cost);
        }
    });
    check_benchmark(&report)?;
    match report.result.best() {
        Some(best) => println!("Best: {}", best.cost()),
        None => println!("Best: none"),
    }
    println!("Time: {:.3}", report.elapsed.as_secs_f64());
    Ok(())
}
