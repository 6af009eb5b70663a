mod analysis;
mod cli;
mod error_handling;
mod grammar;
mod parser;
mod report;

use std::process::ExitCode;

use clap::Parser;

use analysis::Analysis;
use cli::Cli;
use error_handling::{Error, Location};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let grammar = match parser::parse_file(&cli.file) {
        Ok(grammar) => grammar,
        Err(errors) => {
            for error in errors {
                eprintln!("{}", error);
            }
            return ExitCode::FAILURE;
        }
    };

    let analysis = Analysis::new(&grammar);
    match report::render(&analysis, cli.sections()) {
        Ok(text) => print!("{}", text),
        Err(error) => {
            eprintln!("{}", Error { location: Location::whole_file(cli.file.clone()), error });
            return ExitCode::FAILURE;
        }
    }

    if cli.strict && !analysis.is_ll1() {
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
