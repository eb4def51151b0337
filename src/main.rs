use caseload_processor::cli::{args::Args, commands};
use clap::Parser;
use std::process;

fn main() {
    let args = Args::parse();

    match commands::run(args) {
        Ok(()) => {}
        Err(error) => {
            eprintln!("Error: {error:#}");
            process::exit(1);
        }
    }
}
