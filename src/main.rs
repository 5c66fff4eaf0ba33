#![forbid(unsafe_code)]

//! jpb: Job Posting Board CLI entry point.

use clap::Parser;

mod cli_app;

fn main() {
    let args = cli_app::Cli::parse();
    if let Err(e) = cli_app::run(&args) {
        eprintln!("jpb: {e}");
        std::process::exit(e.exit_code());
    }
}
