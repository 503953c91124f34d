mod cli;
mod platform;

use std::process::ExitCode;

use clap::Parser;

fn main() -> ExitCode {
    match platform::run_app(cli::Cli::parse()) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("rowtrim: {err:#}");
            ExitCode::FAILURE
        }
    }
}
