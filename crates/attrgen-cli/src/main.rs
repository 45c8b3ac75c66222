mod args;
mod cli;
mod logging;

use std::process::ExitCode;

fn main() -> ExitCode {
    cli::run(std::env::args_os())
}
