//! scummloc binary entry point

use std::process::ExitCode;

fn main() -> ExitCode {
    match scummloc::cli::run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
