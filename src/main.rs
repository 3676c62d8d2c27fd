//! skills - credit-gated skill progression from the command line

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = skill_matrix::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
