//! Binary entrypoint for the `cursus` CLI.

use std::process::ExitCode;

fn main() -> ExitCode {
    // .env is optional; real configuration comes from the environment.
    let _ = dotenvy::dotenv();
    cursus::logging::init();

    match cursus::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
