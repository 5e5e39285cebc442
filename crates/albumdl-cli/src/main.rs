use albumdl_core::logging;
use std::process::ExitCode;

mod cli;

fn main() -> ExitCode {
    // Initialize logging as early as possible; never let it block a download.
    if logging::init_logging().is_err() {
        logging::init_logging_stderr();
    }

    match cli::run_from_args() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("albumdl error: {:#}", err);
            ExitCode::from(cli::EXIT_FAILURE)
        }
    }
}
