//! Timelapse pipeline
//!
//! Stamps periodic camera captures with their capture time and assembles
//! them into a single video.
//!
//! # Usage
//!
//! ```bash
//! timelapse run --base-path /srv/camera --timezone BST --window-start 07:00 --window-end 19:00
//! timelapse stamp --date 2021-05-23 --remove-raw
//! timelapse assemble --all-dates --raw-output
//! ```

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use timelapse_cli::cli::{commands, Cli};
use timelapse_cli::utils::logging::init_logging;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(&cli.log_level, cli.log_format) {
        eprintln!("Error: {:#}", e);
        return ExitCode::from(2);
    }

    info!("Starting timelapse {}", env!("CARGO_PKG_VERSION"));

    match commands::execute(cli) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            let code = commands::exit_code(&err);
            error!(exit_code = code, "{:#}", err);
            eprintln!("Error: {:#}", err);
            ExitCode::from(code)
        }
    }
}
