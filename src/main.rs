//! `zacros-ce-fit` command.

use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use zacros_ce_fit::cli::{init_logging, Cli, CliExitCode};
use zacros_ce_fit::pipeline;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match cli.to_config() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "configuration rejected");
            eprintln!("error: {e}");
            return CliExitCode::InputError.into();
        }
    };

    let report = match pipeline::run(&cli.file, &config) {
        Ok(report) => report,
        Err(e) => {
            error!(error = %e, "failed to load input");
            eprintln!("error: {e}");
            return CliExitCode::InputError.into();
        }
    };

    for failure in &report.failures {
        eprintln!("{failure}");
    }
    println!("Results saved to {}", report.output_root.display());
    CliExitCode::from(&report).into()
}
