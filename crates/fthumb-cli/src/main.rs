//! font-thumbnail - render a font sample into a tagged PNG thumbnail

use std::process::ExitCode;

use fthumb_cli::{cli::Args, thumbnail};

fn main() -> ExitCode {
    // Usage errors exit with status 2 from here
    let args = Args::parse_ordered();
    init_logger(args.verbose);

    let request = args.resolve();
    match thumbnail::run(&request) {
        Ok(report) => {
            if !args.quiet {
                eprintln!(
                    "Wrote {}x{} thumbnail to {} ({} bytes, fit to {})",
                    report.width,
                    report.height,
                    report.output.display(),
                    report.bytes,
                    report.fit
                );
            }
            ExitCode::SUCCESS
        },
        Err(err) => {
            match thumbnail::error_category(&err) {
                Some(category) => log::debug!("{category:?} failure: {err:?}"),
                None => log::debug!("Failure: {err:?}"),
            }
            eprintln!("error: {}", thumbnail::error_chain(&err));
            ExitCode::FAILURE
        },
    }
}

/// `RUST_LOG` wins; otherwise warnings only, or everything under `--verbose`
fn init_logger(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}
