use std::ffi::OsString;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use attrgen_codegen::EmitReport;

use crate::args::Args;
use crate::logging;

/// Parse arguments, run the generator and map the outcome to an exit code.
pub fn run<I, T>(argv: I) -> ExitCode
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args = Args::try_parse_from(argv).unwrap_or_else(|e| {
        e.exit();
    });
    logging::init(&args.global);

    match execute(&args) {
        Ok(report) => {
            info!(
                written = report.written.len(),
                unchanged = report.unchanged.len(),
                "done"
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{}", failure_message(&err));
            ExitCode::FAILURE
        }
    }
}

fn execute(args: &Args) -> Result<EmitReport> {
    attrgen_codegen::run(&args.input_dir, &args.output_dir).with_context(|| {
        format!(
            "failed to generate {} from {}",
            args.output_dir.display(),
            args.input_dir.display()
        )
    })
}

/// The single line printed for a failed run, with the whole context chain.
fn failure_message(err: &anyhow::Error) -> String {
    format!("error: {:#}", err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_inputs_fail() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let args = Args::try_parse_from([
            "attrgen".into(),
            "--input-dir".into(),
            input.path().as_os_str().to_os_string(),
            "--output-dir".into(),
            output.path().join("out").into_os_string(),
        ])
        .unwrap();

        let err = execute(&args).unwrap_err();
        let message = failure_message(&err);
        assert!(message.starts_with("error: failed to generate"));
        assert!(message.contains("svg.idl"));
        assert_eq!(message.lines().count(), 1);
        assert!(!output.path().join("out").exists());
    }
}
