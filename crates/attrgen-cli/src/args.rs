use std::path::PathBuf;

use clap::Parser;

/// Generate C++ attribute accessors from the interface and document-type grammars.
#[derive(Parser, Debug, Clone)]
#[command(name = "attrgen")]
#[command(version, about)]
pub struct Args {
    /// Directory holding svg.idl, svg.dtd, css-properties.tsv and an optional attrgen.toml.
    #[arg(long, value_name = "DIR")]
    pub input_dir: PathBuf,

    /// Directory the generated sources are written to; created if missing.
    #[arg(long, value_name = "DIR")]
    pub output_dir: PathBuf,

    #[command(flatten)]
    pub global: GlobalArgs,
}

#[derive(Parser, Debug, Clone)]
pub struct GlobalArgs {
    /// Only print errors.
    #[arg(long, short, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Use verbose output. Repeat for more detail.
    #[arg(action = clap::ArgAction::Count, long, short, conflicts_with = "quiet")]
    pub verbose: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dirs_and_verbosity() {
        let args = Args::try_parse_from([
            "attrgen",
            "--input-dir",
            "grammars",
            "--output-dir",
            "out",
            "-vv",
        ])
        .unwrap();
        assert_eq!(args.input_dir, PathBuf::from("grammars"));
        assert_eq!(args.output_dir, PathBuf::from("out"));
        assert_eq!(args.global.verbose, 2);
        assert!(!args.global.quiet);
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        let result = Args::try_parse_from([
            "attrgen",
            "--input-dir",
            "a",
            "--output-dir",
            "b",
            "-q",
            "-v",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_dirs_are_required() {
        assert!(Args::try_parse_from(["attrgen", "--input-dir", "a"]).is_err());
    }
}
