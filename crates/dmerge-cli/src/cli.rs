use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "dmerge",
    about = "Merge particle decay measurement files into one record set",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum InputFormat {
    Text,
    Toml,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum MeanModeArg {
    Legacy,
    Strict,
}

#[derive(Subcommand)]
pub enum Command {
    /// Merge sources into a single output file
    Merge(MergeArgs),
    /// Verify that every record renders and parses back unchanged
    Check(CheckArgs),
}

/// Options shared by every command that reads sources.
#[derive(Args)]
pub struct SourceArgs {
    /// Directories, glob patterns, or files to read
    #[arg(required = true)]
    pub sources: Vec<String>,
    /// Input format; inferred from file extensions when omitted
    #[arg(long)]
    pub input_format: Option<InputFormat>,
    /// Header lines to skip at the top of each text file [default: 2].
    ///
    /// Source files always carry two header lines. Other values exist to
    /// re-read merged output, which has none (use 0).
    #[arg(long)]
    pub header_lines: Option<usize>,
    /// TOML file with run settings
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Args)]
pub struct MergeArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// Output path [default: out.txt]
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    #[arg(long)]
    pub mean_mode: Option<MeanModeArg>,
    /// Accepted for compatibility; has no effect yet
    #[arg(long)]
    pub ignore_stable: bool,
}

#[derive(Args)]
pub struct CheckArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_merge_defaults() {
        let cli = Cli::try_parse_from(["dmerge", "merge", "data/"]).unwrap();
        if let Command::Merge(args) = cli.command {
            assert_eq!(args.source.sources, vec!["data/"]);
            assert!(args.output.is_none());
            assert!(args.source.input_format.is_none());
            assert!(args.mean_mode.is_none());
            assert!(!args.ignore_stable);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_merge_files_and_output() {
        let cli = Cli::try_parse_from(["dmerge", "merge", "a.toml", "b.toml", "-o", "merged.toml"]).unwrap();
        if let Command::Merge(args) = cli.command {
            assert_eq!(args.source.sources, vec!["a.toml", "b.toml"]);
            assert_eq!(args.output, Some(PathBuf::from("merged.toml")));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_merge_flags() {
        let cli = Cli::try_parse_from([
            "dmerge", "merge", "runs/*.txt", "--ignore-stable", "--mean-mode", "strict",
            "--input-format", "text", "--header-lines", "3", "--config", "dmerge.toml",
        ])
        .unwrap();
        if let Command::Merge(args) = cli.command {
            assert!(args.ignore_stable);
            assert_eq!(args.mean_mode, Some(MeanModeArg::Strict));
            assert_eq!(args.source.input_format, Some(InputFormat::Text));
            assert_eq!(args.source.header_lines, Some(3));
            assert_eq!(args.source.config, Some(PathBuf::from("dmerge.toml")));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn header_lines_help_names_merged_output() {
        use clap::CommandFactory;
        let mut cmd = Cli::command();
        let merge = cmd.find_subcommand_mut("merge").unwrap();
        let help = merge.render_long_help().to_string();
        assert!(help.contains("two header lines"));
        assert!(help.contains("re-read merged output"));
    }

        #[test]
    fn parse_merge_requires_sources() {
        assert!(Cli::try_parse_from(["dmerge", "merge"]).is_err());
    }

    #[test]
    fn parse_check() {
        let cli = Cli::try_parse_from(["dmerge", "check", "a.txt"]).unwrap();
        assert!(matches!(cli.command, Command::Check(_)));
    }

    #[test]
    fn parse_unknown_mean_mode() {
        assert!(Cli::try_parse_from(["dmerge", "merge", "a", "--mean-mode", "weighted"]).is_err());
    }

    #[test]
    fn parse_verbose() {
        let cli = Cli::try_parse_from(["dmerge", "--verbose", "check", "a.txt"]).unwrap();
        assert!(cli.verbose);
    }

    #[test]
    fn parse_json_format() {
        let cli = Cli::try_parse_from(["dmerge", "--format", "json", "merge", "a.txt"]).unwrap();
        assert!(matches!(cli.format, OutputFormat::Json));
    }
}
