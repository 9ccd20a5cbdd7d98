use anyhow::Context;
use colored::Colorize;
use dmerge_fold::{run_check, run_merge, CheckReport, MergeConfig, MergeSummary};
use dmerge_record::SourceFormat;
use dmerge_types::MeanMode;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Merge(args) => cmd_merge(args, &cli.format),
        Command::Check(args) => cmd_check(args, &cli.format),
    }
}

impl From<InputFormat> for SourceFormat {
    fn from(format: InputFormat) -> Self {
        match format {
            InputFormat::Text => SourceFormat::Text,
            InputFormat::Toml => SourceFormat::Toml,
        }
    }
}

impl From<MeanModeArg> for MeanMode {
    fn from(mode: MeanModeArg) -> Self {
        match mode {
            MeanModeArg::Legacy => MeanMode::Legacy,
            MeanModeArg::Strict => MeanMode::Strict,
        }
    }
}

/// Defaults, then the config file, then flags.
fn load_config(source: &SourceArgs) -> anyhow::Result<MergeConfig> {
    let mut config = match &source.config {
        Some(path) => MergeConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => MergeConfig::default(),
    };
    if let Some(format) = source.input_format {
        config.input_format = Some(format.into());
    }
    if let Some(lines) = source.header_lines {
        config.header_lines = lines;
    }
    Ok(config)
}

fn merge_config(args: &MergeArgs) -> anyhow::Result<MergeConfig> {
    let mut config = load_config(&args.source)?;
    if let Some(output) = &args.output {
        config.output = output.clone();
    }
    if let Some(mode) = args.mean_mode {
        config.mean_mode = mode.into();
    }
    config.ignore_stable |= args.ignore_stable;
    Ok(config)
}

fn cmd_merge(args: MergeArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let config = merge_config(&args)?;
    let summary = run_merge(&config, &args.source.sources).context("merge failed")?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Text => print_merge_summary(&summary),
    }
    Ok(())
}

fn print_merge_summary(summary: &MergeSummary) {
    let report = &summary.report;
    println!(
        "{} Merged {} {} sources into {}",
        "✓".green().bold(),
        report.sources_read.to_string().bold(),
        summary.format.to_string().cyan(),
        summary.output.display().to_string().bold(),
    );
    println!("  Particles: {}", report.particles.to_string().bold());
    println!("  Records read: {}", report.records_absorbed);
    println!("  Merges: {}", report.merges_applied.to_string().green());
    for path in &report.count_only_sources {
        println!("  {} {} (count-only)", "skipped:".yellow(), path.display());
    }
    for skip in &report.skipped_merges {
        let source = skip
            .source
            .as_ref()
            .map(|p| format!(" from {}", p.display()))
            .unwrap_or_default();
        println!(
            "  {} {}{}: {}",
            "merge skipped:".yellow(),
            skip.particle.yellow(),
            source,
            skip.reason.dimmed(),
        );
    }
}

fn cmd_check(args: CheckArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let config = load_config(&args.source)?;
    let report = run_check(&config, &args.source.sources).context("check failed")?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => print_check_report(&report),
    }
    if !report.is_clean() {
        anyhow::bail!("round trip mismatches found");
    }
    Ok(())
}

fn print_check_report(report: &CheckReport) {
    for file in &report.files {
        let path = file.path.display().to_string();
        if file.count_only {
            println!("  {} {} (count-only)", "skipped:".yellow(), path);
        } else if file.mismatches.is_empty() {
            println!("  {} {} ({} records)", "✓".green(), path, file.records);
        } else {
            println!(
                "  {} {}: {}",
                "✗".red().bold(),
                path,
                file.mismatches.join(", ").red(),
            );
        }
    }
}
