//! notepress CLI

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use notepress::{BatchReport, Migrator, MigratorConfig, MigratorConfigBuilder, migrate_path};
use std::path::PathBuf;
use std::process::ExitCode;

/// notepress - publish markdown notes as Jekyll posts
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Note file or directory of notes
    input: PathBuf,

    /// Project root holding _posts/ and images/ [default: .]
    #[arg(short, long, env = "NOTEPRESS_ROOT")]
    root: Option<PathBuf>,

    /// YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Publish date override (YYYY-MM-DD) instead of the file's modification date
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Number of tags per post
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
    max_tags: Option<u8>,

    /// Plan only, write nothing
    #[arg(long, action = clap::ArgAction::SetTrue)]
    dry_run: bool,

    /// Print the batch report as JSON
    #[arg(long, action = clap::ArgAction::SetTrue)]
    json: bool,

    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long, action = clap::ArgAction::SetTrue)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if args.verbose { "debug" } else { "info" }),
    )
    .init();

    match run(&args) {
        Ok(report) if report.success => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<BatchReport> {
    let config = build_config(args)?;
    log::debug!(
        "Posts -> {}, images -> {}",
        config.posts_path().display(),
        config.images_path().display()
    );

    let mut migrator = Migrator::new(config)
        .context("Invalid configuration")?
        .dry_run(args.dry_run);
    let report = migrate_path(&mut migrator, &args.input)
        .with_context(|| format!("Failed to migrate {}", args.input.display()))?;

    if args.json {
        println!("{}", report.to_json()?);
    } else {
        print_summary(&report);
    }
    Ok(report)
}

/// File values first, then command-line flags on top.
fn build_config(args: &Args) -> Result<MigratorConfig> {
    let mut builder = match &args.config {
        Some(path) => MigratorConfigBuilder::from_config(
            MigratorConfig::load(path).context("Failed to load configuration")?,
        ),
        None => MigratorConfig::builder("."),
    };

    if let Some(root) = &args.root {
        builder = builder.root(root);
    }
    if let Some(date) = args.date {
        builder = builder.date_override(date);
    }
    if let Some(max_tags) = args.max_tags {
        builder = builder.max_tags(usize::from(max_tags));
    }

    builder.build().context("Invalid configuration")
}

fn print_summary(report: &BatchReport) {
    for record in &report.records {
        match (&record.outcome, &record.error) {
            (Some(outcome), _) => {
                println!("{} -> {}", outcome.source.display(), outcome.post_path.display());
                println!("  title: {}", outcome.title);
                println!("  permalink: {}", outcome.permalink);
                println!("  tags: {}", outcome.tags.join(", "));
                if outcome.images_copied + outcome.images_reused > 0 {
                    println!(
                        "  images: {} copied, {} reused",
                        outcome.images_copied, outcome.images_reused
                    );
                }
                for warning in &outcome.warnings {
                    println!("  warning: {}", warning);
                }
            }
            (None, error) => {
                println!(
                    "FAILED {}: {}",
                    record.path.display(),
                    error.as_deref().unwrap_or("unknown error")
                );
            }
        }
    }

    println!(
        "{} succeeded, {} failed{}",
        report.succeeded,
        report.failed,
        if report.dry_run { " (dry run, nothing written)" } else { "" }
    );
}
