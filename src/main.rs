use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use epguide_rename::cache::CatalogCache;
use epguide_rename::config;
use epguide_rename::downloader::DownloadProgress;
use epguide_rename::executor::{RenameOutcome, RenameResult, RenameSummary};
use epguide_rename::rename_engine::{RenameConfig, parse_season_input};
use epguide_rename::season;
use epguide_rename::tui;
use epguide_rename::workflow::Workflow;

#[derive(Parser)]
#[command(
    name = "epguide-rename",
    about = "Rename a season of TV episode files using epguides.com episode data",
    version,
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Settings file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the show catalog by title
    Search {
        query: String,
        /// Print matches as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the seasons of a show
    Seasons { title: String },

    /// Write the episode names of one season to the working list
    List { title: String, season: String },

    /// Show the planned renames without touching any file
    Preview(TargetArgs),

    /// Rename the files of one season
    Rename {
        #[command(flatten)]
        target: TargetArgs,
        /// Rename without the interactive preview
        #[arg(long)]
        yes: bool,
    },

    /// Remove downloaded working files
    Clean,
}

#[derive(Args)]
struct TargetArgs {
    title: String,
    season: String,

    /// Directory holding the episode files
    #[arg(long, default_value = ".")]
    dir: PathBuf,

    /// Extension of the episode files, e.g. mkv
    #[arg(long)]
    ext: Option<String>,

    /// Naming template, e.g. "{Titel} {SeasonNumber} {EpisodeNumber} - {EpisodeName}"
    #[arg(long)]
    template: Option<String>,
}

/// Single-line download progress on stderr.
#[derive(Default)]
struct ProgressLine {
    active: bool,
}

impl ProgressLine {
    fn update(&mut self, progress: DownloadProgress) {
        match progress.percentage() {
            Some(percent) => eprint!("\rDownloading... {:.2}%", percent),
            None => eprint!("\rDownloading... {} bytes", progress.bytes_read),
        }
        self.active = true;
    }

    fn finish(&mut self) {
        if self.active {
            eprintln!();
            self.active = false;
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("epguide_rename={}", log_level))),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cancel = CancellationToken::new();
    let signal_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            signal_token.cancel();
        }
    });

    if let Err(e) = run(cli, cancel).await {
        eprintln!("✗ Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli, cancel: CancellationToken) -> anyhow::Result<()> {
    let config_path = cli.config.unwrap_or_else(config::config_path);
    let settings = config::load_or_create_default(&config_path)
        .with_context(|| format!("loading settings from {}", config_path.display()))?;
    let workflow = Workflow::new(settings, Arc::new(CatalogCache::new()))?;

    let mut line = ProgressLine::default();

    match cli.command {
        Commands::Search { query, json } => {
            let shows = workflow
                .search_shows(&query, &cancel, &mut |p: DownloadProgress| line.update(p))
                .await;
            line.finish();
            let shows = shows?;

            if json {
                println!("{}", serde_json::to_string_pretty(&shows)?);
            } else if shows.is_empty() {
                println!("✗ No shows found matching '{}'", query.trim());
            } else {
                for show in &shows {
                    println!(
                        "{} ({}, {} - {}) [TVmaze {}]",
                        show.title, show.network, show.start_date, show.end_date, show.tvmaze
                    );
                }
            }
        }
        Commands::Seasons { title } => {
            let ceiling = workflow
                .season_ceiling(&title, &cancel, &mut |p: DownloadProgress| line.update(p))
                .await;
            line.finish();

            let labels = season::season_labels(ceiling?);
            if labels.is_empty() {
                println!("✗ No seasons listed for '{}'", title.trim());
            }
            for label in labels {
                println!("{}", label);
            }
        }
        Commands::List { title, season } => {
            let season_num = season_number(&season)?;
            write_list(&workflow, &title, season_num, &cancel, &mut line).await?;

            let names = season::read_episode_list(&workflow.list_path())?;
            println!("✓ Wrote {} episode names to {}", names.len(), workflow.list_path().display());
            for (i, name) in names.iter().enumerate() {
                println!("  {:02}  {}", i + 1, name);
            }
        }
        Commands::Preview(target) => {
            let config = prepare(&workflow, &target, &cancel, &mut line).await?;
            let plan = workflow.preview(config)?;

            if plan.is_empty() {
                println!("✗ No matching files to rename in {}", target.dir.display());
            }
            for entry in &plan {
                println!("{}", entry.preview_row().concat());
            }
        }
        Commands::Rename { target, yes } => {
            let config = prepare(&workflow, &target, &cancel, &mut line).await?;

            let results = if yes {
                workflow.rename(config, &cancel)?
            } else {
                let directory = config.directory.clone();
                let title = format!("{} Season {:02}", config.show_title, config.season_num);
                let plan = workflow.preview(config)?;
                if plan.is_empty() {
                    println!("✗ No matching files to rename in {}", target.dir.display());
                    return Ok(());
                }
                tui::run_preview(title, directory, plan, cancel.clone()).await?
            };

            print_results(&results);
        }
        Commands::Clean => {
            workflow.clean_working_files()?;
            println!("✓ Removed downloaded files from {}", workflow.settings().working_dir.display());
        }
    }

    Ok(())
}

fn season_number(season: &str) -> anyhow::Result<u32> {
    parse_season_input(season).with_context(|| format!("could not parse season number '{}'", season))
}

async fn write_list(
    workflow: &Workflow,
    title: &str,
    season_num: u32,
    cancel: &CancellationToken,
    line: &mut ProgressLine,
) -> anyhow::Result<()> {
    let written = workflow
        .generate_episode_list(title, season_num, cancel, &mut |p: DownloadProgress| line.update(p))
        .await;
    line.finish();

    if !written? {
        bail!("no episode data available for '{}'", title.trim());
    }
    Ok(())
}

/// Refresh the episode list for the target season and build its rename config.
async fn prepare(
    workflow: &Workflow,
    target: &TargetArgs,
    cancel: &CancellationToken,
    line: &mut ProgressLine,
) -> anyhow::Result<RenameConfig> {
    let mut builder = workflow
        .config_builder(&target.dir)
        .show_title(target.title.clone())
        .season(target.season.clone())
        .extension(target.ext.clone());
    if target.template.is_some() {
        builder = builder.template(target.template.clone());
    }
    let config = builder.build()?;

    write_list(workflow, &target.title, config.season_num, cancel, line).await?;
    Ok(config)
}

fn print_results(results: &[RenameResult]) {
    if results.is_empty() {
        println!("No files were renamed.");
        return;
    }

    for result in results {
        match &result.outcome {
            RenameOutcome::Renamed { to } => {
                println!("✓ {} -> {}", result.entry.original_name, to)
            }
            RenameOutcome::Failed { error } => {
                println!("✗ {}: {}", result.entry.original_name, error)
            }
            RenameOutcome::Cancelled => println!("- {} (cancelled)", result.entry.original_name),
        }
    }

    let summary = RenameSummary::from_results(results);
    println!();
    println!(
        "Summary: {} of {} files renamed, {} failed, {} cancelled",
        summary.renamed, summary.total, summary.failed, summary.cancelled
    );
}
