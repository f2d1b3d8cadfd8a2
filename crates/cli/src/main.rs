//! Timeline CLI - structured timelines from program documents.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use timeline_core::{Dependency, EngineConfig, SectionMap};
use timeline_deps::DependencyMapper;
use timeline_engine::{project_schedule, TimelineEngine};
use timeline_estimate::DurationEstimator;
use timeline_extract::{MilestoneExtractor, Segmenter, StageDetector};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "timeline")]
#[command(about = "Extract a structured timeline from program documents", long_about = None)]
struct Cli {
    /// Engine configuration file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct InputArgs {
    /// Normalized text file
    input: PathBuf,

    /// Heading map file (JSON)
    #[arg(long)]
    sections: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the full structured timeline
    Plan {
        #[command(flatten)]
        input: InputArgs,
        /// Project stages onto the calendar from this date (YYYY-MM-DD)
        #[arg(long)]
        start: Option<NaiveDate>,
    },
    /// Show text segments
    Segments {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Detect stages
    Stages {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Extract milestones
    Milestones {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Estimate durations
    Durations {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Map dependencies
    Dependencies {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Check a dependency list for cycles
    Validate {
        /// Dependency list file (JSON)
        dependencies: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => EngineConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    let limits = config.limits;

    match cli.command {
        Commands::Plan { input, start } => {
            let (text, sections) = load_input(&input)?;
            let engine = TimelineEngine::new().with_config(config);
            let timeline = engine.create_structured_timeline(&text, sections.as_ref());

            let output = match start {
                Some(start) => serde_json::json!({
                    "timeline": serde_json::to_value(&timeline)?,
                    "schedule": serde_json::to_value(project_schedule(&timeline, start))?,
                }),
                None => serde_json::to_value(&timeline)?,
            };
            print_json(&output)?;
        }
        Commands::Segments { input } => {
            let (text, _) = load_input(&input)?;
            print_json(&Segmenter::new().segment_text(&text))?;
        }
        Commands::Stages { input } => {
            let (text, sections) = load_input(&input)?;
            let stages = StageDetector::with_limits(limits).detect_stages(&text, sections.as_ref());
            info!("Detected {} stages", stages.len());
            print_json(&stages)?;
        }
        Commands::Milestones { input } => {
            let (text, sections) = load_input(&input)?;
            let milestones =
                MilestoneExtractor::with_limits(limits).extract_milestones(&text, sections.as_ref(), None);
            info!("Extracted {} milestones", milestones.len());
            print_json(&milestones)?;
        }
        Commands::Durations { input } => {
            let (text, sections) = load_input(&input)?;
            let durations = DurationEstimator::with_config(config)
                .estimate_durations(&text, None, None, sections.as_ref());
            print_json(&durations)?;
        }
        Commands::Dependencies { input } => {
            let (text, sections) = load_input(&input)?;
            let dependencies =
                DependencyMapper::with_limits(limits).map_dependencies(&text, None, None, sections.as_ref());
            info!("Mapped {} dependencies", dependencies.len());
            print_json(&dependencies)?;
        }
        Commands::Validate { dependencies } => {
            let raw = std::fs::read_to_string(&dependencies)
                .with_context(|| format!("Failed to read {}", dependencies.display()))?;
            let list: Vec<Dependency> = serde_json::from_str(&raw)
                .with_context(|| format!("Invalid dependency list {}", dependencies.display()))?;

            timeline_deps::check(&list)?;
            println!("Dependency list is acyclic ({} edges)", list.len());
        }
    }

    Ok(())
}

/// Read the input text and the optional heading map.
fn load_input(args: &InputArgs) -> Result<(String, Option<SectionMap>)> {
    let text = read_text(&args.input)?;
    let sections = match &args.sections {
        Some(path) => Some(
            SectionMap::from_json_file(path)
                .with_context(|| format!("Failed to load heading map {}", path.display()))?,
        ),
        None => None,
    };
    debug!(
        "Loaded {} bytes of text, {} headings",
        text.len(),
        sections.as_ref().map_or(0, |s| s.sections.len())
    );
    Ok((text, sections))
}

fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
