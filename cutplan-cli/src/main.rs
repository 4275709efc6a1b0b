//! cutplan - CLI tool to price and nest furniture cut lists.

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use cutplan_core::{build_summary, validate_project, Project, ProjectData, SummaryOptions};

/// Price and nest a furniture cut list from a workspace JSON document.
#[derive(Parser, Debug)]
#[command(name = "cutplan")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input workspace JSON file (catalog, templates, settings, project)
    #[arg(short, long)]
    input: PathBuf,

    /// Output JSON file path (stdout if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Validate templates and pieces only, don't build the summary
    #[arg(long)]
    validate: bool,

    /// Disable 90-degree rotation during nesting
    #[arg(long)]
    no_rotate: bool,

    /// Pretty-print the output JSON
    #[arg(long)]
    pretty: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// On-disk workspace document.
#[derive(Debug, Deserialize)]
struct Workspace {
    #[serde(flatten)]
    data: ProjectData,
    project: Project,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!("Processing: {}", args.input.display());

    let content = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let workspace: Workspace = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", args.input.display()))?;

    info!(
        "Loaded project '{}' with {} item(s)",
        workspace.project.name,
        workspace.project.items.len()
    );

    // Validate
    let validation = validate_project(&workspace.project, &workspace.data);

    for warning in &validation.warnings {
        warn!("{}", warning);
    }

    for err in &validation.errors {
        error!("{}", err);
    }

    if args.validate {
        if !validation.passed {
            anyhow::bail!("Validation failed");
        }
        info!("Validation passed");
        return Ok(());
    }

    // Build the summary
    let options = SummaryOptions {
        allow_rotate: args.no_rotate.then_some(false),
        ..Default::default()
    };
    let summary = build_summary(&workspace.project, &workspace.data, &options)?;

    for diagnostic in &summary.diagnostics {
        warn!("{}", diagnostic);
    }

    for nesting in &summary.nesting {
        info!(
            "{}: {} sheet(s), buy {}, {} unplaced",
            nesting.board.name,
            nesting.result.total_sheets,
            nesting.purchase_sheets,
            nesting.result.unplaced_count
        );
    }
    info!("Total: {:.2}", summary.costs.total);

    let json = if args.pretty {
        serde_json::to_string_pretty(&summary)?
    } else {
        serde_json::to_string(&summary)?
    };

    match args.output {
        Some(path) => {
            std::fs::write(&path, &json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Written: {}", path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}
