use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use clap::Args;

use mindflow_core::transfer::ExportDocument;

use super::{Workspace, WorkspaceArgs};

#[derive(Args, Debug)]
pub struct ExportArgs {
    #[command(flatten)]
    pub workspace: WorkspaceArgs,

    /// Output file (default: `mindflow_<date>.json` in the workspace directory)
    #[arg(long, short)]
    pub out: Option<PathBuf>,

    /// Write the document to stdout instead of a file
    #[arg(long, conflicts_with = "out")]
    pub stdout: bool,
}

pub fn run(args: &ExportArgs) -> anyhow::Result<()> {
    let workspace = Workspace::resolve(&args.workspace)?;
    let store = workspace.open_store()?;

    let doc = ExportDocument::new(store.snapshot(), Utc::now());
    let json = doc.to_json()?;

    if args.stdout {
        println!("{json}");
        return Ok(());
    }

    let out = args
        .out
        .clone()
        .unwrap_or_else(|| workspace.root.join(doc.file_name()));
    std::fs::write(&out, json).with_context(|| format!("Cannot write {}", out.display()))?;
    tracing::info!(path = %out.display(), nodes = doc.nodes.len(), "Exported mind map");
    println!(
        "Exported {} topics and {} edges to {}",
        doc.nodes.len(),
        doc.edges.len(),
        out.display()
    );
    Ok(())
}
