use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use mindflow_core::transfer;

use super::{Workspace, WorkspaceArgs};

#[derive(Args, Debug)]
pub struct ImportArgs {
    #[command(flatten)]
    pub workspace: WorkspaceArgs,

    /// JSON document previously written by `mindflow export`
    pub file: PathBuf,
}

pub fn run(args: &ImportArgs) -> anyhow::Result<()> {
    let workspace = Workspace::resolve(&args.workspace)?;
    let text = std::fs::read_to_string(&args.file)
        .with_context(|| format!("Cannot read {}", args.file.display()))?;

    // Parse before touching the database so a bad file leaves the map as-is.
    let snapshot = transfer::parse_import(&text)
        .with_context(|| format!("Cannot import {}", args.file.display()))?;

    let mut store = workspace.open_store()?;
    let report = store
        .import_mind_map(snapshot)
        .with_context(|| format!("Cannot import {}", args.file.display()))?;
    super::save(&mut store)?;

    println!(
        "Imported {} topics and {} edges",
        store.nodes().len(),
        store.edges().len()
    );
    if !report.is_clean() {
        println!("  Repaired: {report}");
    }
    Ok(())
}
