use anyhow::Context;
use clap::Args;

use mindflow_core::store::SqliteStorage;

use super::{Workspace, WorkspaceArgs};

#[derive(Args, Debug)]
pub struct StatusArgs {
    #[command(flatten)]
    pub workspace: WorkspaceArgs,
}

pub fn run(args: &StatusArgs) -> anyhow::Result<()> {
    let workspace = Workspace::resolve(&args.workspace)?;
    let db_path = workspace.db_path();
    if !db_path.exists() {
        anyhow::bail!("Database not found: {}", db_path.display());
    }

    let key = &workspace.config.storage.key;
    let (size, updated_at) = {
        let storage = SqliteStorage::open(&db_path)
            .with_context(|| format!("Cannot open database: {}", db_path.display()))?;
        (storage.size_bytes(), storage.updated_at(key)?)
    };

    let store = workspace.open_store()?;
    let stats = store.stats();

    println!("MindFlow status for {}", workspace.root.display());
    println!();
    println!("  Database: {}", db_path.display());
    if size > 0 {
        println!("  Size:     {}", format_bytes(size));
    }
    println!("  Key:      {key}");
    println!(
        "  Saved:    {}",
        updated_at.as_deref().unwrap_or("(never)")
    );
    println!();

    println!("  Topics:  {} total", stats.nodes);
    println!("    {:<20} {:>6}", "visible", stats.visible_nodes);
    println!("    {:<20} {:>6}", "collapsed", stats.collapsed_nodes);
    println!("    {:<20} {:>6}", "floating", stats.floating_nodes);
    println!("    {:<20} {:>6}", "max depth", stats.max_depth);
    println!();
    println!("  Edges:   {} total", stats.edges);
    println!("    {:<20} {:>6}", "manual", stats.custom_edges);
    println!();

    match store.selected_node() {
        Some(node) => println!("  Selected: {} ({})", node.label(), node.id),
        None => println!("  Selected: (none)"),
    }
    if store.search_query().is_empty() {
        println!("  Search:   (none)");
    } else {
        println!("  Search:   \"{}\"", store.search_query());
    }

    Ok(())
}

#[allow(clippy::cast_precision_loss)]
fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
