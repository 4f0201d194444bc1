use anyhow::Context;
use clap::Args;

use mindflow_core::config::MindflowConfig;

use super::{MINDFLOW_DIR, Workspace, WorkspaceArgs};

#[derive(Args, Debug)]
pub struct InitArgs {
    #[command(flatten)]
    pub workspace: WorkspaceArgs,

    /// Overwrite an existing config file with the defaults
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: &InitArgs) -> anyhow::Result<()> {
    let root = std::fs::canonicalize(&args.workspace.path)
        .with_context(|| format!("Cannot resolve path: {}", args.workspace.path.display()))?;

    let dir = root.join(MINDFLOW_DIR);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Cannot create {}", dir.display()))?;

    let config_path = super::config_path(&root);
    if config_path.exists() && !args.force {
        println!(
            "MindFlow is already set up in {} (use --force to reset the config)",
            root.display()
        );
        return Ok(());
    }

    MindflowConfig::default()
        .save(&config_path)
        .with_context(|| format!("Cannot write config: {}", config_path.display()))?;

    let workspace = Workspace::resolve(&args.workspace)?;
    let mut store = workspace.open_store()?;
    super::save(&mut store)?;

    println!("Initialized MindFlow in {}", dir.display());
    println!("  Config:   {}", config_path.display());
    println!("  Database: {}", workspace.db_path().display());
    Ok(())
}
