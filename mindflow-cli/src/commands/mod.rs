pub mod add;
pub mod clear;
pub mod connect;
pub mod delete;
pub mod edit;
pub mod export;
pub mod import;
pub mod init;
pub mod move_node;
pub mod search;
pub mod select;
pub mod show;
pub mod status;
pub mod templates;
pub mod toggle;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Subcommand};

use mindflow_core::config::MindflowConfig;
use mindflow_core::render::RenderOptions;
use mindflow_core::store::{MindMapStore, SqliteStorage};

/// Directory holding the config file and database.
pub const MINDFLOW_DIR: &str = ".mindflow";
pub const CONFIG_FILE: &str = "config.toml";

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a `.mindflow` workspace with a default config and an empty map
    Init(init::InitArgs),
    /// Show storage details and map statistics
    Status(status::StatusArgs),
    /// Print the visible mind map as an indented tree
    Show(show::ShowArgs),
    /// Add a topic under a parent (default: the root)
    Add(add::AddArgs),
    /// Edit a topic's label, colour, notes, tags, priority, or attachment
    Edit(edit::EditArgs),
    /// Move a topic to a canvas position
    Move(move_node::MoveArgs),
    /// Collapse or expand a topic
    Toggle(toggle::ToggleArgs),
    /// Select a topic, or clear the selection
    Select(select::SelectArgs),
    /// Set or clear the search filter
    Search(search::SearchArgs),
    /// Draw a manual connection between two topics
    Connect(connect::ConnectArgs),
    /// Delete a topic and everything below it
    Delete(delete::DeleteArgs),
    /// Reset the map to a single root topic
    Clear(clear::ClearArgs),
    /// List templates, or replace the map with one
    Templates(templates::TemplatesArgs),
    /// Write the map to a JSON file
    Export(export::ExportArgs),
    /// Replace the map with the contents of a JSON file
    Import(import::ImportArgs),
}

pub fn run(cmd: Command) -> anyhow::Result<()> {
    match cmd {
        Command::Init(args) => init::run(&args),
        Command::Status(args) => status::run(&args),
        Command::Show(args) => show::run(&args),
        Command::Add(args) => add::run(args),
        Command::Edit(args) => edit::run(args),
        Command::Move(args) => move_node::run(&args),
        Command::Toggle(args) => toggle::run(&args),
        Command::Select(args) => select::run(&args),
        Command::Search(args) => search::run(args),
        Command::Connect(args) => connect::run(&args),
        Command::Delete(args) => delete::run(&args),
        Command::Clear(args) => clear::run(&args),
        Command::Templates(args) => templates::run(&args),
        Command::Export(args) => export::run(&args),
        Command::Import(args) => import::run(&args),
    }
}

/// `--path` option shared by every command.
#[derive(Args, Debug, Clone)]
pub struct WorkspaceArgs {
    /// Directory containing the `.mindflow` workspace (default: current directory)
    #[arg(long, default_value = ".")]
    pub path: PathBuf,
}

/// An initialized workspace: resolved paths plus its loaded config.
#[derive(Debug)]
pub struct Workspace {
    pub root: PathBuf,
    pub config: MindflowConfig,
}

impl Workspace {
    pub fn resolve(args: &WorkspaceArgs) -> anyhow::Result<Self> {
        let root = std::fs::canonicalize(&args.path)
            .with_context(|| format!("Cannot resolve path: {}", args.path.display()))?;

        if !root.join(MINDFLOW_DIR).is_dir() {
            anyhow::bail!(
                "MindFlow is not initialized in {}. Run `mindflow init` first.",
                root.display()
            );
        }

        let config_path = config_path(&root);
        let config = MindflowConfig::load(&config_path)
            .with_context(|| format!("Cannot load config: {}", config_path.display()))?;

        Ok(Self { root, config })
    }

    pub fn db_path(&self) -> PathBuf {
        self.root.join(MINDFLOW_DIR).join(&self.config.storage.db_file)
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions::from(&self.config.render)
    }

    /// Open the store over the workspace database.
    pub fn open_store(&self) -> anyhow::Result<MindMapStore> {
        let db_path = self.db_path();
        let storage = SqliteStorage::open(&db_path)
            .with_context(|| format!("Cannot open database: {}", db_path.display()))?;
        MindMapStore::from_config(Box::new(storage), &self.config)
            .with_context(|| format!("Cannot load mind map from database: {}", db_path.display()))
    }
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(MINDFLOW_DIR).join(CONFIG_FILE)
}

/// Make sure the final state reached the database before exiting.
pub fn save(store: &mut MindMapStore) -> anyhow::Result<()> {
    if let Some(error) = store.last_persist_error() {
        tracing::warn!(error, "An earlier write failed, retrying");
    }
    store
        .flush()
        .context("Failed to write mind map to database")
}

/// Parse the id argument used by most commands.
pub fn node_id(raw: &str) -> mindflow_core::types::NodeId {
    mindflow_core::types::NodeId::from(raw.trim())
}

/// Fail with a readable message when `id` is not in the map.
pub fn require_node(store: &MindMapStore, id: &mindflow_core::types::NodeId) -> anyhow::Result<()> {
    if store.node(id).is_none() {
        anyhow::bail!("No topic with id `{id}`");
    }
    Ok(())
}
