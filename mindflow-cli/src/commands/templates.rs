use clap::Args;

use mindflow_core::templates;

use super::{Workspace, WorkspaceArgs};

#[derive(Args, Debug)]
pub struct TemplatesArgs {
    #[command(flatten)]
    pub workspace: WorkspaceArgs,

    /// Replace the current map with this template
    #[arg(long, value_name = "ID")]
    pub apply: Option<String>,
}

pub fn run(args: &TemplatesArgs) -> anyhow::Result<()> {
    let Some(template_id) = &args.apply else {
        for summary in templates::available_templates() {
            println!("{:<18} {} ({} topics)", summary.id, summary.name, summary.node_count);
            println!("{:<18} {}", "", summary.description);
            if !summary.tags.is_empty() {
                println!("{:<18} tags: {}", "", summary.tags.join(", "));
            }
        }
        return Ok(());
    };

    let workspace = Workspace::resolve(&args.workspace)?;
    let mut store = workspace.open_store()?;
    store.apply_template(template_id)?;
    super::save(&mut store)?;
    println!(
        "Applied template {template_id} ({} topics)",
        store.nodes().len()
    );
    Ok(())
}
