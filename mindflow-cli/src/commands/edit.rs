use anyhow::Context;
use clap::Args;

use mindflow_core::types::{
    ANIMATION_STYLES, Attachment, AttachmentKind, NodePatch, Priority, is_palette_color,
};

use super::{Workspace, WorkspaceArgs};

#[derive(Args, Debug)]
#[allow(clippy::struct_excessive_bools)]
pub struct EditArgs {
    #[command(flatten)]
    pub workspace: WorkspaceArgs,

    /// Topic id
    pub id: String,

    #[arg(long)]
    pub label: Option<String>,

    /// Accent colour, e.g. `#F97316`
    #[arg(long, conflicts_with = "clear_color")]
    pub color: Option<String>,

    #[arg(long)]
    pub clear_color: bool,

    /// Animation style: pulse, float, glow, none
    #[arg(long)]
    pub animation: Option<String>,

    /// Free-form notes (an empty string clears them)
    #[arg(long)]
    pub notes: Option<String>,

    /// Add a tag (repeatable)
    #[arg(long = "tag")]
    pub tags: Vec<String>,

    /// Remove a tag (repeatable)
    #[arg(long = "untag")]
    pub untags: Vec<String>,

    /// Priority: low, medium, high
    #[arg(long, conflicts_with = "clear_priority")]
    pub priority: Option<Priority>,

    #[arg(long)]
    pub clear_priority: bool,

    /// Attach a link
    #[arg(long, group = "attach")]
    pub link: Option<String>,

    /// Attach an image URL
    #[arg(long, group = "attach")]
    pub image: Option<String>,

    /// Attach a file URL
    #[arg(long, group = "attach")]
    pub file: Option<String>,

    /// Title for the attachment (defaults to its URL)
    #[arg(long)]
    pub title: Option<String>,

    /// Remove the attachment
    #[arg(long, conflicts_with = "attach")]
    pub clear_attachment: bool,
}

pub fn run(args: EditArgs) -> anyhow::Result<()> {
    let workspace = Workspace::resolve(&args.workspace)?;
    let mut store = workspace.open_store()?;
    let id = super::node_id(&args.id);
    let node = store
        .node(&id)
        .with_context(|| format!("No topic with id `{id}`"))?;

    if let Some(animation) = args
        .animation
        .as_deref()
        .filter(|a| !ANIMATION_STYLES.contains(a))
    {
        tracing::warn!(animation, "Unrecognized animation style, storing as given");
    }
    if let Some(color) = args.color.as_deref().filter(|c| !is_palette_color(c)) {
        tracing::warn!(color, "Colour is not in the editor palette, storing as given");
    }

    // Tags are merged against the current set so repeated edits accumulate.
    let tags = if args.tags.is_empty() && args.untags.is_empty() {
        None
    } else {
        let mut data = node.data.clone();
        for tag in &args.tags {
            data.add_tag(tag);
        }
        for tag in &args.untags {
            data.remove_tag(tag.trim());
        }
        Some(data.tags.unwrap_or_default())
    };

    let attachment = [
        (AttachmentKind::Link, args.link),
        (AttachmentKind::Image, args.image),
        (AttachmentKind::File, args.file),
    ]
    .into_iter()
    .find_map(|(kind, url)| url.map(|url| Attachment::new(kind, url, args.title.clone())));

    let mut patch = NodePatch::default();
    if let Some(label) = args.label {
        patch = patch.label(label);
    }
    if let Some(color) = args.color {
        patch = patch.color(Some(color));
    } else if args.clear_color {
        patch = patch.color(None);
    }
    if let Some(animation) = args.animation {
        patch = patch.animation(Some(animation));
    }
    if let Some(notes) = args.notes {
        patch = patch.notes(Some(notes));
    }
    if let Some(tags) = tags {
        patch = patch.tags(tags);
    }
    if let Some(priority) = args.priority {
        patch = patch.priority(Some(priority));
    } else if args.clear_priority {
        patch = patch.priority(None);
    }
    if let Some(attachment) = attachment {
        patch = patch.attachment(Some(attachment));
    } else if args.clear_attachment {
        patch = patch.attachment(None);
    }

    if patch.is_empty() {
        println!("Nothing to change for {id}");
        return Ok(());
    }

    store.update_node_data(&id, patch);
    super::save(&mut store)?;
    println!("Updated {id}");
    Ok(())
}
