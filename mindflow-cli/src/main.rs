use clap::Parser;

use mindflow_core::error::{ConfigError, MindflowError, StoreError, TemplateError, TransferError};

mod commands;

#[derive(Parser, Debug)]
#[command(
    name = "mindflow",
    version,
    about = "Build, search, and export mind maps from the terminal"
)]
struct Cli {
    #[command(subcommand)]
    command: commands::Command,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    quiet: bool,
}

/// Classify an error into a process exit code.
///
/// Exit codes:
///   0: success
///   1: general/unknown error
///   2: configuration error
///   3: workspace not found / not initialized
///   4: database error
///   5: invalid import document
///   6: unknown template
///   7: attempted to delete the root node
fn classify_exit_code(err: &anyhow::Error) -> i32 {
    // Typed errors decide first; contexts may carry arbitrary file paths.
    if let Some(code) = err.chain().find_map(typed_exit_code) {
        return code;
    }

    let lower = format!("{err:#}").to_lowercase();
    if lower.contains("not initialized") || lower.contains("cannot resolve path") {
        3 // workspace not found
    } else if lower.starts_with("database not found") {
        4 // database error
    } else {
        1 // general error
    }
}

fn typed_exit_code(cause: &(dyn std::error::Error + 'static)) -> Option<i32> {
    if let Some(err) = cause.downcast_ref::<MindflowError>() {
        return Some(match err {
            MindflowError::Store(e) => store_exit_code(e),
            MindflowError::Transfer(e) => transfer_exit_code(e),
            MindflowError::Template(_) => 6,
            MindflowError::Config(_) => 2,
        });
    }
    if let Some(e) = cause.downcast_ref::<StoreError>() {
        return Some(store_exit_code(e));
    }
    if let Some(e) = cause.downcast_ref::<TransferError>() {
        return Some(transfer_exit_code(e));
    }
    if cause.downcast_ref::<TemplateError>().is_some() {
        return Some(6);
    }
    if cause.downcast_ref::<ConfigError>().is_some() {
        return Some(2);
    }
    None
}

fn store_exit_code(err: &StoreError) -> i32 {
    match err {
        StoreError::RootProtected => 7,
        StoreError::Sqlite(_) | StoreError::Serialization(_) | StoreError::Schema(_) => 4,
    }
}

fn transfer_exit_code(err: &TransferError) -> i32 {
    match err {
        TransferError::Parse(_) | TransferError::InvalidFormat(_) | TransferError::Validation(_) => 5,
        TransferError::Export(_) => 1,
    }
}

fn main() {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity
    let filter = match (cli.quiet, cli.verbose) {
        (true, _) => "error",
        (_, 0) => "warn",
        (_, 1) => "info",
        (_, 2) => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .init();

    match commands::run(cli.command) {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(classify_exit_code(&e));
        }
    }
}
