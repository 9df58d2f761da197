//! Pathway CLI - Catalogue route editor for laboratory processes.

mod colors;
mod config;
mod copy_routes;
mod edit;
mod layout;
mod loader;
mod normalize;
mod validate;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "pathway")]
#[command(about = "Catalogue route editor for laboratory processes")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to a config file (default: <config dir>/pathway/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a catalogue for structural problems
    Validate {
        /// Path to the catalogue (.json file)
        catalogue: String,
    },

    /// Print the automatic layout of each process
    Layout {
        /// Path to the catalogue (.json file)
        catalogue: String,

        /// Only lay out this process
        #[arg(long)]
        process: Option<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Replay a gesture script against one process and save
    Edit {
        /// Path to the catalogue (.json file)
        catalogue: String,

        /// Name of the process to edit
        #[arg(long)]
        process: String,

        /// Gesture script, one gesture per line
        #[arg(long)]
        script: String,

        /// Output path (default: overwrite the catalogue)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Replace one process's routes with a copy of another's
    CopyRoutes {
        /// Path to the catalogue (.json file)
        catalogue: String,

        /// Process to copy from
        #[arg(long)]
        from: String,

        /// Process to paste into
        #[arg(long)]
        to: String,

        /// Output path (default: overwrite the catalogue)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Assign identifiers to processes and products that lack them
    Normalize {
        /// Path to the catalogue (.json file)
        catalogue: String,

        /// Replace every identifier, not only missing ones
        #[arg(long)]
        force: bool,

        /// Output path (default: overwrite the catalogue)
        #[arg(short, long)]
        output: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        tracing_subscriber::EnvFilter::from_default_env()
            .add_directive(tracing::Level::DEBUG.into())
    } else {
        tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    // Helper to format pathway-core errors with recovery hints
    let format_error = |err: anyhow::Error| -> anyhow::Error {
        if let Some(core_err) = err.downcast_ref::<pathway_core::Error>() {
            anyhow::anyhow!("{}", core_err.with_hint())
        } else {
            err
        }
    };

    let config = config::load(cli.config.as_deref()).map_err(format_error)?;

    match cli.command {
        Commands::Validate { catalogue } => {
            validate::execute(&catalogue, &config).map_err(format_error)?;
        }

        Commands::Layout {
            catalogue,
            process,
            json,
        } => {
            layout::execute(&catalogue, process.as_deref(), json, &config).map_err(format_error)?;
        }

        Commands::Edit {
            catalogue,
            process,
            script,
            output,
        } => {
            edit::execute(&catalogue, &process, &script, output.as_deref(), &config)
                .map_err(format_error)?;
        }

        Commands::CopyRoutes {
            catalogue,
            from,
            to,
            output,
        } => {
            copy_routes::execute(&catalogue, &from, &to, output.as_deref(), &config)
                .map_err(format_error)?;
        }

        Commands::Normalize {
            catalogue,
            force,
            output,
        } => {
            normalize::execute(&catalogue, force, output.as_deref(), &config)
                .map_err(format_error)?;
        }
    }

    Ok(())
}
