//! Normalize command implementation for Pathway CLI.
//!
//! Assigns identifiers to processes and products that lack them, then saves.

use pathway_core::PathwayConfig;

use crate::colors;
use crate::loader::LoadedCatalogue;

/// Execute the normalize command.
pub fn execute(
    catalogue_path: &str,
    force: bool,
    output: Option<&str>,
    config: &PathwayConfig,
) -> anyhow::Result<()> {
    let mut loaded = LoadedCatalogue::open(catalogue_path, config)?;

    colors::print_header("Pathway Normalize", &loaded.display_name());
    loaded.report_cyclic();

    let assigned = loaded.catalogue.fill_in_uuids(force);
    println!(
        "  Assigned {}{}{} identifier{}",
        colors::BOLD,
        assigned,
        colors::RESET,
        if assigned == 1 { "" } else { "s" }
    );

    loaded.save(output)?;
    Ok(())
}
