//! Validate command implementation for Pathway CLI.
//!
//! Loads a catalogue and reports its structural problems.

use pathway_core::PathwayConfig;

use crate::colors;
use crate::loader::{self, LoadedCatalogue};

/// Execute the validate command.
pub fn execute(catalogue_path: &str, config: &PathwayConfig) -> anyhow::Result<()> {
    let loaded = LoadedCatalogue::open(catalogue_path, config)?;

    colors::print_header("Pathway Validate", &loaded.display_name());
    loaded.report_cyclic();

    let report = loaded.problems();
    loader::print_report(&report);

    if report.has_problems() {
        anyhow::bail!(
            "{} {} found",
            report.len(),
            if report.len() == 1 { "problem" } else { "problems" }
        );
    }
    Ok(())
}
