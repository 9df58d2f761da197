//! Layout command implementation for Pathway CLI.
//!
//! Prints the automatic layout of one or all processes, as text or JSON.

use pathway_core::{Catalogue, ModuleLayout, PathwayConfig, Position};
use serde_json::json;

use crate::colors;
use crate::loader::LoadedCatalogue;

/// Execute the layout command.
pub fn execute(
    catalogue_path: &str,
    process: Option<&str>,
    as_json: bool,
    config: &PathwayConfig,
) -> anyhow::Result<()> {
    let loaded = LoadedCatalogue::open(catalogue_path, config)?;

    let ids = match process {
        Some(name) => vec![loaded.process_id(name)?],
        None => loaded.catalogue.iter_processes().map(|(id, _)| id).collect(),
    };

    if !as_json {
        colors::print_header("Pathway Layout", &loaded.display_name());
    }
    loaded.report_cyclic();

    let mut documents = Vec::new();
    for id in ids {
        let Some(entry) = loaded.catalogue.process(id) else {
            continue;
        };
        let rows = loaded
            .layouts
            .get(id)
            .map(|layout| sorted_positions(&loaded.catalogue, layout))
            .unwrap_or_default();

        if as_json {
            let modules: Vec<_> = rows
                .iter()
                .map(|(name, pos)| json!({ "module": name, "x": pos.x, "y": pos.y }))
                .collect();
            documents.push(json!({
                "process": entry.name,
                "cyclic": loaded.is_cyclic(id),
                "modules": modules,
            }));
            continue;
        }

        println!("\n{}{}{}", colors::CYAN, entry.name, colors::RESET);
        if loaded.is_cyclic(id) {
            println!("  {}(no layout: cyclic routes){}", colors::DIM, colors::RESET);
            continue;
        }
        for (name, pos) in &rows {
            println!("  {:<24} {:>6} {:>6}", name, pos.x, pos.y);
        }
    }

    if as_json {
        println!("{}", serde_json::to_string_pretty(&documents)?);
    }
    Ok(())
}

/// Module names with positions, top to bottom then left to right.
fn sorted_positions(catalogue: &Catalogue, layout: &ModuleLayout) -> Vec<(String, Position)> {
    let mut rows: Vec<_> = layout
        .iter()
        .map(|(module, pos)| (catalogue.module_name(module).to_string(), pos))
        .collect();
    rows.sort_by_key(|(_, pos)| (pos.y, pos.x));
    rows
}
