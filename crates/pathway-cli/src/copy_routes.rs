//! Copy-routes command implementation for Pathway CLI.
//!
//! Replaces one process's routes and layout with a copy of another's.

use anyhow::Context;
use pathway_core::{CopiedModuleMap, Module, ModuleLayout, PathwayConfig};
use rustc_hash::FxHashSet;

use crate::colors;
use crate::loader::LoadedCatalogue;

/// Execute the copy-routes command.
pub fn execute(
    catalogue_path: &str,
    from: &str,
    to: &str,
    output: Option<&str>,
    config: &PathwayConfig,
) -> anyhow::Result<()> {
    let mut loaded = LoadedCatalogue::open(catalogue_path, config)?;

    colors::print_header("Pathway Copy Routes", &loaded.display_name());
    loaded.report_cyclic();

    let source = loaded.process_id(from)?;
    let target = loaded.process_id(to)?;
    if source == target {
        anyhow::bail!("Cannot copy routes of '{}' onto itself", from);
    }

    let source_layout = loaded
        .layouts
        .get(source)
        .with_context(|| format!("Process '{}' has no layout to copy", from))?;
    let source_pairs = loaded
        .catalogue
        .process(source)
        .map(|process| process.pairs.as_slice())
        .unwrap_or_default();
    let mut copied = CopiedModuleMap::new(source_layout, source_pairs);

    // Only modules the catalogue still knows about survive the paste
    let mut known: FxHashSet<Module> = loaded
        .catalogue
        .modules()
        .iter()
        .map(|info| info.module())
        .collect();
    known.insert(Module::Start);
    known.insert(Module::End);
    copied.filter(&known);

    let process = loaded
        .catalogue
        .process_mut(target)
        .with_context(|| format!("No process named '{}'", to))?;
    let mut layout = ModuleLayout::new();
    copied.paste_into(&mut process.pairs, &mut layout);
    let route_count = process.pairs.len();

    loaded.layouts.insert(target, layout);
    loaded.cyclic.retain(|(id, _)| *id != target);

    println!(
        "  Copied {}{}{} routes from {} to {}",
        colors::BOLD,
        route_count,
        colors::RESET,
        from,
        to
    );

    loaded.save(output)?;
    Ok(())
}
