//! Shared catalogue loading for the Pathway CLI.
//!
//! Every command starts the same way: read the catalogue, lay out each
//! process, and warn about the ones whose routes contain a cycle.

use std::path::{Path, PathBuf};
use std::time::Instant;

use pathway_core::{
    Catalogue, Error, LayoutCache, PathwayConfig, ProblemReport, ProcessId, find_problems,
};

use crate::colors;

/// A catalogue together with the layouts of its processes.
pub struct LoadedCatalogue {
    /// Path the catalogue was read from.
    pub path: PathBuf,
    /// The catalogue itself.
    pub catalogue: Catalogue,
    /// Layouts of every process that could be laid out.
    pub layouts: LayoutCache,
    /// Processes that could not be laid out, with the reason.
    pub cyclic: Vec<(ProcessId, Error)>,
}

impl LoadedCatalogue {
    /// Load a catalogue file and lay out all of its processes.
    pub fn open(path: &str, config: &PathwayConfig) -> anyhow::Result<Self> {
        let path = Path::new(path);
        if !path.exists() {
            anyhow::bail!("Catalogue not found: {}", path.display());
        }

        let catalogue = pathway_json::load_catalogue(path)?;
        let mut layouts = LayoutCache::new(config.layout);
        let cyclic = layouts.lay_out_all(&catalogue);

        Ok(Self {
            path: path.to_path_buf(),
            catalogue,
            layouts,
            cyclic,
        })
    }

    /// File name of the catalogue for display.
    pub fn display_name(&self) -> String {
        self.path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string()
    }

    /// Warn about each process that could not be laid out.
    pub fn report_cyclic(&self) {
        for (id, err) in &self.cyclic {
            let Some(process) = self.catalogue.process(*id) else {
                continue;
            };
            eprintln!(
                "{}warning:{} process '{}' cannot be laid out: {}",
                colors::YELLOW,
                colors::RESET,
                process.name,
                err.with_hint()
            );
        }
    }

    /// Whether the process could not be laid out.
    pub fn is_cyclic(&self, id: ProcessId) -> bool {
        self.cyclic.iter().any(|(cyclic, _)| *cyclic == id)
    }

    /// Look up a process by name.
    pub fn process_id(&self, name: &str) -> anyhow::Result<ProcessId> {
        self.catalogue
            .find_process(name)
            .ok_or_else(|| anyhow::anyhow!("No process named '{}'", name))
    }

    /// Run the structural checks against the cached layouts.
    pub fn problems(&self) -> ProblemReport {
        find_problems(
            &self.catalogue.processes,
            &self.layouts,
            self.catalogue.modules(),
            &self.catalogue.products,
        )
    }

    /// Save to `output`, or back to the file it came from.
    pub fn save(&self, output: Option<&str>) -> anyhow::Result<PathBuf> {
        let target = output.map(PathBuf::from).unwrap_or_else(|| self.path.clone());
        let start = Instant::now();

        print!(
            "  Saving {} ... ",
            target.file_name().unwrap_or_default().to_string_lossy()
        );
        colors::flush_stdout();

        pathway_json::save_catalogue(&self.catalogue, &target)?;

        println!(
            "{}✓{} ({:.2}ms)",
            colors::GREEN,
            colors::RESET,
            start.elapsed().as_secs_f64() * 1000.0
        );
        Ok(target)
    }
}

/// Print a problem report, or a note that there is nothing to report.
pub fn print_report(report: &ProblemReport) {
    if !report.has_problems() {
        println!("{}No problems found.{}", colors::GREEN, colors::RESET);
        return;
    }
    for (problem, items) in report.iter() {
        println!(
            "{}{}{}",
            colors::YELLOW,
            problem.text(items.len()),
            colors::RESET
        );
        for item in items {
            println!("  - {}", item);
        }
    }
}
