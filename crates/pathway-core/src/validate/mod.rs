//! Structural checks run before a catalogue is saved.
//!
//! Validation never fails and never changes anything; it collects the names
//! of affected items under each kind of [`Problem`].

mod message;

pub use message::pluralise;

use std::collections::BTreeMap;
use std::fmt;

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::graph::LayoutLookup;
use crate::model::{
    Identified, Module, ModuleId, ModuleInfo, ModulePair, Named, Process, ProcessId, Product,
};

/// A kind of structural problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Problem {
    /// A positioned module that no route leads into
    DisconnectedModules,
    /// A process with no modules
    EmptyProcess,
    /// A default path that branches, stops early, loops or starts mid-graph
    InvalidDefaultRoute,
    /// A module used by no process
    OrphanModule,
    DuplicateModuleName,
    DuplicateProcessName,
    DuplicateProductName,
    /// One identifier on several processes or products
    DuplicateIdentifier,
}

impl Problem {
    /// Message template, see [`pluralise`].
    pub fn template(&self) -> &'static str {
        match self {
            Problem::DisconnectedModules => {
                "The following process{|es} contain{s|} modules with no routes. Those modules \
                 will not be linked to the process{|es} when the catalogue is saved:"
            }
            Problem::EmptyProcess => "The following process{|es} contain{s|} no modules:",
            Problem::InvalidDefaultRoute => {
                "The following process{|es} {has|have} invalid or missing default routes:"
            }
            Problem::OrphanModule => {
                "The following module{s} {is|are} not part of any process, and will not be \
                 included when the catalogue is saved:"
            }
            Problem::DuplicateModuleName => {
                "The following module name{s} {is|are} used more than once:"
            }
            Problem::DuplicateProcessName => {
                "The following process name{s} {is|are} used more than once:"
            }
            Problem::DuplicateProductName => {
                "The following product name{s} {is|are} used more than once:"
            }
            Problem::DuplicateIdentifier => {
                "The following identifier{s} {is|are} shared by more than one item:"
            }
        }
    }

    /// The heading for a list of `count` affected items.
    pub fn text(&self, count: usize) -> String {
        pluralise(self.template(), count)
    }
}

/// Problems found in a catalogue, grouped by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemReport {
    problems: BTreeMap<Problem, Vec<String>>,
}

impl ProblemReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `item` under `problem`.
    pub fn add(&mut self, problem: Problem, item: impl Into<String>) {
        self.problems.entry(problem).or_default().push(item.into());
    }

    pub fn has_problems(&self) -> bool {
        self.problems.values().any(|items| !items.is_empty())
    }

    /// Items recorded under `problem`, in discovery order.
    pub fn items(&self, problem: Problem) -> &[String] {
        self.problems.get(&problem).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Non-empty categories in a fixed order.
    pub fn iter(&self) -> impl Iterator<Item = (Problem, &[String])> {
        self.problems
            .iter()
            .filter(|(_, items)| !items.is_empty())
            .map(|(problem, items)| (*problem, items.as_slice()))
    }

    /// Total number of affected items.
    pub fn len(&self) -> usize {
        self.problems.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        !self.has_problems()
    }
}

impl fmt::Display for ProblemReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (problem, items) in self.iter() {
            if !first {
                writeln!(f)?;
            }
            first = false;
            writeln!(f, "{}", problem.text(items.len()))?;
            for item in items {
                writeln!(f, "  - {}", item)?;
            }
        }
        Ok(())
    }
}

/// Check processes, modules and products for structural problems.
///
/// `layouts` is consulted for processes that have a cached layout; a process
/// without one cannot have disconnected modules.
pub fn find_problems(
    processes: &[Process],
    layouts: &impl LayoutLookup,
    modules: &[ModuleInfo],
    products: &[Product],
) -> ProblemReport {
    let mut report = ProblemReport::new();
    let names: FxHashMap<ModuleId, &str> = modules
        .iter()
        .map(|info| (info.id, info.name.as_str()))
        .collect();
    let module_name = |module: Module| match module {
        Module::Step(id) => names.get(&id).copied().unwrap_or("?").to_string(),
        other => other.to_string(),
    };
    let mut used: FxHashSet<Module> = FxHashSet::default();

    for (index, process) in processes.iter().enumerate() {
        let targets = process.step_modules();
        let target_set: FxHashSet<Module> = targets.iter().copied().collect();

        if let Some(layout) = layouts.layout(ProcessId::new(index)) {
            let disconnected: Vec<String> = layout
                .modules()
                .filter(|m| !m.is_endpoint() && !target_set.contains(m))
                .map(module_name)
                .collect();
            if !disconnected.is_empty() {
                report.add(
                    Problem::DisconnectedModules,
                    format!("{} ({})", process.name, disconnected.join(", ")),
                );
            }
        }
        if targets.is_empty() {
            report.add(Problem::EmptyProcess, process.name.clone());
        }
        if !default_route_valid(&process.pairs) {
            report.add(Problem::InvalidDefaultRoute, process.name.clone());
        }
        used.extend(targets);
    }

    for info in modules {
        if !used.contains(&info.module()) {
            report.add(Problem::OrphanModule, info.name.clone());
        }
    }

    for name in duplicates(modules) {
        report.add(Problem::DuplicateModuleName, name);
    }
    for name in duplicates(processes) {
        report.add(Problem::DuplicateProcessName, name);
    }
    for name in duplicates(products) {
        report.add(Problem::DuplicateProductName, name);
    }

    let identified = processes
        .iter()
        .map(|p| (p.uuid(), p.name()))
        .chain(products.iter().map(|p| (p.uuid(), p.name())));
    for entry in shared_identifiers(identified) {
        report.add(Problem::DuplicateIdentifier, entry);
    }

    if report.has_problems() {
        tracing::debug!("Validation found {} problem items", report.len());
    }
    report
}

/// Names used more than once, each reported once in first-seen order.
fn duplicates<T: Named>(items: &[T]) -> Vec<String> {
    let mut counts: FxHashMap<&str, usize> = FxHashMap::default();
    for item in items {
        *counts.entry(item.name()).or_default() += 1;
    }
    let mut reported = FxHashSet::default();
    items
        .iter()
        .map(Named::name)
        .filter(|name| counts[name] > 1 && reported.insert(*name))
        .map(str::to_string)
        .collect()
}

/// `"<id>: <names>"` for each non-empty identifier carried by several items.
fn shared_identifiers<'a>(items: impl Iterator<Item = (&'a str, &'a str)>) -> Vec<String> {
    let mut order: Vec<&str> = Vec::new();
    let mut owners: FxHashMap<&str, Vec<&str>> = FxHashMap::default();
    for (id, name) in items.filter(|(id, _)| !id.is_empty()) {
        let names = owners.entry(id).or_default();
        if names.is_empty() {
            order.push(id);
        }
        names.push(name);
    }
    order
        .into_iter()
        .filter(|id| owners[id].len() > 1)
        .map(|id| format!("{}: {}", id, owners[id].join(", ")))
        .collect()
}

/// Whether the default routes form one unbranched path from `Start` to `End`.
///
/// Fails when two default routes leave the same module, when the path from
/// `Start` stops before `End` or loops, and when some default route is not on
/// the path from `Start`.
pub fn default_route_valid(pairs: &[ModulePair]) -> bool {
    let mut next: FxHashMap<Module, Module> = FxHashMap::default();
    for pair in pairs.iter().filter(|pair| pair.is_default) {
        if next.insert(pair.from, pair.to).is_some() {
            return false;
        }
    }

    let mut current = Module::Start;
    let mut length = 0;
    while current != Module::End {
        let Some(&to) = next.get(&current) else {
            return false;
        };
        current = to;
        length += 1;
        if length > next.len() {
            return false;
        }
    }
    length == next.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{ModuleLayout, Position};
    use crate::model::Catalogue;

    fn step(id: usize) -> Module {
        Module::Step(ModuleId::new(id))
    }

    fn pair(from: Module, to: Module, is_default: bool) -> ModulePair {
        ModulePair::new(from, to, is_default)
    }

    fn no_layouts() -> FxHashMap<ProcessId, ModuleLayout> {
        FxHashMap::default()
    }

    #[test]
    fn test_default_route_simple() {
        let a = step(0);
        assert!(default_route_valid(&[
            pair(Module::Start, a, true),
            pair(a, Module::End, true)
        ]));
    }

    #[test]
    fn test_default_route_branching() {
        let (a, b) = (step(0), step(1));
        assert!(!default_route_valid(&[
            pair(Module::Start, a, true),
            pair(Module::Start, b, true)
        ]));
    }

    #[test]
    fn test_default_route_dead_end() {
        assert!(!default_route_valid(&[pair(Module::Start, step(0), true)]));
        assert!(!default_route_valid(&[]));
    }

    #[test]
    fn test_default_route_fragment_not_from_start() {
        let (a, b) = (step(0), step(1));
        assert!(!default_route_valid(&[
            pair(Module::Start, a, false),
            pair(a, b, true),
            pair(b, Module::End, true)
        ]));
    }

    #[test]
    fn test_default_route_loop() {
        let (a, b) = (step(0), step(1));
        assert!(!default_route_valid(&[
            pair(Module::Start, a, true),
            pair(a, b, true),
            pair(b, a, true)
        ]));
    }

    #[test]
    fn test_default_route_ignores_optional_branches() {
        let (a, b) = (step(0), step(1));
        assert!(default_route_valid(&[
            pair(Module::Start, a, true),
            pair(Module::Start, b, false),
            pair(a, Module::End, true),
            pair(b, Module::End, false)
        ]));
    }

    fn sample() -> Catalogue {
        let mut catalogue = Catalogue::new();
        let a = catalogue.add_module("Library prep");
        let b = catalogue.add_module("Sequencing");
        catalogue.add_module("Unused");
        let mut process = Process::new("WGS");
        process.pairs = vec![
            pair(Module::Start, a, true),
            pair(a, b, true),
            pair(b, Module::End, true),
        ];
        catalogue.add_process(process);
        catalogue
    }

    #[test]
    fn test_disconnected_module_is_reported() {
        let mut catalogue = sample();
        let c = catalogue.add_module("Pooling");
        let mut process = Process::new("Pooled");
        process.pairs = vec![pair(Module::Start, step(0), true), pair(step(0), Module::End, true)];
        let id = catalogue.add_process(process);

        let mut layouts: FxHashMap<ProcessId, ModuleLayout> = FxHashMap::default();
        let mut layout = ModuleLayout::new();
        layout.insert(Module::Start, Position::new(0, 0));
        layout.insert(step(0), Position::new(0, 80));
        layout.insert(c, Position::new(160, 80));
        layout.insert(Module::End, Position::new(0, 160));
        layouts.insert(id, layout);

        let report = find_problems(
            &catalogue.processes,
            &layouts,
            catalogue.modules(),
            &catalogue.products,
        );
        assert_eq!(report.items(Problem::DisconnectedModules), ["Pooled (Pooling)"]);
        assert_eq!(report.items(Problem::OrphanModule), ["Unused", "Pooling"]);
    }

    #[test]
    fn test_empty_process_and_names() {
        let mut catalogue = sample();
        catalogue.add_process(Process::new("WGS"));
        catalogue.products.push(Product::new("Genome"));
        catalogue.products.push(Product::new("Genome"));
        catalogue.add_module("Sequencing");

        let report = find_problems(
            &catalogue.processes,
            &no_layouts(),
            catalogue.modules(),
            &catalogue.products,
        );
        assert_eq!(report.items(Problem::EmptyProcess), ["WGS"]);
        assert_eq!(report.items(Problem::InvalidDefaultRoute), ["WGS"]);
        assert_eq!(report.items(Problem::DuplicateProcessName), ["WGS"]);
        assert_eq!(report.items(Problem::DuplicateProductName), ["Genome"]);
        assert_eq!(report.items(Problem::DuplicateModuleName), ["Sequencing"]);
        assert!(report.items(Problem::DisconnectedModules).is_empty());
    }

    #[test]
    fn test_shared_identifiers() {
        let mut catalogue = sample();
        catalogue.processes[0].uuid = "abc".to_string();
        let mut product = Product::new("Genome");
        product.uuid = "abc".to_string();
        catalogue.products.push(product);
        // Empty identifiers are never considered shared
        catalogue.products.push(Product::new("Exome"));
        catalogue.products.push(Product::new("Panel"));

        let report = find_problems(
            &catalogue.processes,
            &no_layouts(),
            catalogue.modules(),
            &catalogue.products,
        );
        assert_eq!(report.items(Problem::DuplicateIdentifier), ["abc: WGS, Genome"]);
    }

    #[test]
    fn test_clean_catalogue_has_no_problems() {
        let mut catalogue = sample();
        catalogue.processes[0].pairs.push(pair(Module::Start, step(2), false));
        catalogue.processes[0].pairs.push(pair(step(2), Module::End, false));
        let report = find_problems(
            &catalogue.processes,
            &no_layouts(),
            catalogue.modules(),
            &catalogue.products,
        );
        assert!(!report.has_problems());
        assert!(report.is_empty());
        assert_eq!(report.to_string(), "");
    }

    #[test]
    fn test_report_rendering() {
        let mut report = ProblemReport::new();
        report.add(Problem::OrphanModule, "Pooling");
        report.add(Problem::EmptyProcess, "A");
        report.add(Problem::EmptyProcess, "B");
        assert_eq!(
            report.to_string(),
            "The following processes contain no modules:\n  - A\n  - B\n\n\
             The following module is not part of any process, and will not be included \
             when the catalogue is saved:\n  - Pooling\n"
        );
    }
}
