//! Processes, products and the catalogue that owns them.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use super::module::{Module, ModuleId, ModuleInfo, ModulePair, graph_modules};

/// Something with a display name.
pub trait Named {
    fn name(&self) -> &str;
}

/// Something with an external identifier (a UUID string, possibly empty).
pub trait Identified {
    fn uuid(&self) -> &str;
}

/// Index of a process within its catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProcessId(pub(crate) usize);

impl ProcessId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn as_usize(&self) -> usize {
        self.0
    }
}

/// A unit of work whose optional steps are described by a route graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Process {
    pub name: String,
    pub uuid: String,
    /// Turnaround time in days
    pub tat: i32,
    pub process_class: String,
    /// Routes in insertion order
    pub pairs: Vec<ModulePair>,
}

impl Process {
    pub const DEFAULT_TAT: i32 = 1;
    pub const DEFAULT_CLASS: &'static str = "sequencing";

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            uuid: String::new(),
            tat: Self::DEFAULT_TAT,
            process_class: Self::DEFAULT_CLASS.to_string(),
            pairs: Vec::new(),
        }
    }

    /// Named steps that some route leads into, in first-seen order.
    pub fn step_modules(&self) -> Vec<Module> {
        let mut seen = FxHashSet::default();
        self.pairs
            .iter()
            .map(|pair| pair.to)
            .filter(|to| *to != Module::End && seen.insert(*to))
            .collect()
    }

    /// Every module the route graph needs a position for, see [`graph_modules`].
    pub fn graph_modules(&self) -> Vec<Module> {
        graph_modules(&self.pairs)
    }
}

impl Named for Process {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Identified for Process {
    fn uuid(&self) -> &str {
        &self.uuid
    }
}

/// Something a customer can order: a sequence of processes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    pub uuid: String,
    pub description: String,
    pub product_version: i32,
    pub availability: i32,
    /// Requested biomaterial type
    pub bio_type: String,
    pub processes: Vec<ProcessId>,
}

impl Product {
    pub const DEFAULT_VERSION: i32 = 1;
    pub const DEFAULT_AVAILABILITY: i32 = 1;
    pub const DEFAULT_BIO_TYPE: &'static str = "dna/rna";

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            uuid: String::new(),
            description: String::new(),
            product_version: Self::DEFAULT_VERSION,
            availability: Self::DEFAULT_AVAILABILITY,
            bio_type: Self::DEFAULT_BIO_TYPE.to_string(),
            processes: Vec::new(),
        }
    }
}

impl Named for Product {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Identified for Product {
    fn uuid(&self) -> &str {
        &self.uuid
    }
}

impl Named for ModuleInfo {
    fn name(&self) -> &str {
        &self.name
    }
}

/// The document being edited: modules, processes and products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalogue {
    pub pipeline: String,
    pub url: String,
    pub lims_id: String,
    /// Named modules; a module's id is its index here
    modules: Vec<ModuleInfo>,
    pub processes: Vec<Process>,
    pub products: Vec<Product>,
}

impl Catalogue {
    pub const DEFAULT_PIPELINE: &'static str = "Genomics Pipeline";
    pub const DEFAULT_URL: &'static str = "http://localhost:3400";
    pub const DEFAULT_LIMS_ID: &'static str = "SQSC";

    /// Create an empty catalogue with default header fields.
    pub fn new() -> Self {
        Self {
            pipeline: Self::DEFAULT_PIPELINE.to_string(),
            url: Self::DEFAULT_URL.to_string(),
            lims_id: Self::DEFAULT_LIMS_ID.to_string(),
            modules: Vec::new(),
            processes: Vec::new(),
            products: Vec::new(),
        }
    }

    /// The node the next call to [`add_module`](Self::add_module) will return.
    pub fn next_module(&self) -> Module {
        Module::Step(ModuleId::new(self.modules.len()))
    }

    /// Add a named module and return its graph node.
    pub fn add_module(&mut self, name: impl Into<String>) -> Module {
        let id = ModuleId::new(self.modules.len());
        self.modules.push(ModuleInfo::new(id, name));
        Module::Step(id)
    }

    /// Get a module's catalogue data.
    pub fn module(&self, id: ModuleId) -> Option<&ModuleInfo> {
        self.modules.get(id.0)
    }

    /// Get a mutable reference to a module's catalogue data.
    pub fn module_mut(&mut self, id: ModuleId) -> Option<&mut ModuleInfo> {
        self.modules.get_mut(id.0)
    }

    /// All named modules, in id order.
    pub fn modules(&self) -> &[ModuleInfo] {
        &self.modules
    }

    /// Find the first module with the given display name.
    pub fn find_module(&self, name: &str) -> Option<Module> {
        self.modules
            .iter()
            .find(|info| info.name == name)
            .map(ModuleInfo::module)
    }

    /// Display name of a graph node.
    pub fn module_name(&self, module: Module) -> &str {
        match module {
            Module::Start => "START",
            Module::End => "END",
            Module::Step(id) => self.module(id).map(|m| m.name.as_str()).unwrap_or("?"),
        }
    }

    /// Add a process and return its id.
    pub fn add_process(&mut self, process: Process) -> ProcessId {
        self.processes.push(process);
        ProcessId::new(self.processes.len() - 1)
    }

    pub fn process(&self, id: ProcessId) -> Option<&Process> {
        self.processes.get(id.0)
    }

    pub fn process_mut(&mut self, id: ProcessId) -> Option<&mut Process> {
        self.processes.get_mut(id.0)
    }

    /// Find a process by name.
    pub fn find_process(&self, name: &str) -> Option<ProcessId> {
        self.processes
            .iter()
            .position(|p| p.name == name)
            .map(ProcessId::new)
    }

    /// Iterate processes together with their ids.
    pub fn iter_processes(&self) -> impl Iterator<Item = (ProcessId, &Process)> {
        self.processes
            .iter()
            .enumerate()
            .map(|(i, p)| (ProcessId::new(i), p))
    }

    /// Give a fresh v4 UUID to every process and product lacking one.
    ///
    /// With `force`, every identifier is replaced. Returns how many were assigned.
    pub fn fill_in_uuids(&mut self, force: bool) -> usize {
        let mut assigned = 0;
        let uuids = self
            .processes
            .iter_mut()
            .map(|p| &mut p.uuid)
            .chain(self.products.iter_mut().map(|p| &mut p.uuid));
        for uuid in uuids {
            if force || uuid.is_empty() {
                *uuid = uuid::Uuid::new_v4().to_string();
                assigned += 1;
            }
        }
        if assigned > 0 {
            tracing::debug!("Assigned {} new identifiers", assigned);
        }
        assigned
    }
}

impl Default for Catalogue {
    fn default() -> Self {
        Self::new()
    }
}
