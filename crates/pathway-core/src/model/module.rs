//! Module identity and the directed edges between modules.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// Identifier of a named module within a [`Catalogue`](super::Catalogue).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ModuleId(pub(crate) usize);

impl ModuleId {
    pub fn new(id: usize) -> Self {
        Self(id)
    }

    pub fn as_usize(&self) -> usize {
        self.0
    }
}

impl std::fmt::Display for ModuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "module_{}", self.0)
    }
}

/// A node in a process's route graph.
///
/// Identity is by variant and id only. Two named steps with the same display
/// name are still distinct modules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Module {
    /// Entry sentinel; every route begins here.
    Start,
    /// A named step, see [`ModuleInfo`].
    Step(ModuleId),
    /// Exit sentinel; every route ends here.
    End,
}

impl Module {
    /// Whether this is `Start` or `End`.
    pub fn is_endpoint(&self) -> bool {
        matches!(self, Module::Start | Module::End)
    }

    /// The step id, if this is a named step.
    pub fn step_id(&self) -> Option<ModuleId> {
        match self {
            Module::Step(id) => Some(*id),
            _ => None,
        }
    }
}

impl std::fmt::Display for Module {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Module::Start => f.write_str("START"),
            Module::End => f.write_str("END"),
            Module::Step(id) => id.fmt(f),
        }
    }
}

/// Catalogue data carried by a named module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleInfo {
    /// Identity of the module
    pub id: ModuleId,
    /// Display name (not required to be unique)
    pub name: String,
    /// Lower bound of the caller-visible parameter
    pub min_value: Option<i32>,
    /// Upper bound of the caller-visible parameter
    pub max_value: Option<i32>,
}

impl ModuleInfo {
    pub fn new(id: ModuleId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            min_value: None,
            max_value: None,
        }
    }

    /// A module takes a parameter when either bound is set.
    pub fn has_parameter(&self) -> bool {
        self.min_value.is_some() || self.max_value.is_some()
    }

    /// The graph node for this module.
    pub fn module(&self) -> Module {
        Module::Step(self.id)
    }
}

/// A directed route from one module to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModulePair {
    pub from: Module,
    pub to: Module,
    /// Whether this route is part of the process's default path
    pub is_default: bool,
}

impl ModulePair {
    pub fn new(from: Module, to: Module, is_default: bool) -> Self {
        Self {
            from,
            to,
            is_default,
        }
    }

    /// Whether this pair touches `module` at either end.
    pub fn touches(&self, module: Module) -> bool {
        self.from == module || self.to == module
    }

    /// Whether this pair connects `from` to `to` in that direction.
    pub fn connects(&self, from: Module, to: Module) -> bool {
        self.from == from && self.to == to
    }
}

/// Every module a route graph needs a position for.
///
/// This is `Start`, then all route targets, then any route source that is
/// never a target, then `End`. Sources that are never targets are not part of
/// the process proper; they are kept so that a layout can show them and
/// validation can report them as disconnected.
pub fn graph_modules(pairs: &[ModulePair]) -> Vec<Module> {
    let mut seen: FxHashSet<Module> = [Module::Start, Module::End].into_iter().collect();
    let mut modules = vec![Module::Start];
    let targets = pairs.iter().map(|pair| pair.to);
    let sources = pairs.iter().map(|pair| pair.from);
    for module in targets.chain(sources) {
        if seen.insert(module) {
            modules.push(module);
        }
    }
    modules.push(Module::End);
    modules
}
