//! Copy and paste of a process's route map.

use rustc_hash::FxHashSet;

use crate::graph::ModuleLayout;
use crate::model::{Module, ModulePair};

/// A detached copy of one process's layout and routes.
///
/// Pasting replaces the target process's routes wholesale, so the copy owns
/// its data and hands out fresh clones on every read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopiedModuleMap {
    layout: ModuleLayout,
    pairs: Vec<ModulePair>,
}

impl CopiedModuleMap {
    pub fn new(layout: &ModuleLayout, pairs: &[ModulePair]) -> Self {
        Self {
            layout: layout.clone(),
            pairs: pairs.to_vec(),
        }
    }

    /// Drop every position and route that mentions a module outside `modules`.
    ///
    /// Sentinels are not implied; include `Start` and `End` in `modules` to keep them.
    pub fn filter(&mut self, modules: &FxHashSet<Module>) {
        self.layout.retain_modules(|module| modules.contains(&module));
        self.pairs
            .retain(|pair| modules.contains(&pair.from) && modules.contains(&pair.to));
    }

    pub fn layout(&self) -> ModuleLayout {
        self.layout.clone()
    }

    pub fn pairs(&self) -> Vec<ModulePair> {
        self.pairs.clone()
    }

    /// Replace `pairs` and `layout` with this copy.
    pub fn paste_into(&self, pairs: &mut Vec<ModulePair>, layout: &mut ModuleLayout) {
        *pairs = self.pairs();
        *layout = self.layout();
    }
}
