//! Per-process layout cache.
//!
//! Layouts are computed on first use and kept until the caller asks for a
//! fresh one; nothing here tracks whether routes changed since.

use std::collections::hash_map::Entry;

use rustc_hash::FxHashMap;

use crate::config::LayoutConfig;
use crate::error::{Error, Result};
use crate::model::{Catalogue, Process, ProcessId};

use super::layout::{ModuleLayout, lay_out};

/// Read access to cached layouts, keyed by process.
pub trait LayoutLookup {
    /// The cached layout for `process`, if one has been computed.
    fn layout(&self, process: ProcessId) -> Option<&ModuleLayout>;
}

impl LayoutLookup for FxHashMap<ProcessId, ModuleLayout> {
    fn layout(&self, process: ProcessId) -> Option<&ModuleLayout> {
        self.get(&process)
    }
}

/// Cached layouts for the processes of one catalogue.
#[derive(Debug, Clone, Default)]
pub struct LayoutCache {
    config: LayoutConfig,
    layouts: FxHashMap<ProcessId, ModuleLayout>,
}

impl LayoutCache {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            layouts: FxHashMap::default(),
        }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn get(&self, process: ProcessId) -> Option<&ModuleLayout> {
        self.layouts.get(&process)
    }

    pub fn get_mut(&mut self, process: ProcessId) -> Option<&mut ModuleLayout> {
        self.layouts.get_mut(&process)
    }

    /// Store a layout, e.g. one pasted from another process.
    pub fn insert(&mut self, process: ProcessId, layout: ModuleLayout) {
        self.layouts.insert(process, layout);
    }

    pub fn remove(&mut self, process: ProcessId) -> Option<ModuleLayout> {
        self.layouts.remove(&process)
    }

    /// Forget every cached layout.
    pub fn clear(&mut self) {
        self.layouts.clear();
    }

    /// The cached layout for `process`, computing it on a miss.
    pub fn get_or_lay_out(
        &mut self,
        id: ProcessId,
        process: &Process,
    ) -> Result<&mut ModuleLayout> {
        match self.layouts.entry(id) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let layout = lay_out(&process.pairs, &self.config)?;
                Ok(entry.insert(layout))
            }
        }
    }

    /// Recompute the layout for `process`, replacing any cached one.
    ///
    /// On failure the previous layout is left untouched.
    pub fn relayout(&mut self, id: ProcessId, process: &Process) -> Result<&mut ModuleLayout> {
        let layout = lay_out(&process.pairs, &self.config)?;
        let slot = self.layouts.entry(id).or_default();
        *slot = layout;
        Ok(slot)
    }

    /// Replace the cache with fresh layouts for every process in `catalogue`.
    ///
    /// Processes whose routes cannot be laid out get no entry; they are
    /// returned with the reason so the caller can decide what to do with them.
    pub fn lay_out_all(&mut self, catalogue: &Catalogue) -> Vec<(ProcessId, Error)> {
        self.layouts.clear();
        let mut failures = Vec::new();
        for (id, process) in catalogue.iter_processes() {
            match lay_out(&process.pairs, &self.config) {
                Ok(layout) => {
                    self.layouts.insert(id, layout);
                }
                Err(e) => {
                    tracing::warn!("Cannot lay out process '{}': {}", process.name, e);
                    failures.push((id, e));
                }
            }
        }
        tracing::debug!(
            "Laid out {} of {} processes",
            self.layouts.len(),
            catalogue.processes.len()
        );
        failures
    }
}

impl LayoutLookup for LayoutCache {
    fn layout(&self, process: ProcessId) -> Option<&ModuleLayout> {
        self.get(process)
    }
}
