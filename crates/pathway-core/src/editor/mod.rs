//! Interactive editing of a process's route graph.
//!
//! A [`GraphEditor`] borrows one process's routes and layout for the length of
//! an editing session and applies discrete gestures to them. Gestures that
//! would break the graph's vertical ordering are rejected in place: the call
//! returns `false` and nothing changes.

mod clipboard;
mod geometry;

pub use clipboard::CopiedModuleMap;
pub use geometry::{distance_to_segment, in_module_rect};

use serde::{Deserialize, Serialize};

use crate::config::{EditorGeometry, LayoutConfig};
use crate::error::Result;
use crate::graph::{ModuleLayout, Position, lay_out};
use crate::model::{Module, ModulePair};

/// Selection state of an editing session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditorState {
    /// Nothing selected.
    #[default]
    Idle,
    /// A positioned module is selected.
    ModuleSelected(Module),
    /// The route at this index is selected.
    EdgeSelected(usize),
    /// A tentative route is being dragged out of `source` towards `target`.
    ProjectingPath { source: Module, target: Position },
}

/// An editing session over one process's routes and layout.
pub struct GraphEditor<'a> {
    /// Routes of the process being edited
    pairs: &'a mut Vec<ModulePair>,
    /// Positions of the process's modules
    layout: &'a mut ModuleLayout,
    /// Module size and edge hit tolerances
    geometry: EditorGeometry,
    /// Current selection
    state: EditorState,
}

impl<'a> GraphEditor<'a> {
    /// Start a session with nothing selected.
    pub fn new(
        pairs: &'a mut Vec<ModulePair>,
        layout: &'a mut ModuleLayout,
        geometry: EditorGeometry,
    ) -> Self {
        Self {
            pairs,
            layout,
            geometry,
            state: EditorState::Idle,
        }
    }

    pub fn state(&self) -> EditorState {
        self.state
    }

    pub fn pairs(&self) -> &[ModulePair] {
        self.pairs.as_slice()
    }

    pub fn layout(&self) -> &ModuleLayout {
        &*self.layout
    }

    /// Current position of `module`.
    pub fn position(&self, module: Module) -> Option<Position> {
        self.layout.get(module)
    }

    /// The selected module, including the source of a projected path.
    pub fn selected_module(&self) -> Option<Module> {
        match self.state {
            EditorState::ModuleSelected(module) => Some(module),
            EditorState::ProjectingPath { source, .. } => Some(source),
            _ => None,
        }
    }

    /// Index of the selected route.
    pub fn selected_edge(&self) -> Option<usize> {
        match self.state {
            EditorState::EdgeSelected(index) => Some(index),
            _ => None,
        }
    }

    /// Select a module, or clear the selection with `None`.
    ///
    /// A module without a position cannot be selected and leaves the session idle.
    pub fn select(&mut self, module: Option<Module>) {
        self.state = match module {
            Some(module) if self.layout.contains(module) => EditorState::ModuleSelected(module),
            _ => EditorState::Idle,
        };
    }

    /// Select a route by index, or clear the selection with `None`.
    pub fn select_edge(&mut self, index: Option<usize>) {
        self.state = match index {
            Some(index) if index < self.pairs.len() => EditorState::EdgeSelected(index),
            _ => EditorState::Idle,
        };
    }

    /// Move the selected module by `(dx, dy)`.
    ///
    /// The move is applied whole or not at all. It is refused when any route
    /// touching the module would stop pointing downwards, when a step would
    /// leave the band between `Start` and `End`, or when `Start` (`End`) would
    /// stop being strictly above (below) every other module.
    pub fn move_selected(&mut self, dx: i32, dy: i32) -> bool {
        let EditorState::ModuleSelected(module) = self.state else {
            return false;
        };
        let Some(current) = self.layout.get(module) else {
            return false;
        };
        let Some(candidate) = current.offset(dx, dy) else {
            tracing::debug!("Refused to move {} off the canvas", module);
            return false;
        };
        if !self.can_place(module, candidate.y) {
            tracing::debug!("Refused to move {} to {}", module, candidate);
            return false;
        }
        self.layout.insert(module, candidate);
        true
    }

    /// Whether `module` may sit at height `y` given the rest of the layout.
    fn can_place(&self, module: Module, y: i32) -> bool {
        let others = || {
            self.layout
                .iter()
                .filter(move |(other, _)| *other != module)
                .map(|(_, pos)| pos.y)
        };
        let placed = match module {
            Module::Start => others().all(|other| other > y),
            Module::End => others().all(|other| other < y),
            Module::Step(_) => {
                self.layout.get(Module::Start).is_none_or(|start| start.y < y)
                    && self.layout.get(Module::End).is_none_or(|end| end.y > y)
            }
        };
        if !placed {
            return false;
        }

        let y_of = |m: Module| {
            if m == module {
                Some(y)
            } else {
                self.layout.get(m).map(|pos| pos.y)
            }
        };
        self.pairs
            .iter()
            .filter(|pair| pair.touches(module))
            .all(|pair| match (y_of(pair.from), y_of(pair.to)) {
                (Some(from), Some(to)) => from < to,
                _ => true,
            })
    }

    /// Place `module` on the canvas and select it.
    ///
    /// A module that already has a position is simply selected. Sentinels
    /// cannot be added. `y` is clamped to lie strictly between `Start` and
    /// `End`; if there is no integer between them the call fails.
    pub fn add_module(&mut self, module: Module, x: i32, y: i32) -> bool {
        if self.layout.contains(module) {
            self.select(Some(module));
            return true;
        }
        if module.is_endpoint() {
            return false;
        }
        let (Some(start), Some(end)) = (
            self.layout.get(Module::Start),
            self.layout.get(Module::End),
        ) else {
            return false;
        };
        let (Some(low), Some(high)) = (start.y.checked_add(1), end.y.checked_sub(1)) else {
            return false;
        };
        if low > high {
            return false;
        }
        let y = y.clamp(low, high);
        self.layout.insert(module, Position::new(x, y));
        self.state = EditorState::ModuleSelected(module);
        true
    }

    /// Delete the selected module or route.
    ///
    /// Deleting a module also deletes every route touching it. Sentinels
    /// cannot be deleted.
    pub fn delete_selected(&mut self) -> bool {
        match self.state {
            EditorState::ModuleSelected(module) | EditorState::ProjectingPath { source: module, .. } => {
                if module.is_endpoint() {
                    return false;
                }
                self.pairs.retain(|pair| !pair.touches(module));
                self.layout.remove(module);
            }
            EditorState::EdgeSelected(index) => {
                if index >= self.pairs.len() {
                    return false;
                }
                self.pairs.remove(index);
            }
            EditorState::Idle => return false,
        }
        self.state = EditorState::Idle;
        true
    }

    /// Flip whether the selected route is part of the default path.
    pub fn toggle_selected_edge_default(&mut self) -> bool {
        let Some(pair) = self.selected_edge().and_then(|i| self.pairs.get_mut(i)) else {
            return false;
        };
        pair.is_default = !pair.is_default;
        true
    }

    /// Drag a tentative route from the selected module towards `(x, y)`.
    ///
    /// Repeated calls just move the target.
    pub fn project_path(&mut self, x: i32, y: i32) -> bool {
        let Some(source) = self.selected_module() else {
            return false;
        };
        self.state = EditorState::ProjectingPath {
            source,
            target: Position::new(x, y),
        };
        true
    }

    /// The module under the projected path's target point.
    pub fn projected_target(&self) -> Option<Module> {
        match self.state {
            EditorState::ProjectingPath { target, .. } => self.module_at(target.x, target.y),
            _ => None,
        }
    }

    /// Whether releasing the projected path now would create a route.
    ///
    /// The target must be a module other than the source and `Start`, lie
    /// strictly below the source, and not already be joined from it. `End`
    /// can never be a source.
    pub fn is_path_strong(&self) -> bool {
        let EditorState::ProjectingPath { source, .. } = self.state else {
            return false;
        };
        if source == Module::End {
            return false;
        }
        let Some(target) = self.projected_target() else {
            return false;
        };
        if target == source || target == Module::Start {
            return false;
        }
        let (Some(from), Some(to)) = (self.layout.get(source), self.layout.get(target)) else {
            return false;
        };
        to.y > from.y && !self.pairs.iter().any(|pair| pair.connects(source, target))
    }

    /// Finish the projected path.
    ///
    /// A strong path becomes a new route, which is then selected. Otherwise
    /// the projection is dropped and the source stays selected. Returns whether
    /// a route was added.
    pub fn release_projected_path(&mut self, mark_default: bool) -> bool {
        let EditorState::ProjectingPath { source, .. } = self.state else {
            return false;
        };
        let target = self.projected_target().filter(|_| self.is_path_strong());
        match target {
            Some(target) => {
                self.pairs.push(ModulePair::new(source, target, mark_default));
                self.state = EditorState::EdgeSelected(self.pairs.len() - 1);
                tracing::debug!("Added route {} -> {}", source, target);
                true
            }
            None => {
                self.state = EditorState::ModuleSelected(source);
                false
            }
        }
    }

    /// Drop the projected path, keeping its source selected.
    pub fn cancel_projected_path(&mut self) -> bool {
        let EditorState::ProjectingPath { source, .. } = self.state else {
            return false;
        };
        self.state = EditorState::ModuleSelected(source);
        true
    }

    /// The first module whose rectangle contains `(x, y)`.
    pub fn module_at(&self, x: i32, y: i32) -> Option<Module> {
        self.layout
            .iter()
            .find(|(_, pos)| in_module_rect(x, y, *pos, &self.geometry))
            .map(|(module, _)| module)
    }

    /// Index of the route closest to `(x, y)` within the hit threshold.
    pub fn edge_at(&self, x: i32, y: i32) -> Option<usize> {
        let mut best = None;
        let mut best_distance = self.geometry.edge_hit_threshold;
        for (index, pair) in self.pairs.iter().enumerate() {
            let (Some(from), Some(to)) = (self.layout.from_of(pair), self.layout.to_of(pair)) else {
                continue;
            };
            let Some(distance) =
                distance_to_segment(x, y, from, to, self.geometry.edge_hit_margin)
            else {
                continue;
            };
            if distance < best_distance {
                best = Some(index);
                best_distance = distance;
            }
        }
        best
    }

    /// Replace the layout with a fresh automatic one.
    ///
    /// On failure the layout is left as it was. A selected module keeps its
    /// selection only if it is still positioned.
    pub fn auto_layout(&mut self, config: &LayoutConfig) -> Result<()> {
        *self.layout = lay_out(self.pairs.as_slice(), config)?;
        if self
            .selected_module()
            .is_some_and(|module| !self.layout.contains(module))
        {
            self.state = EditorState::Idle;
        }
        Ok(())
    }
}
