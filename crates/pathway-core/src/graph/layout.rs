//! Row-based automatic layout of a route graph.
//!
//! Layout runs as two passes: a topological sort of the modules, then a
//! partition of the sorted sequence into rows. Rows are stacked top to bottom,
//! so every route points downwards.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::LayoutConfig;
use crate::error::Result;
use crate::model::{Module, ModulePair, graph_modules};

use super::sort::TopologicalSorter;

/// A point on the editing canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// This position moved by the given delta, or `None` if it leaves the canvas.
    pub fn offset(&self, dx: i32, dy: i32) -> Option<Self> {
        Some(Self::new(self.x.checked_add(dx)?, self.y.checked_add(dy)?))
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Positions of the modules in one process's graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleLayout {
    positions: BTreeMap<Module, Position>,
}

impl ModuleLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Position of `module`, if it has one.
    pub fn get(&self, module: Module) -> Option<Position> {
        self.positions.get(&module).copied()
    }

    /// Position of a route's source.
    pub fn from_of(&self, pair: &ModulePair) -> Option<Position> {
        self.get(pair.from)
    }

    /// Position of a route's target.
    pub fn to_of(&self, pair: &ModulePair) -> Option<Position> {
        self.get(pair.to)
    }

    /// Store the position of `module`, returning the previous one.
    pub fn insert(&mut self, module: Module, position: Position) -> Option<Position> {
        self.positions.insert(module, position)
    }

    /// Remove `module`'s position, if present.
    pub fn remove(&mut self, module: Module) -> Option<Position> {
        self.positions.remove(&module)
    }

    pub fn contains(&self, module: Module) -> bool {
        self.positions.contains_key(&module)
    }

    /// Drop positions for every module not accepted by `keep`.
    pub fn retain_modules(&mut self, mut keep: impl FnMut(Module) -> bool) {
        self.positions.retain(|module, _| keep(*module));
    }

    /// Modules with a position, in module order.
    pub fn modules(&self) -> impl Iterator<Item = Module> + '_ {
        self.positions.keys().copied()
    }

    /// Iterate over `(module, position)` in module order.
    pub fn iter(&self) -> impl Iterator<Item = (Module, Position)> + '_ {
        self.positions.iter().map(|(m, p)| (*m, *p))
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

impl FromIterator<(Module, Position)> for ModuleLayout {
    fn from_iter<I: IntoIterator<Item = (Module, Position)>>(iter: I) -> Self {
        Self {
            positions: iter.into_iter().collect(),
        }
    }
}

/// Partition `modules` into rows such that every route leads to a later row.
///
/// A new row starts when the next module is `End`, when the current row holds
/// only `Start`, or when the current row already holds a direct preceder of the
/// next module. `End` is moved to a row of its own at the bottom unless
/// something follows it.
pub fn rows(modules: &[Module], pairs: &[ModulePair]) -> Result<Vec<Vec<Module>>> {
    let sorter = TopologicalSorter::new(modules.iter().copied()).with_relations(
        pairs,
        |pair| pair.from,
        |pair| pair.to,
    );
    let sorted = sorter.sort()?;

    let end_is_terminal = !pairs.iter().any(|pair| pair.from == Module::End);
    let mut rows: Vec<Vec<Module>> = Vec::new();
    let mut current: Vec<Module> = Vec::new();

    for module in sorted {
        if module == Module::End && end_is_terminal {
            continue;
        }
        let starts_row = module == Module::End
            || current == [Module::Start]
            || sorter
                .preceders(&module)
                .is_some_and(|precs| current.iter().any(|m| precs.contains(m)));
        if starts_row && !current.is_empty() {
            rows.push(std::mem::take(&mut current));
        }
        current.push(module);
    }
    if !current.is_empty() {
        rows.push(current);
    }
    if end_is_terminal && modules.contains(&Module::End) {
        rows.push(vec![Module::End]);
    }

    tracing::debug!("Partitioned {} modules into {} rows", modules.len(), rows.len());
    Ok(rows)
}

/// Horizontal offsets for each row.
///
/// Three consecutive rows of the same size would stack their routes exactly
/// on top of each other, so interior rows of such runs are shifted by half a
/// column, alternating direction.
fn row_offsets(rows: &[Vec<Module>], column_spacing: i32) -> Vec<i32> {
    let mut offsets = vec![0; rows.len()];
    for i in 1..rows.len().saturating_sub(1) {
        let size = rows[i].len();
        if size == rows[i - 1].len() && size == rows[i + 1].len() {
            offsets[i] = if offsets[i - 1] != 0 {
                -offsets[i - 1]
            } else {
                column_spacing / 2
            };
        }
    }
    offsets
}

/// Assign positions to `modules` from the given routes.
///
/// Start sits on the top row, centred on `x = 0`; each row is centred
/// around zero. Fails with [`CyclicGraph`](crate::Error::CyclicGraph) without
/// producing any positions if the routes contain a cycle.
pub fn lay_out_modules(
    modules: &[Module],
    pairs: &[ModulePair],
    config: &LayoutConfig,
) -> Result<ModuleLayout> {
    let rows = rows(modules, pairs)?;
    let offsets = row_offsets(&rows, config.column_spacing);
    let mut layout = ModuleLayout::new();
    let mut y = 0;

    for (row, offset) in rows.iter().zip(offsets) {
        let width = i32::try_from(row.len()).unwrap_or(i32::MAX) - 1;
        let mut x = offset - config.column_spacing * width / 2;
        for module in row {
            layout.insert(*module, Position::new(x, y));
            x += config.column_spacing;
        }
        y += config.row_spacing;
    }
    Ok(layout)
}

/// Lay out a process's graph from its routes alone.
///
/// The node set comes from [`graph_modules`].
pub fn lay_out(pairs: &[ModulePair], config: &LayoutConfig) -> Result<ModuleLayout> {
    lay_out_modules(&graph_modules(pairs), pairs, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::model::ModuleId;

    fn step(id: usize) -> Module {
        Module::Step(ModuleId::new(id))
    }

    fn pair(from: Module, to: Module, is_default: bool) -> ModulePair {
        ModulePair::new(from, to, is_default)
    }

    #[test]
    fn test_lay_out_positions_exactly_the_graph_modules() {
        let (a, b, c) = (step(0), step(1), step(2));
        let pairs = [
            pair(Module::Start, a, true),
            pair(a, Module::End, true),
            pair(c, b, false),
        ];
        let layout = lay_out(&pairs, &LayoutConfig::default()).unwrap();
        let mut positioned: Vec<Module> = layout.modules().collect();
        let mut expected = graph_modules(&pairs);
        positioned.sort();
        expected.sort();
        assert_eq!(positioned, expected);
    }

    #[test]
    fn test_offset_stays_on_canvas() {
        let p = Position::new(80, 80);
        assert_eq!(p.offset(-80, 20), Some(Position::new(0, 100)));
        assert_eq!(p.offset(i32::MAX, 0), None);
        assert_eq!(p.offset(0, i32::MIN), Some(Position::new(80, i32::MIN + 80)));
        assert_eq!(Position::new(0, i32::MIN).offset(0, -1), None);
    }

    #[test]
    fn test_linear_route_gets_one_row_per_module() {
        let (a, b) = (step(0), step(1));
        let pairs = [
            pair(Module::Start, a, true),
            pair(a, b, true),
            pair(b, Module::End, true),
        ];
        let rows = rows(&[Module::Start, a, b, Module::End], &pairs).unwrap();
        assert_eq!(
            rows,
            vec![vec![Module::Start], vec![a], vec![b], vec![Module::End]]
        );
    }

    #[test]
    fn test_parallel_modules_share_a_row() {
        let (a, b) = (step(0), step(1));
        let pairs = [
            pair(Module::Start, a, true),
            pair(Module::Start, b, false),
            pair(a, Module::End, true),
            pair(b, Module::End, false),
        ];
        let layout = lay_out(&pairs, &LayoutConfig::default()).unwrap();
        let (pa, pb) = (layout.get(a).unwrap(), layout.get(b).unwrap());
        assert_eq!(pa.y, pb.y);
        assert_eq!(pa.y, 80);
        assert_eq!(pb.x - pa.x, 160);
        assert_eq!(pa.x + pb.x, 0, "row is centred on zero");
        assert_eq!(layout.get(Module::Start), Some(Position::new(0, 0)));
        assert_eq!(layout.get(Module::End), Some(Position::new(0, 160)));
    }

    #[test]
    fn test_cycle_is_rejected() {
        let (a, b) = (step(0), step(1));
        let pairs = [
            pair(Module::Start, a, true),
            pair(a, b, true),
            pair(b, a, true),
        ];
        let result = lay_out(&pairs, &LayoutConfig::default());
        assert!(matches!(result, Err(Error::CyclicGraph { .. })));
    }

    #[test]
    fn test_two_module_cycle_is_rejected() {
        let (a, b) = (step(0), step(1));
        let result = lay_out(&[pair(a, b, false), pair(b, a, false)], &LayoutConfig::default());
        assert!(matches!(result, Err(Error::CyclicGraph { .. })));
    }

    #[test]
    fn test_end_is_alone_on_the_last_row() {
        // B is not on any route to End and would otherwise sort after it
        let (a, b) = (step(0), step(1));
        let pairs = [
            pair(Module::Start, a, true),
            pair(a, Module::End, true),
            pair(a, b, false),
        ];
        let rows = rows(&[Module::Start, a, b, Module::End], &pairs).unwrap();
        assert_eq!(rows.last(), Some(&vec![Module::End]));
        assert!(rows[..rows.len() - 1].iter().all(|r| !r.contains(&Module::End)));
    }

    #[test]
    fn test_start_row_holds_only_start() {
        // A dangling source has no preceders and is ready alongside Start
        let (a, c) = (step(0), step(2));
        let pairs = [
            pair(Module::Start, a, true),
            pair(a, Module::End, true),
            pair(c, Module::End, false),
        ];
        let rows = rows(&[Module::Start, a, c, Module::End], &pairs).unwrap();
        assert_eq!(rows[0], vec![Module::Start]);
        assert_eq!(rows[1].len(), 2);
        assert!(rows[1].contains(&a) && rows[1].contains(&c));
    }

    #[test]
    fn test_equal_rows_alternate_offsets() {
        let config = LayoutConfig::default();
        let (a, b, c) = (step(0), step(1), step(2));
        let pairs = [
            pair(Module::Start, a, true),
            pair(a, b, true),
            pair(b, c, true),
            pair(c, Module::End, true),
        ];
        let layout = lay_out(&pairs, &config).unwrap();
        // Every row has a single module; interior rows shift left and right
        assert_eq!(layout.get(a).unwrap().x, 80);
        assert_eq!(layout.get(b).unwrap().x, -80);
        assert_eq!(layout.get(c).unwrap().x, 80);
        assert_eq!(layout.get(Module::Start).unwrap().x, 0);
    }

    #[test]
    fn test_every_route_points_down() {
        let m: Vec<Module> = (0..6).map(step).collect();
        let pairs = [
            pair(Module::Start, m[0], true),
            pair(Module::Start, m[1], false),
            pair(m[0], m[2], true),
            pair(m[1], m[2], false),
            pair(m[1], m[3], false),
            pair(m[2], m[4], true),
            pair(m[3], m[4], false),
            pair(m[4], m[5], true),
            pair(m[3], Module::End, false),
            pair(m[5], Module::End, true),
        ];
        let layout = lay_out(&pairs, &LayoutConfig::default()).unwrap();
        for p in &pairs {
            assert!(layout.from_of(p).unwrap().y < layout.to_of(p).unwrap().y);
        }
    }

    #[test]
    fn test_empty_routes_lay_out_sentinels() {
        let layout = lay_out(&[], &LayoutConfig::default()).unwrap();
        assert_eq!(layout.len(), 2);
        assert_eq!(layout.get(Module::Start), Some(Position::new(0, 0)));
        assert_eq!(layout.get(Module::End), Some(Position::new(0, 80)));
    }
}
