//! Core engine for the Pathway catalogue editor.
//!
//! This crate provides:
//! - The catalogue model (modules, processes, products)
//! - Topological sorting with cycle detection
//! - Automatic row layout of a process's route graph
//! - An interactive editing session over one process
//! - Structural validation with pluralised problem messages
//!
//! Nothing here performs I/O; loading and saving live in `pathway-json`.

pub mod config;
pub mod editor;
pub mod error;
pub mod graph;
pub mod model;
pub mod validate;

pub use config::{EditorGeometry, LayoutConfig, PathwayConfig};
pub use editor::{CopiedModuleMap, EditorState, GraphEditor};
pub use error::{Error, Result};
pub use graph::{
    LayoutCache, LayoutLookup, ModuleLayout, Position, TopologicalSorter, lay_out,
    lay_out_modules, topological_sort,
};
pub use model::{
    Catalogue, Identified, Module, ModuleId, ModuleInfo, ModulePair, Named, Process, ProcessId,
    Product, graph_modules,
};
pub use validate::{Problem, ProblemReport, default_route_valid, find_problems, pluralise};
