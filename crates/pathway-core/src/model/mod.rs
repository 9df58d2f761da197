//! Catalogue data model.
//!
//! Module identity is a tagged variant (`Start`, `End` or a named step), so
//! nothing downstream of the JSON boundary special-cases a missing name.

mod catalogue;
mod module;

pub use catalogue::{Catalogue, Identified, Named, Process, ProcessId, Product};
pub use module::{Module, ModuleId, ModuleInfo, ModulePair, graph_modules};
