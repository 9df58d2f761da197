//! Route graph ordering and layout.
//!
//! This module provides:
//! - Topological sorting with cycle detection
//! - Row partitioning of a sorted route graph
//! - Position assignment for each row
//! - A per-process cache of computed layouts

mod cache;
mod layout;
mod sort;

pub use cache::{LayoutCache, LayoutLookup};
pub use layout::{ModuleLayout, Position, lay_out, lay_out_modules, rows};
pub use sort::{TopologicalSorter, topological_sort};
