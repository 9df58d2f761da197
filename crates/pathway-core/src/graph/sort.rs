//! Topological sorting of an arbitrary item set (Kahn's algorithm).

use std::collections::VecDeque;
use std::hash::Hash;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::{Error, Result};

/// Sorts a partially ordered collection.
///
/// Every item keeps the set of items that must precede it and the list of
/// items that must follow it. Items that are ready at the same time come out
/// in input order, so the result depends only on the input sequences and never
/// on hash iteration order.
#[derive(Debug, Clone)]
pub struct TopologicalSorter<T> {
    items: Vec<T>,
    preceders: FxHashMap<T, FxHashSet<T>>,
    followers: FxHashMap<T, Vec<T>>,
}

impl<T: Eq + Hash + Clone> TopologicalSorter<T> {
    /// Create a sorter over `items` with no relations.
    ///
    /// Repeated items are kept once, at their first position.
    pub fn new(items: impl IntoIterator<Item = T>) -> Self {
        let mut preceders = FxHashMap::default();
        let mut followers = FxHashMap::default();
        let mut unique = Vec::new();
        for item in items {
            if preceders.contains_key(&item) {
                continue;
            }
            preceders.insert(item.clone(), FxHashSet::default());
            followers.insert(item.clone(), Vec::new());
            unique.push(item);
        }
        Self {
            items: unique,
            preceders,
            followers,
        }
    }

    /// Set the "X must precede Y" relations, replacing any set before.
    ///
    /// The relations are given in whatever form the caller has them; the two
    /// extractors pull the preceder and the follower out of each one. The
    /// sequence is iterated once. Relations naming an item outside the sorted
    /// set are ignored.
    pub fn set_relations<P>(
        &mut self,
        relations: impl IntoIterator<Item = P>,
        preceder: impl Fn(&P) -> T,
        follower: impl Fn(&P) -> T,
    ) {
        self.preceders.values_mut().for_each(|set| set.clear());
        self.followers.values_mut().for_each(|list| list.clear());

        for relation in relations {
            let first = preceder(&relation);
            let second = follower(&relation);
            if !self.followers.contains_key(&first) {
                tracing::debug!("Ignoring relation from an item outside the sorted set");
                continue;
            }
            let Some(precs) = self.preceders.get_mut(&second) else {
                tracing::debug!("Ignoring relation to an item outside the sorted set");
                continue;
            };
            if precs.insert(first.clone()) {
                if let Some(fols) = self.followers.get_mut(&first) {
                    fols.push(second);
                }
            }
        }
    }

    /// Builder form of [`set_relations`](Self::set_relations).
    pub fn with_relations<P>(
        mut self,
        relations: impl IntoIterator<Item = P>,
        preceder: impl Fn(&P) -> T,
        follower: impl Fn(&P) -> T,
    ) -> Self {
        self.set_relations(relations, preceder, follower);
        self
    }

    /// The items being sorted, in input order.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// The items that must directly precede `item`.
    ///
    /// Sorting works on a copy, so this is unaffected by [`sort`](Self::sort).
    pub fn preceders(&self, item: &T) -> Option<&FxHashSet<T>> {
        self.preceders.get(item)
    }

    /// Topologically sort the items.
    ///
    /// Fails with [`Error::CyclicGraph`] when some items never become ready,
    /// which happens exactly when the relations contain a cycle. No partial
    /// order is ever returned.
    pub fn sort(&self) -> Result<Vec<T>> {
        let mut waiting = self.preceders.clone();
        let mut ready: VecDeque<T> = self
            .items
            .iter()
            .filter(|item| waiting.get(*item).is_none_or(|p| p.is_empty()))
            .cloned()
            .collect();
        let mut output = Vec::with_capacity(self.items.len());

        while let Some(item) = ready.pop_front() {
            if let Some(fols) = self.followers.get(&item) {
                for fol in fols {
                    if let Some(precs) = waiting.get_mut(fol) {
                        if precs.remove(&item) && precs.is_empty() {
                            ready.push_back(fol.clone());
                        }
                    }
                }
            }
            output.push(item);
        }

        if output.len() != self.items.len() {
            tracing::debug!(
                "Topological sort stalled after {} of {} items",
                output.len(),
                self.items.len()
            );
            return Err(Error::CyclicGraph {
                ordered: output.len(),
                total: self.items.len(),
            });
        }
        Ok(output)
    }
}

/// Sort `items` so that the first element of every pair comes before the second.
pub fn topological_sort<T: Eq + Hash + Clone>(
    items: impl IntoIterator<Item = T>,
    relations: impl IntoIterator<Item = (T, T)>,
) -> Result<Vec<T>> {
    TopologicalSorter::new(items)
        .with_relations(relations, |(a, _)| a.clone(), |(_, b)| b.clone())
        .sort()
}
