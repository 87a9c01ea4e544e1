// File: crates/pulse-core/src/selection.rs
// Summary: Point selection set with host-style single/multi select semantics.

use std::collections::BTreeSet;

use crate::series::PointId;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    ids: BTreeSet<PointId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: PointId) -> bool {
        self.ids.contains(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn ids(&self) -> impl Iterator<Item = PointId> + '_ {
        self.ids.iter().copied()
    }

    /// Clear everything. Idempotent; returns whether anything was selected.
    pub fn clear(&mut self) -> bool {
        let had = !self.ids.is_empty();
        self.ids.clear();
        had
    }

    /// Click semantics: without `multi`, select only `id` (clicking the sole
    /// selected point again deselects it); with `multi`, toggle `id`.
    pub fn select(&mut self, id: PointId, multi: bool) {
        if multi {
            if !self.ids.remove(&id) {
                self.ids.insert(id);
            }
            return;
        }
        let only_this = self.ids.len() == 1 && self.ids.contains(&id);
        self.ids.clear();
        if !only_this {
            self.ids.insert(id);
        }
    }

    /// Replace the selection with exactly `id`.
    pub fn set_single(&mut self, id: PointId) {
        self.ids.clear();
        self.ids.insert(id);
    }
}
