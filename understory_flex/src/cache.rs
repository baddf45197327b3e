// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-node memoization of computed sizes, keyed by the constraints that produced them.

use kurbo::Size;
use smallvec::SmallVec;

use crate::engine::Axes;
use crate::length::Length;

/// Size-only probes a node remembers. A parent probes each child at most a few
/// distinct ways per pass (basis, cross size, final), so a handful of slots suffices.
const PROBE_SLOTS: usize = 4;

/// The inputs a node's size is a pure function of, besides its own subtree.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Constraints {
    /// Dimensions imposed by the parent.
    pub(crate) known: Axes<Length>,
    /// Space available to the border box.
    pub(crate) available: Axes<Length>,
}

#[derive(Clone, Copy, Debug)]
struct Entry {
    constraints: Constraints,
    size: Size,
}

/// Results of the last full layout and of recent size probes.
///
/// Dropped as a whole when the node is dirtied, so an entry is valid for as long as it
/// exists.
#[derive(Clone, Debug, Default)]
pub(crate) struct LayoutCache {
    layout: Option<Entry>,
    probes: SmallVec<[Entry; PROBE_SLOTS]>,
    next_probe: usize,
}

impl LayoutCache {
    /// Size of the last full layout, if it ran under `constraints`.
    pub(crate) fn layout(&self, constraints: &Constraints) -> Option<Size> {
        self.layout
            .filter(|e| e.constraints == *constraints)
            .map(|e| e.size)
    }

    /// Any remembered size computed under `constraints`.
    pub(crate) fn probe(&self, constraints: &Constraints) -> Option<Size> {
        self.layout(constraints).or_else(|| {
            self.probes
                .iter()
                .find(|e| e.constraints == *constraints)
                .map(|e| e.size)
        })
    }

    pub(crate) fn store_layout(&mut self, constraints: Constraints, size: Size) {
        self.layout = Some(Entry { constraints, size });
    }

    pub(crate) fn store_probe(&mut self, constraints: Constraints, size: Size) {
        let entry = Entry { constraints, size };
        if self.probes.len() < PROBE_SLOTS {
            self.probes.push(entry);
        } else {
            self.probes[self.next_probe] = entry;
            self.next_probe = (self.next_probe + 1) % PROBE_SLOTS;
        }
    }

    pub(crate) fn clear(&mut self) {
        self.layout = None;
        self.probes.clear();
        self.next_probe = 0;
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.layout.is_none() && self.probes.is_empty()
    }
}
