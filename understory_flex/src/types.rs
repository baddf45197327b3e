// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the layout tree: node identifiers, layout state and results.

use kurbo::{Point, Rect, Size};

/// Identifier for a node in the tree (generational).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Where a node is in the layout/acknowledge cycle.
///
/// `Dirty --compute--> Fresh --mark_seen--> Seen --mutation--> Dirty`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LayoutState {
    /// The node or a descendant changed; [`Layout`] is stale.
    #[default]
    Dirty,
    /// [`Layout`] holds geometry the host has not acknowledged yet.
    Fresh,
    /// [`Layout`] is current and has been acknowledged.
    Seen,
}

/// Computed geometry of a node: its border box relative to its parent's border box.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Layout {
    /// Top-left corner in parent coordinates.
    pub origin: Point,
    /// Border-box size.
    pub size: Size,
}

impl Layout {
    /// Horizontal position.
    pub fn x(&self) -> f64 {
        self.origin.x
    }

    /// Vertical position.
    pub fn y(&self) -> f64 {
        self.origin.y
    }

    /// Border-box width.
    pub fn width(&self) -> f64 {
        self.size.width
    }

    /// Border-box height.
    pub fn height(&self) -> f64 {
        self.size.height
    }

    /// The border box as a rectangle in parent coordinates.
    pub fn rect(&self) -> Rect {
        Rect::from_origin_size(self.origin, self.size)
    }
}
