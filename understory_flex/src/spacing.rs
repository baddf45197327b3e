// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Edge spacing: sparse definitions at several levels of specificity, and their
//! resolved per-edge values.

use core::ops::Add;

use crate::length::Length;
use crate::style::FlexDirection;

/// An edge, or an aggregate of edges, that a spacing value can be defined for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Edge {
    /// The left edge.
    Left,
    /// The top edge.
    Top,
    /// The right edge.
    Right,
    /// The bottom edge.
    Bottom,
    /// Top and bottom.
    Vertical,
    /// Left and right.
    Horizontal,
    /// All four edges.
    All,
}

impl Edge {
    const COUNT: usize = 7;

    const fn slot(self) -> usize {
        match self {
            Self::Left => 0,
            Self::Top => 1,
            Self::Right => 2,
            Self::Bottom => 3,
            Self::Vertical => 4,
            Self::Horizontal => 5,
            Self::All => 6,
        }
    }
}

/// Sparse spacing definitions for one property (margin, padding or border).
///
/// Each physical edge resolves with specificity: its own definition, then the matching
/// axis aggregate ([`Edge::Horizontal`] for left/right, [`Edge::Vertical`] for
/// top/bottom), then [`Edge::All`], then zero.
///
/// ```rust
/// use understory_flex::{Edge, Spacing};
///
/// let mut spacing = Spacing::default();
/// spacing.set(Edge::All, 4.0.into());
/// spacing.set(Edge::Horizontal, 8.0.into());
/// spacing.set(Edge::Left, 1.0.into());
///
/// let edges = spacing.resolve();
/// assert_eq!((edges.left, edges.right, edges.top), (1.0, 8.0, 4.0));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Spacing {
    defined: [Length; Edge::COUNT],
}

impl Spacing {
    /// The definition stored for `edge` (not its resolved value).
    pub fn get(&self, edge: Edge) -> Length {
        self.defined[edge.slot()]
    }

    /// Define `edge`; [`Length::UNDEFINED`] removes the definition.
    ///
    /// Returns `true` if the stored definition changed.
    pub fn set(&mut self, edge: Edge, value: Length) -> bool {
        let slot = &mut self.defined[edge.slot()];
        if *slot == value {
            return false;
        }
        *slot = value;
        true
    }

    /// Resolve the four physical edges.
    pub fn resolve(&self) -> Edges {
        let pick = |edge: Edge, axis: Edge| {
            self.get(edge)
                .or(self.get(axis))
                .or(self.get(Edge::All))
                .unwrap_or(0.0)
        };
        Edges {
            left: pick(Edge::Left, Edge::Horizontal),
            top: pick(Edge::Top, Edge::Vertical),
            right: pick(Edge::Right, Edge::Horizontal),
            bottom: pick(Edge::Bottom, Edge::Vertical),
        }
    }
}

/// Resolved values for the four physical edges.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Edges {
    /// Left edge.
    pub left: f64,
    /// Top edge.
    pub top: f64,
    /// Right edge.
    pub right: f64,
    /// Bottom edge.
    pub bottom: f64,
}

impl Edges {
    /// All edges zero.
    pub const ZERO: Self = Self::uniform(0.0);

    /// All edges set to `value`.
    pub const fn uniform(value: f64) -> Self {
        Self {
            left: value,
            top: value,
            right: value,
            bottom: value,
        }
    }

    /// Sum of left and right.
    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    /// Sum of top and bottom.
    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }

    /// Edge at the main-start side of `direction`.
    ///
    /// For reversed directions this is the right (or bottom) edge.
    pub(crate) fn main_start(&self, direction: FlexDirection) -> f64 {
        match direction {
            FlexDirection::Row => self.left,
            FlexDirection::RowReverse => self.right,
            FlexDirection::Column => self.top,
            FlexDirection::ColumnReverse => self.bottom,
        }
    }

    pub(crate) fn main_sum(&self, direction: FlexDirection) -> f64 {
        if direction.is_row() {
            self.horizontal()
        } else {
            self.vertical()
        }
    }

    pub(crate) fn cross_start(&self, direction: FlexDirection) -> f64 {
        if direction.is_row() {
            self.top
        } else {
            self.left
        }
    }

    pub(crate) fn cross_end(&self, direction: FlexDirection) -> f64 {
        if direction.is_row() {
            self.bottom
        } else {
            self.right
        }
    }

    pub(crate) fn cross_sum(&self, direction: FlexDirection) -> f64 {
        self.cross_start(direction) + self.cross_end(direction)
    }
}

impl Add for Edges {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            left: self.left + rhs.left,
            top: self.top + rhs.top,
            right: self.right + rhs.right,
            bottom: self.bottom + rhs.bottom,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_resolves_to_zero() {
        assert_eq!(Spacing::default().resolve(), Edges::ZERO);
    }

    #[test]
    fn exact_edge_beats_axis_beats_all() {
        let mut spacing = Spacing::default();
        spacing.set(Edge::All, Length::new(2.0));
        assert_eq!(spacing.resolve(), Edges::uniform(2.0));

        spacing.set(Edge::Vertical, Length::new(5.0));
        let edges = spacing.resolve();
        assert_eq!((edges.top, edges.bottom), (5.0, 5.0));
        assert_eq!((edges.left, edges.right), (2.0, 2.0));

        spacing.set(Edge::Bottom, Length::new(9.0));
        let edges = spacing.resolve();
        assert_eq!((edges.top, edges.bottom), (5.0, 9.0));
    }

    #[test]
    fn clearing_a_definition_falls_back() {
        let mut spacing = Spacing::default();
        spacing.set(Edge::Horizontal, Length::new(3.0));
        spacing.set(Edge::Right, Length::new(7.0));
        assert_eq!(spacing.resolve().right, 7.0);

        assert!(spacing.set(Edge::Right, Length::UNDEFINED));
        assert_eq!(spacing.resolve().right, 3.0);
    }

    #[test]
    fn set_reports_changes_only() {
        let mut spacing = Spacing::default();
        assert!(spacing.set(Edge::Top, Length::new(1.0)));
        assert!(!spacing.set(Edge::Top, Length::new(1.0)));
        assert!(!spacing.set(Edge::Left, Length::UNDEFINED));
    }

    #[test]
    fn directional_accessors() {
        let edges = Edges {
            left: 1.0,
            top: 2.0,
            right: 3.0,
            bottom: 4.0,
        };
        assert_eq!(edges.main_start(FlexDirection::Row), 1.0);
        assert_eq!(edges.main_start(FlexDirection::RowReverse), 3.0);
        assert_eq!(edges.main_start(FlexDirection::ColumnReverse), 4.0);
        assert_eq!(edges.main_sum(FlexDirection::Column), 6.0);
        assert_eq!(edges.cross_start(FlexDirection::Column), 1.0);
        assert_eq!(edges.cross_sum(FlexDirection::Row), 6.0);
    }
}
