// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-node style: flex properties, alignment, positioning and explicit dimensions.

use crate::length::Length;
use crate::spacing::Edges;

/// The direction children are laid out in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FlexDirection {
    /// Left to right.
    Row,
    /// Right to left.
    RowReverse,
    /// Top to bottom.
    #[default]
    Column,
    /// Bottom to top.
    ColumnReverse,
}

impl FlexDirection {
    /// Returns `true` if the main axis is horizontal.
    pub const fn is_row(self) -> bool {
        matches!(self, Self::Row | Self::RowReverse)
    }

    /// Returns `true` if main-start is the right (or bottom) edge.
    pub const fn is_reverse(self) -> bool {
        matches!(self, Self::RowReverse | Self::ColumnReverse)
    }
}

/// Packing of children along the main axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum JustifyContent {
    /// Pack at main-start.
    #[default]
    FlexStart,
    /// Center the packed group.
    Center,
    /// Pack at main-end.
    FlexEnd,
    /// Distribute leftover space between children.
    SpaceBetween,
    /// Distribute leftover space around children, half-size gaps at the ends.
    SpaceAround,
}

/// Default cross-axis alignment for a container's children.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AlignItems {
    /// Align to cross-start.
    FlexStart,
    /// Center within the line.
    Center,
    /// Align to cross-end.
    FlexEnd,
    /// Fill the line when no cross dimension is set.
    #[default]
    Stretch,
}

/// Cross-axis alignment of a single child, overriding its parent's [`AlignItems`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AlignSelf {
    /// Use the parent's [`AlignItems`].
    #[default]
    Auto,
    /// Align to cross-start.
    FlexStart,
    /// Center within the line.
    Center,
    /// Align to cross-end.
    FlexEnd,
    /// Fill the line when no cross dimension is set.
    Stretch,
}

impl AlignSelf {
    /// The effective alignment given the parent's `align_items`.
    pub const fn resolve(self, parent: AlignItems) -> AlignItems {
        match self {
            Self::Auto => parent,
            Self::FlexStart => AlignItems::FlexStart,
            Self::Center => AlignItems::Center,
            Self::FlexEnd => AlignItems::FlexEnd,
            Self::Stretch => AlignItems::Stretch,
        }
    }
}

/// Whether a node takes part in its parent's flex flow.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PositionType {
    /// In flow; `position` offsets shift the node after layout.
    #[default]
    Relative,
    /// Out of flow; placed by its `position` offsets.
    Absolute,
}

/// Whether in-flow children may break into several lines.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FlexWrap {
    /// A single line that may overflow.
    #[default]
    NoWrap,
    /// Break lines when the main axis is full.
    Wrap,
}

/// Position offsets for the four edges.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Offsets {
    /// Offset from the top edge.
    pub top: Length,
    /// Offset from the right edge.
    pub right: Length,
    /// Offset from the bottom edge.
    pub bottom: Length,
    /// Offset from the left edge.
    pub left: Length,
}

/// The style of a node.
///
/// `margin`, `padding` and `border` hold resolved values. Edit them through
/// [`Tree::set_margin`](crate::Tree::set_margin) and friends so that their sparse
/// definitions stay in sync, or replace them wholesale with
/// [`Tree::set_style`](crate::Tree::set_style).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Style {
    /// Main axis and its direction.
    pub flex_direction: FlexDirection,
    /// Main-axis packing.
    pub justify_content: JustifyContent,
    /// Default cross-axis alignment of children.
    pub align_items: AlignItems,
    /// Cross-axis alignment of this node within its parent.
    pub align_self: AlignSelf,
    /// In-flow or absolutely positioned.
    pub position_type: PositionType,
    /// Line breaking of children.
    pub flex_wrap: FlexWrap,
    /// Grow and shrink weight; zero makes the node inflexible.
    pub flex: f64,
    /// Resolved margin.
    pub margin: Edges,
    /// Resolved padding.
    pub padding: Edges,
    /// Resolved border widths.
    pub border: Edges,
    /// Position offsets.
    pub position: Offsets,
    /// Explicit border-box width.
    pub width: Length,
    /// Explicit border-box height.
    pub height: Length,
    /// Lower bound on the border-box width.
    pub min_width: Length,
    /// Lower bound on the border-box height.
    pub min_height: Length,
    /// Upper bound on the border-box width.
    pub max_width: Length,
    /// Upper bound on the border-box height.
    pub max_height: Length,
}

impl Style {
    /// Padding plus border.
    pub fn inset(&self) -> Edges {
        self.padding + self.border
    }

    pub(crate) fn is_absolute(&self) -> bool {
        self.position_type == PositionType::Absolute
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_css_layout_conventions() {
        let style = Style::default();
        assert_eq!(style.flex_direction, FlexDirection::Column);
        assert_eq!(style.align_items, AlignItems::Stretch);
        assert_eq!(style.align_self, AlignSelf::Auto);
        assert_eq!(style.position_type, PositionType::Relative);
        assert!(style.width.is_undefined());
        assert!(style.position.left.is_undefined());
        assert_eq!(style.flex, 0.0);
    }

    #[test]
    fn align_self_overrides_only_when_set() {
        assert_eq!(AlignSelf::Auto.resolve(AlignItems::Center), AlignItems::Center);
        assert_eq!(
            AlignSelf::FlexEnd.resolve(AlignItems::Stretch),
            AlignItems::FlexEnd
        );
    }
}
