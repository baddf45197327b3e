// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The flex layout algorithm.
//!
//! Layout runs in two kinds of passes over a node:
//!
//! - size probes ([`Mode::Measure`]) compute a node's border-box size under some
//!   constraints without touching the geometry of its descendants;
//! - full layout ([`Mode::Layout`]) computes the size and then places every child.
//!
//! A parent probes each in-flow child for its flex basis and cross size before laying it
//! out for real, so a child can be visited several times per pass. Both kinds of result
//! are memoized per node, keyed by the constraints that produced them, which keeps the
//! probing linear in tree size.

use alloc::vec::Vec;
use core::ops::Range;

use kurbo::{Point, Size, Vec2};

use crate::cache::Constraints;
use crate::error::FlexResult;
use crate::length::Length;
use crate::spacing::Edges;
use crate::style::{AlignItems, FlexDirection, FlexWrap, JustifyContent, Offsets, Style};
use crate::tree::Tree;
use crate::types::{LayoutState, NodeId};

/// A pair of values along the horizontal and vertical axes.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct Axes<T> {
    pub(crate) width: T,
    pub(crate) height: T,
}

impl<T: Copy> Axes<T> {
    pub(crate) const fn new(width: T, height: T) -> Self {
        Self { width, height }
    }

    fn from_main_cross(direction: FlexDirection, main: T, cross: T) -> Self {
        if direction.is_row() {
            Self::new(main, cross)
        } else {
            Self::new(cross, main)
        }
    }

    fn main(self, direction: FlexDirection) -> T {
        if direction.is_row() {
            self.width
        } else {
            self.height
        }
    }

    fn cross(self, direction: FlexDirection) -> T {
        if direction.is_row() {
            self.height
        } else {
            self.width
        }
    }
}

impl From<Size> for Axes<f64> {
    fn from(size: Size) -> Self {
        Self::new(size.width, size.height)
    }
}

impl From<Axes<f64>> for Size {
    fn from(axes: Axes<f64>) -> Self {
        Self::new(axes.width, axes.height)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Mode {
    /// Compute the node's size only.
    Measure,
    /// Compute the node's size and lay out its subtree.
    Layout,
}

/// An in-flow child as seen by its flex container.
#[derive(Clone, Debug)]
struct FlexItem {
    id: NodeId,
    margin: Edges,
    flex: f64,
    align: AlignItems,
    /// Space available to the child's border box.
    available: Axes<Length>,
    /// Explicit cross dimension.
    cross_size: Length,
    min_main: f64,
    max_main: Length,
    min_cross: f64,
    max_cross: Length,
    basis: f64,
    /// Target main size, after flexing.
    main: f64,
    cross: f64,
    frozen: bool,
    violation: f64,
}

impl FlexItem {
    fn outer_main(&self, direction: FlexDirection) -> f64 {
        self.main + self.margin.main_sum(direction)
    }

    fn outer_cross(&self, direction: FlexDirection) -> f64 {
        self.cross + self.margin.cross_sum(direction)
    }
}

#[derive(Clone, Debug)]
struct FlexLine {
    items: Range<usize>,
    cross: f64,
}

impl Tree {
    /// Compute the layout of the subtree rooted at `root`.
    ///
    /// `available_width` bounds the root's margin box; pass [`Length::UNDEFINED`] for
    /// unconstrained layout. Only dirty nodes, and nodes whose constraints changed, are
    /// recomputed. Every node whose geometry was computed or changed ends up
    /// [`LayoutState::Fresh`].
    ///
    /// ```rust
    /// use understory_flex::{FlexDirection, FlexWrap, Length, Style, Tree};
    ///
    /// let mut tree = Tree::new();
    /// let row = tree.create(Style {
    ///     flex_direction: FlexDirection::Row,
    ///     flex_wrap: FlexWrap::Wrap,
    ///     ..Style::default()
    /// });
    /// let tile = Style {
    ///     width: Length::new(60.0),
    ///     height: Length::new(20.0),
    ///     ..Style::default()
    /// };
    /// let a = tree.create(tile);
    /// let b = tree.create(tile);
    /// tree.append_child(row, a).unwrap();
    /// tree.append_child(row, b).unwrap();
    ///
    /// tree.compute_layout(row, Length::new(100.0)).unwrap();
    /// assert_eq!(tree.layout(b).unwrap().y(), 20.0);
    /// assert_eq!(tree.layout(row).unwrap().height(), 40.0);
    /// ```
    pub fn compute_layout(&mut self, root: NodeId, available_width: Length) -> FlexResult<()> {
        let style = self.live(root)?.style;
        let _span = tracing::debug_span!("compute_layout", ?root, ?available_width).entered();

        let available = Axes::new(
            (available_width - style.margin.horizontal()).max(0.0),
            Length::UNDEFINED,
        );
        let known = Axes::new(Length::UNDEFINED, Length::UNDEFINED);
        let size = self.compute_node(root, known, available, Mode::Layout);
        // The root is a containing block whatever its position type.
        if style.is_absolute() {
            self.layout_absolute_descendants(size, root, Vec2::ZERO);
        }
        self.place(root, Point::new(style.margin.left, style.margin.top));
        Ok(())
    }

    /// Size (and, in [`Mode::Layout`], lay out) a node, consulting its cache.
    fn compute_node(
        &mut self,
        id: NodeId,
        known: Axes<Length>,
        available: Axes<Length>,
        mode: Mode,
    ) -> Size {
        let constraints = Constraints { known, available };
        let node = self.node(id);
        let cached = match mode {
            Mode::Layout if node.state != LayoutState::Dirty => node.cache.layout(&constraints),
            Mode::Layout => None,
            Mode::Measure => node.cache.probe(&constraints),
        };
        if let Some(size) = cached {
            tracing::trace!(node = ?id, ?mode, "cache hit");
            return size;
        }

        let style = node.style;
        let size = if node.is_measured_leaf(self) {
            self.measure_leaf(id, &style, known, available)
        } else {
            self.layout_flex(id, &style, known, available, mode)
        };

        match mode {
            Mode::Measure => self.node_mut(id).cache.store_probe(constraints, size),
            Mode::Layout => {
                if !style.is_absolute() {
                    self.layout_absolute_descendants(size, id, Vec2::ZERO);
                }
                let node = self.node_mut(id);
                node.cache.store_layout(constraints, size);
                let resized = node.layout.size != size;
                node.layout.size = size;
                if node.state == LayoutState::Dirty || resized {
                    node.state = LayoutState::Fresh;
                }
            }
        }
        size
    }

    /// Size a leaf through its measure function.
    fn measure_leaf(
        &mut self,
        id: NodeId,
        style: &Style,
        known: Axes<Length>,
        available: Axes<Length>,
    ) -> Size {
        let inset = style.inset();
        let own = definite_size(style, known);
        if let (Some(width), Some(height)) = (own.width.get(), own.height.get()) {
            return Size::new(width.max(inset.horizontal()), height.max(inset.vertical()));
        }

        let available_width = (own.width.or(available.width) - inset.horizontal()).max(0.0);
        let content = self.measure(id, available_width).unwrap_or(Size::ZERO);
        let width = own.width.unwrap_or(clamp(
            content.width + inset.horizontal(),
            style.min_width,
            style.max_width,
        ));
        let height = own.height.unwrap_or(clamp(
            content.height + inset.vertical(),
            style.min_height,
            style.max_height,
        ));
        Size::new(width.max(inset.horizontal()), height.max(inset.vertical()))
    }

    /// Size a flex container and, in [`Mode::Layout`], place its in-flow children.
    fn layout_flex(
        &mut self,
        id: NodeId,
        style: &Style,
        known: Axes<Length>,
        available: Axes<Length>,
        mode: Mode,
    ) -> Size {
        let direction = style.flex_direction;
        let inset = style.inset();
        let inset_size = Axes::new(inset.horizontal(), inset.vertical());

        let own = definite_size(style, known);
        let inner = Axes::new(
            (own.width - inset_size.width).max(0.0),
            (own.height - inset_size.height).max(0.0),
        );
        let inner_available = Axes::new(
            inner.width.or((available.width - inset_size.width).max(0.0)),
            inner.height.or((available.height - inset_size.height).max(0.0)),
        );

        let in_flow: Vec<NodeId> = self
            .node(id)
            .children
            .iter()
            .copied()
            .filter(|&c| !self.node(c).style.is_absolute())
            .collect();

        let mut items = Vec::with_capacity(in_flow.len());
        for child in in_flow {
            items.push(self.flex_item(child, style, inner_available));
        }

        let main_space = inner.main(direction).or(inner_available.main(direction));
        let mut lines = break_lines(&items, direction, style.flex_wrap, main_space);
        for line in &lines {
            resolve_flexible_lengths(&mut items[line.items.clone()], direction, main_space);
        }

        // Cross sizes follow from the final main sizes.
        for item in &mut items {
            let cross = match item.cross_size.get() {
                Some(cross) => cross,
                None => {
                    let known =
                        Axes::from_main_cross(direction, Length::new(item.main), Length::UNDEFINED);
                    let size = self.compute_node(item.id, known, item.available, Mode::Measure);
                    Axes::from(size).cross(direction)
                }
            };
            item.cross = clamp(cross, Length::new(item.min_cross), item.max_cross);
        }

        let single_line_cross = match style.flex_wrap {
            FlexWrap::NoWrap => inner.cross(direction),
            FlexWrap::Wrap => Length::UNDEFINED,
        };
        for line in &mut lines {
            let natural = items[line.items.clone()]
                .iter()
                .map(|i| i.outer_cross(direction))
                .fold(0.0, f64::max);
            line.cross = single_line_cross.unwrap_or(natural);
            for item in &mut items[line.items.clone()] {
                if item.align == AlignItems::Stretch && item.cross_size.is_undefined() {
                    item.cross = clamp(
                        line.cross - item.margin.cross_sum(direction),
                        Length::new(item.min_cross),
                        item.max_cross,
                    );
                }
            }
        }

        let content_main = lines
            .iter()
            .map(|l| {
                items[l.items.clone()]
                    .iter()
                    .map(|i| i.outer_main(direction))
                    .sum::<f64>()
            })
            .fold(0.0, f64::max);
        let content_cross: f64 = lines.iter().map(|l| l.cross).sum();
        let min_size = Axes::new(style.min_width, style.min_height);
        let max_size = Axes::new(style.max_width, style.max_height);
        let outer_main = own
            .main(direction)
            .unwrap_or(clamp(
                content_main + inset_size.main(direction),
                min_size.main(direction),
                max_size.main(direction),
            ))
            .max(inset_size.main(direction));
        let outer_cross = own
            .cross(direction)
            .unwrap_or(clamp(
                content_cross + inset_size.cross(direction),
                min_size.cross(direction),
                max_size.cross(direction),
            ))
            .max(inset_size.cross(direction));
        let size = Size::from(Axes::from_main_cross(direction, outer_main, outer_cross));

        if mode == Mode::Layout {
            let inner_main = outer_main - inset_size.main(direction);
            let mut cross_cursor = inset.cross_start(direction);
            for line in &lines {
                let used: f64 = items[line.items.clone()]
                    .iter()
                    .map(|i| i.outer_main(direction))
                    .sum();
                let (leading, gap) =
                    justify(style.justify_content, inner_main - used, line.items.len());
                let mut main_cursor = inset.main_start(direction) + leading;
                for item in &items[line.items.clone()] {
                    let known = Axes::from_main_cross(
                        direction,
                        Length::new(item.main),
                        Length::new(item.cross),
                    );
                    self.compute_node(item.id, known, item.available, Mode::Layout);

                    let start = main_cursor + item.margin.main_start(direction);
                    main_cursor += item.outer_main(direction) + gap;
                    // Positions are computed from main-start; flip them for reversed flows.
                    let main_pos = if direction.is_reverse() {
                        outer_main - start - item.main
                    } else {
                        start
                    };
                    let cross_pos = cross_cursor + align_offset(item, line.cross, direction);
                    let axes = Axes::from_main_cross(direction, main_pos, cross_pos);
                    let offset = relative_offset(&self.node(item.id).style.position);
                    self.place(item.id, Point::new(axes.width, axes.height) + offset);
                }
                cross_cursor += line.cross;
            }
        }
        size
    }

    /// Gather an in-flow child's constraints and hypothetical main size.
    fn flex_item(
        &mut self,
        child: NodeId,
        parent: &Style,
        inner_available: Axes<Length>,
    ) -> FlexItem {
        let direction = parent.flex_direction;
        let style = self.node(child).style;
        let margin = style.margin;
        let inset = style.inset();
        let inset_size = Axes::new(inset.horizontal(), inset.vertical());
        let available = Axes::new(
            (inner_available.width - margin.horizontal()).max(0.0),
            (inner_available.height - margin.vertical()).max(0.0),
        );
        let size = Axes::new(style.width, style.height);
        let min = Axes::new(style.min_width, style.min_height);
        let max = Axes::new(style.max_width, style.max_height);

        let basis = match size.main(direction).get() {
            Some(basis) => basis,
            None => {
                // Measured leaves see the real available width; containers report their
                // natural size along an unconstrained main axis.
                let probe = if self.node(child).is_measured_leaf(self) {
                    available
                } else {
                    Axes::from_main_cross(direction, Length::UNDEFINED, available.cross(direction))
                };
                let unknown = Axes::new(Length::UNDEFINED, Length::UNDEFINED);
                Axes::from(self.compute_node(child, unknown, probe, Mode::Measure)).main(direction)
            }
        };
        let min_main = min
            .main(direction)
            .unwrap_or(0.0)
            .max(inset_size.main(direction));
        let min_cross = min
            .cross(direction)
            .unwrap_or(0.0)
            .max(inset_size.cross(direction));
        let basis = clamp(basis, Length::new(min_main), max.main(direction));

        FlexItem {
            id: child,
            margin,
            flex: style.flex.max(0.0),
            align: style.align_self.resolve(parent.align_items),
            available,
            cross_size: size.cross(direction),
            min_main,
            max_main: max.main(direction),
            min_cross,
            max_cross: max.cross(direction),
            basis,
            main: basis,
            cross: 0.0,
            frozen: false,
            violation: 0.0,
        }
    }

    /// Size and place the absolutely positioned children of `parent`, and recursively
    /// theirs, against a containing block of `container` size.
    ///
    /// `offset` is the position of `parent` within the containing block. Absolute nodes
    /// are not containing blocks, so their absolute children resolve offsets against the
    /// same block.
    fn layout_absolute_descendants(&mut self, container: Size, parent: NodeId, offset: Vec2) {
        let parent_inset = self.node(parent).style.inset();
        let absolute: Vec<NodeId> = self
            .node(parent)
            .children
            .iter()
            .copied()
            .filter(|&c| self.node(c).style.is_absolute())
            .collect();

        for child in absolute {
            let style = self.node(child).style;
            let margin = style.margin;
            let position = style.position;

            // Opposing offsets stretch the box when no explicit size is set.
            let stretched = Axes::new(
                Length::new(container.width) - position.left - position.right - margin.horizontal(),
                Length::new(container.height) - position.top - position.bottom - margin.vertical(),
            );
            let known = Axes::new(
                clamp_length(
                    style.width.or(stretched.width.max(0.0)),
                    style.min_width,
                    style.max_width,
                ),
                clamp_length(
                    style.height.or(stretched.height.max(0.0)),
                    style.min_height,
                    style.max_height,
                ),
            );
            let available = Axes::new(
                Length::new(container.width - margin.horizontal()).max(0.0),
                Length::new(container.height - margin.vertical()).max(0.0),
            );
            let size = self.compute_node(child, known, available, Mode::Layout);

            let x = match (position.left.get(), position.right.get()) {
                (Some(left), _) => left + margin.left,
                (None, Some(right)) => container.width - right - margin.right - size.width,
                (None, None) => offset.x + parent_inset.left + margin.left,
            };
            let y = match (position.top.get(), position.bottom.get()) {
                (Some(top), _) => top + margin.top,
                (None, Some(bottom)) => container.height - bottom - margin.bottom - size.height,
                (None, None) => offset.y + parent_inset.top + margin.top,
            };
            self.place(child, Point::new(x - offset.x, y - offset.y));
            self.layout_absolute_descendants(container, child, Vec2::new(x, y));
        }
    }

    /// Move a node; a seen node whose position changes becomes fresh again.
    fn place(&mut self, id: NodeId, origin: Point) {
        let node = self.node_mut(id);
        if node.layout.origin != origin {
            node.layout.origin = origin;
            if node.state == LayoutState::Seen {
                node.state = LayoutState::Fresh;
            }
        }
    }
}

/// The explicit border-box size, with parent-imposed dimensions taking precedence.
fn definite_size(style: &Style, known: Axes<Length>) -> Axes<Length> {
    Axes::new(
        clamp_length(known.width.or(style.width), style.min_width, style.max_width),
        clamp_length(known.height.or(style.height), style.min_height, style.max_height),
    )
}

fn clamp(value: f64, min: Length, max: Length) -> f64 {
    let value = max.get().map_or(value, |max| value.min(max));
    min.get().map_or(value, |min| value.max(min))
}

fn clamp_length(value: Length, min: Length, max: Length) -> Length {
    Length::from(value.get().map(|v| clamp(v, min, max)))
}

/// Split items into flex lines. Without wrapping, or without a main-axis limit, there is
/// exactly one line.
fn break_lines(
    items: &[FlexItem],
    direction: FlexDirection,
    wrap: FlexWrap,
    limit: Length,
) -> Vec<FlexLine> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut used = 0.0;
    for (i, item) in items.iter().enumerate() {
        let outer = item.basis + item.margin.main_sum(direction);
        if wrap == FlexWrap::Wrap
            && i > start
            && let Some(limit) = limit.get()
            && used + outer > limit
        {
            lines.push(FlexLine {
                items: start..i,
                cross: 0.0,
            });
            start = i;
            used = 0.0;
        }
        used += outer;
    }
    lines.push(FlexLine {
        items: start..items.len(),
        cross: 0.0,
    });
    lines
}

/// Grow or shrink the items of one line towards `space`, in proportion to their flex.
///
/// Items that hit their min or max size are frozen there and the remaining free space is
/// shared among the others. Every round either settles the line or freezes at least one
/// item, so there are at most `items.len()` rounds.
fn resolve_flexible_lengths(items: &mut [FlexItem], direction: FlexDirection, space: Length) {
    for item in items.iter_mut() {
        item.main = item.basis;
        item.frozen = item.flex <= 0.0;
    }
    let Some(space) = space.get() else {
        return;
    };
    let initial_free = space - items.iter().map(|i| i.outer_main(direction)).sum::<f64>();
    if initial_free == 0.0 {
        return;
    }
    let growing = initial_free > 0.0;

    for _ in 0..items.len() {
        let flex_total: f64 = items.iter().filter(|i| !i.frozen).map(|i| i.flex).sum();
        if flex_total <= 0.0 {
            break;
        }
        let used: f64 = items
            .iter()
            .map(|i| {
                let main = if i.frozen { i.main } else { i.basis };
                main + i.margin.main_sum(direction)
            })
            .sum();
        let free = space - used;
        if (growing && free <= 0.0) || (!growing && free >= 0.0) {
            for item in items.iter_mut().filter(|i| !i.frozen) {
                item.main = item.basis;
            }
            break;
        }

        let mut violation = 0.0;
        for item in items.iter_mut().filter(|i| !i.frozen) {
            let unclamped = item.basis + free * (item.flex / flex_total);
            item.main = clamp(unclamped, Length::new(item.min_main), item.max_main);
            item.violation = item.main - unclamped;
            violation += item.violation;
        }
        if violation == 0.0 {
            break;
        }
        // Unbounded space leaves nothing to redistribute.
        if !violation.is_finite() {
            break;
        }
        // Freeze the items clamped in the direction of the total violation.
        for item in items.iter_mut().filter(|i| !i.frozen) {
            if (violation > 0.0 && item.violation > 0.0) || (violation < 0.0 && item.violation < 0.0)
            {
                item.frozen = true;
            }
        }
    }
}

/// Leading space and inter-item gap for a line with `free` leftover main-axis space.
fn justify(justify: JustifyContent, free: f64, count: usize) -> (f64, f64) {
    if count == 0 {
        return (0.0, 0.0);
    }
    let n = count as f64;
    match justify {
        JustifyContent::FlexStart => (0.0, 0.0),
        JustifyContent::FlexEnd => (free, 0.0),
        JustifyContent::Center => (free / 2.0, 0.0),
        JustifyContent::SpaceBetween if free > 0.0 && count > 1 => (0.0, free / (n - 1.0)),
        JustifyContent::SpaceBetween => (0.0, 0.0),
        JustifyContent::SpaceAround if free > 0.0 => (free / n / 2.0, free / n),
        JustifyContent::SpaceAround => (free / 2.0, 0.0),
    }
}

/// Offset of an item's border box from the cross-start edge of its line.
fn align_offset(item: &FlexItem, line_cross: f64, direction: FlexDirection) -> f64 {
    let start = item.margin.cross_start(direction);
    match item.align {
        AlignItems::FlexStart | AlignItems::Stretch => start,
        AlignItems::Center => start + (line_cross - item.outer_cross(direction)) / 2.0,
        AlignItems::FlexEnd => line_cross - item.cross - item.margin.cross_end(direction),
    }
}

/// Shift applied to a relatively positioned node after layout.
fn relative_offset(position: &Offsets) -> Vec2 {
    let dx = position
        .left
        .get()
        .or(position.right.get().map(|right| -right))
        .unwrap_or(0.0);
    let dy = position
        .top
        .get()
        .or(position.bottom.get().map(|bottom| -bottom))
        .unwrap_or(0.0);
    Vec2::new(dx, dy)
}
