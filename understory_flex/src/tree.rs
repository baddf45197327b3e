// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: structure, invalidation, and the layout state machine.

use alloc::{boxed::Box, vec, vec::Vec};
use core::fmt;

use kurbo::Size;

use crate::cache::LayoutCache;
use crate::error::{FlexError, FlexResult};
use crate::length::Length;
use crate::measure::{Measure, sanitize};
use crate::spacing::{Edge, Edges, Spacing};
use crate::style::{
    AlignItems, AlignSelf, FlexDirection, FlexWrap, JustifyContent, PositionType, Style,
};
use crate::types::{Layout, LayoutState, NodeId};

/// A tree of styled nodes and their computed layouts.
///
/// Nodes live in an arena and are addressed by generational [`NodeId`]s. Parents own
/// their children; the child-to-parent link is a plain identifier used for upward
/// invalidation.
///
/// Every mutation that can change geometry marks the node and its ancestors dirty.
/// [`Tree::compute_layout`] recomputes the dirty part of a tree, reusing memoized
/// results everywhere else, and flags every node with new geometry as fresh. The host
/// reads the geometry and acknowledges it with [`Tree::mark_seen`]; mutating a node
/// whose fresh layout was never acknowledged is an error.
///
/// ## Example
///
/// ```rust
/// use understory_flex::{FlexDirection, Length, Style, Tree};
///
/// let mut tree = Tree::new();
/// let root = tree.create(Style {
///     flex_direction: FlexDirection::Row,
///     width: Length::new(300.0),
///     height: Length::new(100.0),
///     ..Style::default()
/// });
/// let child = tree.create(Style {
///     flex: 1.0,
///     ..Style::default()
/// });
/// tree.append_child(root, child).unwrap();
///
/// tree.compute_layout(root, Length::UNDEFINED).unwrap();
/// let layout = tree.layout(child).unwrap();
/// assert_eq!((layout.width(), layout.height()), (300.0, 100.0));
///
/// // Acknowledge before mutating again.
/// tree.mark_subtree_seen(root);
/// tree.set_width(root, Length::new(200.0)).unwrap();
/// assert!(tree.is_dirty(root));
/// ```
pub struct Tree {
    /// slots
    nodes: Vec<Option<Node>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
}

impl fmt::Debug for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        let dirty = self
            .nodes
            .iter()
            .flatten()
            .filter(|n| n.state == LayoutState::Dirty)
            .count();
        f.debug_struct("Tree")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("nodes_dirty", &dirty)
            .field("free_list", &self.free_list.len())
            .finish_non_exhaustive()
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy, Debug)]
enum SpacingKind {
    Margin,
    Padding,
    Border,
}

pub(crate) struct Node {
    generation: u32,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) style: Style,
    /// Sparse margin, padding and border definitions backing the resolved edges in `style`.
    spacing: [Spacing; 3],
    pub(crate) layout: Layout,
    pub(crate) cache: LayoutCache,
    pub(crate) measure: Option<Box<dyn Measure>>,
    pub(crate) state: LayoutState,
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("generation", &self.generation)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("style", &self.style)
            .field("spacing", &self.spacing)
            .field("layout", &self.layout)
            .field("cache", &self.cache)
            .field("measure", &self.measure.is_some())
            .field("state", &self.state)
            .finish()
    }
}

impl Node {
    fn new(generation: u32, style: Style) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            spacing: [
                spacing_from(style.margin),
                spacing_from(style.padding),
                spacing_from(style.border),
            ],
            style: normalized(style),
            layout: Layout::default(),
            cache: LayoutCache::default(),
            measure: None,
            state: LayoutState::Dirty,
        }
    }

    /// Returns `true` if the node is sized by its measure function.
    pub(crate) fn is_measured_leaf(&self, tree: &Tree) -> bool {
        self.measure.is_some()
            && self
                .children
                .iter()
                .all(|&c| tree.node(c).style.is_absolute())
    }
}

/// Sparse definitions that reproduce `edges` exactly.
fn spacing_from(edges: Edges) -> Spacing {
    let mut spacing = Spacing::default();
    if edges == Edges::ZERO {
        return spacing;
    }
    spacing.set(Edge::Left, Length::new(edges.left));
    spacing.set(Edge::Top, Length::new(edges.top));
    spacing.set(Edge::Right, Length::new(edges.right));
    spacing.set(Edge::Bottom, Length::new(edges.bottom));
    spacing
}

/// Clear NaNs that would never compare equal to themselves, and keep the resolved edges
/// in agreement with the sparse definitions built from them.
fn normalized(mut style: Style) -> Style {
    if style.flex.is_nan() {
        style.flex = 0.0;
    }
    style.margin = spacing_from(style.margin).resolve();
    style.padding = spacing_from(style.padding).resolve();
    style.border = spacing_from(style.border).resolve();
    style
}

impl Tree {
    /// Create a new empty tree.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create a new empty tree with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            generations: Vec::with_capacity(capacity),
            free_list: Vec::new(),
        }
    }

    /// Create a detached node with the given style.
    ///
    /// The node starts [`LayoutState::Dirty`] and becomes a root until it is inserted
    /// under a parent.
    pub fn create(&mut self, style: Style) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, style));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId stores 32-bit slot indices."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, style)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId stores 32-bit slot indices."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        NodeId::new(idx, generation)
    }

    /// Destroy a node and its whole subtree.
    ///
    /// The node is first detached from its parent, which is marked dirty. All
    /// identifiers in the subtree become stale.
    pub fn remove(&mut self, id: NodeId) -> FlexResult<()> {
        if let Some(parent) = self.live(id)?.parent {
            let index = self
                .index_of(parent, id)
                .ok_or(FlexError::StaleNode(id))?;
            self.remove_child(parent, index)?;
        }
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            let Some(node) = self.nodes[n.idx()].take() else {
                continue;
            };
            stack.extend(node.children);
            self.free_list.push(n.idx());
        }
        Ok(())
    }

    /// Insert `child` under `parent` at `index`.
    ///
    /// Fails without touching either tree if `child` already has a parent, if `child`
    /// is `parent` or one of its ancestors, or if `index > child_count(parent)`.
    pub fn insert_child(&mut self, parent: NodeId, child: NodeId, index: usize) -> FlexResult<()> {
        let len = self.live(parent)?.children.len();
        if self.live(child)?.parent.is_some() {
            return Err(FlexError::AlreadyAttached { child });
        }
        if self.is_ancestor_or_self(child, parent) {
            return Err(FlexError::WouldCycle { parent, child });
        }
        if index > len {
            return Err(FlexError::IndexOutOfBounds { index, len });
        }
        self.ensure_can_dirty(parent)?;
        self.node_mut(parent).children.insert(index, child);
        self.node_mut(child).parent = Some(parent);
        self.propagate_dirty(parent);
        Ok(())
    }

    /// Insert `child` as the last child of `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> FlexResult<()> {
        let len = self.live(parent)?.children.len();
        self.insert_child(parent, child, len)
    }

    /// Detach and return the child of `parent` at `index`.
    ///
    /// The child stays alive as a detached root.
    pub fn remove_child(&mut self, parent: NodeId, index: usize) -> FlexResult<NodeId> {
        let len = self.live(parent)?.children.len();
        if index >= len {
            return Err(FlexError::IndexOutOfBounds { index, len });
        }
        self.ensure_can_dirty(parent)?;
        let child = self.node_mut(parent).children.remove(index);
        self.node_mut(child).parent = None;
        self.propagate_dirty(parent);
        Ok(child)
    }

    /// Number of children of a node, zero for stale ids.
    pub fn child_count(&self, id: NodeId) -> usize {
        self.children_of(id).len()
    }

    /// Child of `id` at `index`.
    pub fn child_at(&self, id: NodeId, index: usize) -> Option<NodeId> {
        self.children_of(id).get(index).copied()
    }

    /// Position of `child` among the children of `parent`.
    pub fn index_of(&self, parent: NodeId, child: NodeId) -> Option<usize> {
        self.children_of(parent).iter().position(|&c| c == child)
    }

    /// Get the children of a node, or empty slice if node is stale.
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        self.node_opt(id).map_or(&[], |n| &n.children)
    }

    /// Returns the parent of a node if live, or `None` for roots or stale ids.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.node_opt(id).and_then(|n| n.parent)
    }

    /// Returns true if `id` refers to a live node.
    ///
    /// A `NodeId` is considered live if its slot exists and its generation matches
    /// the current generation stored in that slot.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.node_opt(id).is_some()
    }

    /// Attach a measure function, replacing any previous one.
    ///
    /// Functions cannot be compared, so this always marks the node dirty.
    pub fn set_measure(&mut self, id: NodeId, measure: impl Measure + 'static) -> FlexResult<()> {
        self.live(id)?;
        self.ensure_can_dirty(id)?;
        self.node_mut(id).measure = Some(Box::new(measure));
        self.propagate_dirty(id);
        Ok(())
    }

    /// Detach the measure function, if any.
    pub fn clear_measure(&mut self, id: NodeId) -> FlexResult<()> {
        if self.live(id)?.measure.is_none() {
            return Ok(());
        }
        self.ensure_can_dirty(id)?;
        self.node_mut(id).measure = None;
        self.propagate_dirty(id);
        Ok(())
    }

    /// Returns `true` if a measure function is attached.
    pub fn is_measurable(&self, id: NodeId) -> bool {
        self.node_opt(id).is_some_and(|n| n.measure.is_some())
    }

    /// Invoke the measure function of `id`.
    ///
    /// Fails with [`FlexError::MissingMeasure`] if none is attached.
    pub fn measure(&mut self, id: NodeId, available_width: Length) -> FlexResult<Size> {
        let Some(measure) = self.live_mut(id)?.measure.as_mut() else {
            return Err(FlexError::MissingMeasure(id));
        };
        let size = sanitize(measure.measure(id, available_width));
        tracing::trace!(node = ?id, ?available_width, ?size, "measured");
        Ok(size)
    }

    /// The style of a live node.
    pub fn style(&self, id: NodeId) -> Option<&Style> {
        self.node_opt(id).map(|n| &n.style)
    }

    /// Replace the whole style.
    ///
    /// Margin, padding and border definitions are reset to the per-edge values of the
    /// new style.
    pub fn set_style(&mut self, id: NodeId, style: Style) -> FlexResult<()> {
        let style = normalized(style);
        if self.live(id)?.style == style {
            return Ok(());
        }
        self.ensure_can_dirty(id)?;
        let node = self.node_mut(id);
        node.spacing = [
            spacing_from(style.margin),
            spacing_from(style.padding),
            spacing_from(style.border),
        ];
        node.style = style;
        self.propagate_dirty(id);
        Ok(())
    }

    /// Update the flex direction.
    pub fn set_flex_direction(&mut self, id: NodeId, value: FlexDirection) -> FlexResult<()> {
        self.update_style(id, |s| s.flex_direction = value)
    }

    /// Update main-axis justification.
    pub fn set_justify_content(&mut self, id: NodeId, value: JustifyContent) -> FlexResult<()> {
        self.update_style(id, |s| s.justify_content = value)
    }

    /// Update the default cross-axis alignment of children.
    pub fn set_align_items(&mut self, id: NodeId, value: AlignItems) -> FlexResult<()> {
        self.update_style(id, |s| s.align_items = value)
    }

    /// Update this node's own cross-axis alignment.
    pub fn set_align_self(&mut self, id: NodeId, value: AlignSelf) -> FlexResult<()> {
        self.update_style(id, |s| s.align_self = value)
    }

    /// Update the position type.
    pub fn set_position_type(&mut self, id: NodeId, value: PositionType) -> FlexResult<()> {
        self.update_style(id, |s| s.position_type = value)
    }

    /// Update line wrapping.
    pub fn set_flex_wrap(&mut self, id: NodeId, value: FlexWrap) -> FlexResult<()> {
        self.update_style(id, |s| s.flex_wrap = value)
    }

    /// Update the flex weight. NaN is stored as zero.
    pub fn set_flex(&mut self, id: NodeId, value: f64) -> FlexResult<()> {
        let value = if value.is_nan() { 0.0 } else { value };
        self.update_style(id, |s| s.flex = value)
    }

    /// Define the margin of `edge`.
    pub fn set_margin(&mut self, id: NodeId, edge: Edge, value: Length) -> FlexResult<()> {
        self.update_spacing(id, SpacingKind::Margin, edge, value)
    }

    /// Define the padding of `edge`.
    pub fn set_padding(&mut self, id: NodeId, edge: Edge, value: Length) -> FlexResult<()> {
        self.update_spacing(id, SpacingKind::Padding, edge, value)
    }

    /// Define the border width of `edge`.
    pub fn set_border(&mut self, id: NodeId, edge: Edge, value: Length) -> FlexResult<()> {
        self.update_spacing(id, SpacingKind::Border, edge, value)
    }

    /// Update the top offset.
    pub fn set_position_top(&mut self, id: NodeId, value: Length) -> FlexResult<()> {
        self.update_style(id, |s| s.position.top = value)
    }

    /// Update the right offset.
    pub fn set_position_right(&mut self, id: NodeId, value: Length) -> FlexResult<()> {
        self.update_style(id, |s| s.position.right = value)
    }

    /// Update the bottom offset.
    pub fn set_position_bottom(&mut self, id: NodeId, value: Length) -> FlexResult<()> {
        self.update_style(id, |s| s.position.bottom = value)
    }

    /// Update the left offset.
    pub fn set_position_left(&mut self, id: NodeId, value: Length) -> FlexResult<()> {
        self.update_style(id, |s| s.position.left = value)
    }

    /// Update the explicit width.
    pub fn set_width(&mut self, id: NodeId, value: Length) -> FlexResult<()> {
        self.update_style(id, |s| s.width = value)
    }

    /// Update the explicit height.
    pub fn set_height(&mut self, id: NodeId, value: Length) -> FlexResult<()> {
        self.update_style(id, |s| s.height = value)
    }

    /// Update the minimum width.
    pub fn set_min_width(&mut self, id: NodeId, value: Length) -> FlexResult<()> {
        self.update_style(id, |s| s.min_width = value)
    }

    /// Update the minimum height.
    pub fn set_min_height(&mut self, id: NodeId, value: Length) -> FlexResult<()> {
        self.update_style(id, |s| s.min_height = value)
    }

    /// Update the maximum width.
    pub fn set_max_width(&mut self, id: NodeId, value: Length) -> FlexResult<()> {
        self.update_style(id, |s| s.max_width = value)
    }

    /// Update the maximum height.
    pub fn set_max_height(&mut self, id: NodeId, value: Length) -> FlexResult<()> {
        self.update_style(id, |s| s.max_height = value)
    }

    /// Mark a node and its ancestors dirty.
    ///
    /// A no-op if the node is already dirty. Fails with [`FlexError::UnconsumedLayout`]
    /// if the node, or an ancestor that would be dirtied, holds a fresh layout; in that
    /// case nothing changes.
    pub fn mark_dirty(&mut self, id: NodeId) -> FlexResult<()> {
        self.live(id)?;
        self.ensure_can_dirty(id)?;
        self.propagate_dirty(id);
        Ok(())
    }

    /// Returns `true` if the node needs layout. `false` for stale ids.
    pub fn is_dirty(&self, id: NodeId) -> bool {
        self.layout_state(id) == Some(LayoutState::Dirty)
    }

    /// Returns `true` if the node has geometry the host has not acknowledged.
    pub fn has_fresh_layout(&self, id: NodeId) -> bool {
        self.layout_state(id) == Some(LayoutState::Fresh)
    }

    /// The layout state of a live node.
    pub fn layout_state(&self, id: NodeId) -> Option<LayoutState> {
        self.node_opt(id).map(|n| n.state)
    }

    /// Acknowledge a fresh layout.
    ///
    /// Fails with [`FlexError::NoFreshLayout`] unless the node is
    /// [`LayoutState::Fresh`].
    pub fn mark_seen(&mut self, id: NodeId) -> FlexResult<()> {
        let node = self.live_mut(id)?;
        if node.state != LayoutState::Fresh {
            return Err(FlexError::NoFreshLayout(id));
        }
        node.state = LayoutState::Seen;
        Ok(())
    }

    /// Acknowledge every fresh layout in the subtree rooted at `id`.
    ///
    /// Returns the number of nodes acknowledged.
    pub fn mark_subtree_seen(&mut self, id: NodeId) -> usize {
        if !self.is_alive(id) {
            return 0;
        }
        let mut seen = 0;
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            let node = self.node_mut(n);
            if node.state == LayoutState::Fresh {
                node.state = LayoutState::Seen;
                seen += 1;
            }
            stack.extend_from_slice(&node.children);
        }
        seen
    }

    /// The current layout of a live node.
    ///
    /// Only meaningful once the node has been laid out; check
    /// [`Tree::has_fresh_layout`] to learn whether it changed.
    pub fn layout(&self, id: NodeId) -> Option<&Layout> {
        self.node_opt(id).map(|n| &n.layout)
    }

    // --- internals ---

    /// Access a node; panics if `id` is stale.
    pub(crate) fn node(&self, id: NodeId) -> &Node {
        self.nodes[id.idx()].as_ref().expect("dangling NodeId")
    }

    /// Access a node mutably; panics if `id` is stale.
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.nodes[id.idx()].as_mut().expect("dangling NodeId")
    }

    fn node_opt(&self, id: NodeId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    fn node_opt_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    pub(crate) fn live(&self, id: NodeId) -> FlexResult<&Node> {
        self.node_opt(id).ok_or(FlexError::StaleNode(id))
    }

    fn live_mut(&mut self, id: NodeId) -> FlexResult<&mut Node> {
        self.node_opt_mut(id).ok_or(FlexError::StaleNode(id))
    }

    fn is_ancestor_or_self(&self, candidate: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(n) = current {
            if n == candidate {
                return true;
            }
            current = self.node(n).parent;
        }
        false
    }

    /// Check that dirtying `id` would not discard an unacknowledged layout.
    fn ensure_can_dirty(&self, id: NodeId) -> FlexResult<()> {
        let mut current = Some(id);
        while let Some(n) = current {
            let node = self.node(n);
            match node.state {
                LayoutState::Dirty => return Ok(()),
                LayoutState::Fresh => {
                    tracing::debug!(node = ?n, origin = ?id, "mutation would discard a fresh layout");
                    return Err(FlexError::UnconsumedLayout(n));
                }
                LayoutState::Seen => current = node.parent,
            }
        }
        Ok(())
    }

    /// Dirty `id` and its ancestors up to the first one that already is.
    ///
    /// Callers run [`Tree::ensure_can_dirty`] first.
    fn propagate_dirty(&mut self, id: NodeId) {
        let mut current = Some(id);
        while let Some(n) = current {
            let node = self.node_mut(n);
            if node.state == LayoutState::Dirty {
                break;
            }
            debug_assert_eq!(
                node.state,
                LayoutState::Seen,
                "fresh layouts are rejected before propagation"
            );
            tracing::trace!(node = ?n, "dirty");
            node.state = LayoutState::Dirty;
            node.cache.clear();
            current = node.parent;
        }
    }

    fn update_style(&mut self, id: NodeId, apply: impl FnOnce(&mut Style)) -> FlexResult<()> {
        let current = self.live(id)?.style;
        let mut style = current;
        apply(&mut style);
        if style == current {
            return Ok(());
        }
        self.ensure_can_dirty(id)?;
        self.node_mut(id).style = style;
        self.propagate_dirty(id);
        Ok(())
    }

    fn update_spacing(
        &mut self,
        id: NodeId,
        kind: SpacingKind,
        edge: Edge,
        value: Length,
    ) -> FlexResult<()> {
        let slot = kind as usize;
        if self.live(id)?.spacing[slot].get(edge) == value {
            return Ok(());
        }
        self.ensure_can_dirty(id)?;
        let node = self.node_mut(id);
        node.spacing[slot].set(edge, value);
        let resolved = node.spacing[slot].resolve();
        match kind {
            SpacingKind::Margin => node.style.margin = resolved,
            SpacingKind::Padding => node.style.padding = resolved,
            SpacingKind::Border => node.style.border = resolved,
        }
        self.propagate_dirty(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Rect;

    fn sized(width: f64, height: f64) -> Style {
        Style {
            width: Length::new(width),
            height: Length::new(height),
            ..Style::default()
        }
    }

    /// Lay out and acknowledge everything under `root`.
    fn settle(tree: &mut Tree, root: NodeId) {
        tree.compute_layout(root, Length::UNDEFINED).unwrap();
        tree.mark_subtree_seen(root);
    }

    #[test]
    fn insert_and_query_children() {
        let mut tree = Tree::new();
        let root = tree.create(Style::default());
        let a = tree.create(Style::default());
        let b = tree.create(Style::default());
        let c = tree.create(Style::default());
        tree.append_child(root, a).unwrap();
        tree.append_child(root, c).unwrap();
        tree.insert_child(root, b, 1).unwrap();

        assert_eq!(tree.children_of(root), &[a, b, c]);
        assert_eq!(tree.child_count(root), 3);
        assert_eq!(tree.child_at(root, 1), Some(b));
        assert_eq!(tree.child_at(root, 3), None);
        assert_eq!(tree.index_of(root, c), Some(2));
        assert_eq!(tree.index_of(a, c), None);
        assert_eq!(tree.parent_of(b), Some(root));
        assert_eq!(tree.parent_of(root), None);
    }

    #[test]
    fn inserting_attached_child_fails_without_mutation() {
        let mut tree = Tree::new();
        let first = tree.create(Style::default());
        let second = tree.create(Style::default());
        let child = tree.create(Style::default());
        tree.append_child(first, child).unwrap();
        settle(&mut tree, first);
        settle(&mut tree, second);

        let err = tree.append_child(second, child).unwrap_err();
        assert_eq!(err, FlexError::AlreadyAttached { child });
        assert_eq!(tree.children_of(first), &[child]);
        assert!(tree.children_of(second).is_empty());
        assert_eq!(tree.parent_of(child), Some(first));
        assert_eq!(tree.layout_state(second), Some(LayoutState::Seen));
    }

    #[test]
    fn cycles_are_rejected() {
        let mut tree = Tree::new();
        let root = tree.create(Style::default());
        let child = tree.create(Style::default());
        tree.append_child(root, child).unwrap();

        assert_eq!(
            tree.append_child(child, root),
            Err(FlexError::WouldCycle {
                parent: child,
                child: root
            })
        );
        assert_eq!(
            tree.append_child(root, root),
            Err(FlexError::WouldCycle {
                parent: root,
                child: root
            })
        );
    }

    #[test]
    fn insert_past_end_is_rejected() {
        let mut tree = Tree::new();
        let root = tree.create(Style::default());
        let child = tree.create(Style::default());
        assert_eq!(
            tree.insert_child(root, child, 1),
            Err(FlexError::IndexOutOfBounds { index: 1, len: 0 })
        );
        assert_eq!(tree.parent_of(child), None);
    }

    #[test]
    fn remove_child_clears_back_reference() {
        let mut tree = Tree::new();
        let root = tree.create(Style::default());
        let child = tree.create(Style::default());
        tree.append_child(root, child).unwrap();
        settle(&mut tree, root);

        assert_eq!(tree.remove_child(root, 0), Ok(child));
        assert_eq!(tree.parent_of(child), None);
        assert!(tree.is_alive(child));
        assert!(tree.is_dirty(root));
        assert_eq!(
            tree.remove_child(root, 0),
            Err(FlexError::IndexOutOfBounds { index: 0, len: 0 })
        );

        // A detached node can be attached elsewhere.
        let other = tree.create(Style::default());
        tree.append_child(other, child).unwrap();
    }

    #[test]
    fn remove_makes_subtree_stale() {
        let mut tree = Tree::new();
        let root = tree.create(Style::default());
        let a = tree.create(Style::default());
        let a1 = tree.create(Style::default());
        tree.append_child(root, a).unwrap();
        tree.append_child(a, a1).unwrap();

        tree.remove(a).unwrap();
        assert!(!tree.is_alive(a));
        assert!(!tree.is_alive(a1));
        assert!(tree.children_of(root).is_empty());
        assert_eq!(tree.set_width(a, Length::new(1.0)), Err(FlexError::StaleNode(a)));

        // Slots are reused with a new generation.
        let b = tree.create(Style::default());
        assert!(tree.is_alive(b));
        assert!(!tree.is_alive(a1));
        assert_ne!(b, a);
    }

    #[test]
    fn mark_seen_requires_fresh_layout() {
        let mut tree = Tree::new();
        let root = tree.create(sized(10.0, 10.0));
        assert_eq!(tree.mark_seen(root), Err(FlexError::NoFreshLayout(root)));

        tree.compute_layout(root, Length::UNDEFINED).unwrap();
        assert!(tree.has_fresh_layout(root));
        assert_eq!(tree.mark_seen(root), Ok(()));
        assert_eq!(tree.mark_seen(root), Err(FlexError::NoFreshLayout(root)));
        assert_eq!(tree.layout_state(root), Some(LayoutState::Seen));
    }

    #[test]
    fn mutating_unacknowledged_layout_fails_atomically() {
        let mut tree = Tree::new();
        let root = tree.create(sized(10.0, 10.0));
        let child = tree.create(sized(5.0, 5.0));
        tree.append_child(root, child).unwrap();
        tree.compute_layout(root, Length::UNDEFINED).unwrap();
        tree.mark_seen(child).unwrap();

        // The child was acknowledged but the root was not.
        assert_eq!(
            tree.set_width(child, Length::new(6.0)),
            Err(FlexError::UnconsumedLayout(root))
        );
        assert_eq!(tree.style(child).unwrap().width, Length::new(5.0));
        assert_eq!(tree.layout_state(child), Some(LayoutState::Seen));

        tree.mark_seen(root).unwrap();
        tree.set_width(child, Length::new(6.0)).unwrap();
        assert!(tree.is_dirty(child));
        assert!(tree.is_dirty(root));
    }

    #[test]
    fn dirt_propagates_to_ancestors_only() {
        let mut tree = Tree::new();
        let root = tree.create(sized(100.0, 100.0));
        let mut chain = vec![root];
        for _ in 0..3 {
            let n = tree.create(Style::default());
            tree.append_child(*chain.last().unwrap(), n).unwrap();
            chain.push(n);
        }
        let sibling = tree.create(sized(10.0, 10.0));
        let nephew = tree.create(Style::default());
        tree.append_child(chain[1], sibling).unwrap();
        tree.append_child(sibling, nephew).unwrap();
        settle(&mut tree, root);

        let deepest = *chain.last().unwrap();
        tree.set_height(deepest, Length::new(4.0)).unwrap();
        for &n in &chain {
            assert!(tree.is_dirty(n), "{n:?} should be dirty");
        }
        assert_eq!(tree.layout_state(sibling), Some(LayoutState::Seen));
        assert_eq!(tree.layout_state(nephew), Some(LayoutState::Seen));
        assert!(!tree.node(sibling).cache.is_empty());
        assert!(tree.node(root).cache.is_empty());
    }

    #[test]
    fn equal_values_do_not_dirty() {
        let mut tree = Tree::new();
        let root = tree.create(sized(10.0, 10.0));
        settle(&mut tree, root);

        tree.set_width(root, Length::new(10.0)).unwrap();
        tree.set_min_width(root, Length::new(f64::NAN)).unwrap();
        tree.set_flex_direction(root, FlexDirection::Column).unwrap();
        tree.set_margin(root, Edge::All, Length::UNDEFINED).unwrap();
        tree.set_flex(root, f64::NAN).unwrap();
        tree.set_style(root, sized(10.0, 10.0)).unwrap();
        assert_eq!(tree.layout_state(root), Some(LayoutState::Seen));

        tree.set_justify_content(root, JustifyContent::Center).unwrap();
        assert!(tree.is_dirty(root));
    }

    #[test]
    fn mark_dirty_is_idempotent() {
        let mut tree = Tree::new();
        let root = tree.create(Style::default());
        let child = tree.create(Style::default());
        tree.append_child(root, child).unwrap();
        settle(&mut tree, root);

        tree.mark_dirty(child).unwrap();
        tree.mark_dirty(child).unwrap();
        assert!(tree.is_dirty(child));
        assert!(tree.is_dirty(root));
    }

    #[test]
    fn spacing_setters_resolve_specificity() {
        let mut tree = Tree::new();
        let n = tree.create(Style::default());
        tree.set_padding(n, Edge::All, Length::new(2.0)).unwrap();
        tree.set_padding(n, Edge::Horizontal, Length::new(4.0)).unwrap();
        tree.set_padding(n, Edge::Left, Length::new(6.0)).unwrap();
        tree.set_border(n, Edge::Bottom, Length::new(1.0)).unwrap();

        let style = tree.style(n).unwrap();
        assert_eq!(
            style.padding,
            Edges {
                left: 6.0,
                top: 2.0,
                right: 4.0,
                bottom: 2.0,
            }
        );
        assert_eq!(style.inset().bottom, 3.0);
    }

    #[test]
    fn set_style_resets_spacing_definitions() {
        let mut tree = Tree::new();
        let n = tree.create(Style::default());
        tree.set_margin(n, Edge::All, Length::new(5.0)).unwrap();
        tree.set_style(
            n,
            Style {
                margin: Edges {
                    left: 1.0,
                    ..Edges::ZERO
                },
                ..Style::default()
            },
        )
        .unwrap();
        // The old `All` definition is gone, so clearing `Left` falls back to zero.
        tree.set_margin(n, Edge::Left, Length::UNDEFINED).unwrap();
        assert_eq!(tree.style(n).unwrap().margin, Edges::ZERO);
    }

    #[test]
    fn nan_edges_resolve_to_zero() {
        let mut tree = Tree::new();
        let root = tree.create(sized(100.0, 100.0));
        let child = tree.create(Style {
            height: Length::new(10.0),
            margin: Edges {
                left: f64::NAN,
                top: 2.0,
                ..Edges::ZERO
            },
            ..Style::default()
        });
        tree.append_child(root, child).unwrap();
        assert_eq!(
            tree.style(child).unwrap().margin,
            Edges {
                top: 2.0,
                ..Edges::ZERO
            }
        );

        tree.compute_layout(root, Length::UNDEFINED).unwrap();
        assert_eq!(tree.layout(child).unwrap().rect(), Rect::new(0.0, 2.0, 100.0, 12.0));

        // Replacing the style goes through the same normalization.
        tree.mark_subtree_seen(root);
        tree.set_style(
            child,
            Style {
                padding: Edges::uniform(f64::NAN),
                ..Style::default()
            },
        )
        .unwrap();
        assert_eq!(tree.style(child).unwrap().padding, Edges::ZERO);
    }

    #[test]
    fn measure_requires_a_function() {
        let mut tree = Tree::new();
        let n = tree.create(Style::default());
        assert!(!tree.is_measurable(n));
        assert_eq!(
            tree.measure(n, Length::UNDEFINED),
            Err(FlexError::MissingMeasure(n))
        );

        tree.set_measure(n, |_: NodeId, width: Length| {
            Size::new(width.unwrap_or(f64::NAN), 12.0)
        })
        .unwrap();
        assert!(tree.is_measurable(n));
        assert_eq!(tree.measure(n, Length::new(30.0)), Ok(Size::new(30.0, 12.0)));
        // Non-finite components are sanitized.
        assert_eq!(tree.measure(n, Length::UNDEFINED), Ok(Size::new(0.0, 12.0)));

        tree.clear_measure(n).unwrap();
        assert!(!tree.is_measurable(n));
    }

    #[test]
    fn mark_subtree_seen_counts_fresh_nodes() {
        let mut tree = Tree::new();
        let root = tree.create(sized(10.0, 10.0));
        let child = tree.create(Style::default());
        tree.append_child(root, child).unwrap();
        tree.compute_layout(root, Length::UNDEFINED).unwrap();

        assert_eq!(tree.mark_subtree_seen(root), 2);
        assert_eq!(tree.mark_subtree_seen(root), 0);
    }
}
