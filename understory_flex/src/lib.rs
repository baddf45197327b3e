// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_flex --heading-base-level=0

//! Understory Flex: incremental flexbox layout over an arena node tree.
//!
//! Understory Flex computes box geometry (position and size) for a tree of styled nodes
//! using a flexbox model, independently of any rendering or windowing system.
//!
//! - The host mirrors its widget hierarchy into a [`Tree`] of nodes, each carrying a
//!   [`Style`] and, for leaf content such as text, an optional [`Measure`] function.
//! - [`Tree::compute_layout`] sizes and places the tree; results are read back with
//!   [`Tree::layout`] as parent-relative border boxes.
//! - Relayout is incremental: mutations mark the node and its ancestors dirty, and untouched
//!   subtrees are served from per-node caches keyed by the constraints they were computed
//!   under.
//!
//! ## Layout state
//!
//! Each node moves through `Dirty -> Fresh -> Seen -> Dirty`:
//!
//! - a new or mutated node is [`LayoutState::Dirty`];
//! - after a layout pass, every node whose geometry was computed or moved is
//!   [`LayoutState::Fresh`];
//! - the host reads that geometry and acknowledges it with [`Tree::mark_seen`] (or
//!   [`Tree::mark_subtree_seen`]).
//!
//! Mutating a node whose fresh layout, or whose ancestors' fresh layout, was never
//! acknowledged fails with [`FlexError::UnconsumedLayout`] and changes nothing. This makes it
//! impossible to silently drop geometry the host never applied.
//!
//! ## Model
//!
//! - [`FlexDirection`] picks the main axis; reversed directions start at the far edge.
//! - [`JustifyContent`] packs children along the main axis, [`AlignItems`] and
//!   [`AlignSelf`] along the cross axis.
//! - [`FlexWrap::Wrap`] breaks children into several lines when the main axis is full.
//! - `flex` grows and shrinks children proportionally; children that reach their min or max
//!   size are frozen there and the rest of the space is redistributed.
//! - Margins sit outside the border box; padding and border inset the content box. Margin,
//!   padding and border are set per [`Edge`], with exact edges overriding axis aggregates
//!   overriding [`Edge::All`].
//! - [`PositionType::Absolute`] children leave the flow and are placed by their offsets
//!   against the nearest relatively positioned ancestor.
//! - Undefined dimensions are expressed with [`Length::UNDEFINED`].
//!
//! No rounding or pixel snapping is applied to the results.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::Size;
//! use understory_flex::{FlexDirection, Length, NodeId, Style, Tree};
//!
//! let mut tree = Tree::new();
//! let toolbar = tree.create(Style {
//!     flex_direction: FlexDirection::Row,
//!     height: Length::new(32.0),
//!     ..Style::default()
//! });
//! let label = tree.create(Style::default());
//! tree.set_measure(label, |_: NodeId, _: Length| Size::new(48.0, 16.0)).unwrap();
//! let spacer = tree.create(Style {
//!     flex: 1.0,
//!     ..Style::default()
//! });
//! tree.append_child(toolbar, label).unwrap();
//! tree.append_child(toolbar, spacer).unwrap();
//!
//! tree.compute_layout(toolbar, Length::new(400.0)).unwrap();
//! assert_eq!(tree.layout(label).unwrap().width(), 48.0);
//! assert_eq!(tree.layout(spacer).unwrap().x(), 48.0);
//! assert_eq!(tree.layout(spacer).unwrap().width(), 352.0);
//! assert_eq!(tree.mark_subtree_seen(toolbar), 3);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod cache;
mod engine;
mod error;
mod length;
mod measure;
mod spacing;
mod style;
mod tree;
mod types;

pub use error::{FlexError, FlexResult};
pub use length::Length;
pub use measure::Measure;
pub use spacing::{Edge, Edges, Spacing};
pub use style::{
    AlignItems, AlignSelf, FlexDirection, FlexWrap, JustifyContent, Offsets, PositionType, Style,
};
pub use tree::Tree;
pub use types::{Layout, LayoutState, NodeId};
