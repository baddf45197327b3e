// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Usage errors.

use crate::types::NodeId;

/// Convenience result type for fallible tree operations.
pub type FlexResult<T> = Result<T, FlexError>;

/// An integration error: the tree was used in a way its contract forbids.
///
/// None of these are transient. A failed operation leaves the tree unchanged.
#[derive(thiserror::Error, Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlexError {
    /// The identifier does not refer to a live node.
    #[error("node {0:?} is not alive")]
    StaleNode(NodeId),
    /// The child already has a parent and must be removed from it first.
    #[error("node {child:?} already has a parent, it must be removed first")]
    AlreadyAttached {
        /// The node that was being inserted.
        child: NodeId,
    },
    /// The child is the parent itself or one of its ancestors.
    #[error("inserting {child:?} under {parent:?} would create a cycle")]
    WouldCycle {
        /// The intended parent.
        parent: NodeId,
        /// The node that was being inserted.
        child: NodeId,
    },
    /// A child index past the end of the children list.
    #[error("child index {index} out of bounds for {len} children")]
    IndexOutOfBounds {
        /// The requested index.
        index: usize,
        /// Number of children.
        len: usize,
    },
    /// A mutation would discard a layout that was never acknowledged with `mark_seen`.
    #[error("previous layout of {0:?} was ignored, mark_seen was never called")]
    UnconsumedLayout(NodeId),
    /// `mark_seen` was called on a node without a fresh layout.
    #[error("expected {0:?} to have a fresh layout to mark seen")]
    NoFreshLayout(NodeId),
    /// Measurement was requested for a node without a measure function.
    #[error("node {0:?} has no measure function")]
    MissingMeasure(NodeId),
}
