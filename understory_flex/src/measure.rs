// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The measurement callback contract for leaf content.

use kurbo::Size;

use crate::length::Length;
use crate::types::NodeId;

/// Intrinsic sizing of leaf content (text, images, native controls).
///
/// A measure function is called for nodes that have one attached and no in-flow
/// children. It receives the width available to the node's content box, which is
/// [`Length::UNDEFINED`] when unconstrained, and returns the content size.
///
/// The engine holds the tree mutably while measuring, so a measure function cannot
/// touch the tree or start another layout, and only one measurement is ever in flight.
/// Components that are NaN or infinite are treated as zero.
///
/// Closures of the shape `FnMut(NodeId, Length) -> Size` implement this trait.
pub trait Measure {
    /// Return the content size of `node` given `available_width`.
    fn measure(&mut self, node: NodeId, available_width: Length) -> Size;
}

impl<F> Measure for F
where
    F: FnMut(NodeId, Length) -> Size,
{
    fn measure(&mut self, node: NodeId, available_width: Length) -> Size {
        self(node, available_width)
    }
}

/// Replace non-finite components with zero.
pub(crate) fn sanitize(size: Size) -> Size {
    let finite = |v: f64| if v.is_finite() { v } else { 0.0 };
    Size::new(finite(size.width), finite(size.height))
}
