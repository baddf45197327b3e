// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A scalar that may be undefined.
//!
//! Style dimensions, offsets and available space all share the notion of "no value".
//! [`Length`] models that as a real sum type instead of a NaN payload, so every check for
//! undefined-ness goes through [`Length::is_undefined`] and two undefined values always
//! compare equal.

use core::fmt;
use core::ops::{Add, Div, Mul, Sub};

/// A length in layout units, or [`Length::UNDEFINED`].
///
/// Any arithmetic that involves an undefined operand yields [`Length::UNDEFINED`]:
///
/// ```rust
/// use understory_flex::Length;
///
/// assert_eq!(Length::UNDEFINED, Length::new(f64::NAN));
/// assert!((Length::new(4.0) + Length::UNDEFINED).is_undefined());
/// assert_eq!(Length::new(4.0) - 1.5, Length::new(2.5));
/// ```
#[derive(Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct Length(Option<f64>);

impl Length {
    /// The undefined length.
    pub const UNDEFINED: Self = Self(None);

    /// A defined length of zero.
    pub const ZERO: Self = Self(Some(0.0));

    /// Create a length from a raw value.
    ///
    /// NaN of any payload maps to [`Length::UNDEFINED`].
    pub const fn new(value: f64) -> Self {
        if value.is_nan() {
            Self::UNDEFINED
        } else {
            Self(Some(value))
        }
    }

    /// Returns `true` if this length carries no value.
    pub const fn is_undefined(self) -> bool {
        self.0.is_none()
    }

    /// Returns `true` if this length carries a value.
    pub const fn is_defined(self) -> bool {
        self.0.is_some()
    }

    /// The value, if defined.
    pub const fn get(self) -> Option<f64> {
        self.0
    }

    /// The value, or `fallback` if undefined.
    pub fn unwrap_or(self, fallback: f64) -> f64 {
        self.0.unwrap_or(fallback)
    }

    /// Returns `self` if defined, otherwise `other`.
    pub fn or(self, other: Self) -> Self {
        if self.is_defined() { self } else { other }
    }

    /// Larger of the value and `floor`; undefined stays undefined.
    pub fn max(self, floor: f64) -> Self {
        Self(self.0.map(|v| v.max(floor)))
    }

    /// Smaller of the value and `ceiling`; undefined stays undefined.
    pub fn min(self, ceiling: f64) -> Self {
        Self(self.0.map(|v| v.min(ceiling)))
    }
}

impl fmt::Debug for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) => write!(f, "{v:?}"),
            None => f.write_str("undefined"),
        }
    }
}

impl From<f64> for Length {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<Option<f64>> for Length {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Self::UNDEFINED, Self::new)
    }
}

impl From<Length> for Option<f64> {
    fn from(value: Length) -> Self {
        value.0
    }
}

fn combine(a: Length, b: Length, op: impl FnOnce(f64, f64) -> f64) -> Length {
    match (a.0, b.0) {
        // Renormalize so that e.g. `inf - inf` cannot smuggle a NaN into a defined length.
        (Some(a), Some(b)) => Length::new(op(a, b)),
        _ => Length::UNDEFINED,
    }
}

impl Add for Length {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        combine(self, rhs, |a, b| a + b)
    }
}

impl Sub for Length {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        combine(self, rhs, |a, b| a - b)
    }
}

impl Add<f64> for Length {
    type Output = Self;

    fn add(self, rhs: f64) -> Self {
        self + Self::new(rhs)
    }
}

impl Sub<f64> for Length {
    type Output = Self;

    fn sub(self, rhs: f64) -> Self {
        self - Self::new(rhs)
    }
}

impl Mul<f64> for Length {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        combine(self, Self::new(rhs), |a, b| a * b)
    }
}

impl Div<f64> for Length {
    type Output = Self;

    fn div(self, rhs: f64) -> Self {
        combine(self, Self::new(rhs), |a, b| a / b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undefined_values_compare_equal() {
        let a = Length::new(f64::NAN);
        let b = Length::new(-f64::NAN);
        let c = Length::from(None);
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(c, Length::UNDEFINED);
        assert!(a.is_undefined());
    }

    #[test]
    fn arithmetic_with_undefined_is_undefined() {
        let five = Length::new(5.0);
        assert!((five + Length::UNDEFINED).is_undefined());
        assert!((Length::UNDEFINED - five).is_undefined());
        assert!((Length::UNDEFINED * 2.0).is_undefined());
        assert!((five / f64::NAN).is_undefined());
        assert_eq!(five * 2.0, Length::new(10.0));
        assert_eq!(five - 7.0, Length::new(-2.0));
    }

    #[test]
    fn defined_arithmetic_never_yields_nan() {
        let inf = Length::new(f64::INFINITY);
        let diff = inf - inf;
        assert!(diff.is_undefined());
        assert_eq!(diff, Length::UNDEFINED);
    }

    #[test]
    fn clamps_and_fallbacks() {
        assert_eq!(Length::new(-3.0).max(0.0), Length::ZERO);
        assert_eq!(Length::new(12.0).min(10.0), Length::new(10.0));
        assert!(Length::UNDEFINED.max(0.0).is_undefined());
        assert_eq!(Length::UNDEFINED.or(Length::new(1.0)), Length::new(1.0));
        assert_eq!(Length::UNDEFINED.unwrap_or(7.0), 7.0);
    }
}
