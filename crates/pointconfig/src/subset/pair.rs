//! Unordered pairs of distinct points.

use std::fmt;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::error::{Error, Result};
use crate::space::Point;

/// Two distinct points, stored smaller first.
///
/// # Examples
///
/// ```
/// use pointconfig::{AmbientSpace, PointPair};
///
/// let space = AmbientSpace::new(3, 2).unwrap();
/// let a = space.point(&[2, 0]).unwrap();
/// let b = space.point(&[0, 1]).unwrap();
/// let pair = PointPair::new(a.clone(), b.clone()).unwrap();
/// assert_eq!(pair.first(), &b);
/// assert_eq!(pair, PointPair::new(b, a).unwrap());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct PointPair(Point, Point);

impl PointPair {
    /// Order two points into a canonical pair.
    ///
    /// # Errors
    ///
    /// [`Error::DegeneratePair`] if `a == b`.
    pub fn new(a: Point, b: Point) -> Result<Self> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Ok(Self(a, b)),
            std::cmp::Ordering::Greater => Ok(Self(b, a)),
            std::cmp::Ordering::Equal => Err(Error::DegeneratePair(a)),
        }
    }

    /// Pair of points already known to differ.
    pub(crate) fn ordered(a: &Point, b: &Point) -> Self {
        debug_assert_ne!(a, b);
        let pair = if a < b {
            Self(a.clone(), b.clone())
        } else {
            Self(b.clone(), a.clone())
        };
        debug_assert!(pair.0 < pair.1);
        pair
    }

    /// The smaller point.
    #[inline]
    pub fn first(&self) -> &Point {
        &self.0
    }

    /// The larger point.
    #[inline]
    pub fn second(&self) -> &Point {
        &self.1
    }

    /// Whether `point` is one of the two.
    pub fn contains(&self, point: &Point) -> bool {
        &self.0 == point || &self.1 == point
    }
}

impl fmt::Display for PointPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}, {}}}", self.0, self.1)
    }
}
