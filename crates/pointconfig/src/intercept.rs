//! Plane and line intercepts.
//!
//! A direction `d` splits F_p^n two ways:
//!
//! - into `p` parallel hyperplanes `{x : x·d = c}`, labelled by the
//!   **plane intercept** `c`;
//! - into `p^(n-1)` parallel lines `{x + t·d}`, labelled by the
//!   **line intercept**: the point slid along `d` until the coordinate at
//!   the last nonzero position of `d` vanishes, with that coordinate removed.
//!
//! Replacing `d` by a nonzero multiple keeps both partitions. The line
//! intercept is unchanged; the plane intercept is multiplied by the same
//! scalar.
//!
//! # Example
//!
//! ```
//! use pointconfig::{line_intercept, plane_intercept, AmbientSpace};
//!
//! let space = AmbientSpace::new(5, 3).unwrap();
//! assert_eq!(plane_intercept(&space, &[1, 2, 3], &[1, 1, 1]).unwrap(), 1);
//! let line = line_intercept(&space, &[1, 2, 3], &[0, 0, 2]).unwrap();
//! assert_eq!(line.coords(), &[1, 2]);
//! ```

use crate::error::ValidationError;
use crate::space::{AmbientSpace, Direction, LineIntercept, Point};

/// Which of the hyperplanes normal to `normal` contains `point`.
///
/// The direction is reduced mod p but not normalized.
///
/// # Errors
///
/// Length mismatches, or a direction that is zero mod p.
pub fn plane_intercept(
    space: &AmbientSpace,
    point: &[i64],
    normal: &[i64],
) -> Result<u32, ValidationError> {
    let normal = space.reduce_direction(normal)?;
    let point = space.point(point)?;
    Ok(dot(space, &point, &normal))
}

/// Which of the lines parallel to `direction` contains `point`.
///
/// Empty in the 0-dimensional space.
///
/// # Errors
///
/// Length mismatches, or a direction that is zero mod p.
pub fn line_intercept(
    space: &AmbientSpace,
    point: &[i64],
    direction: &[i64],
) -> Result<LineIntercept, ValidationError> {
    let reduced = space.reduce_direction(direction)?;
    let point = space.point(point)?;
    Ok(match space.normalize(&reduced) {
        Some(direction) => slide(space, &point, &direction),
        None => LineIntercept::new(Vec::new()),
    })
}

/// `point · direction mod p`.
pub(crate) fn dot(space: &AmbientSpace, point: &Point, direction: &[u32]) -> u32 {
    let p = u64::from(space.prime());
    let sum = point
        .coords()
        .iter()
        .zip(direction)
        .fold(0u64, |acc, (&x, &d)| (acc + u64::from(x) * u64::from(d)) % p);
    // sum < p
    #[allow(clippy::cast_possible_truncation)]
    let sum = sum as u32;
    sum
}

/// Line intercept for an already canonical direction.
pub(crate) fn slide(space: &AmbientSpace, point: &Point, direction: &Direction) -> LineIntercept {
    let coords = direction.coords();
    let Some(pivot) = coords.iter().rposition(|&c| c != 0) else {
        return LineIntercept::new(Vec::new());
    };
    let shift = point.coords()[pivot];
    let mut intercept: Vec<u32> = point
        .coords()
        .iter()
        .zip(coords)
        .map(|(&x, &d)| space.sub(x, space.mul(d, shift)))
        .collect();
    debug_assert_eq!(intercept[pivot], 0);
    intercept.remove(pivot);
    LineIntercept::new(intercept)
}
