//! Ambient spaces F_p^n and their coordinate types.
//!
//! An [`AmbientSpace`] is a validated `(prime, dimension)` pair. It owns
//! every conversion from raw integer tuples into residues, and the dense
//! index encodings used by lookup tables and incidence counters:
//!
//! | Object | Index | Range |
//! |--------|-------|-------|
//! | [`Point`] | base-p digits, first coordinate most significant | `0..p^n` |
//! | [`Direction`] | position in [`directions`](crate::directions) order | `0..(p^n-1)/(p-1)` |
//! | [`LineIntercept`] | base-p digits | `0..p^(n-1)` |
//!
//! # Example
//!
//! ```
//! use pointconfig::AmbientSpace;
//!
//! let space = AmbientSpace::new(3, 2).unwrap();
//! assert_eq!(space.point_count(), 9);
//! assert_eq!(space.direction_count(), 4);
//!
//! let p = space.point(&[4, -1]).unwrap();
//! assert_eq!(p.coords(), &[1, 2]);
//! ```

use std::fmt;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::directions::Directions;
use crate::error::{TupleKind, ValidationError};

/// Trial-division primality test.
///
/// # Examples
///
/// ```
/// use pointconfig::space::is_prime;
///
/// assert!(is_prime(2));
/// assert!(is_prime(101));
/// assert!(!is_prime(1));
/// assert!(!is_prime(91)); // 7 · 13
/// ```
pub const fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    if n < 4 {
        return true;
    }
    if n % 2 == 0 {
        return false;
    }
    let mut d = 3;
    while d * d <= n {
        if n % d == 0 {
            return false;
        }
        d += 2;
    }
    true
}

/// Writes `(a, b, c)` like a tuple.
fn write_tuple(f: &mut fmt::Formatter<'_>, coords: &[u32]) -> fmt::Result {
    f.write_str("(")?;
    for (i, c) in coords.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{c}")?;
    }
    f.write_str(")")
}

/// A point of F_p^n, every coordinate reduced into `0..p`.
///
/// Points order lexicographically, which fixes the order of the two points
/// in a [`PointPair`](crate::PointPair).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize), serde(transparent))]
pub struct Point(Vec<u32>);

impl Point {
    /// Residue coordinates.
    #[inline]
    pub fn coords(&self) -> &[u32] {
        &self.0
    }

    /// Number of coordinates.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_tuple(f, &self.0)
    }
}

/// Canonical representative of a 1-dimensional subspace: nonzero, with its
/// last nonzero coordinate equal to 1.
///
/// Used both as the direction of a family of parallel lines and as the
/// normal of a family of parallel hyperplanes.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize), serde(transparent))]
pub struct Direction(Vec<u32>);

impl Direction {
    pub(crate) fn from_canonical(coords: Vec<u32>) -> Self {
        debug_assert_eq!(coords.iter().rev().find(|&&c| c != 0), Some(&1));
        Self(coords)
    }

    /// Residue coordinates.
    #[inline]
    pub fn coords(&self) -> &[u32] {
        &self.0
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_tuple(f, &self.0)
    }
}

/// Identifies one line within the family of lines sharing a direction.
///
/// Has `n - 1` coordinates: the point is slid along the direction until the
/// coordinate at the direction's last nonzero position is zero, and that
/// coordinate is dropped.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize), serde(transparent))]
pub struct LineIntercept(Vec<u32>);

impl LineIntercept {
    pub(crate) fn new(coords: Vec<u32>) -> Self {
        Self(coords)
    }

    /// Residue coordinates.
    #[inline]
    pub fn coords(&self) -> &[u32] {
        &self.0
    }
}

impl fmt::Display for LineIntercept {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_tuple(f, &self.0)
    }
}

/// The vector space F_p^n.
///
/// Construction checks that the modulus is prime and that `p^n` is
/// addressable; every other operation relies on both.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct AmbientSpace {
    prime: u32,
    dimension: usize,
    #[cfg_attr(feature = "serde", serde(skip))]
    point_count: usize,
}

impl AmbientSpace {
    /// Validate `prime` and `dimension`.
    ///
    /// # Errors
    ///
    /// [`ValidationError::NotPrime`] if `prime` is not prime (this includes
    /// 0 and 1), [`ValidationError::SpaceTooLarge`] if `prime^dimension`
    /// overflows `usize`.
    pub fn new(prime: u32, dimension: usize) -> Result<Self, ValidationError> {
        if !is_prime(u64::from(prime)) {
            return Err(ValidationError::NotPrime(u64::from(prime)));
        }
        let too_large = ValidationError::SpaceTooLarge { prime, dimension };
        let exponent = u32::try_from(dimension).map_err(|_| too_large.clone())?;
        let point_count = usize::try_from(prime)
            .ok()
            .and_then(|p| p.checked_pow(exponent))
            .ok_or(too_large)?;
        Ok(Self {
            prime,
            dimension,
            point_count,
        })
    }

    /// The modulus p.
    #[inline]
    pub const fn prime(&self) -> u32 {
        self.prime
    }

    /// The dimension n.
    #[inline]
    pub const fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of points, `p^n`.
    #[inline]
    pub const fn point_count(&self) -> usize {
        self.point_count
    }

    /// Number of directions, `(p^n - 1) / (p - 1)`.
    #[inline]
    pub const fn direction_count(&self) -> usize {
        (self.point_count - 1) / (self.prime as usize - 1)
    }

    /// Number of parallel lines sharing one direction, `p^(n-1)`.
    ///
    /// Zero for the 0-dimensional space, which has no directions.
    #[inline]
    pub const fn lines_per_direction(&self) -> usize {
        self.point_count / self.prime as usize
    }

    /// Iterate over every canonical direction.
    pub fn directions(&self) -> Directions {
        Directions::new(*self)
    }

    /// Iterate over every point in lexicographic order.
    pub fn points(&self) -> impl ExactSizeIterator<Item = Point> {
        let space = *self;
        (0..self.point_count).map(move |i| space.point_at(i))
    }

    /// Reduce a single integer into `0..p`.
    #[inline]
    pub fn reduce(&self, value: i64) -> u32 {
        // rem_euclid result lies in 0..p, which fits u32.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let r = value.rem_euclid(i64::from(self.prime)) as u32;
        r
    }

    fn check_len(&self, kind: TupleKind, actual: usize) -> Result<(), ValidationError> {
        if actual == self.dimension {
            Ok(())
        } else {
            Err(ValidationError::LengthMismatch {
                kind,
                expected: self.dimension,
                actual,
            })
        }
    }

    /// Canonicalize integer coordinates into a [`Point`].
    ///
    /// # Errors
    ///
    /// [`ValidationError::LengthMismatch`] if `coords` does not have
    /// `dimension` entries.
    pub fn point(&self, coords: &[i64]) -> Result<Point, ValidationError> {
        self.check_len(TupleKind::Point, coords.len())?;
        Ok(Point(coords.iter().map(|&c| self.reduce(c)).collect()))
    }

    /// Reduce integer direction coordinates mod p without normalizing.
    ///
    /// The empty direction of the 0-dimensional space is accepted.
    ///
    /// # Errors
    ///
    /// [`ValidationError::LengthMismatch`] on a wrong length,
    /// [`ValidationError::ZeroDirection`] if every coordinate is 0 mod p.
    pub fn reduce_direction(&self, coords: &[i64]) -> Result<Vec<u32>, ValidationError> {
        self.check_len(TupleKind::Direction, coords.len())?;
        let reduced: Vec<u32> = coords.iter().map(|&c| self.reduce(c)).collect();
        if !reduced.is_empty() && reduced.iter().all(|&c| c == 0) {
            return Err(ValidationError::ZeroDirection { prime: self.prime });
        }
        Ok(reduced)
    }

    /// Canonicalize integer coordinates into a [`Direction`].
    ///
    /// # Errors
    ///
    /// As [`reduce_direction`](Self::reduce_direction); the 0-dimensional
    /// space has no directions, so there every input is a zero direction.
    pub fn direction(&self, coords: &[i64]) -> Result<Direction, ValidationError> {
        let reduced = self.reduce_direction(coords)?;
        self.normalize(&reduced)
            .ok_or(ValidationError::ZeroDirection { prime: self.prime })
    }

    #[inline]
    pub(crate) fn mul(&self, a: u32, b: u32) -> u32 {
        let r = u64::from(a) * u64::from(b) % u64::from(self.prime);
        // r < p
        #[allow(clippy::cast_possible_truncation)]
        let r = r as u32;
        r
    }

    #[inline]
    pub(crate) fn sub(&self, a: u32, b: u32) -> u32 {
        let p = u64::from(self.prime);
        #[allow(clippy::cast_possible_truncation)]
        let r = ((u64::from(a) + p - u64::from(b)) % p) as u32;
        r
    }

    /// Multiplicative inverse of a nonzero residue, by Fermat's little theorem.
    ///
    /// Returns 0 for 0, which has no inverse.
    pub fn inverse(&self, a: u32) -> u32 {
        let a = a % self.prime;
        if a == 0 {
            return 0;
        }
        let mut base = a;
        let mut exp = self.prime - 2;
        let mut acc = 1 % self.prime;
        while exp > 0 {
            if exp & 1 == 1 {
                acc = self.mul(acc, base);
            }
            base = self.mul(base, base);
            exp >>= 1;
        }
        acc
    }

    /// Scale a reduced vector so its last nonzero coordinate is 1.
    ///
    /// `None` for the zero vector (and the empty vector).
    pub fn normalize(&self, vector: &[u32]) -> Option<Direction> {
        let pivot = *vector.iter().rev().find(|&&c| c != 0)?;
        let scale = self.inverse(pivot);
        Some(Direction::from_canonical(
            vector.iter().map(|&c| self.mul(c, scale)).collect(),
        ))
    }

    /// Normalized direction from `b` to `a`; `None` if the points coincide.
    pub(crate) fn direction_between(&self, a: &Point, b: &Point) -> Option<Direction> {
        let diff: Vec<u32> = a
            .coords()
            .iter()
            .zip(b.coords())
            .map(|(&x, &y)| self.sub(x, y))
            .collect();
        self.normalize(&diff)
    }

    fn digits(&self, mut index: usize, len: usize) -> Vec<u32> {
        let p = self.prime as usize;
        let mut coords = vec![0u32; len];
        for slot in coords.iter_mut().rev() {
            // index % p < p
            #[allow(clippy::cast_possible_truncation)]
            let digit = (index % p) as u32;
            *slot = digit;
            index /= p;
        }
        coords
    }

    fn undigits(&self, coords: &[u32]) -> usize {
        let p = self.prime as usize;
        coords.iter().fold(0, |acc, &c| acc * p + c as usize)
    }

    /// The point with the given lexicographic index.
    pub fn point_at(&self, index: usize) -> Point {
        debug_assert!(index < self.point_count);
        Point(self.digits(index, self.dimension))
    }

    /// Lexicographic index of a point of this space.
    pub fn point_index(&self, point: &Point) -> usize {
        debug_assert_eq!(point.dimension(), self.dimension);
        self.undigits(point.coords())
    }

    /// Position of a direction in [`directions`](crate::directions) order.
    ///
    /// Directions whose last nonzero coordinate sits at position `k - 1`
    /// form a block of `p^(k-1)` entries, emitted after the blocks for every
    /// larger `k`. `None` if `direction` does not belong to this space.
    pub fn direction_index(&self, direction: &Direction) -> Option<usize> {
        let coords = direction.coords();
        if coords.len() != self.dimension {
            return None;
        }
        let pivot = coords.iter().rposition(|&c| c != 0)?;
        if coords[pivot] != 1 || coords.iter().any(|&c| c >= self.prime) {
            return None;
        }
        let p = self.prime as usize;
        let block = p.pow(u32::try_from(pivot + 1).ok()?);
        let preceding = (self.point_count - block) / (p - 1);
        Some(preceding + self.undigits(&coords[..pivot]))
    }

    /// Dense slot of a line intercept within its direction family.
    pub fn line_slot(&self, intercept: &LineIntercept) -> usize {
        debug_assert_eq!(intercept.coords().len() + 1, self.dimension);
        self.undigits(intercept.coords())
    }

    /// The line intercept stored at a dense slot.
    pub fn line_at(&self, slot: usize) -> LineIntercept {
        LineIntercept(self.digits(slot, self.dimension.saturating_sub(1)))
    }
}

impl fmt::Display for AmbientSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "F_{}^{}", self.prime, self.dimension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn space(p: u32, n: usize) -> AmbientSpace {
        AmbientSpace::new(p, n).unwrap()
    }

    #[test]
    fn rejects_non_primes() {
        for m in [0, 1, 4, 9, 15, 91] {
            assert_eq!(
                AmbientSpace::new(m, 2),
                Err(ValidationError::NotPrime(u64::from(m)))
            );
        }
        assert!(AmbientSpace::new(2, 0).is_ok());
        assert!(AmbientSpace::new(7919, 1).is_ok());
    }

    #[test]
    fn rejects_unaddressable_spaces() {
        assert_eq!(
            AmbientSpace::new(3, 200),
            Err(ValidationError::SpaceTooLarge {
                prime: 3,
                dimension: 200
            })
        );
    }

    #[test]
    fn counts() {
        let s = space(5, 3);
        assert_eq!(s.point_count(), 125);
        assert_eq!(s.direction_count(), 31);
        assert_eq!(s.lines_per_direction(), 25);

        let zero = space(5, 0);
        assert_eq!(zero.point_count(), 1);
        assert_eq!(zero.direction_count(), 0);
        assert_eq!(zero.lines_per_direction(), 0);
    }

    #[test]
    fn reduces_negative_coordinates() {
        let s = space(7, 3);
        let p = s.point(&[-1, 8, -14]).unwrap();
        assert_eq!(p.coords(), &[6, 1, 0]);
        assert_eq!(p.to_string(), "(6, 1, 0)");
    }

    #[test]
    fn point_length_checked() {
        let s = space(3, 2);
        assert_eq!(
            s.point(&[1, 2, 0]),
            Err(ValidationError::LengthMismatch {
                kind: TupleKind::Point,
                expected: 2,
                actual: 3
            })
        );
    }

    #[test]
    fn zero_direction_rejected() {
        let s = space(3, 2);
        assert_eq!(
            s.reduce_direction(&[3, -6]),
            Err(ValidationError::ZeroDirection { prime: 3 })
        );
        assert_eq!(s.reduce_direction(&[4, 0]).unwrap(), vec![1, 0]);
        assert_eq!(space(3, 0).reduce_direction(&[]).unwrap(), Vec::<u32>::new());
    }

    #[test]
    fn inverse_table() {
        for p in [2u32, 3, 5, 7, 11, 13] {
            let s = space(p, 1);
            for a in 1..p {
                assert_eq!(s.mul(a, s.inverse(a)), 1, "inverse of {a} mod {p}");
            }
            assert_eq!(s.inverse(0), 0);
        }
    }

    #[test]
    fn normalize_puts_one_last() {
        let s = space(5, 3);
        let d = s.normalize(&[2, 4, 0]).unwrap();
        // 4^-1 = 4 mod 5
        assert_eq!(d.coords(), &[3, 1, 0]);
        assert!(s.normalize(&[0, 0, 0]).is_none());
        assert_eq!(s.direction(&[-2, -4, 0]).unwrap(), d);
    }

    #[test]
    fn point_index_roundtrip() {
        let s = space(3, 3);
        for (i, p) in s.points().enumerate() {
            assert_eq!(s.point_index(&p), i);
        }
        assert_eq!(s.point_at(5).coords(), &[0, 1, 2]);
    }

    #[test]
    fn direction_index_follows_enumeration() {
        for (p, n) in [(2, 3), (3, 2), (3, 3), (5, 2)] {
            let s = space(p, n);
            for (i, d) in s.directions().enumerate() {
                assert_eq!(s.direction_index(&d), Some(i), "{d} in {s}");
            }
        }
    }

    #[test]
    fn direction_index_rejects_foreign_directions() {
        let s = space(3, 2);
        let other = space(3, 3).direction(&[1, 0, 0]).unwrap();
        assert_eq!(s.direction_index(&other), None);
    }

    #[test]
    fn line_slots_cover_family() {
        let s = space(3, 3);
        for slot in 0..s.lines_per_direction() {
            assert_eq!(s.line_slot(&s.line_at(slot)), slot);
        }
        assert_eq!(space(3, 1).line_at(0).coords(), &[] as &[u32]);
    }
}
