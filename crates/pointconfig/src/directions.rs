//! Enumeration of the directions (1-dimensional subspaces) of F_p^n.
//!
//! Every nonzero vector is a scalar multiple of exactly one vector whose last
//! nonzero coordinate is 1. The enumeration emits those representatives in a
//! fixed order, level by level:
//!
//! ```text
//! n = 2, p = 3
//!   sloped (last coordinate 1):  (0, 1) (1, 1) (2, 1)
//!   flat   (last coordinate 0):  (1, 0)
//! ```
//!
//! The flat block is itself the enumeration of F_p^(n-1) padded with a
//! trailing zero, so the order is the same as recursing on dimension.
//! There are `(p^n - 1) / (p - 1)` directions in total.
//!
//! # Example
//!
//! ```
//! use pointconfig::directions;
//!
//! let dirs: Vec<_> = directions(3, 2).unwrap().map(|d| d.coords().to_vec()).collect();
//! assert_eq!(dirs, vec![vec![0, 1], vec![1, 1], vec![2, 1], vec![1, 0]]);
//! ```

use crate::error::ValidationError;
use crate::space::{AmbientSpace, Direction};

/// All canonical directions of a space, validating `prime` and `dimension`.
///
/// # Errors
///
/// Whatever [`AmbientSpace::new`] rejects.
pub fn directions(prime: u32, dimension: usize) -> Result<Directions, ValidationError> {
    Ok(Directions::new(AmbientSpace::new(prime, dimension)?))
}

/// Lazy iterator over the canonical directions of an [`AmbientSpace`].
///
/// A clone continues from the same position; [`AmbientSpace::directions`]
/// starts a fresh pass.
#[derive(Clone, Debug)]
pub struct Directions {
    space: AmbientSpace,
    /// Directions whose last nonzero coordinate is at index `level - 1`.
    level: usize,
    /// Position inside the current level.
    offset: usize,
    /// `p^(level - 1)`.
    level_len: usize,
    remaining: usize,
}

impl Directions {
    pub(crate) fn new(space: AmbientSpace) -> Self {
        Self {
            space,
            level: space.dimension(),
            offset: 0,
            level_len: space.lines_per_direction(),
            remaining: space.direction_count(),
        }
    }
}

impl Iterator for Directions {
    type Item = Direction;

    fn next(&mut self) -> Option<Direction> {
        if self.level == 0 {
            return None;
        }
        let p = self.space.prime() as usize;
        let mut coords = vec![0u32; self.space.dimension()];
        coords[self.level - 1] = 1;
        let mut rest = self.offset;
        for slot in coords[..self.level - 1].iter_mut().rev() {
            // rest % p < p
            #[allow(clippy::cast_possible_truncation)]
            let digit = (rest % p) as u32;
            *slot = digit;
            rest /= p;
        }

        self.offset += 1;
        self.remaining -= 1;
        if self.offset == self.level_len {
            self.level -= 1;
            self.offset = 0;
            self.level_len /= p;
        }
        Some(Direction::from_canonical(coords))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Directions {}

impl std::iter::FusedIterator for Directions {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn zero_dimension_is_empty() {
        assert_eq!(directions(5, 0).unwrap().count(), 0);
    }

    #[test]
    fn line_has_one_direction() {
        let all: Vec<_> = directions(7, 1).unwrap().collect();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].coords(), &[1]);
    }

    #[test]
    fn counts_match_projective_space() {
        for (p, n) in [(2u32, 1usize), (2, 4), (3, 3), (5, 2), (7, 2), (3, 4)] {
            let expected = (p.pow(n as u32) as usize - 1) / (p as usize - 1);
            let it = directions(p, n).unwrap();
            assert_eq!(it.len(), expected);
            let all: HashSet<_> = it.collect();
            assert_eq!(all.len(), expected, "duplicates for p={p}, n={n}");
        }
    }

    #[test]
    fn every_direction_is_canonical() {
        for d in directions(5, 3).unwrap() {
            let last = d.coords().iter().rev().find(|&&c| c != 0);
            assert_eq!(last, Some(&1), "{d} is not canonical");
            assert!(d.coords().iter().all(|&c| c < 5));
        }
    }

    #[test]
    fn sloped_block_precedes_flat_block() {
        let all: Vec<_> = directions(2, 3).unwrap().map(|d| d.coords().to_vec()).collect();
        assert_eq!(
            all,
            vec![
                vec![0, 0, 1],
                vec![0, 1, 1],
                vec![1, 0, 1],
                vec![1, 1, 1],
                vec![0, 1, 0],
                vec![1, 1, 0],
                vec![1, 0, 0],
            ]
        );
    }

    #[test]
    fn restartable() {
        let space = AmbientSpace::new(3, 3).unwrap();
        let first: Vec<_> = space.directions().collect();
        let second: Vec<_> = space.directions().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn invalid_prime_rejected() {
        assert!(directions(6, 2).is_err());
    }
}
