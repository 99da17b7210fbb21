//! Error types for point configurations.
//!
//! Boundary checks on primes, dimensions, points and directions produce a
//! [`ValidationError`]. Everything the crate can report, including state
//! errors on a [`Subset`](crate::Subset), is an [`Error`].

use thiserror::Error;

use crate::space::{AmbientSpace, Point};

/// Result type for point configuration operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Whether a coordinate tuple was passed as a point or as a direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TupleKind {
    /// A point of the ambient space.
    Point,
    /// A direction (or normal direction) of the ambient space.
    Direction,
}

impl std::fmt::Display for TupleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Point => f.write_str("point"),
            Self::Direction => f.write_str("direction"),
        }
    }
}

/// Malformed input rejected before any state is touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The modulus is not a prime number.
    #[error("modulus must be a prime, got {0}")]
    NotPrime(u64),

    /// `prime^dimension` does not fit in the address space.
    #[error("ambient space of dimension {dimension} over {prime} elements is too large")]
    SpaceTooLarge {
        /// Requested modulus.
        prime: u32,
        /// Requested dimension.
        dimension: usize,
    },

    /// A point or direction has the wrong number of coordinates.
    #[error("{kind} has {actual} coordinates, expected {expected}")]
    LengthMismatch {
        /// Point or direction.
        kind: TupleKind,
        /// The dimension of the space.
        expected: usize,
        /// Number of coordinates supplied.
        actual: usize,
    },

    /// A direction that reduces to the zero vector.
    #[error("direction must be nonzero mod {prime}")]
    ZeroDirection {
        /// The modulus the direction was reduced by.
        prime: u32,
    },
}

/// Errors reported by lookup tables, caches and subsets.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Input failed boundary validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Removal of a point that is not in the subset.
    #[error("point {0} is not in the subset")]
    NotFound(Point),

    /// A point pair was formed from a single point.
    #[error("a point pair needs two distinct points, got {0} twice")]
    DegeneratePair(Point),

    /// Building the table would exceed the configured cell budget.
    #[error("lookup table for {space} needs {cells} cells, limit is {limit}")]
    TableTooLarge {
        /// Requested space.
        space: AmbientSpace,
        /// Points times directions, saturating.
        cells: usize,
        /// Configured maximum.
        limit: usize,
    },

    /// A derived structure disagrees with the point set.
    #[error("invariant `{invariant}` violated: {detail}")]
    Inconsistent {
        /// Short name of the broken invariant.
        invariant: &'static str,
        /// What was found.
        detail: String,
    },
}
