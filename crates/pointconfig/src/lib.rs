//! Point configurations in F_p^n.
//!
//! Tracks how a finite point set meets every affine line and every affine
//! hyperplane of the vector space of dimension n over the integers mod a
//! prime p, as points are added and removed. Intended for experiments on
//! Kakeya-type and equidistribution questions over finite fields.
//!
//! # Layers
//!
//! | Layer | Module | Role |
//! |-------|--------|------|
//! | Space | [`space`] | validated `(p, n)`, residues, index encodings |
//! | Directions | [`directions`](mod@directions) | canonical 1-dimensional subspaces |
//! | Intercepts | [`intercept`] | which line / hyperplane a point is on |
//! | Lookup | [`lut`] | per-point intercepts for a whole space, cached |
//! | Incidence | [`subset`] | incremental point set with incidence counters |
//!
//! # Example
//!
//! ```
//! use pointconfig::{LookupCache, Subset};
//!
//! let mut cache = LookupCache::new();
//! let mut subset = Subset::new(&mut cache, 3, 2).unwrap();
//! subset.add_points([[0i64, 0], [1, 0], [2, 0]]).unwrap();
//!
//! assert_eq!(subset.prime_multiple(), Some(1));
//! assert_eq!(subset.max_line_incidence(), 3);
//! assert_eq!(subset.below_line_incidence_threshold(), Some(false));
//! assert_eq!(subset.number_equidistributed_planes(), 3);
//! ```
//!
//! # Cost model
//!
//! The lookup table for `(p, n)` holds `p^n · (p^n - 1)/(p - 1)` entries and
//! is built once per [`LookupCache`]. After that, each `add_point` or
//! `remove_point` costs `O(|points| · n + #directions)`.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

pub mod directions;
pub mod error;
pub mod intercept;
pub mod lut;
pub mod report;
pub mod space;
pub mod subset;

pub use directions::{directions, Directions};
pub use error::{Error, Result, TupleKind, ValidationError};
pub use intercept::{line_intercept, plane_intercept};
pub use lut::{CacheConfig, LookupCache, LookupEntry, LookupTable, DEFAULT_MAX_TABLE_CELLS};
pub use report::SubsetReport;
pub use space::{AmbientSpace, Direction, LineIntercept, Point};
pub use subset::{PointPair, Subset};
