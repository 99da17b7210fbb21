//! Precomputed incidence lookup tables.
//!
//! For a fixed space F_p^n the table stores, for every point and every
//! direction, the plane intercept and the line intercept of the point. A
//! [`Subset`](crate::Subset) update then reads one entry instead of doing any
//! arithmetic per direction.
//!
//! # Cost
//!
//! | Quantity | Size |
//! |----------|------|
//! | Points | `p^n` |
//! | Directions | `(p^n - 1) / (p - 1)` |
//! | Build time | `Θ(p^n · (p^n - 1)/(p - 1) · n)` |
//!
//! The build is exponential in `n`; only small spaces are practical. A
//! [`LookupCache`] builds each table once and hands out shared references.
//!
//! # Example
//!
//! ```
//! use pointconfig::LookupCache;
//!
//! let mut cache = LookupCache::new();
//! let table = cache.get_or_build(3, 2).unwrap();
//! assert_eq!(table.len(), 9);
//! assert_eq!(table.directions().len(), 4);
//!
//! // Second request reuses the same table.
//! let again = cache.get_or_build(3, 2).unwrap();
//! assert!(std::sync::Arc::ptr_eq(&table, &again));
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use tracing::debug;

use crate::error::{Error, Result};
use crate::intercept::{dot, slide};
use crate::space::{AmbientSpace, Direction, LineIntercept, Point};

/// Default limit on `points × directions` for a single table.
pub const DEFAULT_MAX_TABLE_CELLS: usize = 1 << 22;

/// Intercepts of one point, indexed by direction index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LookupEntry {
    planes: Vec<u32>,
    lines: Vec<LineIntercept>,
    line_slots: Vec<usize>,
}

impl LookupEntry {
    fn compute(space: &AmbientSpace, point: &Point, directions: &[Direction]) -> Self {
        let mut planes = Vec::with_capacity(directions.len());
        let mut lines = Vec::with_capacity(directions.len());
        let mut line_slots = Vec::with_capacity(directions.len());
        for direction in directions {
            planes.push(dot(space, point, direction.coords()));
            let line = slide(space, point, direction);
            line_slots.push(space.line_slot(&line));
            lines.push(line);
        }
        Self {
            planes,
            lines,
            line_slots,
        }
    }

    /// Plane intercepts, one per direction.
    #[inline]
    pub fn planes(&self) -> &[u32] {
        &self.planes
    }

    /// Line intercepts, one per direction.
    #[inline]
    pub fn lines(&self) -> &[LineIntercept] {
        &self.lines
    }

    /// Dense slots of [`lines`](Self::lines) within each direction family.
    #[inline]
    pub(crate) fn line_slots(&self) -> &[usize] {
        &self.line_slots
    }
}

/// Plane and line intercepts of every point of one space.
///
/// Read-only once built.
#[derive(Clone, PartialEq, Eq)]
pub struct LookupTable {
    space: AmbientSpace,
    directions: Vec<Direction>,
    entries: Vec<LookupEntry>,
}

impl LookupTable {
    /// Compute the table for `space`. Unbounded; see [`LookupCache`] for a
    /// size-checked entry point.
    pub fn build(space: AmbientSpace) -> Self {
        let start = Instant::now();
        let directions: Vec<Direction> = space.directions().collect();
        let entries: Vec<LookupEntry> = space
            .points()
            .map(|point| LookupEntry::compute(&space, &point, &directions))
            .collect();
        debug!(
            space = %space,
            points = entries.len(),
            directions = directions.len(),
            elapsed = ?start.elapsed(),
            "built lookup table"
        );
        Self {
            space,
            directions,
            entries,
        }
    }

    /// The space this table describes.
    #[inline]
    pub fn space(&self) -> &AmbientSpace {
        &self.space
    }

    /// All directions, in index order.
    #[inline]
    pub fn directions(&self) -> &[Direction] {
        &self.directions
    }

    /// Number of points (entries).
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Never true: every space has at least the origin.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry for a point of this space.
    ///
    /// `None` if the point has the wrong dimension or unreduced coordinates.
    pub fn entry(&self, point: &Point) -> Option<&LookupEntry> {
        if point.dimension() != self.space.dimension()
            || point.coords().iter().any(|&c| c >= self.space.prime())
        {
            return None;
        }
        self.entries.get(self.space.point_index(point))
    }

    /// `(normal direction, plane intercept)` pairs for a point.
    pub fn plane_intercepts<'a>(
        &'a self,
        point: &Point,
    ) -> Option<impl Iterator<Item = (&'a Direction, u32)> + 'a> {
        let entry = self.entry(point)?;
        Some(self.directions.iter().zip(entry.planes.iter().copied()))
    }

    /// `(direction, line intercept)` pairs for a point.
    pub fn line_intercepts<'a>(
        &'a self,
        point: &Point,
    ) -> Option<impl Iterator<Item = (&'a Direction, &'a LineIntercept)> + 'a> {
        let entry = self.entry(point)?;
        Some(self.directions.iter().zip(entry.lines.iter()))
    }
}

impl fmt::Debug for LookupTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LookupTable")
            .field("space", &self.space)
            .field("points", &self.entries.len())
            .field("directions", &self.directions.len())
            .finish()
    }
}

/// Resource limits for a [`LookupCache`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CacheConfig {
    /// Largest `points × directions` product the cache will build.
    pub max_table_cells: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_table_cells: DEFAULT_MAX_TABLE_CELLS,
        }
    }
}

/// Owner of built lookup tables, keyed by space.
///
/// Tables are built on first request and never rebuilt unless evicted.
/// Building requires `&mut self`; callers sharing a cache across threads
/// must serialize first use of a space themselves. Built tables are
/// immutable and handed out as [`Arc`]s.
#[derive(Debug, Default)]
pub struct LookupCache {
    config: CacheConfig,
    tables: HashMap<AmbientSpace, Arc<LookupTable>>,
}

impl LookupCache {
    /// Empty cache with default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty cache with the given limits.
    pub fn with_config(config: CacheConfig) -> Self {
        Self {
            config,
            tables: HashMap::new(),
        }
    }

    /// Active limits.
    #[inline]
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Table for `(prime, dimension)`, building it if needed.
    ///
    /// # Errors
    ///
    /// Invalid `prime`/`dimension`, or [`Error::TableTooLarge`].
    pub fn get_or_build(&mut self, prime: u32, dimension: usize) -> Result<Arc<LookupTable>> {
        self.table(AmbientSpace::new(prime, dimension)?)
    }

    /// Table for an already validated space, building it if needed.
    ///
    /// # Errors
    ///
    /// [`Error::TableTooLarge`] if the table exceeds the configured limit.
    pub fn table(&mut self, space: AmbientSpace) -> Result<Arc<LookupTable>> {
        if let Some(table) = self.tables.get(&space) {
            debug!(space = %space, "lookup cache hit");
            return Ok(Arc::clone(table));
        }
        let cells = space.point_count().saturating_mul(space.direction_count());
        if cells > self.config.max_table_cells {
            return Err(Error::TableTooLarge {
                space,
                cells,
                limit: self.config.max_table_cells,
            });
        }
        let table = Arc::new(LookupTable::build(space));
        self.tables.insert(space, Arc::clone(&table));
        Ok(table)
    }

    /// Build the table for `(prime, dimension)` if missing.
    ///
    /// Returns `true` if a build happened.
    ///
    /// # Errors
    ///
    /// As [`get_or_build`](Self::get_or_build).
    pub fn ensure(&mut self, prime: u32, dimension: usize) -> Result<bool> {
        let space = AmbientSpace::new(prime, dimension)?;
        if self.tables.contains_key(&space) {
            return Ok(false);
        }
        self.table(space)?;
        Ok(true)
    }

    /// Already built table, without building.
    pub fn get(&self, prime: u32, dimension: usize) -> Option<Arc<LookupTable>> {
        let space = AmbientSpace::new(prime, dimension).ok()?;
        self.tables.get(&space).cloned()
    }

    /// Whether a table for `(prime, dimension)` has been built.
    pub fn contains(&self, prime: u32, dimension: usize) -> bool {
        self.get(prime, dimension).is_some()
    }

    /// Drop the cached table for `(prime, dimension)`.
    ///
    /// Subsets holding the table keep their reference.
    pub fn evict(&mut self, prime: u32, dimension: usize) -> Option<Arc<LookupTable>> {
        let space = AmbientSpace::new(prime, dimension).ok()?;
        let evicted = self.tables.remove(&space);
        if evicted.is_some() {
            debug!(space = %space, "evicted lookup table");
        }
        evicted
    }

    /// Drop every cached table.
    pub fn clear(&mut self) {
        self.tables.clear();
    }

    /// Number of cached tables.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Whether no table is cached.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intercept::{line_intercept, plane_intercept};

    fn coords(p: &Point) -> Vec<i64> {
        p.coords().iter().map(|&c| i64::from(c)).collect()
    }

    #[test]
    fn table_matches_intercept_functions() {
        let space = AmbientSpace::new(3, 3).unwrap();
        let table = LookupTable::build(space);
        assert_eq!(table.len(), 27);
        assert_eq!(table.directions().len(), 13);
        for point in space.points() {
            let pt = coords(&point);
            for (direction, plane) in table.plane_intercepts(&point).unwrap() {
                let d = coords_of(direction);
                assert_eq!(plane_intercept(&space, &pt, &d).unwrap(), plane);
            }
            for (direction, line) in table.line_intercepts(&point).unwrap() {
                let d = coords_of(direction);
                assert_eq!(&line_intercept(&space, &pt, &d).unwrap(), line);
            }
        }
    }

    fn coords_of(d: &Direction) -> Vec<i64> {
        d.coords().iter().map(|&c| i64::from(c)).collect()
    }

    #[test]
    fn entry_rejects_foreign_points() {
        let table = LookupTable::build(AmbientSpace::new(3, 2).unwrap());
        let other = AmbientSpace::new(3, 3).unwrap().point(&[0, 0, 0]).unwrap();
        assert!(table.entry(&other).is_none());
    }

    #[test]
    fn zero_dimension_table() {
        let space = AmbientSpace::new(2, 0).unwrap();
        let table = LookupTable::build(space);
        assert_eq!(table.len(), 1);
        assert!(table.directions().is_empty());
        let origin = space.point(&[]).unwrap();
        assert!(table.entry(&origin).unwrap().planes().is_empty());
    }

    #[test]
    fn cache_builds_once() {
        let mut cache = LookupCache::new();
        assert!(cache.is_empty());
        assert!(cache.get(5, 2).is_none());
        assert!(cache.ensure(5, 2).unwrap());
        assert!(!cache.ensure(5, 2).unwrap());
        assert!(cache.contains(5, 2));
        let a = cache.get_or_build(5, 2).unwrap();
        let b = cache.get(5, 2).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn cache_keys_by_space() {
        let mut cache = LookupCache::new();
        let a = cache.get_or_build(3, 2).unwrap();
        let b = cache.get_or_build(3, 3).unwrap();
        assert_ne!(a.space(), b.space());
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn cache_rejects_invalid_space() {
        let mut cache = LookupCache::new();
        assert!(matches!(
            cache.get_or_build(8, 2),
            Err(Error::Validation(_))
        ));
        assert!(cache.is_empty());
    }

    #[test]
    fn cache_enforces_cell_limit() {
        let mut cache = LookupCache::with_config(CacheConfig {
            max_table_cells: 100,
        });
        // 3^3 points × 13 directions = 351 cells
        let err = cache.get_or_build(3, 3).unwrap_err();
        assert_eq!(
            err,
            Error::TableTooLarge {
                space: AmbientSpace::new(3, 3).unwrap(),
                cells: 351,
                limit: 100
            }
        );
        // 3^2 × 4 = 36 cells
        assert!(cache.get_or_build(3, 2).is_ok());
    }

    #[test]
    fn eviction_keeps_outstanding_references() {
        let mut cache = LookupCache::new();
        let held = cache.get_or_build(2, 3).unwrap();
        let evicted = cache.evict(2, 3).unwrap();
        assert!(Arc::ptr_eq(&held, &evicted));
        assert!(!cache.contains(2, 3));
        assert!(cache.evict(2, 3).is_none());
        let rebuilt = cache.get_or_build(2, 3).unwrap();
        assert!(!Arc::ptr_eq(&held, &rebuilt));
        assert_eq!(*held, *rebuilt);
        cache.clear();
        assert!(cache.is_empty());
    }
}
