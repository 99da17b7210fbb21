//! Incremental incidence structure for a subset of F_p^n.
//!
//! A [`Subset`] holds a set of points together with:
//!
//! - the normalized direction between every pair of points,
//! - for every direction, the pairs of points it connects,
//! - for every normal direction, how many points lie on each of the `p`
//!   parallel hyperplanes,
//! - for every direction, how many points lie on each of the `p^(n-1)`
//!   parallel lines.
//!
//! The incidence counters are dense and read their intercepts from a shared
//! [`LookupTable`], so adding or removing a point costs
//! `O(|points| + #directions)`.
//!
//! # Example
//!
//! ```
//! use pointconfig::{LookupCache, Subset};
//!
//! let mut cache = LookupCache::new();
//! let mut subset = Subset::new(&mut cache, 3, 2).unwrap();
//! for x in 0..3 {
//!     subset.add_point(&[x, 0]).unwrap();
//! }
//! assert_eq!(subset.size(), 3);
//! assert_eq!(subset.max_line_incidence(), 3);
//! assert_eq!(subset.number_of_directions_determined(), 1);
//!
//! subset.remove_point(&[1, 0]).unwrap();
//! assert_eq!(subset.max_line_incidence(), 2);
//! ```

mod pair;
mod properties;

pub use pair::PointPair;

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use tracing::trace;

use crate::error::{Error, Result};
use crate::lut::{LookupCache, LookupEntry, LookupTable};
use crate::space::{AmbientSpace, Direction, LineIntercept, Point};

/// A mutable point set with incrementally maintained incidence data.
#[derive(Clone)]
pub struct Subset {
    space: AmbientSpace,
    table: Arc<LookupTable>,
    points: BTreeSet<Point>,
    /// Direction between the two points of every pair.
    pair_directions: HashMap<PointPair, Direction>,
    /// Only directions with at least one pair are keys.
    point_pairs_per_direction: HashMap<Direction, HashSet<PointPair>>,
    /// `[direction index][plane intercept]`
    plane_incidence: Vec<Vec<usize>>,
    /// `[direction index][line slot]`
    line_incidence: Vec<Vec<usize>>,
}

impl Subset {
    /// Empty subset of F_prime^dimension, building the lookup table through
    /// `cache` if it is not cached yet.
    ///
    /// # Errors
    ///
    /// Invalid `prime`/`dimension`, or a table over the cache's size limit.
    pub fn new(cache: &mut LookupCache, prime: u32, dimension: usize) -> Result<Self> {
        let table = cache.get_or_build(prime, dimension)?;
        Ok(Self::with_table(table))
    }

    /// Empty subset over the space of an already built table.
    pub fn with_table(table: Arc<LookupTable>) -> Self {
        let space = *table.space();
        let directions = table.directions().len();
        Self {
            space,
            plane_incidence: vec![vec![0; space.prime() as usize]; directions],
            line_incidence: vec![vec![0; space.lines_per_direction()]; directions],
            table,
            points: BTreeSet::new(),
            pair_directions: HashMap::new(),
            point_pairs_per_direction: HashMap::new(),
        }
    }

    /// The ambient space.
    #[inline]
    pub fn space(&self) -> &AmbientSpace {
        &self.space
    }

    /// The shared lookup table.
    #[inline]
    pub fn table(&self) -> &Arc<LookupTable> {
        &self.table
    }

    /// Add a point, reducing its coordinates mod p.
    ///
    /// Returns `false` (and changes nothing) if the point is already present.
    ///
    /// # Errors
    ///
    /// A coordinate count different from the dimension.
    pub fn add_point(&mut self, coords: &[i64]) -> Result<bool> {
        let point = self.space.point(coords)?;
        if self.points.contains(&point) {
            return Ok(false);
        }
        let entry = table_entry(&self.table, &point)?;

        let links = self
            .points
            .iter()
            .map(|other| {
                let direction = self
                    .space
                    .direction_between(&point, other)
                    .ok_or_else(|| Error::DegeneratePair(point.clone()))?;
                Ok((PointPair::ordered(&point, other), direction))
            })
            .collect::<Result<Vec<_>>>()?;

        for (pair, direction) in links {
            self.point_pairs_per_direction
                .entry(direction.clone())
                .or_default()
                .insert(pair.clone());
            self.pair_directions.insert(pair, direction);
        }

        for (d, (&plane, &slot)) in entry.planes().iter().zip(entry.line_slots()).enumerate() {
            self.plane_incidence[d][plane as usize] += 1;
            self.line_incidence[d][slot] += 1;
        }

        trace!(point = %point, size = self.points.len() + 1, "added point");
        self.points.insert(point);
        Ok(true)
    }

    /// Add several points; returns how many were new.
    ///
    /// # Errors
    ///
    /// Stops at the first point with the wrong coordinate count; points
    /// before it stay added.
    pub fn add_points<I, P>(&mut self, points: I) -> Result<usize>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<[i64]>,
    {
        let mut added = 0;
        for point in points {
            if self.add_point(point.as_ref())? {
                added += 1;
            }
        }
        Ok(added)
    }

    /// Remove a point, reducing its coordinates mod p.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] if the point is absent, or a coordinate count
    /// different from the dimension. Nothing changes on error.
    pub fn remove_point(&mut self, coords: &[i64]) -> Result<()> {
        let point = self.space.point(coords)?;
        if !self.points.contains(&point) {
            return Err(Error::NotFound(point));
        }
        let entry = table_entry(&self.table, &point)?;
        self.points.remove(&point);

        for other in &self.points {
            let pair = PointPair::ordered(&point, other);
            let Some(direction) = self.pair_directions.remove(&pair) else {
                continue;
            };
            if let Some(pairs) = self.point_pairs_per_direction.get_mut(&direction) {
                pairs.remove(&pair);
                if pairs.is_empty() {
                    self.point_pairs_per_direction.remove(&direction);
                }
            }
        }

        for (d, (&plane, &slot)) in entry.planes().iter().zip(entry.line_slots()).enumerate() {
            let count = &mut self.plane_incidence[d][plane as usize];
            debug_assert!(*count > 0, "plane counter underflow");
            *count = count.saturating_sub(1);
            let count = &mut self.line_incidence[d][slot];
            debug_assert!(*count > 0, "line counter underflow");
            *count = count.saturating_sub(1);
        }

        trace!(point = %point, size = self.points.len(), "removed point");
        Ok(())
    }

    /// Whether `point` is in the subset.
    #[inline]
    pub fn contains(&self, point: &Point) -> bool {
        self.points.contains(point)
    }

    /// Points in lexicographic order.
    pub fn points(&self) -> impl ExactSizeIterator<Item = &Point> {
        self.points.iter()
    }

    /// Counts per plane intercept for a normal direction.
    pub fn plane_incidence(&self, normal: &Direction) -> Option<&[usize]> {
        let index = self.space.direction_index(normal)?;
        self.plane_incidence.get(index).map(Vec::as_slice)
    }

    /// `(line intercept, count)` for every line parallel to `direction`.
    pub fn line_incidence(
        &self,
        direction: &Direction,
    ) -> Option<impl Iterator<Item = (LineIntercept, usize)> + '_> {
        let index = self.space.direction_index(direction)?;
        let counts = self.line_incidence.get(index)?;
        Some(
            counts
                .iter()
                .enumerate()
                .map(move |(slot, &count)| (self.space.line_at(slot), count)),
        )
    }

    /// Number of points on one line.
    pub fn line_count(&self, direction: &Direction, intercept: &LineIntercept) -> Option<usize> {
        if intercept.coords().len() + 1 != self.space.dimension()
            || intercept.coords().iter().any(|&c| c >= self.space.prime())
        {
            return None;
        }
        let index = self.space.direction_index(direction)?;
        self.line_incidence
            .get(index)?
            .get(self.space.line_slot(intercept))
            .copied()
    }

    /// Pairs of points connected by `direction`; `None` if there are none.
    pub fn point_pairs(&self, direction: &Direction) -> Option<&HashSet<PointPair>> {
        self.point_pairs_per_direction.get(direction)
    }

    /// Direction between two distinct points of the subset.
    pub fn direction_between(&self, a: &Point, b: &Point) -> Option<&Direction> {
        if a == b {
            return None;
        }
        self.pair_directions.get(&PointPair::ordered(a, b))
    }

    /// Every other point of the subset with the direction towards it.
    ///
    /// Empty if `point` is not in the subset.
    pub fn directions_from<'a>(
        &'a self,
        point: &'a Point,
    ) -> impl Iterator<Item = (&'a Point, &'a Direction)> + 'a {
        let present = self.points.contains(point);
        self.points
            .iter()
            .filter(move |&other| present && other != point)
            .filter_map(move |other| Some((other, self.direction_between(point, other)?)))
    }

    /// Recompute every derived structure from the point set and compare.
    ///
    /// # Errors
    ///
    /// [`Error::Inconsistent`] naming the first mismatch found.
    pub fn validate(&self) -> Result<()> {
        let directions = self.table.directions().len();
        let mut planes = vec![vec![0usize; self.space.prime() as usize]; directions];
        let mut lines = vec![vec![0usize; self.space.lines_per_direction()]; directions];
        for point in &self.points {
            let entry = table_entry(&self.table, point)?;
            for (d, (&plane, &slot)) in entry.planes().iter().zip(entry.line_slots()).enumerate() {
                planes[d][plane as usize] += 1;
                lines[d][slot] += 1;
            }
        }
        if planes != self.plane_incidence {
            return Err(inconsistent("plane incidence", "counts differ from recount"));
        }
        if lines != self.line_incidence {
            return Err(inconsistent("line incidence", "counts differ from recount"));
        }

        let size = self.points.len();
        let expected_pairs = size * size.saturating_sub(1) / 2;
        if self.pair_directions.len() != expected_pairs {
            return Err(inconsistent(
                "pair directions",
                format!("{} pairs for {size} points", self.pair_directions.len()),
            ));
        }
        for (pair, direction) in &self.pair_directions {
            if !self.contains(pair.first()) || !self.contains(pair.second()) {
                return Err(inconsistent("pair directions", format!("stale pair {pair}")));
            }
            if self.space.direction_between(pair.first(), pair.second()).as_ref() != Some(direction)
            {
                return Err(inconsistent("pair directions", format!("{pair} is not along {direction}")));
            }
            if !self
                .point_pairs_per_direction
                .get(direction)
                .is_some_and(|pairs| pairs.contains(pair))
            {
                return Err(inconsistent("pairs per direction", format!("{pair} missing under {direction}")));
            }
        }
        let listed: usize = self.point_pairs_per_direction.values().map(HashSet::len).sum();
        if listed != expected_pairs {
            return Err(inconsistent("pairs per direction", format!("{listed} pairs listed")));
        }
        if let Some(direction) = self
            .point_pairs_per_direction
            .iter()
            .find_map(|(d, pairs)| pairs.is_empty().then_some(d))
        {
            return Err(inconsistent("pairs per direction", format!("empty set under {direction}")));
        }
        Ok(())
    }
}

fn table_entry<'t>(table: &'t LookupTable, point: &Point) -> Result<&'t LookupEntry> {
    table.entry(point).ok_or_else(|| Error::Inconsistent {
        invariant: "lookup",
        detail: format!("no table entry for {point} in {}", table.space()),
    })
}

fn inconsistent(invariant: &'static str, detail: impl Into<String>) -> Error {
    Error::Inconsistent {
        invariant,
        detail: detail.into(),
    }
}

impl PartialEq for Subset {
    /// Equal point sets over the same space; the table is compared by space
    /// only.
    fn eq(&self, other: &Self) -> bool {
        self.space == other.space
            && self.points == other.points
            && self.pair_directions == other.pair_directions
            && self.point_pairs_per_direction == other.point_pairs_per_direction
            && self.plane_incidence == other.plane_incidence
            && self.line_incidence == other.line_incidence
    }
}

impl Eq for Subset {}

impl fmt::Debug for Subset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subset")
            .field("space", &self.space)
            .field("points", &self.points)
            .field("directions_determined", &self.point_pairs_per_direction.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subset(p: u32, n: usize) -> Subset {
        Subset::new(&mut LookupCache::new(), p, n).unwrap()
    }

    #[test]
    fn new_subset_is_zeroed() {
        let s = subset(3, 2);
        assert_eq!(s.size(), 0);
        assert_eq!(s.plane_incidence.len(), 4);
        assert!(s.plane_incidence.iter().all(|c| c == &vec![0, 0, 0]));
        assert!(s.line_incidence.iter().all(|c| c == &vec![0, 0, 0]));
        s.validate().unwrap();
    }

    #[test]
    fn add_is_idempotent() {
        let mut s = subset(5, 2);
        assert!(s.add_point(&[1, 2]).unwrap());
        s.add_point(&[3, 3]).unwrap();
        let before = s.clone();
        assert!(!s.add_point(&[6, -3]).unwrap());
        assert_eq!(s, before);
    }

    #[test]
    fn add_rejects_wrong_length() {
        let mut s = subset(3, 2);
        assert!(matches!(s.add_point(&[1]), Err(Error::Validation(_))));
        assert!(matches!(s.remove_point(&[1, 1, 1]), Err(Error::Validation(_))));
        assert_eq!(s.size(), 0);
    }

    #[test]
    fn remove_missing_point_changes_nothing() {
        let mut s = subset(3, 2);
        s.add_point(&[0, 1]).unwrap();
        let before = s.clone();
        let missing = s.space().point(&[2, 2]).unwrap();
        assert_eq!(s.remove_point(&[2, 2]), Err(Error::NotFound(missing)));
        assert_eq!(s, before);
    }

    #[test]
    fn add_then_remove_restores_structure() {
        let mut s = subset(3, 3);
        s.add_points([[0i64, 0, 0], [1, 2, 0], [2, 2, 1]]).unwrap();
        let before = s.clone();
        s.add_point(&[1, 1, 1]).unwrap();
        assert_ne!(s, before);
        s.remove_point(&[1, 1, 1]).unwrap();
        assert_eq!(s, before);
        s.validate().unwrap();
    }

    #[test]
    fn pair_directions_are_symmetric() {
        let mut s = subset(5, 2);
        s.add_points([[0i64, 0], [2, 1], [4, 4]]).unwrap();
        let a = s.space().point(&[0, 0]).unwrap();
        let b = s.space().point(&[2, 1]).unwrap();
        let ab = s.direction_between(&a, &b).unwrap();
        assert_eq!(ab.coords(), &[2, 1]);
        assert_eq!(s.direction_between(&b, &a), Some(ab));
        assert_eq!(s.direction_between(&a, &a), None);

        let from_a: Vec<_> = s.directions_from(&a).collect();
        assert_eq!(from_a.len(), 2);
        let stranger = s.space().point(&[1, 1]).unwrap();
        assert_eq!(s.directions_from(&stranger).count(), 0);
    }

    #[test]
    fn direction_keys_removed_when_empty() {
        let mut s = subset(3, 2);
        s.add_points([[0i64, 0], [0, 1]]).unwrap();
        let vertical = s.space().direction(&[0, 1]).unwrap();
        assert_eq!(s.point_pairs(&vertical).map(HashSet::len), Some(1));
        s.remove_point(&[0, 1]).unwrap();
        assert!(s.point_pairs(&vertical).is_none());
        assert!(s.pair_directions.is_empty());
        s.validate().unwrap();
    }

    #[test]
    fn validate_detects_tampering() {
        let mut s = subset(3, 2);
        s.add_points([[0i64, 0], [1, 1]]).unwrap();
        s.plane_incidence[0][0] += 1;
        assert!(matches!(
            s.validate(),
            Err(Error::Inconsistent {
                invariant: "plane incidence",
                ..
            })
        ));
    }

    #[test]
    fn zero_dimension_subset() {
        let mut s = subset(2, 0);
        assert!(s.add_point(&[]).unwrap());
        assert!(!s.add_point(&[]).unwrap());
        assert_eq!(s.size(), 1);
        assert_eq!(s.max_line_incidence(), 0);
        s.validate().unwrap();
        s.remove_point(&[]).unwrap();
        assert_eq!(s.size(), 0);
    }

    #[test]
    fn line_count_lookup() {
        let mut s = subset(3, 2);
        s.add_points([[0i64, 0], [1, 0]]).unwrap();
        let horizontal = s.space().direction(&[1, 0]).unwrap();
        let through_origin = s.space().line_at(0);
        assert_eq!(s.line_count(&horizontal, &through_origin), Some(2));
        assert_eq!(s.line_count(&horizontal, &s.space().line_at(1)), Some(0));
        let total: usize = s.line_incidence(&horizontal).unwrap().map(|(_, c)| c).sum();
        assert_eq!(total, 2);
    }
}
