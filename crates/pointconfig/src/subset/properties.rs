//! Read-only properties derived from the incidence counters.
//!
//! For a subset whose size is `m·p`, equidistribution asks that every
//! hyperplane of some parallel family holds exactly `m` points, and the
//! line threshold `min(m, p - m)` bounds how many points any single line
//! should carry.

use std::collections::BTreeSet;

use super::Subset;
use crate::space::Direction;

impl Subset {
    /// Number of points.
    #[inline]
    pub fn size(&self) -> usize {
        self.points.len()
    }

    /// `size / p` when p divides the size.
    pub fn prime_multiple(&self) -> Option<usize> {
        let p = self.space.prime() as usize;
        (self.size() % p == 0).then(|| self.size() / p)
    }

    /// Most points on any single line; 0 when the space has no directions.
    pub fn max_line_incidence(&self) -> usize {
        self.line_incidence
            .iter()
            .flatten()
            .copied()
            .max()
            .unwrap_or(0)
    }

    /// `min(m, p - m)` for `m = size / p`.
    ///
    /// Negative once the subset holds more than `p²` points.
    pub fn line_incidence_threshold(&self) -> Option<i64> {
        let m = i64::try_from(self.prime_multiple()?).ok()?;
        Some(m.min(i64::from(self.space.prime()) - m))
    }

    /// Whether no line carries more points than the threshold.
    pub fn below_line_incidence_threshold(&self) -> Option<bool> {
        let threshold = self.line_incidence_threshold()?;
        let max = i64::try_from(self.max_line_incidence()).ok()?;
        Some(max <= threshold)
    }

    /// Normal directions whose hyperplanes each hold exactly `size / p`
    /// points. Empty when p does not divide the size.
    pub fn equidistributed_planes(&self) -> BTreeSet<&Direction> {
        let Some(target) = self.prime_multiple() else {
            return BTreeSet::new();
        };
        self.table
            .directions()
            .iter()
            .zip(&self.plane_incidence)
            .filter(|(_, counts)| counts.iter().all(|&c| c == target))
            .map(|(direction, _)| direction)
            .collect()
    }

    /// Number of equidistributed hyperplane families.
    pub fn number_equidistributed_planes(&self) -> usize {
        self.equidistributed_planes().len()
    }

    /// Directions connecting at least one pair of points.
    pub fn directions_determined(&self) -> BTreeSet<&Direction> {
        self.point_pairs_per_direction.keys().collect()
    }

    /// Number of directions determined.
    #[inline]
    pub fn number_of_directions_determined(&self) -> usize {
        self.point_pairs_per_direction.len()
    }
}

#[cfg(test)]
mod tests {
    use crate::{LookupCache, Subset};

    fn subset(p: u32, n: usize) -> Subset {
        Subset::new(&mut LookupCache::new(), p, n).unwrap()
    }

    #[test]
    fn empty_subset() {
        let s = subset(3, 2);
        assert_eq!(s.prime_multiple(), Some(0));
        assert_eq!(s.max_line_incidence(), 0);
        assert_eq!(s.line_incidence_threshold(), Some(0));
        assert_eq!(s.below_line_incidence_threshold(), Some(true));
        // every count is 0 == size / p
        assert_eq!(s.number_equidistributed_planes(), 4);
        assert_eq!(s.number_of_directions_determined(), 0);
    }

    #[test]
    fn undefined_when_p_does_not_divide_size() {
        let mut s = subset(5, 2);
        s.add_points([[0i64, 0], [1, 1]]).unwrap();
        assert_eq!(s.prime_multiple(), None);
        assert_eq!(s.line_incidence_threshold(), None);
        assert_eq!(s.below_line_incidence_threshold(), None);
        assert!(s.equidistributed_planes().is_empty());
    }

    #[test]
    fn threshold_is_symmetric_in_m() {
        let mut s = subset(5, 2);
        // 20 points: m = 4, threshold min(4, 1) = 1
        for x in 0..5i64 {
            for y in 0..4i64 {
                s.add_point(&[x, y]).unwrap();
            }
        }
        assert_eq!(s.prime_multiple(), Some(4));
        assert_eq!(s.line_incidence_threshold(), Some(1));
        assert_eq!(s.max_line_incidence(), 5);
        assert_eq!(s.below_line_incidence_threshold(), Some(false));
    }

    #[test]
    fn threshold_goes_negative_past_p_squared() {
        let mut s = subset(2, 3);
        let everything: Vec<_> = s.space().points().collect();
        for p in everything {
            let coords: Vec<i64> = p.coords().iter().map(|&c| i64::from(c)).collect();
            s.add_point(&coords).unwrap();
        }
        // 8 points over F_2: m = 4, threshold min(4, -2)
        assert_eq!(s.line_incidence_threshold(), Some(-2));
        assert_eq!(s.below_line_incidence_threshold(), Some(false));
        // the whole space is equidistributed on every family
        assert_eq!(s.number_equidistributed_planes(), 7);
    }

    #[test]
    fn parabola_meets_lines_at_most_twice() {
        let mut s = subset(5, 2);
        // y = x^2 over F_5
        for x in 0..5i64 {
            s.add_point(&[x, x * x]).unwrap();
        }
        assert_eq!(s.max_line_incidence(), 2);
        // m = 1, so even two collinear points exceed min(1, 4)
        assert_eq!(s.below_line_incidence_threshold(), Some(false));
        // no two points share an x coordinate, so (0, 1) is not determined
        let vertical = s.space().direction(&[0, 1]).unwrap();
        assert!(!s.directions_determined().contains(&vertical));
        // one point per vertical line means the normal (1, 0) is equidistributed
        let normal = s.space().direction(&[1, 0]).unwrap();
        assert!(s.equidistributed_planes().contains(&normal));
        assert_eq!(s.number_of_directions_determined(), s.directions_determined().len());
    }
}
