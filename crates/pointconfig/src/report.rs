//! Snapshot of a subset's derived properties.

use std::fmt;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::space::{AmbientSpace, Direction, Point};
use crate::subset::Subset;

/// Derived properties of a [`Subset`] at one moment.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SubsetReport {
    /// The ambient space.
    pub space: AmbientSpace,
    /// Number of points.
    pub size: usize,
    /// Points in lexicographic order.
    pub points: Vec<Point>,
    /// `size / p` when p divides the size.
    pub prime_multiple: Option<usize>,
    /// Most points on a single line.
    pub max_line_incidence: usize,
    /// `min(m, p - m)` for `m = size / p`.
    pub line_incidence_threshold: Option<i64>,
    /// Whether every line is within the threshold.
    pub below_line_incidence_threshold: Option<bool>,
    /// Normals of the equidistributed hyperplane families.
    pub equidistributed_planes: Vec<Direction>,
    /// Directions connecting some pair of points.
    pub directions_determined: Vec<Direction>,
}

impl Subset {
    /// Capture the current derived properties.
    pub fn report(&self) -> SubsetReport {
        SubsetReport {
            space: *self.space(),
            size: self.size(),
            points: self.points().cloned().collect(),
            prime_multiple: self.prime_multiple(),
            max_line_incidence: self.max_line_incidence(),
            line_incidence_threshold: self.line_incidence_threshold(),
            below_line_incidence_threshold: self.below_line_incidence_threshold(),
            equidistributed_planes: self.equidistributed_planes().into_iter().cloned().collect(),
            directions_determined: self.directions_determined().into_iter().cloned().collect(),
        }
    }
}

fn write_option<T: fmt::Display>(f: &mut fmt::Formatter<'_>, value: Option<T>) -> fmt::Result {
    match value {
        Some(v) => write!(f, "{v}"),
        None => f.write_str("-"),
    }
}

impl fmt::Display for SubsetReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "space:                {}", self.space)?;
        writeln!(f, "size:                 {}", self.size)?;
        f.write_str("prime multiple:       ")?;
        write_option(f, self.prime_multiple)?;
        writeln!(f)?;
        writeln!(f, "max line incidence:   {}", self.max_line_incidence)?;
        f.write_str("line threshold:       ")?;
        write_option(f, self.line_incidence_threshold)?;
        writeln!(f)?;
        f.write_str("below threshold:      ")?;
        write_option(f, self.below_line_incidence_threshold)?;
        writeln!(f)?;
        writeln!(
            f,
            "equidistributed:      {} families",
            self.equidistributed_planes.len()
        )?;
        for normal in &self.equidistributed_planes {
            writeln!(f, "  normal {normal}")?;
        }
        write!(
            f,
            "directions determined: {}",
            self.directions_determined.len()
        )
    }
}
