//! Piecewise-linear membership functions.
//!
//! A membership function is a sequence of `(x, degree)` control points with
//! degrees in [0, 1], evaluated by linear interpolation. The two authored
//! shapes are triangles `(a,0),(b,1),(c,0)` and trapezoids
//! `(a,0),(b,1),(c,1),(d,0)`; arbitrary point lists are accepted as long as
//! they are non-decreasing in x.
//!
//! Shoulder shapes are expressed with coincident control points (for example
//! a trapezoid with `a == b` sits at full membership on the range edge). The
//! zero-width intervals this produces evaluate as steps, so no shape can
//! divide by zero.

use serde::{Deserialize, Serialize};

use crate::domain::Domain;
use crate::error::ConfigError;
use crate::utils::interp_points;

/// Shape tag for an authored membership function.
///
/// This is the serializable description; `MembershipFunction` is the
/// evaluated form. Validation happens when the shape is built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Shape {
    Triangular { a: f64, b: f64, c: f64 },
    Trapezoidal { a: f64, b: f64, c: f64, d: f64 },
}

impl Shape {
    /// Build the membership function this shape describes.
    pub fn build(&self) -> Result<MembershipFunction, ConfigError> {
        match *self {
            Shape::Triangular { a, b, c } => MembershipFunction::triangular(a, b, c),
            Shape::Trapezoidal { a, b, c, d } => MembershipFunction::trapezoidal(a, b, c, d),
        }
    }
}

/// A piecewise-linear curve giving the degree (0 to 1) to which a crisp
/// value belongs to one linguistic label.
#[derive(Debug, Clone, PartialEq)]
pub struct MembershipFunction {
    points: Vec<(f64, f64)>,
}

impl MembershipFunction {
    /// Triangular function with feet at `a` and `c` and peak at `b`.
    pub fn triangular(a: f64, b: f64, c: f64) -> Result<Self, ConfigError> {
        Self::from_points(vec![(a, 0.0), (b, 1.0), (c, 0.0)])
    }

    /// Trapezoidal function with feet at `a` and `d` and plateau `[b, c]`.
    pub fn trapezoidal(a: f64, b: f64, c: f64, d: f64) -> Result<Self, ConfigError> {
        Self::from_points(vec![(a, 0.0), (b, 1.0), (c, 1.0), (d, 0.0)])
    }

    /// Build from raw control points.
    ///
    /// # Errors
    /// - `NotEnoughControlPoints` for fewer than 2 points
    /// - `ControlPointsNotSorted` if x values decrease anywhere
    /// - `DegreeOutOfRange` if any degree leaves [0, 1]
    pub fn from_points(points: Vec<(f64, f64)>) -> Result<Self, ConfigError> {
        if points.len() < 2 {
            return Err(ConfigError::NotEnoughControlPoints {
                count: points.len(),
            });
        }

        for pair in points.windows(2) {
            if pair[1].0 < pair[0].0 {
                return Err(ConfigError::ControlPointsNotSorted {
                    points: points.iter().map(|&(x, _)| x).collect(),
                });
            }
        }

        for &(_, degree) in &points {
            if !(0.0..=1.0).contains(&degree) {
                return Err(ConfigError::DegreeOutOfRange { degree });
            }
        }

        Ok(Self { points })
    }

    /// Membership degree at an arbitrary crisp value.
    ///
    /// Linear interpolation between the bracketing control points; outside
    /// the support the boundary degree applies (0 for the authored shapes).
    pub fn degree_at(&self, x: f64) -> f64 {
        interp_points(&self.points, x)
    }

    /// Rasterize onto a domain's sample grid.
    ///
    /// The result is aligned index-for-index with `domain.samples()` and is
    /// what aggregation arithmetic and plotting consumers work with.
    pub fn sample_over(&self, domain: &Domain) -> Vec<f64> {
        domain
            .samples()
            .iter()
            .map(|&x| self.degree_at(x))
            .collect()
    }

    /// Outermost control-point bounds.
    pub fn support(&self) -> (f64, f64) {
        let first = self.points.first().map(|&(x, _)| x).unwrap_or(0.0);
        let last = self.points.last().map(|&(x, _)| x).unwrap_or(0.0);
        (first, last)
    }

    pub fn control_points(&self) -> &[(f64, f64)] {
        &self.points
    }
}
