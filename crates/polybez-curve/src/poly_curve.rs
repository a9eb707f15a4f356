//! Multi-dimensional polynomial curves.

use polybez_algebra::Polynomial;
use polybez_core::{Curve, Error, Result, Tolerance};
use serde::{Deserialize, Serialize};

/// A parametric curve with one coordinate [`Polynomial`] per axis.
///
/// Coordinate polynomials are independent and may have different orders.
/// Arithmetic between curves, or between a curve and a point, requires
/// equal dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolyCurve {
    coordinates: Vec<Polynomial>,
}

impl PolyCurve {
    pub fn new(coordinates: Vec<Polynomial>) -> Result<Self> {
        if coordinates.is_empty() {
            return Err(Error::InvalidArgument(
                "a curve needs at least one coordinate polynomial".into(),
            ));
        }
        Ok(Self { coordinates })
    }

    /// The constant curve sitting at `point`.
    pub fn from_point(point: &[f64]) -> Result<Self> {
        if point.is_empty() {
            return Err(Error::InvalidArgument(
                "a point needs at least one coordinate".into(),
            ));
        }
        Ok(Self {
            coordinates: point.iter().map(|&x| Polynomial::constant(x)).collect(),
        })
    }

    pub(crate) fn from_coordinates(coordinates: Vec<Polynomial>) -> Self {
        Self { coordinates }
    }

    pub fn dimension(&self) -> usize {
        self.coordinates.len()
    }

    /// Coordinate polynomial of one axis. Panics if `axis` is out of range.
    pub fn coordinate(&self, axis: usize) -> &Polynomial {
        &self.coordinates[axis]
    }

    pub fn coordinates(&self) -> &[Polynomial] {
        &self.coordinates
    }

    /// Evaluate every axis polynomial at parameter `t`.
    pub fn evaluate(&self, t: f64) -> Vec<f64> {
        self.coordinates.iter().map(|p| p.eval(t)).collect()
    }

    fn check_dimension(&self, other: usize) -> Result<()> {
        if self.coordinates.len() != other {
            return Err(Error::DimensionMismatch {
                left: self.coordinates.len(),
                right: other,
            });
        }
        Ok(())
    }

    pub fn scale(&self, factor: f64) -> PolyCurve {
        Self {
            coordinates: self.coordinates.iter().map(|p| p * factor).collect(),
        }
    }

    pub fn neg(&self) -> PolyCurve {
        Self {
            coordinates: self.coordinates.iter().map(|p| -p).collect(),
        }
    }

    pub fn add(&self, other: &PolyCurve) -> Result<PolyCurve> {
        self.check_dimension(other.coordinates.len())?;
        Ok(Self {
            coordinates: self
                .coordinates
                .iter()
                .zip(&other.coordinates)
                .map(|(a, b)| a + b)
                .collect(),
        })
    }

    pub fn sub(&self, other: &PolyCurve) -> Result<PolyCurve> {
        self.check_dimension(other.coordinates.len())?;
        Ok(Self {
            coordinates: self
                .coordinates
                .iter()
                .zip(&other.coordinates)
                .map(|(a, b)| a - b)
                .collect(),
        })
    }

    /// Multiply every axis by the same scalar polynomial.
    pub fn mul_polynomial(&self, factor: &Polynomial) -> PolyCurve {
        Self {
            coordinates: self.coordinates.iter().map(|p| p * factor).collect(),
        }
    }

    /// Shift the curve by a constant point.
    pub fn translate(&self, point: &[f64]) -> Result<PolyCurve> {
        self.check_dimension(point.len())?;
        Ok(Self {
            coordinates: self
                .coordinates
                .iter()
                .zip(point)
                .map(|(p, &x)| p + x)
                .collect(),
        })
    }

    /// Subtract a constant point from the curve.
    pub fn sub_point(&self, point: &[f64]) -> Result<PolyCurve> {
        self.check_dimension(point.len())?;
        Ok(Self {
            coordinates: self
                .coordinates
                .iter()
                .zip(point)
                .map(|(p, &x)| p - x)
                .collect(),
        })
    }

    /// The squared distance to `point` as a polynomial in the curve
    /// parameter: `sum_axis (curve_axis - point_axis)^2`.
    pub fn parameterized_square_distance(&self, point: &[f64]) -> Result<Polynomial> {
        self.check_dimension(point.len())?;
        let mut res = Polynomial::constant(0.0);
        for (poly, &x) in self.coordinates.iter().zip(point) {
            let diff = poly - x;
            res = res + &diff * &diff;
        }
        Ok(res)
    }

    /// Parameter in `[t_min, t_max]` where the curve comes closest to `point`.
    pub fn closest_parameter(
        &self,
        point: &[f64],
        t_min: f64,
        t_max: f64,
        tol: Tolerance,
    ) -> Result<f64> {
        let dsq = self.parameterized_square_distance(point)?;
        let candidates = distance_candidates(&dsq, t_min, t_max, tol)?;
        Ok(candidates
            .into_iter()
            .min_by(|a, b| dsq.eval(*a).total_cmp(&dsq.eval(*b)))
            .unwrap_or(t_min))
    }

    /// Point on the curve closest to `point` within `[t_min, t_max]`.
    pub fn closest_point(
        &self,
        point: &[f64],
        t_min: f64,
        t_max: f64,
        tol: Tolerance,
    ) -> Result<Vec<f64>> {
        let t = self.closest_parameter(point, t_min, t_max, tol)?;
        Ok(self.evaluate(t))
    }

    /// Shortest distance from `point` to the curve within `[t_min, t_max]`.
    pub fn distance_to(
        &self,
        point: &[f64],
        t_min: f64,
        t_max: f64,
        tol: Tolerance,
    ) -> Result<f64> {
        let dsq = self.parameterized_square_distance(point)?;
        let candidates = distance_candidates(&dsq, t_min, t_max, tol)?;
        Ok(candidates
            .into_iter()
            .map(|t| dsq.eval(t).max(0.0).sqrt())
            .fold(f64::INFINITY, f64::min))
    }

    /// Bezier curve through `points` by recursive linear blending:
    /// `(1-T) * bezier(first n-1) + T * bezier(last n-1)`, with a single
    /// point as the constant base case.
    pub fn bezier(points: &[Vec<f64>]) -> Result<PolyCurve> {
        if points.is_empty() {
            return Err(Error::InvalidArgument(
                "a Bezier curve needs at least one control point".into(),
            ));
        }
        let dim = points[0].len();
        if dim == 0 {
            return Err(Error::InvalidArgument(
                "control points need at least one coordinate".into(),
            ));
        }
        for p in points {
            if p.len() != dim {
                return Err(Error::DimensionMismatch {
                    left: dim,
                    right: p.len(),
                });
            }
        }
        Ok(Self {
            coordinates: bezier_blend(points),
        })
    }

    /// Linear segment from `p0` to `p1`.
    pub fn segment(p0: &[f64], p1: &[f64]) -> Result<PolyCurve> {
        Self::bezier(&[p0.to_vec(), p1.to_vec()])
    }

    pub fn quadratic_bezier(p0: &[f64], p1: &[f64], p2: &[f64]) -> Result<PolyCurve> {
        Self::bezier(&[p0.to_vec(), p1.to_vec(), p2.to_vec()])
    }

    pub fn cubic_bezier(p0: &[f64], p1: &[f64], p2: &[f64], p3: &[f64]) -> Result<PolyCurve> {
        Self::bezier(&[p0.to_vec(), p1.to_vec(), p2.to_vec(), p3.to_vec()])
    }
}

fn bezier_blend(points: &[Vec<f64>]) -> Vec<Polynomial> {
    if points.len() == 1 {
        return points[0].iter().map(|&x| Polynomial::constant(x)).collect();
    }
    let t = Polynomial::x();
    let one_minus_t = 1.0 - Polynomial::x();
    let first = bezier_blend(&points[..points.len() - 1]);
    let last = bezier_blend(&points[1..]);
    first
        .into_iter()
        .zip(last)
        .map(|(a, b)| &a * &one_minus_t + &b * &t)
        .collect()
}

/// Candidate parameters for a minimum of the squared-distance polynomial:
/// real roots of its derivative strictly inside `(t_min, t_max)`, plus the
/// interval ends. Root solving goes through the hybrid path because the
/// derivative's degree grows past 4 for cubic and higher curves.
pub(crate) fn distance_candidates(
    dsq: &Polynomial,
    t_min: f64,
    t_max: f64,
    tol: Tolerance,
) -> Result<Vec<f64>> {
    let deriv = dsq.derivative().normalize(tol);
    let mut candidates: Vec<f64> = deriv
        .solve_or_find_real_roots(tol)?
        .into_iter()
        .filter(|&t| t > t_min && t < t_max)
        .collect();
    candidates.push(t_min);
    candidates.push(t_max);
    Ok(candidates)
}

impl Curve for PolyCurve {
    type Point = Vec<f64>;

    fn point_at(&self, t: f64) -> Vec<f64> {
        self.evaluate(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_dimension_mismatch() {
        let a = PolyCurve::from_point(&[0.0, 0.0]).unwrap();
        let b = PolyCurve::from_point(&[0.0, 0.0, 0.0]).unwrap();
        assert!(matches!(
            a.add(&b),
            Err(Error::DimensionMismatch { left: 2, right: 3 })
        ));
        assert!(a.translate(&[1.0]).is_err());
        assert!(a.parameterized_square_distance(&[1.0]).is_err());
    }

    #[test]
    fn test_empty_rejected() {
        assert!(PolyCurve::new(vec![]).is_err());
        assert!(PolyCurve::from_point(&[]).is_err());
        assert!(PolyCurve::bezier(&[]).is_err());
    }

    #[test]
    fn test_segment_interpolates_endpoints() {
        let c = PolyCurve::segment(&[0.0, 0.0], &[2.0, 4.0]).unwrap();
        assert_abs_diff_eq!(c.evaluate(0.0)[0], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(c.evaluate(1.0)[0], 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(c.evaluate(0.5)[1], 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_quadratic_bezier_midpoint() {
        // (1-t)^2 p0 + 2t(1-t) p1 + t^2 p2 at t = 0.5
        let c = PolyCurve::quadratic_bezier(&[0.0, 0.0], &[0.5, 1.0], &[1.0, 0.0]).unwrap();
        let m = c.evaluate(0.5);
        assert_abs_diff_eq!(m[0], 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(m[1], 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_general_bezier_matches_cubic_blend() {
        // the wrappers route through the same recursive construction; check
        // the coefficients against the hand-expanded Bernstein cubic
        let p = [1.0, 2.0, 4.0, 8.0];
        let c = PolyCurve::bezier(&[vec![p[0]], vec![p[1]], vec![p[2]], vec![p[3]]]).unwrap();
        let poly = c.coordinate(0);
        // p0 + 3(p1-p0) t + 3(p0 - 2p1 + p2) t^2 + (p3 - p0 + 3p1 - 3p2) t^3
        let expected = Polynomial::new(vec![
            p[0],
            3.0 * (p[1] - p[0]),
            3.0 * (p[0] - 2.0 * p[1] + p[2]),
            p[3] - p[0] + 3.0 * p[1] - 3.0 * p[2],
        ]);
        assert_abs_diff_eq!(poly.clone(), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_three_dimensional_curve() {
        let c = PolyCurve::cubic_bezier(
            &[0.0, 0.0, 0.0],
            &[1.0, 0.0, 1.0],
            &[2.0, 1.0, 1.0],
            &[3.0, 3.0, 0.0],
        )
        .unwrap();
        assert_eq!(c.dimension(), 3);
        let end = c.evaluate(1.0);
        assert_abs_diff_eq!(end[0], 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(end[1], 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(end[2], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_closest_parameter_on_segment() {
        let tol = Tolerance::default();
        let c = PolyCurve::segment(&[0.0, 0.0], &[1.0, 0.0]).unwrap();
        let t = c.closest_parameter(&[0.25, 1.0], 0.0, 1.0, tol).unwrap();
        assert_abs_diff_eq!(t, 0.25, epsilon = 1e-4);
        let d = c.distance_to(&[0.25, 1.0], 0.0, 1.0, tol).unwrap();
        assert_abs_diff_eq!(d, 1.0, epsilon = 1e-4);
    }

    #[test]
    fn test_closest_point_clamps_to_range() {
        let tol = Tolerance::default();
        let c = PolyCurve::segment(&[0.0, 0.0], &[1.0, 0.0]).unwrap();
        // nearest approach is past the end of the range
        let t = c.closest_parameter(&[2.0, 0.0], 0.0, 1.0, tol).unwrap();
        assert_abs_diff_eq!(t, 1.0, epsilon = 1e-12);
        let p = c.closest_point(&[2.0, 0.0], 0.0, 1.0, tol).unwrap();
        assert_abs_diff_eq!(p[0], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_square_distance_degree_on_cubic() {
        // squared distance to a cubic curve is degree 6 in t
        let c = PolyCurve::cubic_bezier(&[0.0, 0.0], &[1.0, 2.0], &[3.0, 2.0], &[4.0, 0.0])
            .unwrap();
        let dsq = c.parameterized_square_distance(&[1.0, 1.0]).unwrap();
        assert_eq!(dsq.order(), 6);
    }

    #[test]
    fn test_scale_and_translate() {
        let tol = Tolerance::default();
        let c = PolyCurve::segment(&[0.0, 0.0], &[1.0, 1.0]).unwrap();
        let moved = c.scale(2.0).translate(&[1.0, -1.0]).unwrap();
        let end = moved.evaluate(1.0);
        assert_abs_diff_eq!(end[0], 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(end[1], 1.0, epsilon = 1e-12);
        let back = moved.sub_point(&[1.0, -1.0]).unwrap().scale(0.5);
        assert_abs_diff_eq!(back.coordinate(0).clone(), c.coordinate(0).clone(), epsilon = tol.epsilon());
        let flipped = c.neg();
        assert_abs_diff_eq!(flipped.evaluate(1.0)[0], -1.0, epsilon = 1e-12);
    }
}
