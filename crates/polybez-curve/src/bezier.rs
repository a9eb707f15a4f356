//! 2D Bezier curve fragments: segments, quadratics, cubics, and
//! arbitrary-order curves over `DVec2` control points.

use glam::DVec2;
use polybez_algebra::Polynomial;
use polybez_core::{Curve, Error, Result, Tolerance};

use crate::bbox::Aabb2;
use crate::poly_curve::{distance_candidates, PolyCurve};

/// The Bezier blending polynomial through scalar control values, built by
/// recursive linear blending: `(1-T) * blend(first n-1) + T * blend(last
/// n-1)`, with a single value as the constant base case.
pub fn bezier_polynomial(values: &[f64]) -> Result<Polynomial> {
    if values.is_empty() {
        return Err(Error::InvalidArgument(
            "a Bezier polynomial needs at least one control value".into(),
        ));
    }
    Ok(blend(values))
}

fn blend(values: &[f64]) -> Polynomial {
    if values.len() == 1 {
        return Polynomial::constant(values[0]);
    }
    let t = Polynomial::x();
    let one_minus_t = 1.0 - Polynomial::x();
    &blend(&values[..values.len() - 1]) * &one_minus_t + &blend(&values[1..]) * &t
}

/// De Casteljau subdivision of scalar control values at `t`.
///
/// The front diagonal of the triangular construction and the reversed back
/// diagonal are the control values of the two sub-curves, both of the same
/// order as the input.
pub fn split_values(values: &[f64], t: f64) -> (Vec<f64>, Vec<f64>) {
    let mut front = Vec::with_capacity(values.len());
    let mut back = Vec::with_capacity(values.len());
    let mut row = values.to_vec();
    while !row.is_empty() {
        front.push(row[0]);
        back.push(row[row.len() - 1]);
        row = row
            .windows(2)
            .map(|pair| pair[0] * (1.0 - t) + pair[1] * t)
            .collect();
    }
    back.reverse();
    (front, back)
}

/// De Casteljau subdivision of 2D control points at `t`.
pub fn split_points(points: &[DVec2], t: f64) -> (Vec<DVec2>, Vec<DVec2>) {
    let mut front = Vec::with_capacity(points.len());
    let mut back = Vec::with_capacity(points.len());
    let mut row = points.to_vec();
    while !row.is_empty() {
        front.push(row[0]);
        back.push(row[row.len() - 1]);
        row = row
            .windows(2)
            .map(|pair| pair[0].lerp(pair[1], t))
            .collect();
    }
    back.reverse();
    (front, back)
}

/// A 2D Bezier curve fragment of arbitrary order.
///
/// The per-axis blending polynomials are computed once at construction;
/// a fragment is immutable afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct BezierFragment {
    control_points: Vec<DVec2>,
    curve_x: Polynomial,
    curve_y: Polynomial,
}

impl BezierFragment {
    /// Create a fragment from at least 2 control points; the curve order is
    /// `points.len() - 1`.
    pub fn new(control_points: Vec<DVec2>) -> Result<Self> {
        if control_points.len() < 2 {
            return Err(Error::InvalidArgument(
                "a Bezier fragment needs at least 2 control points".into(),
            ));
        }
        let xs: Vec<f64> = control_points.iter().map(|p| p.x).collect();
        let ys: Vec<f64> = control_points.iter().map(|p| p.y).collect();
        let curve_x = bezier_polynomial(&xs)?;
        let curve_y = bezier_polynomial(&ys)?;
        Ok(Self {
            control_points,
            curve_x,
            curve_y,
        })
    }

    pub fn order(&self) -> usize {
        self.control_points.len() - 1
    }

    pub fn control_points(&self) -> &[DVec2] {
        &self.control_points
    }

    pub fn curve_x(&self) -> &Polynomial {
        &self.curve_x
    }

    pub fn curve_y(&self) -> &Polynomial {
        &self.curve_y
    }

    /// Evaluate the fragment at parameter `t`.
    pub fn evaluate(&self, t: f64) -> DVec2 {
        DVec2::new(self.curve_x.eval(t), self.curve_y.eval(t))
    }

    /// The fragment as an n-dimensional polynomial curve.
    pub fn to_poly_curve(&self) -> PolyCurve {
        PolyCurve::from_coordinates(vec![self.curve_x.clone(), self.curve_y.clone()])
    }

    /// Tight bounding box over `t` in `[0, 1]`.
    ///
    /// Axis extrema sit either at the endpoints or at roots of the axis
    /// derivative strictly inside `(0, 1)`.
    pub fn bounding_box(&self, tol: Tolerance) -> Result<Aabb2> {
        if self.control_points.len() == 2 {
            let a = self.control_points[0];
            let b = self.control_points[1];
            return Ok(Aabb2::new(a.min(b), a.max(b)));
        }
        let (x0, x1) = axis_range(&self.curve_x, tol)?;
        let (y0, y1) = axis_range(&self.curve_y, tol)?;
        Ok(Aabb2::new(DVec2::new(x0, y0), DVec2::new(x1, y1)))
    }

    /// Cut the fragment at `t` into two fragments of the same order, by the
    /// de Casteljau construction.
    ///
    /// `t` may be anywhere in the inclusive interval `[0, 1]`; a boundary
    /// split returns a zero-length and a full-length fragment.
    pub fn split(&self, t: f64) -> Result<[BezierFragment; 2]> {
        if !(0.0..=1.0).contains(&t) {
            return Err(Error::InvalidArgument(format!(
                "split parameter {t} outside [0, 1]"
            )));
        }
        let (front, back) = split_points(&self.control_points, t);
        Ok([BezierFragment::new(front)?, BezierFragment::new(back)?])
    }

    /// Cut the fragment at every parameter in `ts`, left to right.
    ///
    /// Parameters outside the open interval `(0, 1)` are ignored and
    /// duplicates are collapsed; each remaining cut is remapped into the
    /// still-unsplit tail's local parameter range.
    pub fn split_many(&self, ts: &[f64]) -> Result<Vec<BezierFragment>> {
        let mut filtered: Vec<f64> = ts
            .iter()
            .copied()
            .filter(|&t| t > 0.0 && t < 1.0)
            .collect();
        filtered.sort_by(f64::total_cmp);
        filtered.dedup();
        if filtered.is_empty() {
            return Ok(vec![self.clone()]);
        }

        let mut t_last = 0.0;
        let mut rest = self.clone();
        let mut fragments = Vec::with_capacity(filtered.len() + 1);
        for t in filtered {
            let rel = 1.0 - (1.0 - t) / (1.0 - t_last);
            t_last = t;
            let [head, tail] = rest.split(rel)?;
            fragments.push(head);
            rest = tail;
        }
        fragments.push(rest);
        Ok(fragments)
    }

    /// The squared distance to `point` as a polynomial in `t`.
    pub fn parameterized_square_distance(&self, point: DVec2) -> Polynomial {
        let vx = &self.curve_x - point.x;
        let vy = &self.curve_y - point.y;
        &vx * &vx + &vy * &vy
    }

    /// Parameter in `[0, 1]` where the fragment comes closest to `point`.
    pub fn closest_parameter(&self, point: DVec2, tol: Tolerance) -> Result<f64> {
        let dsq = self.parameterized_square_distance(point);
        let candidates = distance_candidates(&dsq, 0.0, 1.0, tol)?;
        Ok(candidates
            .into_iter()
            .min_by(|a, b| dsq.eval(*a).total_cmp(&dsq.eval(*b)))
            .unwrap_or(0.0))
    }

    /// Shortest distance from `point` to the fragment.
    pub fn distance_to(&self, point: DVec2, tol: Tolerance) -> Result<f64> {
        let dsq = self.parameterized_square_distance(point);
        let candidates = distance_candidates(&dsq, 0.0, 1.0, tol)?;
        Ok(candidates
            .into_iter()
            .map(|t| dsq.eval(t).max(0.0).sqrt())
            .fold(f64::INFINITY, f64::min))
    }
}

fn axis_range(curve: &Polynomial, tol: Tolerance) -> Result<(f64, f64)> {
    let mut ts = vec![0.0, 1.0];
    ts.extend(
        curve
            .derivative()
            .solve_or_find_real_roots(tol)?
            .into_iter()
            .filter(|&t| t > 0.0 && t < 1.0),
    );
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for t in ts {
        let v = curve.eval(t);
        min = min.min(v);
        max = max.max(v);
    }
    Ok((min, max))
}

impl Curve for BezierFragment {
    type Point = DVec2;

    fn point_at(&self, t: f64) -> DVec2 {
        self.evaluate(t)
    }
}
