/// Trait for parametric curves.
pub trait Curve {
    /// Coordinate type produced by evaluation.
    type Point;

    /// Evaluate the curve at parameter `t`.
    fn point_at(&self, t: f64) -> Self::Point;

    /// Return the parameter domain `(t_min, t_max)`.
    fn domain(&self) -> (f64, f64) {
        (0.0, 1.0)
    }
}
