//! polybez curves: multi-dimensional polynomial curves, 2D Bezier fragments,
//! and the geometric queries that reduce to root-finding.

pub mod bbox;
pub mod bezier;
pub mod poly_curve;

pub use bbox::Aabb2;
pub use bezier::BezierFragment;
pub use poly_curve::PolyCurve;
pub use polybez_core::Curve;

pub use glam::DVec2;

pub type Point2 = DVec2;
