//! Edge/boundary intersection.
//!
//! For an edge between two node centers this computes where the straight segment leaves the
//! source outline and enters the target outline, plus the outline's local angle at the entry
//! point (used to rotate tick markers so they sit flush against the border).
//!
//! The ellipse crossing and the ellipse tangent angle follow the parametric approximations the
//! marker rotations are tuned against; keep them as they are.

use crate::shapes::resolve_shape;
use crate::{Error, Result};
use pathviz_core::geom::{Point, Vector, point, vector};
use pathviz_core::{Node, NodeShape, Position};
use serde::Serialize;

/// Tolerance used when deciding which rectangle side an intersection lies on.
pub const SIDE_TOLERANCE: f64 = 0.1;

const EPS: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundaryPoints {
    /// Exit point on the source outline.
    pub start: Position,
    /// Entry point on the target outline.
    pub end: Position,
}

fn center_of(node: &Node) -> Result<Point> {
    node.center
        .map(Point::from)
        .ok_or_else(|| Error::MissingGeometry {
            node_id: node.id.clone(),
        })
}

fn half_extents(node: &Node) -> Vector {
    let (w, h) = node.size();
    vector(w / 2.0, h / 2.0)
}

/// Ellipse outline point facing `other`.
///
/// Solves `t = atan2(dy * a, dx * b)` for the parametric angle, with `d = center - other`, and
/// steps back from the center by `(a cos t, b sin t)`.
fn ellipse_point(center: Point, half: Vector, other: Point) -> Point {
    let d = center - other;
    let (a, b) = (half.x, half.y);
    let t = (d.y * a).atan2(d.x * b);
    point(center.x - a * t.cos(), center.y - b * t.sin())
}

/// Rectangle outline point facing `other`.
///
/// Casts a ray from `center` toward `other`, intersects it with the four sides, drops crossings
/// outside a side's extent or behind the ray origin, and keeps the one nearest `other`. Falls back
/// to `center` when nothing qualifies.
fn rectangle_point(center: Point, half: Vector, other: Point) -> Point {
    let dir = other - center;
    let mut best: Option<(f64, Point)> = None;
    let mut consider = |t: f64| {
        if !(t.is_finite() && t >= -EPS) {
            return;
        }
        let p = center + dir * t;
        let inside_x = (p.x - center.x).abs() <= half.x + EPS;
        let inside_y = (p.y - center.y).abs() <= half.y + EPS;
        if !(inside_x && inside_y) {
            return;
        }
        let dist = (other - p).square_length();
        if best.is_none_or(|(d, _)| dist < d) {
            best = Some((dist, p));
        }
    };

    if dir.x.abs() > EPS {
        consider(half.x / dir.x);
        consider(-half.x / dir.x);
    }
    if dir.y.abs() > EPS {
        consider(half.y / dir.y);
        consider(-half.y / dir.y);
    }

    best.map(|(_, p)| p).unwrap_or(center)
}

/// Where the segment from `node`'s center toward `other` crosses `node`'s outline.
///
/// Octagons use their bounding rectangle. Points (and coincident centers) return the center.
pub fn boundary_point(node: &Node, other: Position) -> Result<Position> {
    let center = center_of(node)?;
    let other = Point::from(other);
    if (other - center).square_length() == 0.0 {
        return Ok(center.into());
    }

    let half = half_extents(node);
    let p = match node.shape.unwrap_or_else(|| resolve_shape(node)) {
        NodeShape::Point => center,
        NodeShape::Ellipse => {
            if half.x <= 0.0 || half.y <= 0.0 {
                center
            } else {
                ellipse_point(center, half, other)
            }
        }
        NodeShape::Rectangle | NodeShape::Octagon => rectangle_point(center, half, other),
    };

    if !(p.x.is_finite() && p.y.is_finite()) {
        return Err(Error::MissingGeometry {
            node_id: node.id.clone(),
        });
    }
    Ok(p.into())
}

/// Exit point on `source` and entry point on `target` for a straight edge between their centers.
///
/// Both nodes need a center; otherwise this fails with [`Error::MissingGeometry`].
pub fn compute_boundary_points(source: &Node, target: &Node) -> Result<BoundaryPoints> {
    let source_center = center_of(source)?;
    let target_center = center_of(target)?;

    if (target_center - source_center).square_length() == 0.0 {
        let shared: Position = source_center.into();
        return Ok(BoundaryPoints {
            start: shared,
            end: shared,
        });
    }

    let start = boundary_point(source, target_center.into())?;
    let end = boundary_point(target, source_center.into())?;
    tracing::trace!(
        source = %source.id,
        target = %target.id,
        start_x = start.x,
        start_y = start.y,
        end_x = end.x,
        end_y = end.y,
        "boundary points"
    );
    Ok(BoundaryPoints { start, end })
}

/// Angle of `node`'s outline at `at`, in degrees.
///
/// Rectangles (and octagons): 0 on a vertical side, 90 on a horizontal side, 0 otherwise.
/// Ellipses: the tangent `atan(-b²dx / (a²dy))` normalized to `[0, 360)` and then negated for the
/// y-down drawing space (90 before negation when `dx == 0`). Other shapes, or a node without a
/// center: 0.
pub fn boundary_angle(node: &Node, at: Position) -> f64 {
    let Some(center) = node.center else {
        return 0.0;
    };
    let dx = at.x - center.x;
    let dy = at.y - center.y;
    let (w, h) = node.size();

    match node.shape.unwrap_or_else(|| resolve_shape(node)) {
        NodeShape::Rectangle | NodeShape::Octagon => {
            let half_width = w / 2.0;
            let half_height = h / 2.0;
            if (dx.abs() - half_width).abs() < SIDE_TOLERANCE {
                0.0
            } else if (dy.abs() - half_height).abs() < SIDE_TOLERANCE {
                90.0
            } else {
                0.0
            }
        }
        NodeShape::Ellipse => {
            let a = w / 2.0;
            let b = h / 2.0;
            let tangent = if dx != 0.0 {
                ((-b * b * dx / (a * a * dy)).atan().to_degrees() + 360.0) % 360.0
            } else {
                90.0
            };
            -tangent
        }
        NodeShape::Point => 0.0,
    }
}

/// Marker `orient` that makes a tick perpendicular to the outline at the entry point.
pub fn marker_rotation(border_angle: f64) -> f64 {
    90.0 - border_angle
}

/// Moves `end` back toward `start` by `distance`; returns `end` for a zero-length segment.
pub fn pull_back(start: Position, end: Position, distance: f64) -> Position {
    let d = Point::from(end) - Point::from(start);
    let length = d.length();
    if length == 0.0 {
        return end;
    }
    Position::new(
        end.x - d.x / length * distance,
        end.y - d.y / length * distance,
    )
}
