use super::defs::{EDGE_COLOR, tick_marker};
use super::fmt;
use super::scene::Element;
use crate::intersect::{boundary_angle, compute_boundary_points, marker_rotation, pull_back};
use crate::shapes::resolve_shape;
use pathviz_core::config::Config;
use pathviz_core::{Edge, GraphData, MarkerStyle, Node, NodeShape, Position};
use rustc_hash::FxHashMap;
use std::fmt::Write as _;

/// Arrowhead used whenever the target cannot be resolved.
pub const FALLBACK_MARKER_ID: &str = "arrow-entity";

/// Shared arrowhead for edges ending at `target`; cofactors get the compact marker.
pub fn marker_base_id(target: &Node) -> &'static str {
    if target.is_cofactor() {
        return "arrow-cofactor";
    }
    match target.shape.unwrap_or_else(|| resolve_shape(target)) {
        NodeShape::Ellipse => "arrow-entity",
        NodeShape::Rectangle | NodeShape::Point => "arrow-process",
        NodeShape::Octagon => "arrow-effect",
    }
}

/// Escapes a node id for use inside a marker id; ASCII alphanumerics pass through and every
/// other char becomes `_<hex code point>_`, so `-` can separate the parts unambiguously.
fn escape_id_part(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch);
        } else {
            let _ = write!(out, "_{:x}_", u32::from(ch));
        }
    }
    out
}

/// Per-edge tick marker id; distinct `(source, target)` pairs never share one.
pub fn tick_marker_id(base_id: &str, edge: &Edge) -> String {
    format!(
        "{base_id}-t-{}-{}",
        escape_id_part(&edge.source),
        escape_id_part(&edge.target)
    )
}

/// Path data and marker reference for one edge.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeGeometry {
    pub d: String,
    pub marker_end: String,
}

fn line_path(start: Position, end: Position) -> String {
    format!(
        "M {},{} L {},{}",
        fmt(start.x),
        fmt(start.y),
        fmt(end.x),
        fmt(end.y)
    )
}

fn marker_url(id: &str) -> String {
    format!("url(#{id})")
}

/// Creates the tick marker for this edge, or re-orients it when a previous render already did.
fn upsert_tick_marker(defs: &mut Element, id: &str, rotation: f64, config: &Config) {
    if let Some(existing) = defs.select_by_id_mut(id) {
        existing.set_attr("orient", fmt(rotation));
        return;
    }
    defs.append(tick_marker(id, rotation, config));
}

/// Computes one edge's path and marker, registering per-edge tick markers in `defs`.
///
/// Never fails: an edge with an unknown endpoint or an endpoint without a center gets an empty
/// path; an intersection failure degrades to a straight center-to-center line with the fallback
/// arrowhead.
pub fn edge_geometry(
    edge: &Edge,
    source: Option<&Node>,
    target: Option<&Node>,
    defs: &mut Element,
    config: &Config,
) -> EdgeGeometry {
    let empty = || EdgeGeometry {
        d: String::new(),
        marker_end: marker_url(FALLBACK_MARKER_ID),
    };
    let (Some(source), Some(target)) = (source, target) else {
        tracing::warn!(
            source = %edge.source,
            target = %edge.target,
            "edge references an unknown node, skipping"
        );
        return empty();
    };
    let (Some(source_center), Some(target_center)) = (source.center, target.center) else {
        tracing::warn!(
            source = %edge.source,
            target = %edge.target,
            "edge endpoint has no position, skipping"
        );
        return empty();
    };

    let points = match compute_boundary_points(source, target) {
        Ok(points) => points,
        Err(err) => {
            tracing::warn!(
                source = %edge.source,
                target = %edge.target,
                error = %err,
                "intersection failed, drawing center line"
            );
            return EdgeGeometry {
                d: line_path(source_center, target_center),
                marker_end: marker_url(FALLBACK_MARKER_ID),
            };
        }
    };

    let style = edge.marker_style();
    let pullback = match style {
        MarkerStyle::Tick => config.marker.tick_pullback,
        MarkerStyle::Arrow => config.marker.arrow_pullback,
    };
    let d = line_path(points.start, pull_back(points.start, points.end, pullback));

    let base_id = marker_base_id(target);
    let marker_end = match style {
        MarkerStyle::Arrow => marker_url(base_id),
        MarkerStyle::Tick => {
            let border = boundary_angle(target, points.end);
            let rotation = marker_rotation(border);
            tracing::debug!(
                source = %edge.source,
                target = %edge.target,
                shape = ?target.shape,
                border_angle = border,
                rotation,
                "tick marker orientation"
            );
            let id = tick_marker_id(base_id, edge);
            upsert_tick_marker(defs, &id, rotation, config);
            marker_url(&id)
        }
    };

    EdgeGeometry { d, marker_end }
}

/// Appends one `<path>` per edge to `layer`, in edge order.
pub fn render_edges(graph: &GraphData, layer: &mut Element, defs: &mut Element, config: &Config) {
    let by_id: FxHashMap<&str, &Node> = graph.nodes.iter().map(|n| (n.id.as_str(), n)).collect();

    for edge in &graph.edges {
        let source = by_id.get(edge.source.as_str()).copied();
        let target = by_id.get(edge.target.as_str()).copied();
        let geometry = edge_geometry(edge, source, target, defs, config);
        layer.append(
            Element::new("path")
                .attr("class", "edge")
                .attr("data-source", edge.source.clone())
                .attr("data-target", edge.target.clone())
                .attr("fill", "none")
                .attr("stroke", EDGE_COLOR)
                .attr("stroke-width", fmt(config.edge.stroke_width))
                .attr("d", geometry.d)
                .attr("marker-end", geometry.marker_end),
        );
    }
}
