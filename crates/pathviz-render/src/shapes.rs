//! Shape and size resolution.
//!
//! Runs once per graph before layout. Every node leaves with `shape`, `width` and `height` set.
//! Resolution is idempotent: a second pass finds explicit values and keeps them.

use crate::text::TextMeasurer;
use pathviz_core::config::Config;
use pathviz_core::{EntitySubtype, GraphData, Node, NodeShape, NodeType};

/// Shape decision table over (type, subtype, declared shape).
///
/// Cofactors are always measured and drawn as compact text boxes, so they become rectangles no
/// matter what the payload declared.
pub fn resolve_shape(node: &Node) -> NodeShape {
    match (node.kind, node.entity_subtype, node.shape) {
        (NodeType::Entity, Some(EntitySubtype::Cofactor), _) => NodeShape::Rectangle,
        (_, _, Some(declared)) => declared,
        (NodeType::Process, _, None) => NodeShape::Rectangle,
        (NodeType::Effect, _, None) => NodeShape::Octagon,
        (NodeType::Entity, _, None) => NodeShape::Ellipse,
    }
}

/// Pixel extents for a node whose shape is already `shape`.
pub fn resolve_size(
    node: &Node,
    shape: NodeShape,
    graph_defaults: (Option<f64>, Option<f64>),
    measurer: &dyn TextMeasurer,
    config: &Config,
) -> (f64, f64) {
    let sizes = &config.node_sizes;
    if shape == NodeShape::Point {
        return (sizes.point.width, sizes.point.height);
    }
    if node.is_cofactor() {
        let text_width = measurer.measure_width(&node.nice_name, config.text.font_sizes.cofactor);
        let text_width = if text_width.is_finite() {
            text_width.max(0.0)
        } else {
            0.0
        };
        return (
            text_width + 2.0 * sizes.cofactor.text_padding,
            sizes.cofactor.height,
        );
    }

    let (default_width, default_height) = graph_defaults;
    let width = node
        .width
        .or(default_width.filter(|w| w.is_finite() && *w > 0.0))
        .unwrap_or(sizes.standard.width);
    let height = node
        .height
        .or(default_height.filter(|h| h.is_finite() && *h > 0.0))
        .unwrap_or(sizes.standard.height);
    (width, height)
}

/// Assigns shape and size to every node in place.
pub fn resolve_graph_shapes<'g>(
    graph: &'g mut GraphData,
    measurer: &dyn TextMeasurer,
    config: &Config,
) -> &'g mut GraphData {
    let graph_defaults = graph
        .size_config
        .map(|s| (s.node_width, s.node_height))
        .unwrap_or((None, None));

    for node in &mut graph.nodes {
        let shape = resolve_shape(node);
        let (width, height) = resolve_size(node, shape, graph_defaults, measurer, config);
        tracing::debug!(
            node = %node.id,
            shape = shape.as_str(),
            width,
            height,
            "resolved node shape"
        );
        node.shape = Some(shape);
        node.width = Some(width);
        node.height = Some(height);
    }
    graph
}
