//! SVG scene rendering for positioned pathway graphs.
//!
//! Output layout: a root `<svg>` sized to the viewport, shared `<defs>` (blur filter, arrowheads,
//! per-edge tick markers), and one fitted content group holding the edge layer below the node
//! layer.

use crate::text::TextMeasurer;
use crate::viewport::{GraphTransform, Viewport, calculate_graph_transform, graph_bounds};
use pathviz_core::GraphData;
use pathviz_core::config::Config;
use rustc_hash::FxHashSet;

pub mod defs;
pub mod edge;
pub mod node;
pub mod scene;

pub use scene::Element;

#[derive(Debug, Clone)]
pub struct NodeStyle {
    pub fill: String,
    pub stroke: String,
    pub stroke_width: String,
}

impl Default for NodeStyle {
    fn default() -> Self {
        Self {
            fill: "var(--node-fill)".to_string(),
            stroke: "var(--node-stroke)".to_string(),
            stroke_width: "1.5".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SvgRenderOptions {
    /// Root `<svg>` id.
    pub diagram_id: Option<String>,
    pub viewport: Viewport,
    /// When false the content group is left untransformed.
    pub fit_to_viewport: bool,
    /// Node ids that get the neon overlay.
    pub highlighted: FxHashSet<String>,
    pub node_style: NodeStyle,
}

impl Default for SvgRenderOptions {
    fn default() -> Self {
        Self {
            diagram_id: None,
            viewport: Viewport {
                width: 800.0,
                height: 600.0,
            },
            fit_to_viewport: true,
            highlighted: FxHashSet::default(),
            node_style: NodeStyle::default(),
        }
    }
}

/// Builds the scene for a graph whose shapes are resolved and nodes positioned.
///
/// Geometry problems on individual nodes or edges never abort the render; see
/// [`edge::edge_geometry`].
pub fn render_graph_scene(
    graph: &GraphData,
    measurer: &dyn TextMeasurer,
    config: &Config,
    options: &SvgRenderOptions,
) -> Element {
    let vp = options.viewport;
    let mut root = Element::new("svg")
        .attr("xmlns", "http://www.w3.org/2000/svg")
        .attr("class", "pathway-graph")
        .attr("width", fmt(vp.width))
        .attr("height", fmt(vp.height))
        .attr(
            "viewBox",
            format!("0 0 {} {}", fmt(vp.width), fmt(vp.height)),
        );
    if let Some(id) = options.diagram_id.as_deref() {
        root.set_attr("id", id);
    }

    let mut defs = defs::setup_svg_defs(config);

    let transform = match graph_bounds(graph) {
        Some(bounds) if options.fit_to_viewport => {
            calculate_graph_transform(&bounds, vp, config.layout.scale_padding)
        }
        _ => GraphTransform::IDENTITY,
    };

    let mut edges = Element::new("g").attr("class", "edges");
    edge::render_edges(graph, &mut edges, &mut defs, config);

    let mut nodes = Element::new("g").attr("class", "nodes");
    for n in &graph.nodes {
        let highlighted = options.highlighted.contains(&n.id);
        if let Some(el) = node::render_node(n, highlighted, measurer, &options.node_style, config)
        {
            nodes.append(el);
        }
    }

    root.append(defs);
    root.append(
        Element::new("g")
            .attr("class", "graph")
            .attr(
                "transform",
                format!(
                    "translate({}, {}) scale({})",
                    fmt(transform.tx),
                    fmt(transform.ty),
                    fmt(transform.scale)
                ),
            )
            .with_child(edges)
            .with_child(nodes),
    );
    root
}

pub fn render_graph_svg(
    graph: &GraphData,
    measurer: &dyn TextMeasurer,
    config: &Config,
    options: &SvgRenderOptions,
) -> String {
    render_graph_scene(graph, measurer, config, options).to_svg_string()
}

/// Number formatting for SVG attributes: round-trippable decimal, no `-0`, and tiny float noise
/// snapped away.
pub(crate) fn fmt(v: f64) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }

    let mut v = if v.abs() < 1e-9 { 0.0 } else { v };
    let nearest = v.round();
    if (v - nearest).abs() < 1e-6 {
        v = nearest;
    }
    let s = v.to_string();
    if s == "-0" { "0".to_string() } else { s }
}

pub(crate) fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

pub(crate) fn escape_attr(text: &str) -> String {
    escape_xml(text)
}
