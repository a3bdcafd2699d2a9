use super::fmt;
use super::scene::Element;
use pathviz_core::config::Config;

pub const BLUR_FILTER_ID: &str = "overlay-blur";

/// Shared arrowhead ids. `arrow-process` serves both rectangles and points.
pub const ARROW_MARKER_IDS: [&str; 4] = [
    "arrow-entity",
    "arrow-process",
    "arrow-effect",
    "arrow-cofactor",
];

pub const EDGE_COLOR: &str = "var(--edge-color-dark)";

pub fn blur_filter(config: &Config) -> Element {
    let f = &config.filter;
    Element::new("filter")
        .attr("id", BLUR_FILTER_ID)
        .attr("width", f.width.clone())
        .attr("height", f.height.clone())
        .attr("x", f.x.clone())
        .attr("y", f.y.clone())
        .with_child(
            Element::new("feGaussianBlur")
                .attr("in", "SourceGraphic")
                .attr("stdDeviation", fmt(f.blur_std_deviation)),
        )
}

pub fn arrow_marker(id: &str, config: &Config) -> Element {
    let m = &config.marker;
    Element::new("marker")
        .attr("id", id)
        .attr("viewBox", m.view_box.clone())
        .attr("refX", fmt(m.ref_x))
        .attr("refY", "0")
        .attr("markerWidth", fmt(m.size))
        .attr("markerHeight", fmt(m.size))
        .attr("orient", "auto")
        .with_child(
            Element::new("path")
                .attr("d", m.path.clone())
                .attr("fill", EDGE_COLOR),
        )
}

/// Per-edge perpendicular tick, oriented by `rotation` degrees.
pub fn tick_marker(id: &str, rotation: f64, config: &Config) -> Element {
    let size = fmt(config.marker.size);
    Element::new("marker")
        .attr("id", id)
        .attr("viewBox", "-10 -7 20 14")
        .attr("refX", "0")
        .attr("refY", "0")
        .attr("markerWidth", size.clone())
        .attr("markerHeight", size)
        .attr("orient", fmt(rotation))
        .with_child(
            Element::new("path")
                .attr("d", "M 0,-12 L 0,12")
                .attr("stroke", EDGE_COLOR)
                .attr("fill", "none")
                .attr("stroke-width", "4"),
        )
}

/// `<defs>` with the blur filter and every shared arrowhead.
pub fn setup_svg_defs(config: &Config) -> Element {
    let mut defs = Element::new("defs");
    defs.append(blur_filter(config));
    for id in ARROW_MARKER_IDS {
        defs.append(arrow_marker(id, config));
    }
    defs
}
