use super::defs::{BLUR_FILTER_ID, EDGE_COLOR};
use super::scene::Element;
use super::{NodeStyle, fmt};
use crate::shapes::resolve_shape;
use crate::text::{TextMeasurer, wrap_and_size_text};
use pathviz_core::config::Config;
use pathviz_core::{Node, NodeShape, NodeType};

fn kind_class(kind: NodeType) -> &'static str {
    match kind {
        NodeType::Entity => "entity",
        NodeType::Process => "process",
        NodeType::Effect => "effect",
    }
}

/// Octagon vertices for half extents `(hw, hh)`: the corners are cut by `hw * factor` on both axes.
pub fn octagon_points(hw: f64, hh: f64, factor: f64) -> String {
    let c = hw * factor;
    [
        (-hw + c, -hh),
        (hw - c, -hh),
        (hw, -hh + c),
        (hw, hh - c),
        (hw - c, hh),
        (-hw + c, hh),
        (-hw, hh - c),
        (-hw, -hh + c),
    ]
    .iter()
    .map(|(x, y)| format!("{},{}", fmt(*x), fmt(*y)))
    .collect::<Vec<_>>()
    .join(" ")
}

fn shape_element(
    shape: NodeShape,
    width: f64,
    height: f64,
    fill: &str,
    stroke: &str,
    stroke_width: &str,
    config: &Config,
) -> Element {
    match shape {
        NodeShape::Point => Element::new("circle")
            .attr("r", fmt(width / 2.0))
            .attr("fill", fill)
            .attr("stroke", "none"),
        NodeShape::Rectangle => Element::new("rect")
            .attr("width", fmt(width))
            .attr("height", fmt(height))
            .attr("x", fmt(-width / 2.0))
            .attr("y", fmt(-height / 2.0))
            .attr("fill", fill)
            .attr("stroke", stroke)
            .attr("stroke-width", stroke_width)
            .attr("rx", fmt(config.layout.rectangle_corner_radius)),
        NodeShape::Ellipse => Element::new("ellipse")
            .attr("rx", fmt(width / 2.0))
            .attr("ry", fmt(height / 2.0))
            .attr("fill", fill)
            .attr("stroke", stroke)
            .attr("stroke-width", stroke_width),
        NodeShape::Octagon => Element::new("polygon")
            .attr(
                "points",
                octagon_points(width / 2.0, height / 2.0, config.layout.octagon_factor),
            )
            .attr("fill", fill)
            .attr("stroke", stroke)
            .attr("stroke-width", stroke_width),
    }
}

/// Blurred white outline drawn over a highlighted node.
fn neon_overlay(
    shape: NodeShape,
    width: f64,
    height: f64,
    style: &NodeStyle,
    config: &Config,
) -> Element {
    Element::new("g")
        .attr("class", "neon-effect")
        .attr("filter", format!("url(#{BLUR_FILTER_ID})"))
        .with_child(shape_element(
            shape,
            width,
            height,
            "none",
            "white",
            &style.stroke_width,
            config,
        ))
}

fn label_element(node: &Node, measurer: &dyn TextMeasurer, config: &Config) -> Element {
    let text = &config.text;
    if node.is_cofactor() {
        return Element::new("text")
            .attr("class", "label")
            .attr("text-anchor", "middle")
            .attr("font-size", format!("{}px", fmt(text.font_sizes.cofactor)))
            .attr("dy", format!("{}em", fmt(text.vertical_offset)))
            .with_text(node.label());
    }

    let wrapped = wrap_and_size_text(node.label(), measurer, text, text.font_sizes.standard);
    let mut el = Element::new("text")
        .attr("class", "label")
        .attr("text-anchor", "middle")
        .attr("font-size", format!("{}px", fmt(wrapped.font_size)));
    for (line, dy) in wrapped.lines.iter().zip(&wrapped.dy_em) {
        el.append(
            Element::new("tspan")
                .attr("x", "0")
                .attr("dy", format!("{}em", fmt(*dy)))
                .with_text(line.clone()),
        );
    }
    el
}

/// One node group positioned at the node's center, or `None` when the node has no center.
///
/// Cofactors draw only their label; points draw only their dot.
pub fn render_node(
    node: &Node,
    highlighted: bool,
    measurer: &dyn TextMeasurer,
    style: &NodeStyle,
    config: &Config,
) -> Option<Element> {
    let Some(center) = node.center else {
        tracing::warn!(node = %node.id, "node has no position, not drawn");
        return None;
    };
    let shape = node.shape.unwrap_or_else(|| resolve_shape(node));
    let (width, height) = node.size();

    let mut class = format!("node {}", kind_class(node.kind));
    if node.is_cofactor() {
        class.push_str(" cofactor");
    }
    if let Some(status) = node.status.as_deref().filter(|s| !s.is_empty()) {
        class.push_str(" status-");
        class.push_str(status);
    }

    let mut group = Element::new("g")
        .attr("class", class)
        .attr("data-id", node.id.clone())
        .attr(
            "transform",
            format!("translate({}, {})", fmt(center.x), fmt(center.y)),
        );

    if !node.is_cofactor() {
        let fill = if shape == NodeShape::Point {
            EDGE_COLOR
        } else {
            style.fill.as_str()
        };
        group.append(shape_element(
            shape,
            width,
            height,
            fill,
            &style.stroke,
            &style.stroke_width,
            config,
        ));
    }
    if shape != NodeShape::Point {
        group.append(label_element(node, measurer, config));
    }
    if highlighted && !node.is_cofactor() && shape != NodeShape::Point {
        group.append(neon_overlay(shape, width, height, style, config));
    }
    Some(group)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::DeterministicTextMeasurer;
    use pathviz_core::{EntitySubtype, Position};

    fn placed(id: &str, kind: NodeType, shape: NodeShape) -> Node {
        let mut node = Node::new(id, kind);
        node.shape = Some(shape);
        node.width = Some(140.0);
        node.height = Some(60.0);
        node.center = Some(Position::new(50.0, 20.0));
        node
    }

    fn render(node: &Node, highlighted: bool) -> Option<Element> {
        render_node(
            node,
            highlighted,
            &DeterministicTextMeasurer::default(),
            &NodeStyle::default(),
            &Config::default(),
        )
    }

    #[test]
    fn unplaced_node_is_not_drawn() {
        let mut node = placed("a", NodeType::Entity, NodeShape::Ellipse);
        node.center = None;
        assert!(render(&node, false).is_none());
    }

    #[test]
    fn entity_draws_ellipse_and_label() {
        let mut node = placed("atp", NodeType::Entity, NodeShape::Ellipse);
        node.status = Some("up".to_string());
        let group = render(&node, false).unwrap();

        assert_eq!(group.get_attr("class"), Some("node entity status-up"));
        assert_eq!(group.get_attr("transform"), Some("translate(50, 20)"));
        let ellipse = &group.children[0];
        assert_eq!(ellipse.name, "ellipse");
        assert_eq!(ellipse.get_attr("rx"), Some("70"));
        assert_eq!(ellipse.get_attr("ry"), Some("30"));
        assert_eq!(group.select_all("tspan").len(), 1);
        assert!(group.select_all("g").is_empty());
    }

    #[test]
    fn cofactor_draws_only_compact_label() {
        let mut node = placed("nadh", NodeType::Entity, NodeShape::Rectangle);
        node.entity_subtype = Some(EntitySubtype::Cofactor);
        node.nice_name = "NADH".to_string();
        let group = render(&node, true).unwrap();

        assert_eq!(group.get_attr("class"), Some("node entity cofactor"));
        assert_eq!(group.children.len(), 1);
        let text = &group.children[0];
        assert_eq!(text.name, "text");
        assert_eq!(text.get_attr("font-size"), Some("14px"));
        assert_eq!(text.get_attr("dy"), Some("0.3em"));
        assert_eq!(text.text.as_deref(), Some("NADH"));
    }

    #[test]
    fn highlight_adds_blurred_overlay() {
        let node = placed("p", NodeType::Effect, NodeShape::Octagon);
        let group = render(&node, true).unwrap();
        let overlay = group
            .children
            .iter()
            .find(|c| c.get_attr("class") == Some("neon-effect"))
            .unwrap();
        assert_eq!(overlay.get_attr("filter"), Some("url(#overlay-blur)"));
        assert_eq!(overlay.children[0].name, "polygon");
        assert_eq!(overlay.children[0].get_attr("stroke"), Some("white"));
    }

    #[test]
    fn point_is_a_filled_dot_without_label() {
        let mut node = placed("x", NodeType::Process, NodeShape::Point);
        node.width = Some(5.0);
        node.height = Some(5.0);
        let group = render(&node, true).unwrap();
        assert_eq!(group.children.len(), 1);
        assert_eq!(group.children[0].name, "circle");
        assert_eq!(group.children[0].get_attr("r"), Some("2.5"));
        assert_eq!(group.children[0].get_attr("fill"), Some(EDGE_COLOR));
    }

    #[test]
    fn octagon_corners_are_cut_by_width_factor() {
        assert_eq!(
            octagon_points(10.0, 5.0, 0.3),
            "-7,-5 7,-5 10,-2 10,2 7,5 -7,5 -10,2 -10,-2"
        );
    }
}
