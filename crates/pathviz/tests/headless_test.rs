use futures::executor::block_on;
use futures::future::BoxFuture;
use pathviz::render::{
    HeadlessError, HeadlessRenderer, LayoutEngine, LayoutGraph, RenderError, sanitize_svg_id,
};
use pathviz::{GraphData, Position};

/// Stacks top-level children vertically, 100px apart.
struct ColumnEngine;

impl LayoutEngine for ColumnEngine {
    fn layout<'a>(
        &'a self,
        mut graph: LayoutGraph,
    ) -> BoxFuture<'a, Result<LayoutGraph, RenderError>> {
        Box::pin(async move {
            for (i, child) in graph.children.iter_mut().enumerate() {
                child.x = Some(0.0);
                child.y = Some(i as f64 * 100.0);
            }
            Ok(graph)
        })
    }
}

const PAYLOAD: &str = r#"{
  "name": "tca",
  "nodes": [
    {"id": "citrate", "type": "entity"},
    {"id": "aconitase", "type": "process"},
    {"id": "h2o", "type": "entity", "entity_subtype": "cofactor", "nice_name": "H2O"}
  ],
  "edges": [
    {"source": "citrate", "target": "aconitase", "marker": "t-arrow"},
    {"source": "h2o", "target": "aconitase"}
  ]
}"#;

#[test]
fn prepare_resolves_and_positions_every_node() {
    let renderer = HeadlessRenderer::new().with_layout_engine(ColumnEngine);
    let graph = block_on(renderer.prepare_json(PAYLOAD)).expect("prepare ok");

    assert!(graph.all_centers_set());
    assert!(graph.nodes.iter().all(|n| n.shape.is_some()));
    assert_eq!(
        graph.node("aconitase").and_then(|n| n.center),
        Some(Position::new(0.0, 100.0))
    );
}

#[test]
fn render_svg_produces_a_document() {
    let renderer = HeadlessRenderer::new().with_layout_engine(ColumnEngine);
    let graph = GraphData::from_json_str(PAYLOAD).expect("payload ok");
    let svg = block_on(renderer.render_svg_with_diagram_id(graph, "tca cycle")).expect("svg");

    assert!(svg.contains(r#"id="tca-cycle""#));
    assert!(svg.contains("arrow-process-t-citrate-aconitase"));
    assert!(svg.contains(r#"marker-end="url(#arrow-process)""#));
}

#[test]
fn default_renderer_requires_positions() {
    let renderer = HeadlessRenderer::new();
    let graph = GraphData::from_json_str(PAYLOAD).expect("payload ok");
    let err = block_on(renderer.render_svg(graph)).unwrap_err();
    assert!(matches!(err, HeadlessError::Render(_)), "{err}");
}

#[test]
fn default_renderer_accepts_pre_positioned_graphs() {
    let renderer = HeadlessRenderer::new();
    let mut graph = GraphData::from_json_str(PAYLOAD).expect("payload ok");
    for (i, node) in graph.nodes.iter_mut().enumerate() {
        node.center = Some(Position::new(i as f64 * 200.0, 0.0));
    }
    let svg = block_on(renderer.render_svg(graph)).expect("svg");
    assert!(svg.contains(r#"data-id="citrate""#));
}

#[test]
fn invalid_payload_is_a_payload_error() {
    let renderer = HeadlessRenderer::new();
    let err = block_on(renderer.prepare_json(r#"{"nodes": [{"id": "", "type": "entity"}]}"#))
        .unwrap_err();
    assert!(matches!(err, HeadlessError::Payload(_)), "{err}");
}

#[test]
fn svg_ids_are_sanitized() {
    assert_eq!(sanitize_svg_id("  "), "pathway");
    assert_eq!(sanitize_svg_id("tca cycle"), "tca-cycle");
    assert_eq!(sanitize_svg_id("1st pathway"), "p-1st-pathway");
    assert_eq!(sanitize_svg_id("a//b"), "a-b");
}
