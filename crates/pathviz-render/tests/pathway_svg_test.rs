use futures::executor::block_on;
use futures::future::BoxFuture;
use pathviz_core::config::Config;
use pathviz_core::{Edge, EntitySubtype, GraphData, Node, NodeType, Position};
use pathviz_render::layout::{LayoutEngine, LayoutGraph, layout_graph};
use pathviz_render::shapes::resolve_graph_shapes;
use pathviz_render::svg::defs::setup_svg_defs;
use pathviz_render::svg::edge::render_edges;
use pathviz_render::svg::{Element, SvgRenderOptions, render_graph_scene, render_graph_svg};
use pathviz_render::text::DeterministicTextMeasurer;

/// Puts every top-level child on one row, 200px apart, at y = 100.
struct RowEngine;

impl LayoutEngine for RowEngine {
    fn layout<'a>(
        &'a self,
        mut graph: LayoutGraph,
    ) -> BoxFuture<'a, pathviz_render::Result<LayoutGraph>> {
        Box::pin(async move {
            for (i, child) in graph.children.iter_mut().enumerate() {
                child.x = Some(i as f64 * 200.0);
                child.y = Some(100.0);
            }
            Ok(graph)
        })
    }
}

fn pathway() -> GraphData {
    let mut graph = GraphData {
        name: "glycolysis".to_string(),
        ..Default::default()
    };
    let mut nadh = Node::new("nadh", NodeType::Entity);
    nadh.nice_name = "NADH".to_string();
    nadh.entity_subtype = Some(EntitySubtype::Cofactor);
    graph.nodes.extend([
        Node::new("a", NodeType::Entity),
        Node::new("b", NodeType::Process),
        Node::new("c", NodeType::Effect),
        nadh,
    ]);
    graph.edges.extend([
        Edge::new("a", "b").with_marker("t-arrow"),
        Edge::new("b", "c"),
        Edge::new("b", "nadh"),
        Edge::new("a", "ghost"),
    ]);
    graph
}

fn prepared() -> GraphData {
    let config = Config::default();
    let mut graph = pathway();
    resolve_graph_shapes(&mut graph, &DeterministicTextMeasurer::default(), &config);
    block_on(layout_graph(&mut graph, &RowEngine, &config.layout)).expect("layout ok");
    graph
}

fn edge_path<'e>(scene: &'e Element, source: &str, target: &str) -> &'e Element {
    scene
        .select_all("path")
        .into_iter()
        .find(|p| {
            p.get_attr("data-source") == Some(source) && p.get_attr("data-target") == Some(target)
        })
        .unwrap_or_else(|| panic!("edge {source} -> {target}"))
}

#[test]
fn full_pipeline_renders_layers_in_order() {
    let graph = prepared();
    assert!(graph.all_centers_set());
    assert_eq!(
        graph.node("b").and_then(|n| n.center),
        Some(Position::new(200.0, 100.0))
    );

    let scene = render_graph_scene(
        &graph,
        &DeterministicTextMeasurer::default(),
        &Config::default(),
        &SvgRenderOptions::default(),
    );
    assert_eq!(scene.name, "svg");
    assert_eq!(scene.children[0].name, "defs");
    let content = &scene.children[1];
    assert_eq!(content.get_attr("class"), Some("graph"));
    assert_eq!(content.children[0].get_attr("class"), Some("edges"));
    assert_eq!(content.children[1].get_attr("class"), Some("nodes"));
    assert_eq!(content.children[0].children.len(), 4);
    assert_eq!(content.children[1].children.len(), 4);
}

#[test]
fn tick_edge_is_clipped_and_pulled_back() {
    let graph = prepared();
    let scene = render_graph_scene(
        &graph,
        &DeterministicTextMeasurer::default(),
        &Config::default(),
        &SvgRenderOptions::default(),
    );

    // Ellipse a at (0, 100) exits at x = 70; rectangle b at (200, 100) is entered at x = 130,
    // and the tick pull-back is 10px.
    let path = edge_path(&scene, "a", "b");
    assert_eq!(path.get_attr("d"), Some("M 70,100 L 120,100"));
    assert_eq!(path.get_attr("marker-end"), Some("url(#arrow-process-t-a-b)"));
    let marker = scene
        .select_by_id("arrow-process-t-a-b")
        .expect("tick marker in defs");
    assert_eq!(marker.get_attr("orient"), Some("90"));
}

#[test]
fn plain_edges_use_shared_arrowheads() {
    let graph = prepared();
    let scene = render_graph_scene(
        &graph,
        &DeterministicTextMeasurer::default(),
        &Config::default(),
        &SvgRenderOptions::default(),
    );
    assert_eq!(
        edge_path(&scene, "b", "c").get_attr("marker-end"),
        Some("url(#arrow-effect)")
    );
    assert_eq!(
        edge_path(&scene, "b", "nadh").get_attr("marker-end"),
        Some("url(#arrow-cofactor)")
    );
}

#[test]
fn dangling_edge_gets_empty_path_and_fallback_marker() {
    let graph = prepared();
    let scene = render_graph_scene(
        &graph,
        &DeterministicTextMeasurer::default(),
        &Config::default(),
        &SvgRenderOptions::default(),
    );
    let path = edge_path(&scene, "a", "ghost");
    assert_eq!(path.get_attr("d"), Some(""));
    assert_eq!(path.get_attr("marker-end"), Some("url(#arrow-entity)"));
}

#[test]
fn rerendering_edges_reuses_tick_markers() {
    let graph = prepared();
    let config = Config::default();
    let mut defs = setup_svg_defs(&config);
    let mut layer = Element::new("g");
    render_edges(&graph, &mut layer, &mut defs, &config);
    render_edges(&graph, &mut layer, &mut defs, &config);

    let ticks = defs
        .select_all("marker")
        .into_iter()
        .filter(|m| m.id() == Some("arrow-process-t-a-b"))
        .count();
    assert_eq!(ticks, 1);
    assert_eq!(defs.select_all("marker").len(), 5);
}

#[test]
fn svg_string_is_fitted_and_escaped() {
    let mut graph = prepared();
    if let Some(node) = graph.node_mut("c") {
        node.nice_name = "A & B".to_string();
    }
    let options = SvgRenderOptions {
        diagram_id: Some("pathway-1".to_string()),
        ..Default::default()
    };
    let svg = render_graph_svg(
        &graph,
        &DeterministicTextMeasurer::default(),
        &Config::default(),
        &options,
    );
    assert!(svg.starts_with(r#"<svg xmlns="http://www.w3.org/2000/svg""#));
    assert!(svg.contains(r#"id="pathway-1""#));
    assert!(svg.contains(r#"viewBox="0 0 800 600""#));
    assert!(svg.contains("A &amp; B"));
    assert!(!svg.contains(r#"transform="translate(0, 0) scale(1)""#));
}

#[test]
fn unpositioned_graph_renders_without_geometry() {
    let config = Config::default();
    let mut graph = pathway();
    resolve_graph_shapes(&mut graph, &DeterministicTextMeasurer::default(), &config);
    let scene = render_graph_scene(
        &graph,
        &DeterministicTextMeasurer::default(),
        &config,
        &SvgRenderOptions::default(),
    );
    let content = &scene.children[1];
    assert_eq!(
        content.get_attr("transform"),
        Some("translate(0, 0) scale(1)")
    );
    assert!(content.children[1].children.is_empty());
    assert!(
        content.children[0]
            .children
            .iter()
            .all(|p| p.get_attr("d") == Some(""))
    );
}
