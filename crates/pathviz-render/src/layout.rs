//! Layout adapter.
//!
//! The layered layout itself is an external collaborator. This module translates a
//! [`GraphData`] into the engine's hierarchical JSON graph (ELK schema), hands it to a
//! [`LayoutEngine`], and writes the returned coordinates back as node centers.

use crate::{Error, Result};
use futures::future::BoxFuture;
use indexmap::IndexMap;
use pathviz_core::config::LayoutConfig;
use pathviz_core::{GraphData, Node, Orientation, Position};
use serde::{Deserialize, Serialize};

mod command;

pub use command::CommandLayoutEngine;

pub const ROOT_ID: &str = "root";
pub const GROUP_ID_PREFIX: &str = "group-";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutGraph {
    pub id: String,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub layout_options: IndexMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<LayoutChild>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub edges: Vec<LayoutEdge>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

/// A leaf node or a group container (when `children` is non-empty).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutChild {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub layout_options: IndexMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<LayoutChild>,
}

impl LayoutChild {
    pub fn is_container(&self) -> bool {
        !self.children.is_empty()
    }

    /// Engine-assigned top-left, if the engine set both coordinates.
    fn offset(&self) -> Option<Position> {
        Some(Position::new(self.x?, self.y?))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutEdge {
    pub id: String,
    pub sources: Vec<String>,
    pub targets: Vec<String>,
}

/// Batch layout solver: takes a hierarchical graph description, returns it with `x`/`y` filled in.
///
/// Implementations report any failure as [`Error::LayoutEngine`]; the adapter never writes
/// partial results.
pub trait LayoutEngine {
    fn layout<'a>(&'a self, graph: LayoutGraph) -> BoxFuture<'a, Result<LayoutGraph>>;
}

impl<T: LayoutEngine + ?Sized> LayoutEngine for &T {
    fn layout<'a>(&'a self, graph: LayoutGraph) -> BoxFuture<'a, Result<LayoutGraph>> {
        (**self).layout(graph)
    }
}

/// Engine used when none is configured: every request fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableLayoutEngine;

impl LayoutEngine for UnavailableLayoutEngine {
    fn layout<'a>(&'a self, _graph: LayoutGraph) -> BoxFuture<'a, Result<LayoutGraph>> {
        Box::pin(async {
            Err(Error::LayoutEngine {
                message: "no layout engine configured and the graph has no positions".to_string(),
            })
        })
    }
}

fn padding_option(padding: f64) -> String {
    let p = crate::svg::fmt(padding);
    format!("[top={p},left={p},bottom={p},right={p}]")
}

fn root_layout_options(graph: &GraphData, config: &LayoutConfig) -> IndexMap<String, String> {
    let direction = match graph.rendering_config.orientation {
        Orientation::Right => "RIGHT",
        Orientation::Down => "DOWN",
    };
    let root_padding = graph
        .size_config
        .and_then(|s| s.padding)
        .filter(|p| p.is_finite() && *p >= 0.0)
        .unwrap_or(config.root_padding);

    let mut options = IndexMap::new();
    for (key, value) in [
        ("elk.algorithm", "layered".to_string()),
        ("elk.direction", direction.to_string()),
        ("elk.spacing.nodeNode", crate::svg::fmt(config.node_spacing)),
        ("elk.padding", padding_option(root_padding)),
        ("elk.hierarchyHandling", "INCLUDE_CHILDREN".to_string()),
        (
            "elk.layered.crossingMinimization.strategy",
            "LAYER_SWEEP".to_string(),
        ),
        ("elk.edgeRouting", "POLYLINE".to_string()),
        (
            "elk.layered.layering.strategy",
            "NETWORK_SIMPLEX".to_string(),
        ),
        (
            "elk.layered.nodePlacement.strategy",
            "NETWORK_SIMPLEX".to_string(),
        ),
    ] {
        options.insert(key.to_string(), value);
    }
    options
}

fn node_child(node: &Node) -> LayoutChild {
    let (width, height) = node.size();
    LayoutChild {
        id: node.id.clone(),
        width: Some(width),
        height: Some(height),
        kind: serde_json::to_value(node.kind)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string)),
        label: Some(node.nice_name.clone()),
        ..Default::default()
    }
}

/// Builds the engine request: group containers first (in first-seen order), then ungrouped nodes.
/// Edges with an endpoint outside the node list are left out.
pub fn build_layout_graph(graph: &GraphData, config: &LayoutConfig) -> LayoutGraph {
    let mut children = Vec::new();

    for group in graph.groups() {
        let mut layout_options = IndexMap::new();
        layout_options.insert(
            "elk.padding".to_string(),
            padding_option(config.group_padding),
        );
        children.push(LayoutChild {
            id: format!("{GROUP_ID_PREFIX}{group}"),
            layout_options,
            children: graph
                .nodes
                .iter()
                .filter(|n| n.group.as_deref() == Some(group))
                .map(node_child)
                .collect(),
            ..Default::default()
        });
    }
    children.extend(
        graph
            .nodes
            .iter()
            .filter(|n| n.group.is_none())
            .map(node_child),
    );

    let index = graph.node_index();
    let edges = graph
        .edges
        .iter()
        .filter(|e| {
            let known = index.contains_key(e.source.as_str())
                && index.contains_key(e.target.as_str());
            if !known {
                tracing::warn!(
                    source = %e.source,
                    target = %e.target,
                    "edge references an unknown node, leaving it out of the layout request"
                );
            }
            known
        })
        .map(|e| LayoutEdge {
            id: format!("{}-{}", e.source, e.target),
            sources: vec![e.source.clone()],
            targets: vec![e.target.clone()],
        })
        .collect();

    LayoutGraph {
        id: ROOT_ID.to_string(),
        layout_options: root_layout_options(graph, config),
        children,
        edges,
        ..Default::default()
    }
}

/// Writes engine coordinates back as centers. Grouped nodes compose container and node offsets.
///
/// All-or-nothing: if any node is missing from the result, or a coordinate is not finite, no
/// center is written.
pub fn apply_layout(graph: &mut GraphData, laid_out: &LayoutGraph) -> Result<()> {
    let index = graph.node_index();
    let mut centers: Vec<Option<Position>> = vec![None; graph.nodes.len()];

    let mut place = |id: &str, pos: Position| -> Result<()> {
        let Some(&idx) = index.get(id) else {
            tracing::debug!(node = id, "layout result contains unknown node id");
            return Ok(());
        };
        if !pos.is_finite() {
            return Err(Error::LayoutEngine {
                message: format!("non-finite position for node `{id}`"),
            });
        }
        centers[idx] = Some(pos);
        Ok(())
    };

    for child in &laid_out.children {
        if child.is_container() {
            let Some(base) = child.offset() else {
                continue;
            };
            for inner in &child.children {
                if let Some(off) = inner.offset() {
                    place(&inner.id, Position::new(base.x + off.x, base.y + off.y))?;
                }
            }
        } else if let Some(pos) = child.offset() {
            place(&child.id, pos)?;
        }
    }

    let mut resolved = Vec::with_capacity(centers.len());
    for (node, center) in graph.nodes.iter().zip(centers) {
        let Some(center) = center else {
            return Err(Error::LayoutEngine {
                message: format!("layout engine returned no position for node `{}`", node.id),
            });
        };
        resolved.push(center);
    }
    for (node, center) in graph.nodes.iter_mut().zip(resolved) {
        node.center = Some(center);
    }
    Ok(())
}

/// Lays out `graph` in place.
///
/// If any node already has a center the whole graph is treated as pre-positioned and returned
/// untouched; positions are never mixed between engine output and payload.
pub async fn layout_graph<'g, E>(
    graph: &'g mut GraphData,
    engine: &E,
    config: &LayoutConfig,
) -> Result<&'g mut GraphData>
where
    E: LayoutEngine + ?Sized,
{
    if graph.has_any_center() {
        tracing::debug!(graph = %graph.name, "graph is pre-positioned, skipping layout");
        return Ok(graph);
    }

    let request = build_layout_graph(graph, config);
    tracing::info!(
        graph = %graph.name,
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        "requesting layout"
    );
    let response = engine.layout(request).await?;
    apply_layout(graph, &response)?;
    Ok(graph)
}
