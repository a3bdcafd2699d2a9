//! Pathway graph payload model.
//!
//! A [`GraphData`] owns its nodes and edges. Edges refer to nodes by id only; a dangling id is
//! tolerated here and handled by the renderer.

use crate::{Error, Result};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

/// A point in the global drawing space (pixels, origin top-left, y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Entity,
    Process,
    Effect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntitySubtype {
    Main,
    Cofactor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeShape {
    Ellipse,
    Rectangle,
    Octagon,
    Point,
}

impl NodeShape {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeShape::Ellipse => "ellipse",
            NodeShape::Rectangle => "rectangle",
            NodeShape::Octagon => "octagon",
            NodeShape::Point => "point",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub nice_name: String,
    #[serde(rename = "type")]
    pub kind: NodeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_subtype: Option<EntitySubtype>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<NodeShape>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center: Option<Position>,
}

impl Node {
    pub fn new(id: impl Into<String>, kind: NodeType) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            nice_name: id.clone(),
            id,
            kind,
            entity_subtype: None,
            shape: None,
            width: None,
            height: None,
            group: None,
            status: None,
            center: None,
        }
    }

    pub fn is_cofactor(&self) -> bool {
        self.kind == NodeType::Entity && self.entity_subtype == Some(EntitySubtype::Cofactor)
    }

    /// Resolved pixel extents; zero when shape resolution has not run yet.
    pub fn size(&self) -> (f64, f64) {
        (self.width.unwrap_or(0.0), self.height.unwrap_or(0.0))
    }

    /// Label text shown on the node (`nice_name`, falling back to `name`, then `id`).
    pub fn label(&self) -> &str {
        if !self.nice_name.is_empty() {
            &self.nice_name
        } else if !self.name.is_empty() {
            &self.name
        } else {
            &self.id
        }
    }
}

/// Edge terminus glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MarkerStyle {
    #[default]
    Arrow,
    /// Perpendicular tick (`t-arrow`), rotated per edge to sit flush on the target boundary.
    Tick,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker: Option<String>,
}

impl Edge {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            marker: None,
        }
    }

    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = Some(marker.into());
        self
    }

    pub fn marker_style(&self) -> MarkerStyle {
        match self.marker.as_deref() {
            Some("t-arrow") => MarkerStyle::Tick,
            _ => MarkerStyle::Arrow,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SizeConfig {
    #[serde(
        rename = "nodeWidth",
        alias = "node_width",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub node_width: Option<f64>,
    #[serde(
        rename = "nodeHeight",
        alias = "node_height",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub node_height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<f64>,
}

/// Layout flow direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "Option<String>")]
pub enum Orientation {
    #[default]
    Down,
    Right,
}

impl From<String> for Orientation {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "right" => Orientation::Right,
            "down" => Orientation::Down,
            other => {
                tracing::warn!(orientation = other, "unknown orientation, using `down`");
                Orientation::Down
            }
        }
    }
}

impl From<Option<String>> for Orientation {
    fn from(raw: Option<String>) -> Self {
        raw.map(Orientation::from).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RenderingConfig {
    #[serde(default)]
    pub orientation: Orientation,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GraphData {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub nice_name: String,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_config: Option<SizeConfig>,
    #[serde(default)]
    pub rendering_config: RenderingConfig,
}

impl GraphData {
    /// Parses a graph payload, then normalizes and validates it.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let mut graph: GraphData = serde_json::from_str(text)?;
        graph.normalize();
        graph.validate()?;
        Ok(graph)
    }

    pub fn from_json_value(value: serde_json::Value) -> Result<Self> {
        let mut graph: GraphData = serde_json::from_value(value)?;
        graph.normalize();
        graph.validate()?;
        Ok(graph)
    }

    /// Enforces the field invariants the payload may violate:
    /// - `entity_subtype` exists only on entities;
    /// - explicit sizes are positive and finite (otherwise treated as unset);
    /// - non-finite centers are dropped.
    pub fn normalize(&mut self) {
        for node in &mut self.nodes {
            if node.kind != NodeType::Entity && node.entity_subtype.take().is_some() {
                tracing::warn!(node = %node.id, "dropping entity_subtype on non-entity node");
            }
            for extent in [&mut node.width, &mut node.height] {
                if extent.is_some_and(|v| !(v.is_finite() && v > 0.0)) {
                    *extent = None;
                }
            }
            if node.center.is_some_and(|c| !c.is_finite()) {
                tracing::warn!(node = %node.id, "dropping non-finite center");
                node.center = None;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        let mut seen = FxHashSet::default();
        for node in &self.nodes {
            if node.id.is_empty() {
                return Err(Error::InvalidPayload {
                    message: "node with empty id".to_string(),
                });
            }
            if !seen.insert(node.id.as_str()) {
                return Err(Error::InvalidPayload {
                    message: format!("duplicate node id `{}`", node.id),
                });
            }
        }
        Ok(())
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    /// Id to position in `nodes`.
    pub fn node_index(&self) -> FxHashMap<&str, usize> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(idx, n)| (n.id.as_str(), idx))
            .collect()
    }

    pub fn has_any_center(&self) -> bool {
        self.nodes.iter().any(|n| n.center.is_some())
    }

    pub fn all_centers_set(&self) -> bool {
        self.nodes.iter().all(|n| n.center.is_some())
    }

    /// Distinct group keys in first-seen order.
    pub fn groups(&self) -> Vec<&str> {
        let mut seen = FxHashSet::default();
        self.nodes
            .iter()
            .filter_map(|n| n.group.as_deref())
            .filter(|g| seen.insert(*g))
            .collect()
    }
}
