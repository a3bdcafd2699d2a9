#![forbid(unsafe_code)]

//! Geometry and rendering for pathway graphs.
//!
//! Pipeline, in order:
//! 1. [`shapes::resolve_graph_shapes`] assigns every node a shape and a pixel size;
//! 2. [`layout::layout_graph`] asks an external [`layout::LayoutEngine`] for positions and writes
//!    node centers back;
//! 3. [`intersect`] computes where each edge crosses its endpoint outlines;
//! 4. [`svg::render_graph_svg`] paints nodes, edges and markers.

pub mod intersect;
pub mod layout;
pub mod shapes;
pub mod svg;
pub mod text;
pub mod viewport;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A node lacks a center where edge geometry needs one. Absorbed by the renderer.
    #[error("node `{node_id}` has no resolved position")]
    MissingGeometry { node_id: String },
    #[error("layout engine failed: {message}")]
    LayoutEngine { message: String },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
