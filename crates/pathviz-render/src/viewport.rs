//! Fitting a positioned graph into a viewport.

use pathviz_core::GraphData;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn from_points(points: impl IntoIterator<Item = (f64, f64)>) -> Option<Self> {
        let mut it = points.into_iter();
        let (x0, y0) = it.next()?;
        let mut b = Self {
            min_x: x0,
            min_y: y0,
            max_x: x0,
            max_y: y0,
        };
        for (x, y) in it {
            b.min_x = b.min_x.min(x);
            b.min_y = b.min_y.min(y);
            b.max_x = b.max_x.max(x);
            b.max_y = b.max_y.max(y);
        }
        Some(b)
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// Union of the extents of every positioned node (`center ± size / 2`).
pub fn graph_bounds(graph: &GraphData) -> Option<Bounds> {
    Bounds::from_points(graph.nodes.iter().filter_map(|n| n.center.map(|c| (n, c))).flat_map(
        |(n, c)| {
            let (w, h) = n.size();
            [
                (c.x - w / 2.0, c.y - h / 2.0),
                (c.x + w / 2.0, c.y + h / 2.0),
            ]
        },
    ))
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GraphTransform {
    pub scale: f64,
    pub tx: f64,
    pub ty: f64,
}

impl GraphTransform {
    pub const IDENTITY: Self = Self {
        scale: 1.0,
        tx: 0.0,
        ty: 0.0,
    };
}

/// Scale and translation that center `bounds` in `viewport`, using `scale_padding` of its extent.
///
/// Degenerate bounds or viewports give the identity transform.
pub fn calculate_graph_transform(
    bounds: &Bounds,
    viewport: Viewport,
    scale_padding: f64,
) -> GraphTransform {
    let (bw, bh) = (bounds.width(), bounds.height());
    if !(bw > 0.0 && bh > 0.0 && viewport.width > 0.0 && viewport.height > 0.0) {
        return GraphTransform::IDENTITY;
    }
    let scale = (viewport.width / bw).min(viewport.height / bh) * scale_padding;
    if !scale.is_finite() {
        return GraphTransform::IDENTITY;
    }
    let tx = (viewport.width - bw * scale) / 2.0 - bounds.min_x * scale;
    let ty = (viewport.height - bh * scale) / 2.0 - bounds.min_y * scale;
    GraphTransform { scale, tx, ty }
}
