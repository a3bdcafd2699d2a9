#![forbid(unsafe_code)]

//! `pathviz` is a headless renderer for biological pathway graphs.
//!
//! A graph payload goes through shape resolution, an external layout pass and shape-aware edge
//! routing, and comes out as a standalone SVG document.
//!
//! # Features
//!
//! - `render`: enable shape resolution, layout and SVG rendering (`pathviz::render`)

pub use pathviz_core::*;

#[cfg(feature = "render")]
pub mod render {
    use crate::{Config, GraphData};
    use std::sync::Arc;

    pub use pathviz_render::layout::{
        CommandLayoutEngine, LayoutEngine, LayoutGraph, UnavailableLayoutEngine,
    };
    pub use pathviz_render::svg::{NodeStyle, SvgRenderOptions};
    pub use pathviz_render::text::{DeterministicTextMeasurer, TextMeasurer};
    pub use pathviz_render::viewport::Viewport;
    pub use pathviz_render::Error as RenderError;

    #[derive(Debug, thiserror::Error)]
    pub enum HeadlessError {
        #[error(transparent)]
        Payload(#[from] pathviz_core::Error),
        #[error(transparent)]
        Render(#[from] pathviz_render::Error),
    }

    pub type Result<T> = std::result::Result<T, HeadlessError>;

    /// Converts an arbitrary string into a conservative SVG `id` token.
    ///
    /// Tick marker ids are scoped by node ids, not by the document, so embedding several graphs
    /// in one page should give each root a distinct id.
    pub fn sanitize_svg_id(raw: &str) -> String {
        let raw = raw.trim();
        if raw.is_empty() {
            return "pathway".to_string();
        }

        let mut out = String::with_capacity(raw.len() + 2);
        for ch in raw.chars() {
            let ok = ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' || ch == ':' || ch == '.';
            out.push(if ok { ch } else { '-' });
        }
        if !out.chars().next().is_some_and(|c| c.is_ascii_alphabetic()) {
            out.insert_str(0, "p-");
        }
        while out.contains("--") {
            out = out.replace("--", "-");
        }
        let out = out.trim_matches('-');
        if out.is_empty() || out == "p" {
            return "pathway".to_string();
        }
        out.to_string()
    }

    /// Bundles the rendering constants, text measurer, layout engine and SVG options.
    ///
    /// The default instance has no layout engine: it renders pre-positioned graphs and fails on
    /// graphs that still need a layout.
    #[derive(Clone)]
    pub struct HeadlessRenderer {
        pub config: Config,
        pub measurer: Arc<dyn TextMeasurer + Send + Sync>,
        pub engine: Arc<dyn LayoutEngine + Send + Sync>,
        pub svg: SvgRenderOptions,
    }

    impl Default for HeadlessRenderer {
        fn default() -> Self {
            Self {
                config: Config::default(),
                measurer: Arc::new(DeterministicTextMeasurer::default()),
                engine: Arc::new(UnavailableLayoutEngine),
                svg: SvgRenderOptions::default(),
            }
        }
    }

    impl HeadlessRenderer {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_config(mut self, config: Config) -> Self {
            self.config = config;
            self
        }

        pub fn with_layout_engine(
            mut self,
            engine: impl LayoutEngine + Send + Sync + 'static,
        ) -> Self {
            self.engine = Arc::new(engine);
            self
        }

        pub fn with_text_measurer(
            mut self,
            measurer: impl TextMeasurer + Send + Sync + 'static,
        ) -> Self {
            self.measurer = Arc::new(measurer);
            self
        }

        /// Resolves shapes and sizes only.
        pub fn resolve(&self, mut graph: GraphData) -> GraphData {
            pathviz_render::shapes::resolve_graph_shapes(
                &mut graph,
                self.measurer.as_ref(),
                &self.config,
            );
            graph
        }

        /// The request that [`Self::prepare`] would send to the layout engine.
        pub fn layout_request(&self, graph: GraphData) -> LayoutGraph {
            let graph = self.resolve(graph);
            pathviz_render::layout::build_layout_graph(&graph, &self.config.layout)
        }

        /// Resolves shapes, then lays out the graph unless it is already positioned.
        pub async fn prepare(&self, graph: GraphData) -> Result<GraphData> {
            let mut graph = self.resolve(graph);
            pathviz_render::layout::layout_graph(
                &mut graph,
                self.engine.as_ref(),
                &self.config.layout,
            )
            .await?;
            Ok(graph)
        }

        pub async fn prepare_json(&self, payload: &str) -> Result<GraphData> {
            self.prepare(GraphData::from_json_str(payload)?).await
        }

        /// Renders a graph that [`Self::prepare`] already handled.
        pub fn render_prepared(&self, graph: &GraphData) -> String {
            pathviz_render::svg::render_graph_svg(
                graph,
                self.measurer.as_ref(),
                &self.config,
                &self.svg,
            )
        }

        pub async fn render_svg(&self, graph: GraphData) -> Result<String> {
            let graph = self.prepare(graph).await?;
            Ok(self.render_prepared(&graph))
        }

        pub async fn render_svg_with_diagram_id(
            &self,
            graph: GraphData,
            diagram_id: &str,
        ) -> Result<String> {
            let graph = self.prepare(graph).await?;
            let mut svg = self.svg.clone();
            svg.diagram_id = Some(sanitize_svg_id(diagram_id));
            Ok(pathviz_render::svg::render_graph_svg(
                &graph,
                self.measurer.as_ref(),
                &self.config,
                &svg,
            ))
        }
    }
}
