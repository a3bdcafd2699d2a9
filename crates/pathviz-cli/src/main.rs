use futures::executor::block_on;
use pathviz::render::{
    CommandLayoutEngine, DeterministicTextMeasurer, HeadlessRenderer, SvgRenderOptions,
    TextMeasurer, Viewport, sanitize_svg_id,
};
use pathviz::{Config, GraphData};
use serde::Serialize;
use std::io::{Read, Write};
use std::sync::Arc;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Payload(pathviz::Error),
    Render(pathviz_render::Error),
    Json(serde_json::Error),
    Unpositioned,
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Payload(err) => write!(f, "{err}"),
            CliError::Render(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::Unpositioned => write!(
                f,
                "graph has no node positions; pass --layout-cmd <program> to run a layout engine"
            ),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<pathviz::Error> for CliError {
    fn from(value: pathviz::Error) -> Self {
        Self::Payload(value)
    }
}

impl From<pathviz_render::Error> for CliError {
    fn from(value: pathviz_render::Error) -> Self {
        Self::Render(value)
    }
}

impl From<pathviz::render::HeadlessError> for CliError {
    fn from(value: pathviz::render::HeadlessError) -> Self {
        match value {
            pathviz::render::HeadlessError::Payload(err) => Self::Payload(err),
            pathviz::render::HeadlessError::Render(err) => Self::Render(err),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Resolve,
    LayoutInput,
    Layout,
    Render,
}

#[derive(Debug, Clone, Copy, Default)]
enum TextMeasurerKind {
    #[default]
    Deterministic,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    pretty: bool,
    config: Option<String>,
    layout_cmd: Option<String>,
    layout_args: Vec<String>,
    text_measurer: TextMeasurerKind,
    viewport_width: f64,
    viewport_height: f64,
    highlight: Vec<String>,
    diagram_id: Option<String>,
    out: Option<String>,
}

fn usage() -> &'static str {
    "pathviz-cli\n\
\n\
USAGE:\n\
  pathviz-cli [resolve] [--pretty] [--config <json>] [<path>|-]\n\
  pathviz-cli layout-input [--pretty] [--config <json>] [<path>|-]\n\
  pathviz-cli layout [--pretty] [--config <json>] [--layout-cmd <program> [--layout-arg <arg>]...] [<path>|-]\n\
  pathviz-cli render [--config <json>] [--layout-cmd <program> [--layout-arg <arg>]...] [--text-measurer deterministic] [--viewport-width <w>] [--viewport-height <h>] [--highlight <node-id>]... [--id <diagram-id>] [--out <path>|-] [<path>|-]\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', the graph JSON is read from stdin.\n\
  - resolve prints the graph with shapes and sizes filled in.\n\
  - layout-input prints the request a layout engine would receive.\n\
  - --layout-cmd runs <program>, writes the request to its stdin and reads the laid-out graph from its stdout.\n\
  - Without --layout-cmd, layout and render need a graph that already has node positions.\n\
  - render prints SVG to stdout by default; use --out to write a file.\n\
"
}

fn next_value<'a>(it: &mut impl Iterator<Item = &'a String>) -> Result<&'a String, CliError> {
    it.next().ok_or(CliError::Usage(usage()))
}

fn parse_dimension(raw: &str) -> Result<f64, CliError> {
    let v = raw.parse::<f64>().map_err(|_| CliError::Usage(usage()))?;
    if !(v.is_finite() && v > 0.0) {
        return Err(CliError::Usage(usage()));
    }
    Ok(v)
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args {
        viewport_width: 800.0,
        viewport_height: 600.0,
        ..Default::default()
    };

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "resolve" => args.command = Command::Resolve,
            "layout-input" => args.command = Command::LayoutInput,
            "layout" => args.command = Command::Layout,
            "render" => args.command = Command::Render,
            "--pretty" => args.pretty = true,
            "--config" => args.config = Some(next_value(&mut it)?.clone()),
            "--layout-cmd" => args.layout_cmd = Some(next_value(&mut it)?.clone()),
            "--layout-arg" => args.layout_args.push(next_value(&mut it)?.clone()),
            "--text-measurer" => {
                args.text_measurer = match next_value(&mut it)?.as_str() {
                    "deterministic" => TextMeasurerKind::Deterministic,
                    _ => return Err(CliError::Usage(usage())),
                };
            }
            "--viewport-width" => args.viewport_width = parse_dimension(next_value(&mut it)?)?,
            "--viewport-height" => args.viewport_height = parse_dimension(next_value(&mut it)?)?,
            "--highlight" => args.highlight.push(next_value(&mut it)?.clone()),
            "--id" => args.diagram_id = Some(next_value(&mut it)?.clone()),
            "--out" => args.out = Some(next_value(&mut it)?.clone()),
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest.clone());
                }
                if it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
            "-" => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some("-".to_string());
            }
            other if other.starts_with('-') => return Err(CliError::Usage(usage())),
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    if args.layout_cmd.is_none() && !args.layout_args.is_empty() {
        return Err(CliError::Usage(usage()));
    }
    Ok(args)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn write_text(text: &str, out: Option<&str>) -> Result<(), CliError> {
    match out {
        None | Some("-") => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()?;
            Ok(())
        }
        Some(path) => {
            std::fs::write(path, text)?;
            Ok(())
        }
    }
}

fn write_json(value: &impl Serialize, pretty: bool, out: Option<&str>) -> Result<(), CliError> {
    let mut text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    text.push('\n');
    write_text(&text, out)
}

fn build_text_measurer(kind: TextMeasurerKind) -> Arc<dyn TextMeasurer + Send + Sync> {
    match kind {
        TextMeasurerKind::Deterministic => Arc::new(DeterministicTextMeasurer::default()),
    }
}

fn load_config(path: Option<&str>) -> Result<Config, CliError> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let text = std::fs::read_to_string(path)?;
    let config = Config::from_json_str(&text)?;
    log::debug!("loaded rendering config from {path}");
    Ok(config)
}

fn build_renderer(args: &Args) -> Result<HeadlessRenderer, CliError> {
    let mut renderer = HeadlessRenderer {
        config: load_config(args.config.as_deref())?,
        measurer: build_text_measurer(args.text_measurer),
        svg: SvgRenderOptions {
            diagram_id: args.diagram_id.as_deref().map(sanitize_svg_id),
            viewport: Viewport {
                width: args.viewport_width,
                height: args.viewport_height,
            },
            highlighted: args.highlight.iter().cloned().collect(),
            ..Default::default()
        },
        ..Default::default()
    };
    if let Some(program) = args.layout_cmd.as_deref() {
        let engine = args
            .layout_args
            .iter()
            .fold(CommandLayoutEngine::new(program), |engine, arg| {
                engine.arg(arg.clone())
            });
        log::debug!("using layout command {engine:?}");
        renderer = renderer.with_layout_engine(engine);
    }
    Ok(renderer)
}

fn prepare(
    renderer: &HeadlessRenderer,
    args: &Args,
    graph: GraphData,
) -> Result<GraphData, CliError> {
    if args.layout_cmd.is_none() && !graph.has_any_center() {
        return Err(CliError::Unpositioned);
    }
    Ok(block_on(renderer.prepare(graph))?)
}

fn run(args: Args) -> Result<(), CliError> {
    let text = read_input(args.input.as_deref())?;
    let graph = GraphData::from_json_str(&text)?;
    log::debug!(
        "loaded graph `{}` with {} nodes and {} edges",
        graph.name,
        graph.nodes.len(),
        graph.edges.len()
    );
    let renderer = build_renderer(&args)?;

    match args.command {
        Command::Resolve => {
            let graph = renderer.resolve(graph);
            write_json(&graph, args.pretty, args.out.as_deref())
        }
        Command::LayoutInput => {
            let request = renderer.layout_request(graph);
            write_json(&request, args.pretty, args.out.as_deref())
        }
        Command::Layout => {
            let graph = prepare(&renderer, &args, graph)?;
            write_json(&graph, args.pretty, args.out.as_deref())
        }
        Command::Render => {
            let graph = prepare(&renderer, &args, graph)?;
            let svg = renderer.render_prepared(&graph);
            write_text(&svg, args.out.as_deref())
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    match run(args) {
        Ok(()) => {}
        Err(CliError::Unpositioned) => {
            eprintln!("{}", CliError::Unpositioned);
            std::process::exit(3);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
