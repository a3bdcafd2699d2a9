use assert_cmd::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command;

const UNPOSITIONED: &str = r#"{
  "name": "glycolysis",
  "nodes": [
    {"id": "glc", "nice_name": "Glucose", "type": "entity"},
    {"id": "hk", "nice_name": "Hexokinase", "type": "process", "group": "upper"},
    {"id": "atp", "nice_name": "ATP", "type": "entity", "entity_subtype": "cofactor"}
  ],
  "edges": [
    {"source": "glc", "target": "hk", "marker": "t-arrow"},
    {"source": "atp", "target": "hk"}
  ]
}"#;

const POSITIONED: &str = r#"{
  "name": "glycolysis",
  "nodes": [
    {"id": "glc", "nice_name": "Glucose", "type": "entity", "center": {"x": 0, "y": 0}},
    {"id": "hk", "nice_name": "Hexokinase", "type": "process", "center": {"x": 0, "y": 200}}
  ],
  "edges": [{"source": "glc", "target": "hk"}]
}"#;

fn write_input(dir: &Path, name: &str, text: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, text).expect("write input");
    path.to_string_lossy().to_string()
}

fn cli() -> Command {
    Command::new(assert_cmd::cargo_bin!("pathviz-cli"))
}

#[test]
fn resolve_prints_shapes_and_sizes() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let input = write_input(tmp.path(), "graph.json", UNPOSITIONED);

    let out = cli()
        .args(["resolve", input.as_str()])
        .output()
        .expect("run cli");
    assert!(out.status.success());

    let value: serde_json::Value = serde_json::from_slice(&out.stdout).expect("json output");
    let nodes = value["nodes"].as_array().expect("nodes");
    assert_eq!(nodes[0]["shape"], "ellipse");
    assert_eq!(nodes[0]["width"], 140.0);
    assert_eq!(nodes[1]["shape"], "rectangle");
    assert_eq!(nodes[2]["shape"], "rectangle");
    assert_eq!(nodes[2]["height"], 20.0);
}

#[test]
fn layout_input_nests_groups() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let input = write_input(tmp.path(), "graph.json", UNPOSITIONED);

    let out = cli()
        .args(["layout-input", "--pretty", input.as_str()])
        .output()
        .expect("run cli");
    assert!(out.status.success());

    let value: serde_json::Value = serde_json::from_slice(&out.stdout).expect("json output");
    assert_eq!(value["id"], "root");
    assert_eq!(value["children"][0]["id"], "group-upper");
    assert_eq!(value["children"][0]["children"][0]["id"], "hk");
    assert_eq!(value["edges"][0]["id"], "glc-hk");
}

#[test]
fn render_writes_svg_file() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let input = write_input(tmp.path(), "graph.json", POSITIONED);
    let out = tmp.path().join("graph.svg");

    cli()
        .args([
            "render",
            "--highlight",
            "glc",
            "--viewport-width",
            "400",
            "--out",
            out.to_string_lossy().as_ref(),
            input.as_str(),
        ])
        .assert()
        .success();

    let svg = fs::read_to_string(&out).expect("read svg");
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains(r#"width="400""#));
    assert!(svg.contains("neon-effect"));
    assert!(svg.contains(r#"marker-end="url(#arrow-process)""#));
}

#[test]
fn render_without_positions_or_engine_fails() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let input = write_input(tmp.path(), "graph.json", UNPOSITIONED);

    cli()
        .args(["render", input.as_str()])
        .assert()
        .failure()
        .code(3);
}

#[test]
fn bad_arguments_print_usage() {
    cli().args(["render", "--viewport-width", "wide"]).assert().code(2);
    cli().args(["--layout-arg", "x"]).assert().code(2);
}

#[test]
fn invalid_payload_fails() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let input = write_input(
        tmp.path(),
        "graph.json",
        r#"{"nodes": [{"id": "a", "type": "entity"}, {"id": "a", "type": "process"}]}"#,
    );
    cli().args(["resolve", input.as_str()]).assert().code(1);
}

#[cfg(unix)]
#[test]
fn layout_cmd_positions_nodes() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let input = write_input(tmp.path(), "graph.json", UNPOSITIONED);
    let response = write_input(
        tmp.path(),
        "response.json",
        r#"{
  "id": "root",
  "children": [
    {"id": "group-upper", "x": 100, "y": 50, "children": [{"id": "hk", "x": 10, "y": 20}]},
    {"id": "glc", "x": 0, "y": 0},
    {"id": "atp", "x": 300, "y": 0}
  ]
}"#,
    );
    let script = format!("cat > /dev/null; cat '{response}'");

    let out = cli()
        .args([
            "layout",
            "--layout-cmd",
            "sh",
            "--layout-arg",
            "-c",
            "--layout-arg",
            script.as_str(),
            input.as_str(),
        ])
        .output()
        .expect("run cli");
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let value: serde_json::Value = serde_json::from_slice(&out.stdout).expect("json output");
    assert_eq!(value["nodes"][1]["center"]["x"], 110.0);
    assert_eq!(value["nodes"][1]["center"]["y"], 70.0);
    assert_eq!(value["nodes"][2]["center"]["x"], 300.0);
}

#[cfg(unix)]
#[test]
fn layout_cmd_echoing_the_request_is_rejected() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let input = write_input(tmp.path(), "graph.json", UNPOSITIONED);

    cli()
        .args(["layout", "--layout-cmd", "cat", input.as_str()])
        .assert()
        .failure()
        .code(1);
}
