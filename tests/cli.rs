use std::fs;

use clap::Parser;
use json_keypaths::cli::CommandLineInterface;

fn run(args: &[&str]) -> anyhow::Result<bool> {
    let cli = CommandLineInterface::try_parse_from(std::iter::once("json-keypaths").chain(args.iter().copied()))?;
    cli.run()
}

fn write_samples(dir: &std::path::Path) {
    fs::write(dir.join("a.json"), r##"{"rgb": [1, 2, 3], "hex": "#fff", "tags": ["x"]}"##).unwrap();
    fs::write(dir.join("b.json"), r##"{"rgb": [4, 5, 6], "hex": "#000", "tags": []}"##).unwrap();
}

#[test]
fn paths_from_samples() {
    let dir = tempfile::tempdir().unwrap();
    write_samples(dir.path());
    let pattern = dir.path().join("*.json");
    let out = dir.path().join("out/paths.txt");

    let ok = run(&[
        "paths",
        "--input", pattern.to_str().unwrap(),
        "--sort",
        "--out", out.to_str().unwrap(),
    ])
    .unwrap();
    assert!(ok);
    assert_eq!(
        fs::read_to_string(&out).unwrap(),
        "hex\nrgb\nrgb[0]\nrgb[1]\nrgb[2]\ntags\ntags[*]\n",
    );
}

#[test]
fn shape_round_trips_through_schema() {
    let dir = tempfile::tempdir().unwrap();
    write_samples(dir.path());
    let pattern = dir.path().join("*.json");
    let shape_out = dir.path().join("shape.json");
    let from_samples = dir.path().join("from_samples.json");
    let from_schema = dir.path().join("from_schema.json");

    assert!(run(&["shape", "-i", pattern.to_str().unwrap(), "-o", shape_out.to_str().unwrap()]).unwrap());
    assert!(run(&["paths", "-i", pattern.to_str().unwrap(), "--format", "json", "-o", from_samples.to_str().unwrap()]).unwrap());
    assert!(run(&["paths", "--schema", shape_out.to_str().unwrap(), "--format", "json", "-o", from_schema.to_str().unwrap()]).unwrap());

    let a: serde_json::Value = serde_json::from_str(&fs::read_to_string(&from_samples).unwrap()).unwrap();
    let b: serde_json::Value = serde_json::from_str(&fs::read_to_string(&from_schema).unwrap()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn matching_filters_output() {
    let dir = tempfile::tempdir().unwrap();
    write_samples(dir.path());
    let pattern = dir.path().join("*.json");
    let out = dir.path().join("rgb.txt");

    assert!(run(&["paths", "-i", pattern.to_str().unwrap(), "--matching", r"^rgb\[", "-o", out.to_str().unwrap()]).unwrap());
    assert_eq!(fs::read_to_string(&out).unwrap(), "rgb[0]\nrgb[1]\nrgb[2]\n");
}

#[test]
fn check_reports_rejections() {
    let dir = tempfile::tempdir().unwrap();
    write_samples(dir.path());
    let pattern = dir.path().join("*.json");
    let input = pattern.to_str().unwrap();

    assert!(run(&["check", "-i", input, "rgb[2]", "tags[7]"]).unwrap());
    assert!(!run(&["check", "-i", input, "rgb[3]"]).unwrap());
    assert!(!run(&["check", "-i", input, "rgb.[0]"]).unwrap());
}

#[test]
fn missing_inputs_are_errors() {
    let dir = tempfile::tempdir().unwrap();
    let pattern = dir.path().join("*.json");
    assert!(run(&["paths", "-i", pattern.to_str().unwrap()]).is_err());
    assert!(run(&["shape"]).is_err());
    assert!(run(&["paths", "--schema", "x.json", "-i", "y.json"]).is_err());
}
