use std::{
    fs,
    path::{Path, PathBuf},
};

use serde_json::Value;
use tempfile::tempdir;

use stategraph_cli::{Args, run};

/// Collects all .json files from a directory
fn collect_json_files(dir: PathBuf) -> Vec<PathBuf> {
    let mut files = if let Ok(entries) = fs::read_dir(&dir) {
        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("json")
            })
            .collect()
    } else {
        Vec::new()
    };

    // Sort for consistent test output
    files.sort();
    files
}

/// Demos are at workspace root, relative to workspace not the crate
fn demos_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("demos")
}

fn args(input: &Path, output: &Path, strict: bool) -> Args {
    Args {
        input: input.to_string_lossy().to_string(),
        output: output.to_string_lossy().to_string(),
        config: None,
        strict,
        log_level: "off".to_string(),
    }
}

fn read_graph(path: &Path) -> Value {
    let written = fs::read_to_string(path).expect("Output file should exist");
    serde_json::from_str(&written).expect("Output should be valid JSON")
}

#[test]
fn e2e_smoke_test_valid_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let valid_demos = collect_json_files(demos_path());

    assert!(!valid_demos.is_empty(), "No valid demos found in demos/");

    let mut failed_demos = Vec::new();

    for demo_path in &valid_demos {
        let output_filename = format!(
            "{}.layout.json",
            demo_path.file_stem().unwrap().to_string_lossy()
        );
        let output_path = temp_dir.path().join(output_filename);

        if let Err(e) = run(&args(demo_path, &output_path, true)) {
            failed_demos.push((demo_path.clone(), e.to_string()));
            continue;
        }

        let graph = read_graph(&output_path);
        let nodes = graph["nodes"].as_array().unwrap();
        if nodes.is_empty() || nodes[0]["kind"] != "entry" {
            failed_demos.push((demo_path.clone(), "graph has no entry node".to_string()));
        }
    }

    if !failed_demos.is_empty() {
        eprintln!("\nValid demos that failed:");
        for (path, err) in &failed_demos {
            eprintln!("  - {}: {}", path.display(), err);
        }
        panic!("{} valid demo(s) failed unexpectedly", failed_demos.len());
    }

    println!("✅ All {} valid demos passed", valid_demos.len());
}

#[test]
fn e2e_smoke_test_error_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let error_demos = collect_json_files(demos_path().join("errors"));

    assert!(
        !error_demos.is_empty(),
        "No error demos found in demos/errors/"
    );

    let mut unexpectedly_succeeded = Vec::new();
    let mut not_empty = Vec::new();

    for demo_path in &error_demos {
        let stem = demo_path.file_stem().unwrap().to_string_lossy();
        let strict_output = temp_dir.path().join(format!("strict_{stem}.json"));
        let lenient_output = temp_dir.path().join(format!("lenient_{stem}.json"));

        if run(&args(demo_path, &strict_output, true)).is_ok() {
            unexpectedly_succeeded.push(demo_path.clone());
        }

        run(&args(demo_path, &lenient_output, false))
            .expect("Lenient mode should write the empty graph");
        let graph = read_graph(&lenient_output);
        if !graph["nodes"].as_array().unwrap().is_empty()
            || !graph["edges"].as_array().unwrap().is_empty()
        {
            not_empty.push(demo_path.clone());
        }
    }

    if !unexpectedly_succeeded.is_empty() {
        eprintln!("\nError demos that unexpectedly succeeded:");
        for path in &unexpectedly_succeeded {
            eprintln!("  - {}", path.display());
        }
        panic!(
            "{} error demo(s) should have failed but succeeded",
            unexpectedly_succeeded.len()
        );
    }

    assert!(
        not_empty.is_empty(),
        "Error demos produced a non-empty graph: {not_empty:?}"
    );

    println!("✅ All {} error demos failed as expected", error_demos.len());
}

#[test]
fn e2e_missing_input_file_fails() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = temp_dir.path().join("absent.json");
    let output = temp_dir.path().join("out.json");

    assert!(run(&args(&input, &output, false)).is_err());
    assert!(!output.exists());
}

#[test]
fn e2e_config_file_is_applied() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    fs::write(
        &config_path,
        "[layout]\nvertical_spacing = 40.0\n\n[output]\npretty = false\n",
    )
    .unwrap();

    let output = temp_dir.path().join("hello.json");
    let mut cli_args = args(&demos_path().join("hello_world.json"), &output, true);
    cli_args.config = Some(config_path.to_string_lossy().to_string());

    run(&cli_args).expect("Run should succeed");

    let written = fs::read_to_string(&output).unwrap();
    assert_eq!(written.lines().count(), 1, "Compact output is one line");

    let graph: Value = serde_json::from_str(&written).unwrap();
    let world = graph["nodes"]
        .as_array()
        .unwrap()
        .iter()
        .find(|node| node["id"] == "state:World")
        .unwrap();
    assert_eq!(world["y"], 80.0);
}

#[test]
fn e2e_malformed_states_lay_out_in_strict_mode() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let output = temp_dir.path().join("tolerated.json");

    run(&args(&demos_path().join("tolerated_states.json"), &output, true))
        .expect("Malformed states are warnings, not errors");

    let graph = read_graph(&output);
    let nodes = graph["nodes"].as_array().unwrap();
    let kind_of = |id: &str| {
        nodes
            .iter()
            .find(|node| node["id"] == id)
            .map(|node| node["kind"].clone())
    };
    assert_eq!(kind_of("state:Legacy"), Some(Value::from("Task")));
    assert_eq!(kind_of("state:Untyped"), Some(Value::from("Task")));
    assert_eq!(kind_of("state:Orphan"), None);

    let edges = graph["edges"].as_array().unwrap();
    assert!(edges.iter().all(|edge| edge["kind"] != "error"));
    assert_eq!(
        edges.iter().filter(|edge| edge["kind"] == "conditional").count(),
        1
    );
}
