use std::{fs, path::PathBuf};

use tempfile::tempdir;

use procession_cli::{Args, DragSpec, run};

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

    files.sort();
    files
}

/// Demo inputs live at the workspace root, not in the crate
fn demos_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("demos")
}

fn args_for(input: &PathBuf, output: PathBuf) -> Args {
    Args {
        input: input.to_string_lossy().to_string(),
        output: output.to_string_lossy().to_string(),
        config: None,
        log_level: "off".to_string(),
        drags: Vec::new(),
    }
}

#[test]
fn e2e_smoke_test_valid_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    let valid_demos = collect_json_files(demos_path());
    assert!(!valid_demos.is_empty(), "No valid demos found in demos/");

    let mut failed_demos = Vec::new();

    for demo_path in &valid_demos {
        let output_path = temp_dir.path().join(format!(
            "{}.layout.json",
            demo_path.file_stem().unwrap().to_string_lossy()
        ));

        let args = args_for(demo_path, output_path.clone());
        match run(&args) {
            Ok(()) => {
                let written = fs::read_to_string(&output_path).expect("Output should exist");
                let json: serde_json::Value =
                    serde_json::from_str(&written).expect("Output should be valid JSON");
                assert!(json["nodes"].is_array(), "{}", demo_path.display());
                assert!(json["edges"].is_array(), "{}", demo_path.display());
            }
            Err(e) => failed_demos.push((demo_path.clone(), e)),
        }
    }

    if !failed_demos.is_empty() {
        eprintln!("\nValid demos that failed:");
        for (path, err) in &failed_demos {
            eprintln!("  - {}: {}", path.display(), err);
        }
        panic!("{} valid demo(s) failed unexpectedly", failed_demos.len());
    }
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

    for demo_path in &error_demos {
        let output_path = temp_dir.path().join(format!(
            "error_{}.json",
            demo_path.file_stem().unwrap().to_string_lossy()
        ));

        if run(&args_for(demo_path, output_path)).is_ok() {
            unexpectedly_succeeded.push(demo_path.clone());
        }
    }

    if !unexpectedly_succeeded.is_empty() {
        eprintln!("\nError demos that unexpectedly succeeded:");
        for path in &unexpectedly_succeeded {
            eprintln!("  - {}", path.display());
        }
        panic!(
            "{} error demo(s) succeeded unexpectedly",
            unexpectedly_succeeded.len()
        );
    }
}

#[test]
fn e2e_replayed_drag_is_committed() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = demos_path().join("order_to_cash.json");
    let output = temp_dir.path().join("dragged.json");

    let mut args = args_for(&input, output.clone());
    args.drags = vec!["iml-1-101=1000".parse::<DragSpec>().unwrap()];
    run(&args).expect("Drag replay should succeed");

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    let edges = json["edges"].as_array().unwrap();
    let dragged = edges.iter().find(|e| e["id"] == "iml-1-101").unwrap();
    let successor = edges.iter().find(|e| e["id"] == "iml-1-102").unwrap();
    let gap = successor["yPosition"].as_f64().unwrap() - dragged["yPosition"].as_f64().unwrap();
    assert!((gap - 60.0).abs() < 1e-3, "gap was {gap}");
}

#[test]
fn e2e_drag_of_unknown_marker_fails() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = demos_path().join("order_to_cash.json");

    let mut args = args_for(&input, temp_dir.path().join("out.json"));
    args.drags = vec!["iml-1-999=10".parse::<DragSpec>().unwrap()];
    assert!(run(&args).is_err());
}
