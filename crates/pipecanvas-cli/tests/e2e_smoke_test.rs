use std::{fs, path::PathBuf};

use serde_json::Value;
use tempfile::tempdir;

use pipecanvas_cli::{Args, run};

/// Collects all .json documents from a directory
fn collect_documents(dir: PathBuf) -> Vec<PathBuf> {
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

fn demos_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("demos")
}

fn args(input: &str, output: &str) -> Args {
    Args {
        input: input.to_string(),
        output: output.to_string(),
        direction: None,
        config: None,
        log_level: "off".to_string(),
    }
}

#[test]
fn e2e_smoke_test_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let documents = collect_documents(demos_path());

    assert!(!documents.is_empty(), "No documents found in demos/");

    let mut failed = Vec::new();

    for document in &documents {
        let output_path = temp_dir
            .path()
            .join(document.file_name().unwrap());

        let input = document.to_string_lossy();
        let output = output_path.to_string_lossy();
        if let Err(e) = run(&args(&input, &output)) {
            failed.push((document.clone(), e));
            continue;
        }

        let written: Value = serde_json::from_str(&fs::read_to_string(&output_path).unwrap())
            .expect("output must be valid JSON");
        let source: Value = serde_json::from_str(&fs::read_to_string(document).unwrap()).unwrap();
        assert_eq!(
            written["nodes"].as_array().map(Vec::len),
            source["nodes"].as_array().map(Vec::len),
            "{}",
            document.display()
        );
    }

    if !failed.is_empty() {
        eprintln!("\nDocuments that failed:");
        for (path, err) in &failed {
            eprintln!("  - {}: {}", path.display(), err);
        }
        panic!("{} document(s) failed unexpectedly", failed.len());
    }
}

#[test]
fn e2e_direction_override() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = temp_dir.path().join("chain.json");
    let output = temp_dir.path().join("out.json");
    fs::write(
        &input,
        r#"{"nodes": [{"id": "a"}, {"id": "b"}], "edges": [{"source": "a", "target": "b"}]}"#,
    )
    .unwrap();

    let mut args = args(&input.to_string_lossy(), &output.to_string_lossy());
    args.direction = Some("tb".to_string());
    run(&args).expect("layout should succeed");

    let written: Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    let nodes = written["nodes"].as_array().unwrap();
    assert_eq!(nodes[0]["sourcePosition"], "bottom");
    assert!(nodes[0]["position"]["y"].as_f64() < nodes[1]["position"]["y"].as_f64());

    assert_eq!(written["edges"], serde_json::json!([{"source": "a", "target": "b"}]));
    let routes = written["routes"].as_array().unwrap();
    assert_eq!(routes.len(), 1);
    assert_eq!(routes[0]["source"], "a");
}

#[test]
fn e2e_output_keeps_document_fields() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = temp_dir.path().join("styled.json");
    let output = temp_dir.path().join("out.json");
    let source = serde_json::json!({
        "nodes": [
            {
                "id": "a",
                "type": "task",
                "selected": true,
                "style": {"backgroundColor": "var(--node-bg)", "width": 180},
                "data": {"label": "A", "prev": [], "succ": ["b"], "service_id": "svc-a", "owner": "ops"}
            },
            {"id": "b", "type": "task"}
        ],
        "edges": [{"id": "e1", "source": "a", "target": "b", "animated": true}]
    });
    fs::write(&input, source.to_string()).unwrap();

    run(&args(&input.to_string_lossy(), &output.to_string_lossy())).expect("layout should succeed");

    let written: Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(written["edges"], source["edges"]);
    let before_nodes = source["nodes"].as_array().unwrap();
    let after_nodes = written["nodes"].as_array().unwrap();
    assert_eq!(before_nodes.len(), after_nodes.len());
    for (before, after) in before_nodes.iter().zip(after_nodes) {
        for (key, value) in before.as_object().unwrap() {
            assert_eq!(&after[key], value, "field `{key}` changed");
        }
        assert!(after["position"]["x"].is_number());
        assert_eq!(after["sourcePosition"], "right");
    }
}

#[test]
fn e2e_invalid_nodes_writes_nothing() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = temp_dir.path().join("bad.json");
    let output = temp_dir.path().join("out.json");
    fs::write(&input, r#"{"nodes": {"id": "a"}}"#).unwrap();

    let result = run(&args(&input.to_string_lossy(), &output.to_string_lossy()));

    assert!(result.is_err(), "non-array nodes must be rejected");
    assert!(!output.exists());
}

#[test]
fn e2e_unknown_direction_rejected() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = temp_dir.path().join("chain.json");
    fs::write(&input, r#"{"nodes": []}"#).unwrap();

    let mut args = args(
        &input.to_string_lossy(),
        &temp_dir.path().join("out.json").to_string_lossy(),
    );
    args.direction = Some("diagonal".to_string());

    assert!(run(&args).is_err());
}
