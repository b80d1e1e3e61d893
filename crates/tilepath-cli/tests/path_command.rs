use std::fs;
use std::path::PathBuf;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../docs/fixtures")
        .canonicalize()
        .expect("fixtures present")
}

fn cli() -> Command {
    let mut cmd = cargo_bin_cmd!("tilepath");
    cmd.env("RUST_LOG", "error").arg("--no-color");
    cmd
}

/// Write `rows` to a grid file in a fresh temp dir.
fn grid_file(rows: &[&str]) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("create temp dir");
    let path = dir.path().join("grid.txt");
    fs::write(&path, format!("{}\n", rows.join("\n"))).expect("write grid");
    (dir, path)
}

fn path_cmd(map: &PathBuf, width: usize, height: usize, from: &str, to: &str) -> Command {
    let mut cmd = cli();
    cmd.arg("path")
        .arg("--map")
        .arg(map)
        .arg("--width")
        .arg(width.to_string())
        .arg("--height")
        .arg(height.to_string())
        .arg("--from")
        .arg(from)
        .arg("--to")
        .arg(to);
    cmd
}

#[test]
fn open_grid_path_reports_cost() {
    let (_dir, map) = grid_file(&["...", "...", "..."]);
    path_cmd(&map, 3, 3, "0,0", "2,2")
        .assert()
        .success()
        .stdout(predicate::str::contains("cost 40 over 4 steps"))
        .stdout(predicate::str::contains("(0, 0) -> "));
}

#[test]
fn walled_goal_fails_with_message() {
    let (_dir, map) = grid_file(&[".#."]);
    path_cmd(&map, 3, 1, "0,0", "2,0")
        .assert()
        .failure()
        .stdout(predicate::str::contains("failed"))
        .stderr(predicate::str::contains("No path found"));
}

#[test]
fn out_of_bounds_point_is_rejected() {
    let (_dir, map) = grid_file(&["...", "..."]);
    path_cmd(&map, 3, 2, "0,0", "5,5")
        .assert()
        .failure()
        .stderr(predicate::str::contains("outside the 3x2 grid"));
}

#[test]
fn malformed_grid_is_rejected() {
    let (_dir, map) = grid_file(&["...", ".."]);
    path_cmd(&map, 3, 2, "0,0", "1,1")
        .assert()
        .failure()
        .stderr(predicate::str::contains("malformed grid"));
}

#[test]
fn json_output_includes_state_and_cells() {
    let (_dir, map) = grid_file(&["..", ".."]);
    let output = path_cmd(&map, 2, 2, "0,0", "1,1")
        .arg("--format")
        .arg("json")
        .output()
        .expect("run cli");
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(json["state"], "succeeded");
    assert_eq!(json["cost"], 20);
    assert_eq!(json["cells"].as_array().map(Vec::len), Some(3));
    assert!(json.get("trace").is_none());
}

#[test]
fn trace_and_map_are_printed() {
    let (_dir, map) = grid_file(&["...", ".#.", "..."]);
    path_cmd(&map, 3, 3, "0,0", "2,0")
        .arg("--trace")
        .arg("--show-map")
        .assert()
        .success()
        .stdout(predicate::str::contains("step    1: in-progress"))
        .stdout(predicate::str::contains("succeeded"))
        .stdout(predicate::str::contains("S*G"));
}

#[test]
fn basic_format_lists_cells() {
    let (_dir, map) = grid_file(&["..."]);
    path_cmd(&map, 3, 1, "0,0", "2,0")
        .arg("--format")
        .arg("basic")
        .assert()
        .success()
        .stdout(predicate::eq("0,0\n1,0\n2,0\ncost 20\n"));
}

#[test]
fn world_grid_is_selected_by_name() {
    cli()
        .arg("path")
        .arg("--world")
        .arg(fixtures_dir().join("world/world.json"))
        .arg("--grid")
        .arg("spire")
        .arg("--from")
        .arg("2,2")
        .arg("--to")
        .arg("2,0")
        .assert()
        .success()
        .stdout(predicate::str::contains("Path on spire"))
        .stdout(predicate::str::contains("cost 30"));
}

#[test]
fn unknown_world_grid_suggests_names() {
    cli()
        .arg("path")
        .arg("--world")
        .arg(fixtures_dir().join("world/world.json"))
        .arg("--grid")
        .arg("grotta")
        .arg("--from")
        .arg("0,0")
        .arg("--to")
        .arg("1,0")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Did you mean 'grotto'?"));
}

#[test]
fn map_and_world_conflict() {
    let (_dir, map) = grid_file(&["..."]);
    cli()
        .arg("path")
        .arg("--map")
        .arg(&map)
        .arg("--world")
        .arg(fixtures_dir().join("world/world.json"))
        .arg("--from")
        .arg("0,0")
        .arg("--to")
        .arg("1,0")
        .assert()
        .failure();
}
