use std::fs;
use std::io::{Read, Write};
use std::process::Command;

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use ms_etitj::estimate::{Mode, estimate_mode};
use ms_etitj::io::{Layout, read_ms_trees, write_estimate_to};
use ms_etitj::{Estimate, EstimateError, parse_newick};
use phylotree::tree::Tree as PhyloTree;
use tempfile::tempdir;

const MS_OUTPUT: &str = "\
ms 3 3 -T
4127 19182 29831

//
((1:0.5,2:0.5):1.0,3:1.5);

//
(1:1.0,(2:0.25,3:0.25):0.75);

//
((1:0.5,3:0.5):1.0,2:1.5);
";

// Coalescence times overflow to infinity, so their difference is NaN.
const INCONSISTENT_OUTPUT: &str = "ms 3 1 -T\n//\n((1:1e999,2:1e999):1,3:1e999);\n";

#[test]
fn estimate_from_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sim.ms");
    fs::write(&path, MS_OUTPUT).unwrap();

    let trees = read_ms_trees(&path).unwrap();
    assert_eq!(trees.len(), 3);

    // intervals [1, 2], [0.5, 1.5], [1, 2]
    let estimate = estimate_mode(&trees, Mode::Matrix, false).unwrap();
    let expected = [2.25 / 3.0, 4.75 / 3.0, 4.75 / 3.0, 10.25 / 3.0];
    let Estimate::Matrix { size, values } = estimate else {
        panic!("expected matrix estimate");
    };
    assert_eq!(size, 2);
    for (value, expected) in values.iter().zip(expected) {
        assert!((value - expected).abs() < 1e-12);
    }
}

#[test]
fn gzipped_input_and_output() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("sim.ms.gz");
    let mut enc = GzEncoder::new(fs::File::create(&input).unwrap(), Compression::default());
    enc.write_all(MS_OUTPUT.as_bytes()).unwrap();
    enc.finish().unwrap();

    let trees = read_ms_trees(&input).unwrap();
    assert_eq!(trees.len(), 3);

    let estimate = estimate_mode(&trees, Mode::Scalar, false).unwrap();
    let output = dir.path().join("etitj.txt.gz");
    write_estimate_to(Some(&output), &estimate, Layout::List).unwrap();

    let mut text = String::new();
    GzDecoder::new(fs::File::open(&output).unwrap())
        .read_to_string(&mut text)
        .unwrap();
    assert!(text.starts_with("Estimated E(T_iT_j) = "));
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempdir().unwrap();
    let err = read_ms_trees(dir.path().join("missing.ms")).unwrap_err();
    assert!(matches!(err, EstimateError::Io(_)));
}

#[test]
fn leaf_counts_agree_with_phylotree() {
    let trees = [
        "((A:0.5,B:0.5):1.0,C:1.5);",
        "(((A:1,B:1):1,C:2):1,(D:0.5,E:0.5):2.5);",
        "((A:0.1,B:0.1):0.4,((C:0.2,D:0.2):0.2,(E:0.3,F:0.3):0.1):0.1);",
    ];
    for newick in trees {
        let ours = parse_newick(newick).unwrap();
        let reference = PhyloTree::from_newick(newick).unwrap();
        assert_eq!(ours.num_leaves(), reference.get_leaves().len());
        assert_eq!(ours.num_internal(), ours.num_leaves() - 1);
    }
}

#[test]
fn cli_scalar_mode() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sim.ms");
    fs::write(&path, MS_OUTPUT).unwrap();

    let out = Command::new(env!("CARGO_BIN_EXE_ms-etitj"))
        .arg(&path)
        .args(["--mode", "scalar", "--quiet"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(stdout.starts_with("Estimated E(T_iT_j) = "));
    assert_eq!(stdout.lines().count(), 1);
}

#[test]
fn cli_matrix_mode() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sim.ms");
    fs::write(&path, MS_OUTPUT).unwrap();

    let out = Command::new(env!("CARGO_BIN_EXE_ms-etitj"))
        .arg(&path)
        .arg("-q")
        .output()
        .unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines.iter().all(|l| l.split_once('.').unwrap().1.len() == 34));
}

#[test]
fn cli_reports_error_in_times() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.ms");
    fs::write(&path, INCONSISTENT_OUTPUT).unwrap();

    let out = Command::new(env!("CARGO_BIN_EXE_ms-etitj"))
        .arg(&path)
        .arg("-q")
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(1));
    assert!(out.stdout.is_empty());
    assert!(String::from_utf8(out.stderr).unwrap().starts_with("Error in times"));
}

#[test]
fn cli_rejects_malformed_tree() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.ms");
    fs::write(&path, "ms 3 1 -T\n//\n(A:1,B:1\n").unwrap();

    let out = Command::new(env!("CARGO_BIN_EXE_ms-etitj"))
        .arg(&path)
        .arg("-q")
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(2));
    assert!(out.stdout.is_empty());
}
