// tests/config_loading.rs

mod common;

use std::io::Write;

use tempfile::NamedTempFile;

use prodline::config::{load_and_validate, load_with, parse_lines, parse_toml, PlantConfig};
use prodline::errors::ProdlineError;
use prodline::fs::mock::MockFileSystem;
use prodline::types::{InputFormat, Operation};

use crate::common::TWO_LEVEL_PLANT;

fn expect_config_error(input: &str, needle: &str) {
    let raw = parse_lines(input).expect("input should parse");
    match PlantConfig::try_from(raw) {
        Err(ProdlineError::ConfigError(msg)) => {
            assert!(msg.contains(needle), "message {msg:?} should mention {needle:?}");
        }
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn parses_line_format() {
    let raw = parse_lines(TWO_LEVEL_PLANT).expect("valid input");

    assert_eq!(raw.machines, 5);
    assert_eq!(raw.cycles, 2);
    assert_eq!(raw.threshold, 6);
    assert_eq!(raw.wear.enhance, 1);
    assert_eq!(raw.wear.reverse, 2);
    assert_eq!(raw.wear.chop, 3);
    assert_eq!(raw.wear.trim, 4);
    assert_eq!(raw.wear.split, 5);
    assert_eq!(raw.links.len(), 4);
    assert_eq!(raw.links[0].child, 2);
    assert_eq!(raw.links[0].parent, 1);
    assert_eq!(raw.links[0].operation, Operation::Enhance);
    assert_eq!(raw.seeds, vec!["XYZ", "ABCD", "HELLO"]);
}

#[test]
fn trailing_blank_lines_are_ignored() {
    let input = format!("{TWO_LEVEL_PLANT}\n\n  \n");
    let raw = parse_lines(&input).expect("valid input");
    assert_eq!(raw.seeds.len(), 3);
    PlantConfig::try_from(raw).expect("still valid");
}

#[test]
fn bad_count_reports_line_number() {
    match parse_lines("five\n1\n1 1 1 1 1\n1\n") {
        Err(ProdlineError::ParseError { line, msg }) => {
            assert_eq!(line, 1);
            assert!(msg.contains("machine count"));
        }
        other => panic!("Expected ParseError, got: {:?}", other),
    }
}

#[test]
fn wrong_number_of_wear_factors() {
    match parse_lines("2\n1\n1 2 3\n1\n2 1 enhance\nA\n") {
        Err(ProdlineError::ParseError { line, .. }) => assert_eq!(line, 3),
        other => panic!("Expected ParseError, got: {:?}", other),
    }
}

#[test]
fn unknown_operation_name() {
    match parse_lines("2\n1\n1 1 1 1 1\n1\n2 1 polish\nA\n") {
        Err(ProdlineError::ParseError { line, msg }) => {
            assert_eq!(line, 5);
            assert!(msg.contains("polish"));
        }
        other => panic!("Expected ParseError, got: {:?}", other),
    }
}

#[test]
fn truncated_adjacency() {
    match parse_lines("3\n1\n1 1 1 1 1\n1\n2 1 enhance\n") {
        Err(ProdlineError::ParseError { line, msg }) => {
            assert_eq!(line, 6);
            assert!(msg.contains("unexpected end of input"));
        }
        other => panic!("Expected ParseError, got: {:?}", other),
    }
}

#[test]
fn single_machine_is_rejected() {
    expect_config_error("1\n1\n1 1 1 1 1\n1\n", "at least one child");
}

#[test]
fn unknown_parent_is_rejected() {
    expect_config_error("2\n1\n1 1 1 1 1\n1\n2 9 enhance\nA\n", "unknown parent 9");
}

#[test]
fn child_outside_range_is_rejected() {
    expect_config_error("2\n1\n1 1 1 1 1\n1\n4 1 enhance\nA\n", "outside");
}

#[test]
fn root_with_parent_is_rejected() {
    expect_config_error("2\n1\n1 1 1 1 1\n1\n1 2 reverse\nA\n", "root machine 1");
}

#[test]
fn two_parents_for_one_child_is_rejected() {
    expect_config_error(
        "3\n1\n1 1 1 1 1\n1\n2 1 enhance\n2 1 split\nA\n",
        "more than one parent",
    );
}

#[test]
fn cycle_never_reaching_root_is_rejected() {
    expect_config_error(
        "4\n1\n1 1 1 1 1\n1\n2 3 enhance\n3 2 reverse\n4 1 split\nA\n",
        "cycle detected",
    );
}

#[test]
fn initial_operation_must_belong_to_parity_roster() {
    // Machine 2 is even; reverse belongs to the odd roster.
    expect_config_error(
        "3\n1\n1 5 1 1 1\n5\n2 1 reverse\n3 2 reverse\nABCDE\n",
        "not in the even-id roster",
    );
}

#[test]
fn leaf_without_seed_is_rejected() {
    expect_config_error(
        "3\n1\n1 1 1 1 1\n1\n2 1 enhance\n3 1 reverse\nA\n",
        "expected 2 leaf products",
    );
}

#[test]
fn lines_after_the_last_seed_are_ignored() {
    let raw = parse_lines("2\n1\n1 1 1 1 1\n1\n2 1 enhance\nA\nEXTRA\n").expect("valid input");
    assert_eq!(raw.seeds, vec!["A"]);
    PlantConfig::try_from(raw).expect("one seed for one leaf");
}

#[test]
fn extra_toml_seed_is_rejected() {
    let toml = r#"
machines = 2
cycles = 1
threshold = 1
seeds = ["A", "B"]

[[link]]
child = 2
parent = 1
operation = "enhance"
"#;
    let raw = parse_toml(toml).expect("toml should parse");
    match PlantConfig::try_from(raw) {
        Err(ProdlineError::ConfigError(msg)) => assert!(msg.contains("expected 1 leaf products")),
        other => panic!("Expected ConfigError, got: {:?}", other),
    }
}

#[test]
fn huge_machine_count_is_a_parse_error() {
    match parse_lines("4000000000\n1\n0 5 0 0 0\n5\n2 1 split") {
        Err(ProdlineError::ParseError { line, msg }) => {
            assert_eq!(line, 6);
            assert!(msg.contains("adjacency record"));
        }
        other => panic!("Expected ParseError, got: {:?}", other),
    }
}

#[test]
fn negative_threshold_is_accepted() {
    let raw = parse_lines("3\n1\n0 5 0 0 0\n-1\n2 1 split\n3 2 reverse\nABCDE").expect("valid input");
    assert_eq!(raw.threshold, -1);
    let cfg = PlantConfig::try_from(raw).expect("negative thresholds are allowed");
    assert_eq!(cfg.threshold, -1);
}

#[test]
fn toml_encoding_matches_line_encoding() {
    let toml = r#"
machines = 3
cycles = 1
threshold = 5
seeds = ["ABCDE"]

[wear]
reverse = 5

[[link]]
child = 2
parent = 1
operation = "split"

[[link]]
child = 3
parent = 2
operation = "reverse"
"#;
    let from_toml = parse_toml(toml).expect("valid toml");
    let from_lines = parse_lines("3\n1\n0 5 0 0 0\n5\n2 1 split\n3 2 reverse\nABCDE\n")
        .expect("valid lines");

    assert_eq!(from_toml.machines, from_lines.machines);
    assert_eq!(from_toml.cycles, from_lines.cycles);
    assert_eq!(from_toml.threshold, from_lines.threshold);
    assert_eq!(from_toml.wear, from_lines.wear);
    assert_eq!(from_toml.links, from_lines.links);
    assert_eq!(from_toml.seeds, from_lines.seeds);
}

#[test]
fn toml_with_unknown_operation_is_a_toml_error() {
    let toml = r#"
machines = 2
cycles = 1
threshold = 1
seeds = ["A"]

[[link]]
child = 2
parent = 1
operation = "polish"
"#;
    assert!(matches!(parse_toml(toml), Err(ProdlineError::TomlError(_))));
}

#[test]
fn loads_lines_from_a_real_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{TWO_LEVEL_PLANT}").unwrap();

    let cfg = load_and_validate(file.path(), InputFormat::Auto).expect("valid plant");
    assert_eq!(cfg.machines, 5);
    assert_eq!(cfg.seeds.len(), 3);
}

#[test]
fn toml_extension_selects_toml() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    write!(
        file,
        r#"
machines = 2
cycles = 4
threshold = 3
seeds = ["ABC"]

[wear]
enhance = 1

[[link]]
child = 2
parent = 1
operation = "enhance"
"#
    )
    .unwrap();

    let cfg = load_and_validate(file.path(), InputFormat::Auto).expect("valid plant");
    assert_eq!(cfg.cycles, 4);
    assert_eq!(cfg.wear.enhance, 1);
}

#[test]
fn explicit_format_overrides_extension() {
    let fs = MockFileSystem::new();
    fs.add_file("plant.toml", TWO_LEVEL_PLANT);

    let cfg = load_with(&fs, "plant.toml", InputFormat::Lines).expect("lines parse");
    assert_eq!(cfg.machines, 5);

    assert!(load_with(&fs, "plant.toml", InputFormat::Auto).is_err());
}

#[test]
fn missing_file_is_an_error() {
    let fs = MockFileSystem::new();
    assert!(load_with(&fs, "nowhere.txt", InputFormat::Auto).is_err());
}
