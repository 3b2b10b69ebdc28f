// tests/cli_run.rs

mod common;
use crate::common::init_tracing;
use crate::common::{TWO_LEVEL_PLANT, TWO_LEVEL_REPORT};

use std::error::Error;

use clap::Parser;

use prodline::cli::CliArgs;
use prodline::fs::mock::MockFileSystem;
use prodline::fs::FileSystem;
use prodline::logging::parse_level_str;
use prodline::run_with;
use prodline::types::InputFormat;

type TestResult = Result<(), Box<dyn Error>>;

fn args(input: &str, output: &str) -> CliArgs {
    CliArgs {
        input: input.to_string(),
        output: output.to_string(),
        format: InputFormat::Auto,
        log_level: None,
        dry_run: false,
    }
}

#[test]
fn cli_parses_positional_paths_and_flags() {
    let parsed = CliArgs::try_parse_from([
        "prodline",
        "plant.txt",
        "out.txt",
        "--format",
        "toml",
        "--log-level",
        "debug",
        "--dry-run",
    ])
    .expect("valid arguments");

    assert_eq!(parsed.input, "plant.txt");
    assert_eq!(parsed.output, "out.txt");
    assert_eq!(parsed.format, InputFormat::Toml);
    assert!(parsed.dry_run);
}

#[test]
fn cli_rejects_unknown_format() {
    assert!(CliArgs::try_parse_from(["prodline", "a", "b", "--format", "yaml"]).is_err());
}

#[tokio::test]
async fn run_writes_products_then_ledger() -> TestResult {
    crate::common::with_timeout(async {
        init_tracing();

        let fs = MockFileSystem::new();
        fs.add_file("plant.txt", TWO_LEVEL_PLANT);

        run_with(&fs, args("plant.txt", "out/report.txt")).await?;

        assert_eq!(fs.contents("out/report.txt").as_deref(), Some(TWO_LEVEL_REPORT));
        Ok(())
    })
    .await
}

#[tokio::test]
async fn run_accepts_toml_input() -> TestResult {
    crate::common::with_timeout(async {
        init_tracing();

        let fs = MockFileSystem::new();
        fs.add_file(
            "plant.toml",
            r#"
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
"#,
        );

        run_with(&fs, args("plant.toml", "out.txt")).await?;

        assert_eq!(fs.contents("out.txt").as_deref(), Some("EDC\n3-5-1"));
        Ok(())
    })
    .await
}

#[tokio::test]
async fn dry_run_writes_nothing() -> TestResult {
    crate::common::with_timeout(async {
        init_tracing();

        let fs = MockFileSystem::new();
        fs.add_file("plant.txt", TWO_LEVEL_PLANT);

        let mut dry = args("plant.txt", "out.txt");
        dry.dry_run = true;
        run_with(&fs, dry).await?;

        assert!(!fs.exists(std::path::Path::new("out.txt")));
        Ok(())
    })
    .await
}

#[tokio::test]
async fn config_error_aborts_before_output() -> TestResult {
    crate::common::with_timeout(async {
        init_tracing();

        let fs = MockFileSystem::new();
        // Machine 2 is even and cannot start with reverse.
        fs.add_file("plant.txt", "3\n1\n1 5 1 1 1\n5\n2 1 reverse\n3 2 reverse\nABCDE\n");

        let result = run_with(&fs, args("plant.txt", "out.txt")).await;

        assert!(result.is_err());
        assert!(fs.contents("out.txt").is_none());
        Ok(())
    })
    .await
}

#[test]
fn log_level_env_values() {
    assert_eq!(parse_level_str(" Debug "), Some(tracing::Level::DEBUG));
    assert_eq!(parse_level_str("warning"), Some(tracing::Level::WARN));
    assert_eq!(parse_level_str("loud"), None);
}
