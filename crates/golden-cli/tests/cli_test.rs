//! Integration tests for the golden command line.

use clap::Parser;
use golden_cli::{load_config, run, Cli, Report};
use golden_comparator::ComparisonOutcome;
use tempfile::TempDir;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("golden").chain(args.iter().copied()))
        .expect("valid arguments")
}

#[tokio::test]
async fn test_update_compare_resolve() {
    let dir = TempDir::new().unwrap();
    let test_file = dir.path().join("render_test.rs").to_string_lossy().into_owned();
    let image = dir.path().join("out.png");
    std::fs::write(&image, [1, 2, 3]).unwrap();
    let image = image.to_string_lossy().into_owned();
    let config = load_config(None).unwrap();

    let cli = parse(&["update", &image, "goldens/x.png", "--test-file", &test_file]);
    let report = run(&cli, &config).await.unwrap();
    assert!(report.passed());
    assert_eq!(
        std::fs::read(dir.path().join("goldens/x.png")).unwrap(),
        vec![1, 2, 3]
    );

    let cli = parse(&["compare", &image, "goldens/x.png", "--test-file", &test_file]);
    let report = run(&cli, &config).await.unwrap();
    assert!(report.passed());
    assert!(matches!(
        report,
        Report::Compare {
            outcome: ComparisonOutcome::Match,
            ..
        }
    ));

    let cli = parse(&["resolve", "goldens/x.png", "--test-file", &test_file, "--version", "3"]);
    match run(&cli, &config).await.unwrap() {
        Report::Resolve { key, path } => {
            assert_eq!(key.as_str(), "goldens/x.3.png");
            assert_eq!(path, dir.path().join("goldens/x.3.png"));
        }
        other => panic!("expected resolve report, got {other:?}"),
    }
}

#[tokio::test]
async fn test_compare_mismatch_fails() {
    let dir = TempDir::new().unwrap();
    let test_file = dir.path().join("render_test.rs").to_string_lossy().into_owned();
    std::fs::write(dir.path().join("x.png"), [1, 2, 3]).unwrap();
    let image = dir.path().join("out.png");
    std::fs::write(&image, [1, 2, 4]).unwrap();
    let image = image.to_string_lossy().into_owned();

    let cli = parse(&["compare", &image, "x.png", "--test-file", &test_file, "--json"]);
    let report = run(&cli, &load_config(None).unwrap()).await.unwrap();
    assert!(!report.passed());

    let json: serde_json::Value = serde_json::from_str(&report.render(true).unwrap()).unwrap();
    assert_eq!(json["command"], "compare");
    assert_eq!(json["outcome"]["status"], "mismatch");
    assert_eq!(json["outcome"]["first_mismatch"], 2);
}

#[tokio::test]
async fn test_compare_missing_golden_errors() {
    let dir = TempDir::new().unwrap();
    let test_file = dir.path().join("render_test.rs").to_string_lossy().into_owned();
    let image = dir.path().join("out.png");
    std::fs::write(&image, [1]).unwrap();
    let image = image.to_string_lossy().into_owned();

    let cli = parse(&["compare", &image, "missing.png", "--test-file", &test_file]);
    let err = run(&cli, &load_config(None).unwrap()).await.unwrap_err();
    assert!(format!("{err:#}").contains("non-existent file"));
}

#[tokio::test]
async fn test_update_goldens_flag_writes_golden() {
    let dir = TempDir::new().unwrap();
    let test_file = dir.path().join("render_test.rs").to_string_lossy().into_owned();
    let image = dir.path().join("out.png");
    std::fs::write(&image, [9, 9]).unwrap();
    let image = image.to_string_lossy().into_owned();

    let cli = parse(&[
        "compare",
        &image,
        "fresh.png",
        "--test-file",
        &test_file,
        "--update-goldens",
    ]);
    let report = run(&cli, &load_config(None).unwrap()).await.unwrap();
    assert!(matches!(
        report,
        Report::Compare {
            outcome: ComparisonOutcome::Updated,
            ..
        }
    ));
    assert_eq!(std::fs::read(dir.path().join("fresh.png")).unwrap(), vec![9, 9]);
}

#[test]
fn test_load_config_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("golden.yaml");
    std::fs::write(&path, "comparator:\n  auto_update: true\nlog_level: debug\n").unwrap();

    let config = load_config(Some(&path)).unwrap();
    assert!(config.comparator.auto_update);
    assert_eq!(config.log_level, "debug");

    let err = load_config(Some(&dir.path().join("absent.yaml"))).unwrap_err();
    assert!(format!("{err:#}").contains("loading configuration"));
}
