// tests/run_single_build.rs

#![cfg(unix)]

mod common;

use std::error::Error;
use std::fs;
use std::os::unix::fs::MetadataExt;
use std::path::Path;

use tempfile::tempdir;

use atomizer_watch::cli::CliArgs;
use atomizer_watch::errors::AtomizerError;
use atomizer_watch::run;
use atomizer_watch_test_utils::{init_tracing, with_timeout};

use common::write_file;

type TestResult = Result<(), Box<dyn Error>>;

/// `cat` echoes the generation request, so the "stylesheet" lists the tokens.
fn write_config(dir: &Path, cmd: &str) {
    write_file(
        dir,
        "Atomizer.toml",
        &format!(
            r#"
[scan]
inputs = ["src"]

[generator]
cmd = "{cmd}"

[output]
path = "dist/atomic.css"
"#
        ),
    );
}

fn args(dir: &Path) -> CliArgs {
    CliArgs {
        config: dir.join("Atomizer.toml"),
        ..CliArgs::default()
    }
}

#[tokio::test]
async fn single_build_writes_then_leaves_identical_output_alone() -> TestResult {
    init_tracing();
    let dir = tempdir()?;
    write_config(dir.path(), "cat");
    write_file(dir.path(), "src/a.html", r#"<div class="Bgc(#0af)"></div>"#);
    let output = dir.path().join("dist/atomic.css");

    with_timeout(run(args(dir.path()))).await?;
    let first = fs::read_to_string(&output)?;
    assert!(first.contains("Bgc(#0af)"), "{first}");
    let inode = fs::metadata(&output)?.ino();

    // Same corpus: success, and the file is not replaced.
    with_timeout(run(args(dir.path()))).await?;
    assert_eq!(fs::metadata(&output)?.ino(), inode);
    assert_eq!(fs::read_to_string(&output)?, first);

    // Different corpus: rewritten.
    write_file(dir.path(), "src/a.html", r#"<div class="C(red)"></div>"#);
    with_timeout(run(args(dir.path()))).await?;
    let second = fs::read_to_string(&output)?;
    assert!(second.contains("C(red)") && !second.contains("Bgc(#0af)"), "{second}");

    // Only the stylesheet is left in the output directory.
    assert_eq!(fs::read_dir(dir.path().join("dist"))?.count(), 1);
    Ok(())
}

#[tokio::test]
async fn failing_generator_makes_the_run_fail() {
    init_tracing();
    let dir = tempdir().unwrap();
    write_config(dir.path(), "echo 'unknown rule' >&2; exit 3");
    write_file(dir.path(), "src/a.html", r#"<div class="Bgc(#0af)"></div>"#);

    let result = with_timeout(run(args(dir.path()))).await;

    match result {
        Err(AtomizerError::GenerationError(msg)) => assert!(msg.contains("exited with 3"), "{msg}"),
        other => panic!("expected GenerationError, got {other:?}"),
    }
    assert!(!dir.path().join("dist/atomic.css").exists());
}
