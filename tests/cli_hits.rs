use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn get_path(filename: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests/hits");
    path.push(filename);
    path
}

#[test]
fn command_hits_combine() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("anchain")?;
    let output = cmd
        .arg("hits")
        .arg("combine")
        .arg(get_path("combine.blast8"))
        .output()?;
    let stdout = String::from_utf8(output.stdout)?;

    // 5-9: 3 + 4, 1e-6 * 1e-7; the overlapping third hit is dropped
    // 5-12: 2e-30 * 1e-30 is flushed to zero
    // 7-9: the second hit crosses the first
    let expected = "\
5\t9\t7\t1e-13
5\t5\t200\t1e-40
5\t12\t115\t0e+00
7\t9\t12\t5e-01
";
    assert_eq!(stdout, expected);

    Ok(())
}

#[test]
fn command_hits_combine_gz() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("anchain")?;
    let output = cmd
        .arg("hits")
        .arg("combine")
        .arg(get_path("combine.blast8.gz"))
        .output()?;
    let stdout = String::from_utf8(output.stdout)?;

    assert!(output.status.success());
    assert_eq!(stdout.lines().count(), 4);
    assert!(stdout.contains("5\t9\t7\t1e-13\n"));
    assert!(stdout.contains("5\t12\t115\t0e+00\n"));

    Ok(())
}

#[test]
fn command_hits_combine_identity() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("anchain")?;
    let output = cmd
        .arg("hits")
        .arg("combine")
        .arg(get_path("combine.blast8"))
        .arg("--identity")
        .output()?;
    let stdout = String::from_utf8(output.stdout)?;

    assert_eq!(stdout.lines().count(), 3);
    assert!(!stdout.contains("5\t5\t"));

    Ok(())
}

#[test]
fn command_hits_combine_stdin() -> anyhow::Result<()> {
    let input = "5\t9\t90.00\t10\t1\t0\t1\t10\t1\t10\t1e-6\t3\n\
                 5\t9\t90.00\t10\t1\t0\t11\t20\t11\t20\t1e-7\t4\n";

    let mut cmd = Command::cargo_bin("anchain")?;
    cmd.arg("hits")
        .arg("combine")
        .arg("stdin")
        .write_stdin(input)
        .assert()
        .success()
        .stdout("5\t9\t7\t1e-13\n");

    Ok(())
}

#[test]
fn command_hits_no_combine() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("anchain")?;
    let output = cmd
        .arg("hits")
        .arg("combine")
        .arg(get_path("combine.blast8"))
        .arg("--no-combine")
        .arg("-i")
        .output()?;
    let stdout = String::from_utf8(output.stdout)?;

    let expected = "\
5\t9\t3\t1e-06
5\t9\t4\t1e-07
5\t9\t9\t0.001
5\t12\t60\t2e-30
5\t12\t55\t1e-30
7\t9\t12\t0.5
7\t9\t10\t0.5
";
    assert_eq!(stdout, expected);

    Ok(())
}

#[test]
fn command_hits_combine_malformed() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("anchain")?;
    cmd.arg("hits")
        .arg("combine")
        .write_stdin("5\t9\t90.00\t10\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 1"))
        .stderr(predicate::str::contains("expected 12 fields"));

    Ok(())
}

#[test]
fn command_hits_constraints() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let output = temp.path().join("constraints");

    let mut cmd = Command::cargo_bin("anchain")?;
    cmd.arg("hits")
        .arg("constraints")
        .arg("--input-dir")
        .arg(get_path("input"))
        .arg("--map-dir")
        .arg(get_path("map"))
        .arg("-o")
        .arg(&output);
    cmd.assert().success();

    // rat anchors come from the map directory
    let expected = "\
1\t1\thuman\tchr1\t1000\t1030\t+\tmouse\tchr4\t1970\t2000\t-
1\t1\thuman\tchr1\t1030\t1060\t+\tmouse\tchr4\t1940\t1970\t-
2\t1\thuman\tchr1\t3540\t3600\t-\tmouse\tchr4\t5000\t5060\t+
3\t1\thuman\tchr2\t0\t30\t+\trat\tscaffold_1\t180\t210\t-
3\t1\thuman\tchr2\t60\t90\t+\trat\tscaffold_1\t90\t120\t-
";
    assert_eq!(fs::read_to_string(&output)?, expected);

    Ok(())
}

#[test]
fn command_hits_constraints_noncoding_parallel() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("anchain")?;
    let output = cmd
        .arg("hits")
        .arg("constraints")
        .arg("-i")
        .arg(get_path("input"))
        .arg("-m")
        .arg(get_path("map"))
        .arg("--noncoding")
        .arg("--parallel")
        .arg("2")
        .output()?;
    let stdout = String::from_utf8(output.stdout)?;

    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 6);
    assert_eq!(
        lines[3],
        "4\t0\thuman\tchr3\t100\t400\t+\tmouse\tchr5\t700\t1000\t-"
    );
    assert!(lines[4].starts_with("3\t1\thuman\tchr2\t0\t30\t"));

    Ok(())
}

#[test]
fn command_hits_constraints_missing_files() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let dir = temp.path();
    fs::write(dir.join("genomes"), "human\nmouse\n")?;
    fs::write(dir.join("pairwisehits"), "1\thuman\t5\tmouse\t9\n")?;

    // no anchors
    let mut cmd = Command::cargo_bin("anchain")?;
    cmd.arg("hits")
        .arg("constraints")
        .arg("-i")
        .arg(dir)
        .arg("-m")
        .arg(dir)
        .assert()
        .failure()
        .stderr(predicate::str::contains("human.anchors"));

    // anchors but no hits
    fs::copy(get_path("input/human.anchors"), dir.join("human.anchors"))?;
    fs::copy(get_path("input/mouse.anchors"), dir.join("mouse.anchors"))?;
    let mut cmd = Command::cargo_bin("anchain")?;
    cmd.arg("hits")
        .arg("constraints")
        .arg("-i")
        .arg(dir)
        .arg("-m")
        .arg(dir)
        .assert()
        .failure()
        .stderr(predicate::str::contains("genome pair human-mouse"))
        .stderr(predicate::str::contains("human-mouse.blat"));

    Ok(())
}

#[test]
fn command_hits_constraints_duplicate_pair() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let map_dir = temp.path();
    fs::write(map_dir.join("genomes"), "human mouse\n")?;
    fs::write(
        map_dir.join("pairwisehits"),
        "1\thuman\t5\tmouse\t9\n2\tmouse\t10\thuman\t5\n",
    )?;

    let mut cmd = Command::cargo_bin("anchain")?;
    cmd.arg("hits")
        .arg("constraints")
        .arg("-i")
        .arg(get_path("input"))
        .arg("-m")
        .arg(map_dir)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Duplicate candidate pair"));

    Ok(())
}
