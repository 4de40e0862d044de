use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;

fn get_path(filename: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests/agp");
    path.push(filename);
    path
}

#[test]
fn command_agp_check() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("anchain")?;
    cmd.arg("agp")
        .arg("check")
        .arg(get_path("draft.agp"))
        .assert()
        .success()
        .stdout("scaffold_1\t250\nscaffold_2\t90\n");

    Ok(())
}

#[test]
fn command_agp_check_overlap() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("anchain")?;
    cmd.arg("agp")
        .arg("check")
        .arg(get_path("overlap.agp"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Gap or overlap in contig"))
        .stderr(predicate::str::contains("ctgB"));

    Ok(())
}

#[test]
fn command_agp_lift() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("anchain")?;
    let output = cmd
        .arg("agp")
        .arg("lift")
        .arg(get_path("map/map"))
        .arg("--map-dir")
        .arg(get_path("map"))
        .output()?;
    let stdout = String::from_utf8(output.stdout)?;

    // rat is a draft genome; scaffold_9 is not in its AGP and 110-140 lies in a gap
    let expected = "\
1\thuman\tchr1\t1000\t1060\t+
1\trat\tcontig_1\t90\t100\t+\tcontig_2\t80\t100\t-
2\thuman\tchr1\t3540\t3600\t-
2\trat\tcontig_2\t80\t100\t+\tcontig_1\t90\t100\t-
3\trat\tcontig_3\t10\t70\t+
4\thuman\tchr2\t0\t90\t+
4\trat\tscaffold_9\t5\t10\t+
5\thuman\tchr3\t1\t2\t+
5\trat
";
    assert_eq!(stdout, expected);

    Ok(())
}

#[test]
fn command_agp_lift_bad_row() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("anchain")?;
    cmd.arg("agp")
        .arg("lift")
        .arg("--map-dir")
        .arg(get_path("map"))
        .write_stdin("1\tchr1\t1000\t1060\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("four fields per genome"));

    Ok(())
}
