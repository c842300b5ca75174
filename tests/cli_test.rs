use anyhow::Result;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn archdiff(temp_dir: &TempDir) -> Result<Command> {
    let mut cmd = Command::cargo_bin("archdiff")?;
    cmd.env_remove("RUST_LOG")
        .env("NO_COLOR", "1")
        .env("ARCHDIFF_CONFIG", temp_dir.path().join("config.toml"))
        .env("ARCHDIFF_ROOT", temp_dir.path().join("root"))
        .env("ARCHDIFF_DBPATH", temp_dir.path().join("db"))
        .env("ARCHDIFF_REPO", temp_dir.path().join("mirror"));
    Ok(cmd)
}

#[test]
fn test_collections_lists_names() -> Result<()> {
    let temp_dir = TempDir::new()?;

    archdiff(&temp_dir)?
        .arg("collections")
        .assert()
        .success()
        .stdout(predicate::str::contains("missing-in-repo"))
        .stdout(predicate::str::contains("modified-backups"))
        .stdout(predicate::str::contains("deleted"));

    Ok(())
}

#[test]
fn test_unknown_collection_is_usage_error() -> Result<()> {
    let temp_dir = TempDir::new()?;

    archdiff(&temp_dir)?
        .args(["ls", "modified"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("modified"));

    Ok(())
}

#[test]
fn test_missing_package_database_fails() -> Result<()> {
    let temp_dir = TempDir::new()?;
    fs::create_dir_all(temp_dir.path().join("root"))?;

    archdiff(&temp_dir)?
        .args(["ls", "unpackaged"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("package database"));

    Ok(())
}

#[test]
fn test_ls_prints_unpackaged_files() -> Result<()> {
    let temp_dir = TempDir::new()?;
    fs::create_dir_all(temp_dir.path().join("root/etc"))?;
    fs::create_dir_all(temp_dir.path().join("db/local"))?;
    fs::write(temp_dir.path().join("root/etc/local.conf"), "x")?;

    archdiff(&temp_dir)?
        .args(["--quiet", "ls", "unpackaged", "package"])
        .assert()
        .success()
        .stdout(predicate::str::contains("unpackaged\n  etc/local.conf\npackage\n"));

    Ok(())
}

#[test]
fn test_invalid_config_fails() -> Result<()> {
    let temp_dir = TempDir::new()?;
    fs::write(
        temp_dir.path().join("config.toml"),
        "[performance]\nparallel_threads = 0\n",
    )?;

    archdiff(&temp_dir)?
        .args(["ls", "all"])
        .assert()
        .failure();

    Ok(())
}

#[test]
fn test_relative_repo_is_rejected() -> Result<()> {
    let temp_dir = TempDir::new()?;
    fs::create_dir_all(temp_dir.path().join("root"))?;
    fs::create_dir_all(temp_dir.path().join("db/local"))?;

    archdiff(&temp_dir)?
        .args(["--repo", "mirror", "ls", "all"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Repo must be an absolute path"));

    Ok(())
}

#[test]
fn test_completion_generates_script() -> Result<()> {
    let temp_dir = TempDir::new()?;

    archdiff(&temp_dir)?
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("archdiff"));

    Ok(())
}
