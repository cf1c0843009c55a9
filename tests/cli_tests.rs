//! Integration tests for CLI execution using `assert_cmd`.
//!
//! These tests invoke the compiled binary against throwaway project trees
//! and check the files and streams it produces.

use anyhow::{Context, Result, ensure};
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use test_support::project_tree;

fn dolgen() -> Result<Command> {
    Command::cargo_bin("dolgen").context("locate dolgen binary")
}

#[test]
fn default_command_writes_build_ninja() -> Result<()> {
    let (_tmp, root) = project_tree(&["src/a.c", "src/sub/b.cpp"])?;
    dolgen()?.current_dir(&root).assert().success();

    let text = fs::read_to_string(root.join("build.ninja")).context("read manifest")?;
    ensure!(text.contains("build build/src/a.o: mwcc src/a.c"), "manifest: {text}");
    ensure!(text.contains("build out/main.dol: dol out/main.elf"), "manifest: {text}");
    Ok(())
}

#[test]
fn directory_flag_selects_project() -> Result<()> {
    let (_tmp, root) = project_tree(&["game/src/a.c"])?;
    dolgen()?
        .current_dir(&root)
        .args(["-C", "game", "generate", "custom.ninja"])
        .assert()
        .success();

    ensure!(root.join("game/custom.ninja").is_file(), "output not written under -C");
    ensure!(!root.join("custom.ninja").exists(), "output written outside -C");
    Ok(())
}

#[test]
fn dash_streams_manifest_to_stdout() -> Result<()> {
    let (_tmp, root) = project_tree(&["src/a.c"])?;
    dolgen()?
        .current_dir(&root)
        .args(["generate", "-"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("# Generated by dolgen"))
        .stdout(predicate::str::contains("rule mwcc"));

    ensure!(!root.join("-").exists(), "generate - should not create a file named '-'");
    ensure!(!root.join("build.ninja").exists(), "generate - should not write build.ninja");
    Ok(())
}

#[test]
fn sources_lists_object_mapping() -> Result<()> {
    let (_tmp, root) = project_tree(&["src/b.cpp", "src/a.c"])?;
    dolgen()?
        .current_dir(&root)
        .arg("sources")
        .assert()
        .success()
        .stdout("src/a.c -> build/src/a.o\nsrc/b.cpp -> build/src/b.o\n");
    Ok(())
}

#[test]
fn config_file_overrides_layout() -> Result<()> {
    let (_tmp, root) = project_tree(&["code/a.c"])?;
    fs::write(
        root.join("dolgen.toml"),
        "source_root = \"code\"\nbuild_dir = \"obj\"\n",
    )
    .context("write config")?;
    dolgen()?
        .current_dir(&root)
        .arg("sources")
        .assert()
        .success()
        .stdout("code/a.c -> obj/code/a.o\n");
    Ok(())
}

#[test]
fn missing_explicit_config_fails() -> Result<()> {
    let (_tmp, root) = project_tree(&["src/a.c"])?;
    dolgen()?
        .current_dir(&root)
        .args(["--config", "nope.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope.toml"));
    ensure!(!root.join("build.ninja").exists(), "no manifest on failure");
    Ok(())
}

#[test]
fn collision_fails_without_touching_existing_manifest() -> Result<()> {
    let (_tmp, root) = project_tree(&["src/a.c", "src/a.cpp"])?;
    let manifest = root.join("build.ninja");
    fs::write(&manifest, "previous\n").context("seed manifest")?;

    dolgen()?
        .current_dir(&root)
        .assert()
        .failure()
        .stderr(predicate::str::contains("build/src/a.o"));

    let text = fs::read_to_string(&manifest).context("read manifest")?;
    ensure!(text == "previous\n", "existing manifest was modified: {text}");
    Ok(())
}

#[test]
fn empty_source_tree_fails() -> Result<()> {
    let (_tmp, root) = project_tree(&["src/"])?;
    dolgen()?
        .current_dir(&root)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no_sources"));
    Ok(())
}
