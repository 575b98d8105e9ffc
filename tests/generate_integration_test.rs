use assert_cmd::cargo::cargo_bin_cmd;
use assert_fs::TempDir;
use assert_fs::prelude::*;
use flate2::Compression;
use flate2::write::GzEncoder;
use predicates::prelude::*;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

const MEMBER: &str = "google-cloud-sdk/data/cli/gcloud_completions.py";

const TREE_JSON: &str = r#"{
  "commands": {
    "config": {
      "commands": {
        "set": {"commands": {}, "flags": ["--format"]}
      },
      "flags": []
    },
    "auth": {
      "commands": {
        "login": {"commands": {}, "flags": ["--no-launch-browser"]}
      },
      "flags": ["--account"]
    }
  },
  "flags": ["--verbosity"]
}"#;

const SDK_MODULE: &str = r#"# -*- coding: utf-8 -*-
"""Static completion CLI tree."""

STATIC_COMPLETION_CLI_TREE = {
  "commands": {
    "config": {
      "commands": {
        "set": {"commands": {}, "flags": {"--format": "value"}}
      },
      "flags": {}
    }
  },
  "flags": {"--verbosity": ["debug", "info"]}
}
"#;

/// Build a gzip'd tarball holding the given members
fn build_sdk_archive(dir: &Path, members: &[(&str, &str)]) -> PathBuf {
    let path = dir.join("google-cloud-sdk.tar.gz");
    let file = File::create(&path).unwrap();
    let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));
    for (name, contents) in members {
        let mut header = tar::Header::new_gnu();
        header.set_size(contents.len() as u64);
        header.set_mode(0o644);
        builder.append_data(&mut header, name, contents.as_bytes()).unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap();
    path
}

fn fgc(config_home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("fgc");
    cmd.env("XDG_CONFIG_HOME", config_home).env_remove("FGC_CONFIG");
    cmd
}

#[test]
fn test_tree_document_to_stdout() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let tree = temp.child("tree.json");
    tree.write_str(TREE_JSON)?;

    let output = fgc(temp.path()).arg("--tree").arg(tree.path()).arg("--stdout").output()?;

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.starts_with("function __gcloud_needs_command\n"));
    assert!(stdout.contains("complete -c gcloud -f -n __gcloud_needs_command -a 'config auth'\n"));
    assert!(stdout.contains("complete -c gcloud -f -n '__gcloud_starts_with config' -a 'set'\n"));
    assert!(stdout.contains("complete -c gcloud -f -n '__gcloud_starts_with config set' -l format -l verbosity"));
    assert!(
        stdout.contains("complete -c gcloud -f -n '__gcloud_starts_with auth login' -l no-launch-browser -l verbosity")
    );
    // auth's own flag stays with auth
    assert!(!stdout.contains("config set' -l format -l verbosity -l account"));

    Ok(())
}

#[test]
fn test_output_directory_gets_default_file_name() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let tree = temp.child("tree.json");
    tree.write_str(TREE_JSON)?;
    let completions = temp.child("completions");
    completions.create_dir_all()?;

    fgc(temp.path())
        .arg("-t")
        .arg(tree.path())
        .arg("-o")
        .arg(completions.path())
        .assert()
        .success();

    completions
        .child("gcloud.fish")
        .assert(predicate::str::contains("__gcloud_starts_with config set"));

    Ok(())
}

#[test]
fn test_output_file_creates_parent_directories() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let tree = temp.child("tree.json");
    tree.write_str(TREE_JSON)?;
    let target = temp.child("a").child("b").child("gcloud-custom.fish");

    fgc(temp.path())
        .arg("-t")
        .arg(tree.path())
        .arg("-o")
        .arg(target.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("Wrote"));

    target.assert(predicate::path::is_file());
    target.assert(predicate::str::starts_with("function __gcloud_needs_command"));

    Ok(())
}

// dirs only honours XDG_CONFIG_HOME on Linux
#[cfg(target_os = "linux")]
#[test]
fn test_default_output_under_config_home() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let tree = temp.child("tree.json");
    tree.write_str(TREE_JSON)?;

    fgc(temp.path()).arg("-t").arg(tree.path()).assert().success();

    temp.child("fish")
        .child("completions")
        .child("gcloud.fish")
        .assert(predicate::path::is_file());

    Ok(())
}

#[test]
fn test_subset_removes_other_commands() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let tree = temp.child("tree.json");
    tree.write_str(TREE_JSON)?;

    let output = fgc(temp.path())
        .arg("-t")
        .arg(tree.path())
        .arg("--stdout")
        .arg("-s")
        .arg("config")
        .output()?;

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    assert!(!stdout.contains("auth"));
    assert!(!stdout.contains("login"));
    assert!(stdout.contains("-n __gcloud_needs_command -a 'config'\n"));
    assert!(stdout.contains("'__gcloud_starts_with config set' -l format -l verbosity"));

    Ok(())
}

#[test]
fn test_subset_with_full_preamble() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let tree = temp.child("tree.json");
    tree.write_str(TREE_JSON)?;

    let output = fgc(temp.path())
        .arg("-t")
        .arg(tree.path())
        .args(["--stdout", "--preamble-commands", "all", "-s", "config"])
        .output()?;

    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("-n __gcloud_needs_command -a 'config auth'\n"));
    assert!(!stdout.contains("__gcloud_starts_with auth"));

    Ok(())
}

#[test]
fn test_local_sdk_archive() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let archive = build_sdk_archive(
        temp.path(),
        &[("google-cloud-sdk/bin/gcloud", "#!/bin/sh\n"), (MEMBER, SDK_MODULE)],
    );
    let target = temp.child("gcloud.fish");

    fgc(temp.path())
        .arg("--sdk")
        .arg(&archive)
        .arg("-o")
        .arg(target.path())
        .assert()
        .success();

    let script = fs::read_to_string(target.path())?;
    assert!(script.contains("complete -c gcloud -f -n '__gcloud_starts_with config set' -l format -l verbosity"));
    assert!(archive.exists(), "a user-supplied archive must not be removed");

    Ok(())
}

#[test]
fn test_missing_member_fails_without_output() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let archive = build_sdk_archive(temp.path(), &[("google-cloud-sdk/bin/gcloud", "#!/bin/sh\n")]);
    let target = temp.child("gcloud.fish");

    fgc(temp.path())
        .arg("--sdk")
        .arg(&archive)
        .arg("-o")
        .arg(target.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found in archive"));

    target.assert(predicate::path::missing());

    Ok(())
}

#[test]
fn test_malformed_tree_keeps_previous_output() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let tree = temp.child("tree.json");
    tree.write_str(r#"{"commands": {"config": {"commands": {}}}, "flags": []}"#)?;
    let target = temp.child("gcloud.fish");
    target.write_str("previous contents")?;

    fgc(temp.path())
        .arg("-t")
        .arg(tree.path())
        .arg("-o")
        .arg(target.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Malformed command tree"));

    target.assert("previous contents");

    Ok(())
}

#[test]
fn test_config_file_program_name() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let tree = temp.child("tree.json");
    tree.write_str(TREE_JSON)?;
    let config = temp.child("fgc.yml");
    config.write_str("program: gcloud-beta\n")?;

    let output = fgc(temp.path())
        .arg("-c")
        .arg(config.path())
        .arg("-t")
        .arg(tree.path())
        .arg("--stdout")
        .output()?;

    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.starts_with("function __gcloud-beta_needs_command\n"));
    assert!(stdout.contains("complete -c gcloud-beta -f -n '__gcloud-beta_starts_with config' -a 'set'"));

    Ok(())
}

#[test]
fn test_output_is_byte_identical_across_runs() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let tree = temp.child("tree.json");
    tree.write_str(TREE_JSON)?;

    let first = fgc(temp.path()).arg("-t").arg(tree.path()).arg("--stdout").output()?;
    let second = fgc(temp.path()).arg("-t").arg(tree.path()).arg("--stdout").output()?;

    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);

    Ok(())
}
