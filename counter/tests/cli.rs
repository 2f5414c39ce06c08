// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

use std::{fs, path::Path, process::Command};

use assert_cmd::{assert::OutputAssertExt as _, cargo::cargo_bin};
use predicates::prelude::*;

fn fake_counter(root: &Path) {
    let count0 = root.join("count0");
    fs::create_dir_all(&count0).unwrap();
    fs::create_dir_all(root.join("signal0")).unwrap();

    fs::write(root.join("num_counts"), "1\n").unwrap();
    fs::write(root.join("num_signals"), "1\n").unwrap();

    fs::write(count0.join("count"), "1234\n").unwrap();
    fs::write(count0.join("ceiling"), "4294967295\n").unwrap();
    fs::write(count0.join("enable"), "1\n").unwrap();
    fs::write(count0.join("function"), "increase\n").unwrap();
    fs::write(
        count0.join("function_available"),
        "increase\nquadrature x4\n",
    )
    .unwrap();
    fs::write(count0.join("name"), "Count 0\n").unwrap();
    fs::write(root.join("signal0/name"), "Signal A\n").unwrap();
}

#[test]
fn help() {
    Command::new(cargo_bin("counter-watch"))
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--ceiling"))
        .stdout(predicate::str::contains("--interval"));
}

#[test]
fn unknown_function_is_rejected() {
    Command::new(cargo_bin("counter-watch"))
        .args(["--function", "quadrature x3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown counter function"));
}

#[test]
fn zero_interval_is_rejected() {
    Command::new(cargo_bin("counter-watch"))
        .args(["--interval", "0"])
        .assert()
        .failure();
}

#[test]
fn missing_sysfs_directory() {
    let root = tempfile::tempdir().unwrap();

    Command::new(cargo_bin("counter-watch"))
        .arg("--sysfs-dir")
        .arg(root.path().join("counter7"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("num_counts"));
}

#[test]
fn configures_then_fails_on_missing_device() {
    let root = tempfile::tempdir().unwrap();
    let sysfs = root.path().join("counter0");
    fake_counter(&sysfs);

    Command::new(cargo_bin("counter-watch"))
        .arg("--sysfs-dir")
        .arg(&sysfs)
        .arg("--device")
        .arg(root.path().join("dev-counter0"))
        .args(["--ceiling", "99"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("count0/ceiling: 99"))
        .stdout(predicate::str::contains("count0/function: quadrature x4"))
        .stdout(predicate::str::contains("signal0/name: Signal A"))
        .stderr(predicate::str::contains("failed to open counter device"));

    let count0 = sysfs.join("count0");
    assert_eq!(fs::read_to_string(count0.join("enable")).unwrap(), "0");
    assert_eq!(fs::read_to_string(count0.join("count")).unwrap(), "0");
}
