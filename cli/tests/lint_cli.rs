// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! End-to-end checks of the `stratalog` binary against real files on disk.

use std::fs;
use std::process::Command;

use tempfile::tempdir;

fn bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_stratalog"))
}

#[test]
fn clean_file_exits_zero() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("clean.slg");
    fs::write(&file, "Decl bar(X) descr[doc(\"a bar\")] bound [/name].\nbar(/x).\nfoo(X) :- bar(X).\n").unwrap();

    let output = bin().arg(&file).output().unwrap();
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
}

#[test]
fn file_with_findings_exits_one_and_prints_text() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("orphan.slg");
    fs::write(&file, "Decl orphan(X).\nbar(/x).\n").unwrap();

    let output = bin().arg(&file).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("unused-predicate"));
}

#[test]
fn disable_flag_suppresses_a_rule() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("orphan.slg");
    fs::write(&file, "Decl orphan(X).\nbar(/x).\n").unwrap();

    let output = bin().arg(&file).arg("--disable").arg("unused-predicate").output().unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("unused-predicate"));
}

#[test]
fn json_format_emits_an_array() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("orphan.slg");
    fs::write(&file, "Decl orphan(X).\nbar(/x).\n").unwrap();

    let output = bin().arg(&file).arg("--format").arg("json").output().unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.trim_start().starts_with('['));
}

#[test]
fn malformed_file_exits_two() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("broken.slg");
    fs::write(&file, "foo(X) :- .\n").unwrap();

    let output = bin().arg(&file).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
}
