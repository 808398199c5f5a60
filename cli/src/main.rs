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

//! Thin wrapper around [`stratalog_cli::run_cli`], mapping its result to a
//! process exit code.
//!
//! # Exit codes
//! - `0` — ran clean, no finding at or above `--min-severity`
//! - `1` — findings were reported
//! - `2` — I/O or parse failure

fn main() {
    env_logger::init();
    match stratalog_cli::run_cli() {
        Ok(had_findings) => std::process::exit(if had_findings { 1 } else { 0 }),
        Err(e) => {
            eprintln!("error: {e:#}");
            std::process::exit(2);
        }
    }
}
