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

//! Argument parsing and orchestration for `stratalog`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use stratalog_ast::Severity;
use stratalog_lint::{LintConfig, LintError, Linter, OutputFormat, TomlConfig};

/// Lints Stratalog source files for style and structural issues.
#[derive(Parser, Debug)]
#[command(name = "stratalog")]
#[command(about = "Lint Stratalog source files", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Source files to lint.
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Maximum premise count before `overly-complex-rule` fires.
    #[arg(long)]
    max_premises: Option<usize>,

    /// Comma-separated list of rule names to disable.
    #[arg(long, value_delimiter = ',')]
    disable: Vec<String>,

    /// Minimum severity to report.
    #[arg(long, value_parser = ["info", "warning", "error"], default_value = "info")]
    min_severity: String,

    /// Output format.
    #[arg(long, value_parser = ["text", "json"], default_value = "text")]
    format: String,
}

/// Parses arguments, runs the linter, and prints the findings. Returns
/// `Ok(true)` if any finding at or above `--min-severity` was reported
/// (the caller maps this to exit code 1), `Ok(false)` for a clean run.
pub fn run_cli() -> Result<bool> {
    let cli = Cli::parse();

    let mut config = LintConfig::default();
    if let Ok(toml_src) = std::fs::read_to_string("stratalog.toml") {
        let file = TomlConfig::from_str(&toml_src).context("parsing stratalog.toml")?;
        config.merge_toml(&file);
    }
    if let Some(max) = cli.max_premises {
        config.max_premises = max;
    }
    config.disabled_rules.extend(cli.disable.iter().cloned());
    config.min_severity = cli.min_severity.parse::<Severity>().expect("Severity::from_str is infallible");

    let format: OutputFormat = cli.format.parse().expect("validated by clap's value_parser");

    let linter = Linter::new(config);
    let mut findings = Vec::new();
    for path in &cli.paths {
        match linter.lint_file(path) {
            Ok(mut file_findings) => findings.append(&mut file_findings),
            Err(LintError::Io { path, source }) => {
                return Err(anyhow::anyhow!("failed to read `{path}`: {source}"));
            }
            Err(LintError::Parse { path, source }) => {
                return Err(anyhow::anyhow!("failed to parse `{path}`: {source}"));
            }
        }
    }

    let rendered = stratalog_lint::render(&findings, format);
    if !rendered.is_empty() {
        println!("{rendered}");
    }

    Ok(!findings.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_disable_list_and_flags() {
        let cli = Cli::parse_from([
            "stratalog",
            "a.slg",
            "--max-premises",
            "4",
            "--disable",
            "missing-doc,dead-code",
            "--min-severity",
            "warning",
            "--format",
            "json",
        ]);
        assert_eq!(cli.max_premises, Some(4));
        assert_eq!(cli.disable, vec!["missing-doc", "dead-code"]);
        assert_eq!(cli.min_severity, "warning");
        assert_eq!(cli.format, "json");
    }
}
