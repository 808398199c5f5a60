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

//! Orchestration: parse, analyze, convert the analyzer's own diagnostics
//! into findings, then run the rule registry over what's left.
//!
//! `AnalysisError` is not fatal to the lint run: it becomes a single
//! error-severity finding and subsequent rules are skipped for that unit.
//! A parse failure is the one truly fatal case — it aborts processing of
//! the file, so it stays an `Err` rather than becoming a `Finding`.

use stratalog_ast::{Severity, SourceUnit};

use crate::config::LintConfig;
use crate::findings::Finding;
use crate::registry::DEFAULT_RULES;
use crate::rule::RuleInput;

/// The one truly fatal failure mode: the input couldn't even be parsed.
#[derive(thiserror::Error, Debug)]
pub enum LintError {
    #[error("failed to read `{path}`: {source}")]
    Io { path: String, #[source] source: std::io::Error },
    #[error("failed to parse `{path}`: {source}")]
    Parse { path: String, #[source] source: anyhow::Error },
}

pub struct Linter {
    config: LintConfig,
}

impl Linter {
    pub fn new(config: LintConfig) -> Self {
        Linter { config }
    }

    /// Lints a single file on disk, tagging every finding with its path.
    pub fn lint_file(&self, path: &std::path::Path) -> Result<Vec<Finding>, LintError> {
        let display = path.display().to_string();
        let bytes = std::fs::read(path).map_err(|source| LintError::Io { path: display.clone(), source })?;
        let unit = stratalog_parse::parse_source_unit(bytes.as_slice(), &display)
            .map_err(|source| LintError::Parse { path: display.clone(), source })?;
        Ok(self.lint_unit(&unit, &display))
    }

    /// Lints an already-parsed source unit, tagging every finding with
    /// `file`. Never fails: analysis/stratification failures become
    /// findings rather than errors.
    pub fn lint_unit(&self, unit: &SourceUnit, file: &str) -> Vec<Finding> {
        let mut findings = match stratalog_analysis::analyze(unit) {
            Ok(info) => self.lint_analyzed(unit, &info),
            Err(stratalog_analysis::AnalysisError::UnstratifiableProgram(cycle)) => {
                log::warn!("{file}: unstratifiable, skipping rule checks");
                vec![Finding::new(
                    "stratification",
                    Severity::Error,
                    format!("program cannot be stratified: cycle through {cycle:?} carries a negation or aggregation edge"),
                )]
            }
            Err(other) => {
                log::warn!("{file}: analysis failed, skipping rule checks: {other}");
                vec![Finding::new("analysis", Severity::Error, other.to_string())]
            }
        };
        for f in &mut findings {
            f.file = Some(file.to_string());
        }
        findings.retain(|f| f.severity >= self.config.min_severity);
        findings
    }

    fn lint_analyzed(&self, unit: &SourceUnit, info: &stratalog_analysis::ProgramInfo) -> Vec<Finding> {
        let mut findings: Vec<Finding> = info
            .warnings
            .iter()
            .map(|w| Finding::new("temporal-recursion", w.severity, w.message.clone()).with_predicate(w.predicate.to_string()))
            .collect();

        let input = RuleInput { unit, info, pred_to_stratum: Some(&info.pred_to_stratum) };
        for rule in DEFAULT_RULES.iter() {
            if self.config.is_disabled(rule.name()) {
                continue;
            }
            let rule_findings = rule.check(&input, &self.config);
            if rule_findings.is_empty() {
                log::debug!("rule `{}` reported no findings", rule.name());
            }
            findings.extend(rule_findings);
        }
        findings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unstratifiable_program_yields_one_stratification_finding_and_skips_rules() {
        let linter = Linter::new(LintConfig::default());
        let unit = stratalog_parse::parse_source_unit("p(X) :- !p(X).\n".as_bytes(), "test").unwrap();
        let findings = linter.lint_unit(&unit, "test");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].rule, "stratification");
        assert_eq!(findings[0].severity, Severity::Error);
    }

    #[test]
    fn min_severity_filters_out_info_findings() {
        let mut config = LintConfig::default();
        config.min_severity = Severity::Error;
        let linter = Linter::new(config);
        let unit =
            stratalog_parse::parse_source_unit("Decl orphan(X).\nbar(/x).\n".as_bytes(), "test").unwrap();
        let findings = linter.lint_unit(&unit, "test");
        assert!(findings.iter().all(|f| f.severity == Severity::Error));
    }

    #[test]
    fn disabling_a_rule_removes_its_findings() {
        let mut config = LintConfig::default();
        config.disabled_rules.insert("unused-predicate".to_string());
        let linter = Linter::new(config);
        let unit = stratalog_parse::parse_source_unit("Decl orphan(X).\nbar(/x).\n".as_bytes(), "test").unwrap();
        let findings = linter.lint_unit(&unit, "test");
        assert!(!findings.iter().any(|f| f.rule == "unused-predicate"));
    }

    #[test]
    fn every_finding_is_tagged_with_the_file() {
        let linter = Linter::new(LintConfig::default());
        let unit = stratalog_parse::parse_source_unit("Decl orphan(X).\nbar(/x).\n".as_bytes(), "test").unwrap();
        let findings = linter.lint_unit(&unit, "my_file.slg");
        assert!(findings.iter().all(|f| f.file.as_deref() == Some("my_file.slg")));
    }
}
