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

//! `overly-complex-rule` (info): a clause whose premise count exceeds the
//! configurable threshold (default 8).

use stratalog_ast::Severity;

use crate::config::LintConfig;
use crate::findings::Finding;
use crate::rule::{LintRule, RuleInput};

pub struct OverlyComplexRuleRule;

impl LintRule for OverlyComplexRuleRule {
    fn name(&self) -> &'static str {
        "overly-complex-rule"
    }

    fn description(&self) -> &'static str {
        "number of premises exceeds the configured threshold"
    }

    fn default_severity(&self) -> Severity {
        Severity::Info
    }

    fn check(&self, input: &RuleInput, config: &LintConfig) -> Vec<Finding> {
        input
            .unit
            .clauses
            .iter()
            .filter(|c| c.premises.len() > config.max_premises)
            .map(|c| {
                Finding::new(
                    self.name(),
                    self.default_severity(),
                    format!(
                        "clause `{}` has {} premises, exceeding the threshold of {}",
                        c.head,
                        c.premises.len(),
                        config.max_premises
                    ),
                )
                .with_predicate(c.head.predicate.to_string())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linter::Linter;

    #[test]
    fn flags_a_clause_exceeding_the_threshold() {
        let mut config = LintConfig::default();
        config.max_premises = 2;
        let linter = Linter::new(config);
        let unit = stratalog_parse::parse_source_unit(
            "a(/1).\nb(/1).\nc(/1).\nd(X) :- a(X), b(X), c(X).\n".as_bytes(),
            "test",
        )
        .unwrap();
        let findings = linter.lint_unit(&unit, "test");
        assert!(findings.iter().any(|f| f.rule == "overly-complex-rule"));
    }

    #[test]
    fn default_threshold_is_eight() {
        let linter = Linter::new(LintConfig::default());
        let unit = stratalog_parse::parse_source_unit(
            "a(/1).\nb(/1).\nc(/1).\nd(X) :- a(X), b(X), c(X).\n".as_bytes(),
            "test",
        )
        .unwrap();
        let findings = linter.lint_unit(&unit, "test");
        assert!(!findings.iter().any(|f| f.rule == "overly-complex-rule"));
    }
}
