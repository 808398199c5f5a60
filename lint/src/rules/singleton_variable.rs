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

//! `singleton-variable` (warning): a variable referenced by exactly one
//! term in a clause, and not underscore-prefixed.

use stratalog_ast::{vars, Severity};

use crate::findings::Finding;
use crate::rule::{LintRule, RuleInput};

pub struct SingletonVariableRule;

impl LintRule for SingletonVariableRule {
    fn name(&self) -> &'static str {
        "singleton-variable"
    }

    fn description(&self) -> &'static str {
        "variable appears in exactly one term of a clause"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, input: &RuleInput, _config: &crate::config::LintConfig) -> Vec<Finding> {
        let mut findings = Vec::new();
        for clause in &input.unit.clauses {
            let counts = vars::term_reference_counts(clause);
            let mut singletons: Vec<_> =
                counts.into_iter().filter(|(v, count)| *count < 2 && !v.is_anonymous()).collect();
            singletons.sort_by(|a, b| a.0.cmp(&b.0));
            for (v, _) in singletons {
                findings.push(
                    Finding::new(
                        self.name(),
                        self.default_severity(),
                        format!("variable `{v}` appears only once in clause `{}`", clause.head),
                    )
                    .with_predicate(clause.head.predicate.to_string()),
                );
            }
        }
        findings
    }
}

#[cfg(test)]
mod tests {
    use crate::linter::Linter;

    #[test]
    fn flags_singleton_variable() {
        let linter = Linter::new(Default::default());
        let unit = stratalog_parse::parse_source_unit(
            "bar(/x, /y).\nfoo(X) :- bar(X, Typo).\n".as_bytes(),
            "test",
        )
        .unwrap();
        let findings = linter.lint_unit(&unit, "test");
        assert!(findings
            .iter()
            .any(|f| f.rule == "singleton-variable" && f.message.contains("Typo")));
    }

    #[test]
    fn anonymous_wildcard_is_exempt() {
        let linter = Linter::new(Default::default());
        let unit =
            stratalog_parse::parse_source_unit("bar(/x, /y).\nfoo(X) :- bar(X, _).\n".as_bytes(), "test")
                .unwrap();
        let findings = linter.lint_unit(&unit, "test");
        assert!(!findings.iter().any(|f| f.rule == "singleton-variable"));
    }
}
