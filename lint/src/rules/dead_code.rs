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

//! `dead-code` (info): an IDB predicate that is never consumed as a
//! premise by any other rule (it may still be a clause head, but nothing
//! ever queries it).
//!
//! Only rewriter helper predicates (the `internal()`-marked `__tmp`
//! declarations produced by `stratalog-analysis::rewriter`) are exempt.
//! An ordinary predicate that merely lacks an explicit `Decl` is still
//! user-facing and must be flagged like any other.

use fxhash::FxHashSet;
use stratalog_ast::{PredicateSym, Severity};

use crate::findings::Finding;
use crate::rule::{LintRule, RuleInput};
use crate::rules::{is_rewriter_helper, literal_predicate};

pub struct DeadCodeRule;

impl LintRule for DeadCodeRule {
    fn name(&self) -> &'static str {
        "dead-code"
    }

    fn description(&self) -> &'static str {
        "IDB predicate is never consumed as a premise by another rule"
    }

    fn default_severity(&self) -> Severity {
        Severity::Info
    }

    fn check(&self, input: &RuleInput, _config: &crate::config::LintConfig) -> Vec<Finding> {
        let mut consumed: FxHashSet<PredicateSym> = FxHashSet::default();
        for clause in &input.unit.clauses {
            for premise in &clause.premises {
                if let Some(p) = literal_predicate(premise) {
                    consumed.insert(p.clone());
                }
            }
        }

        let mut preds: Vec<&PredicateSym> = input.info.idb_predicates.iter().collect();
        preds.sort();
        preds
            .into_iter()
            .filter(|p| !is_rewriter_helper(&input.info.decls[p]))
            .filter(|p| !consumed.contains(p))
            .map(|p| {
                Finding::new(self.name(), self.default_severity(), format!("predicate `{p}` is never consumed by another rule"))
                    .with_predicate(p.to_string())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::config::LintConfig;
    use crate::linter::Linter;

    #[test]
    fn flags_an_idb_predicate_nobody_queries() {
        let linter = Linter::new(LintConfig::default());
        let unit =
            stratalog_parse::parse_source_unit("bar(/x).\ndead(X) :- bar(X).\n".as_bytes(), "test").unwrap();
        let findings = linter.lint_unit(&unit, "test");
        assert_eq!(findings.iter().filter(|f| f.rule == "dead-code").count(), 1);
        assert!(findings.iter().any(|f| f.rule == "dead-code" && f.predicate.as_deref() == Some("dead/1")));
    }

    #[test]
    fn filtered_out_when_min_severity_is_warning() {
        let mut config = LintConfig::default();
        config.min_severity = stratalog_ast::Severity::Warning;
        let linter = Linter::new(config);
        let unit =
            stratalog_parse::parse_source_unit("bar(/x).\ndead(X) :- bar(X).\n".as_bytes(), "test").unwrap();
        let findings = linter.lint_unit(&unit, "test");
        assert!(!findings.iter().any(|f| f.rule == "dead-code"));
    }

    #[test]
    fn rewriter_helper_predicate_is_exempt_even_when_unconsumed() {
        let linter = Linter::new(LintConfig::default());
        let unit = stratalog_parse::parse_source_unit(
            "Decl count1__tmp(X) descr[internal()].\nbar(/x).\ncount1__tmp(X) :- bar(X).\n".as_bytes(),
            "test",
        )
        .unwrap();
        let findings = linter.lint_unit(&unit, "test");
        assert!(!findings.iter().any(|f| f.rule == "dead-code"));
    }

    #[test]
    fn predicate_used_as_a_premise_is_not_dead() {
        let linter = Linter::new(LintConfig::default());
        let unit = stratalog_parse::parse_source_unit(
            "bar(/x).\nmid(X) :- bar(X).\ntop(X) :- mid(X).\n".as_bytes(),
            "test",
        )
        .unwrap();
        let findings = linter.lint_unit(&unit, "test");
        assert!(!findings.iter().any(|f| f.rule == "dead-code" && f.predicate.as_deref() == Some("mid/1")));
    }
}
