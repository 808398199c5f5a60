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

//! `unused-predicate` (warning): a declared predicate never referenced as
//! a clause head (fact or rule) or a premise anywhere in the unit.

use fxhash::FxHashSet;
use stratalog_ast::{PredicateSym, Severity};

use crate::findings::Finding;
use crate::rule::{LintRule, RuleInput};
use crate::rules::{is_internal, literal_predicate};

pub struct UnusedPredicateRule;

impl LintRule for UnusedPredicateRule {
    fn name(&self) -> &'static str {
        "unused-predicate"
    }

    fn description(&self) -> &'static str {
        "predicate is declared but never referenced in any rule head, premise, or fact"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, input: &RuleInput, _config: &crate::config::LintConfig) -> Vec<Finding> {
        let mut referenced: FxHashSet<PredicateSym> = FxHashSet::default();
        for clause in &input.unit.clauses {
            referenced.insert(clause.head.predicate.clone());
            for premise in &clause.premises {
                if let Some(p) = literal_predicate(premise) {
                    referenced.insert(p.clone());
                }
            }
        }

        let mut preds: Vec<&PredicateSym> = input.info.decls.keys().collect();
        preds.sort();
        preds
            .into_iter()
            .filter(|p| !is_internal(&input.info.decls[p]))
            .filter(|p| !referenced.contains(p))
            .map(|p| {
                Finding::new(self.name(), self.default_severity(), format!("predicate `{p}` is never referenced"))
                    .with_predicate(p.to_string())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::linter::Linter;

    #[test]
    fn flags_a_declared_but_unreferenced_predicate() {
        let linter = Linter::new(Default::default());
        let findings = linter.lint_unit(
            &stratalog_parse::parse_source_unit(
                "Decl orphan(X).\nbar(/x).\nfoo(X) :- bar(X).\n".as_bytes(),
                "test",
            )
            .unwrap(),
            "test",
        );
        assert!(findings.iter().any(|f| f.rule == "unused-predicate" && f.predicate.as_deref() == Some("orphan/1")));
    }

    #[test]
    fn no_finding_when_every_predicate_is_used() {
        let linter = Linter::new(Default::default());
        let findings = linter.lint_unit(
            &stratalog_parse::parse_source_unit("bar(/x).\nfoo(X) :- bar(X).\n".as_bytes(), "test").unwrap(),
            "test",
        );
        assert!(!findings.iter().any(|f| f.rule == "unused-predicate"));
    }
}
