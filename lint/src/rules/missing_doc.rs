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

//! `missing-doc` (info): a user predicate has no `doc(...)` descriptor.

use stratalog_ast::{PredicateSym, Severity};

use crate::findings::Finding;
use crate::rule::{LintRule, RuleInput};
use crate::rules::is_internal;

pub struct MissingDocRule;

impl LintRule for MissingDocRule {
    fn name(&self) -> &'static str {
        "missing-doc"
    }

    fn description(&self) -> &'static str {
        "predicate has no doc(...) descriptor"
    }

    fn default_severity(&self) -> Severity {
        Severity::Info
    }

    fn check(&self, input: &RuleInput, _config: &crate::config::LintConfig) -> Vec<Finding> {
        let mut preds: Vec<&PredicateSym> = input.info.decls.keys().collect();
        preds.sort();
        preds
            .into_iter()
            .filter_map(|p| {
                let decl = &input.info.decls[p];
                if is_internal(decl) || decl.doc().is_some() {
                    return None;
                }
                Some(
                    Finding::new(self.name(), self.default_severity(), format!("predicate `{p}` has no documentation"))
                        .with_predicate(p.to_string()),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::linter::Linter;

    #[test]
    fn flags_a_predicate_with_a_bound_but_no_doc() {
        let linter = Linter::new(Default::default());
        let unit =
            stratalog_parse::parse_source_unit("Decl bar(X) bound [/name].\nbar(/x).\n".as_bytes(), "test")
                .unwrap();
        let findings = linter.lint_unit(&unit, "test");
        assert_eq!(findings.iter().filter(|f| f.rule == "missing-doc").count(), 1);
    }

    #[test]
    fn documented_predicate_is_not_flagged() {
        let linter = Linter::new(Default::default());
        let unit = stratalog_parse::parse_source_unit(
            "Decl bar(X) descr[doc(\"a bar\")] bound [/name].\nbar(/x).\n".as_bytes(),
            "test",
        )
        .unwrap();
        let findings = linter.lint_unit(&unit, "test");
        assert!(!findings.iter().any(|f| f.rule == "missing-doc"));
    }
}
