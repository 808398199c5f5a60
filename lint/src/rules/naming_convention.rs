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

//! `naming-convention` (warning): a predicate name that isn't `snake_case`,
//! or a variable name that doesn't start with an uppercase letter.
//!
//! The parser already rejects a malformed variable name at scan time
//! (`is_valid_variable_name`), so the variable half of this check only
//! ever fires on a `SourceUnit` built directly rather than through
//! `stratalog-parse` — kept because this crate's public API accepts any
//! `SourceUnit`, not only parser output.

use stratalog_ast::{is_valid_variable_name, vars, PredicateSym, Severity};

use crate::findings::Finding;
use crate::rule::{LintRule, RuleInput};

pub struct NamingConventionRule;

impl LintRule for NamingConventionRule {
    fn name(&self) -> &'static str {
        "naming-convention"
    }

    fn description(&self) -> &'static str {
        "predicate name is not snake_case, or a variable does not start with an uppercase letter"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, input: &RuleInput, _config: &crate::config::LintConfig) -> Vec<Finding> {
        let mut findings = Vec::new();

        let mut preds: Vec<&PredicateSym> = input.info.decls.keys().collect();
        preds.sort();
        for p in preds {
            if !is_snake_case(&p.name) {
                findings.push(
                    Finding::new(self.name(), self.default_severity(), format!("predicate `{p}` is not snake_case"))
                        .with_predicate(p.to_string()),
                );
            }
        }

        for clause in &input.unit.clauses {
            let mut clause_vars = std::collections::HashSet::new();
            vars::add_vars_from_clause(clause, &mut clause_vars);
            let mut bad: Vec<_> = clause_vars
                .into_iter()
                .filter(|v| !v.is_anonymous() && !is_valid_variable_name(v.name()))
                .collect();
            bad.sort();
            for v in bad {
                findings.push(
                    Finding::new(
                        self.name(),
                        self.default_severity(),
                        format!("variable `{v}` in clause `{}` does not start with an uppercase letter", clause.head),
                    )
                    .with_predicate(clause.head.predicate.to_string()),
                );
            }
        }

        findings
    }
}

fn is_snake_case(name: &str) -> bool {
    name.split('.').all(|segment| {
        let mut chars = segment.chars();
        matches!(chars.next(), Some(c) if c.is_ascii_lowercase())
            && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linter::Linter;

    #[test]
    fn flags_camel_case_predicate() {
        let linter = Linter::new(Default::default());
        let unit = stratalog_parse::parse_source_unit(
            "Decl pointsTo(X,Y) bound [/name,/name].\npointsTo(/a,/b).\n".as_bytes(),
            "test",
        )
        .unwrap();
        let findings = linter.lint_unit(&unit, "test");
        assert!(findings.iter().any(|f| f.rule == "naming-convention" && f.predicate.as_deref() == Some("pointsTo/2")));
    }

    #[test]
    fn snake_case_predicate_is_fine() {
        assert!(is_snake_case("points_to"));
        assert!(is_snake_case("pkg.points_to"));
        assert!(!is_snake_case("pointsTo"));
    }
}
