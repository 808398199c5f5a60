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

//! The fixed set of built-in rules. Six rules, no codegen; see `rule.rs`
//! for why a flat array is enough here.

use crate::rule::LintRule;
use crate::rules::{
    DeadCodeRule, MissingDocRule, NamingConventionRule, OverlyComplexRuleRule, SingletonVariableRule,
    UnusedPredicateRule,
};

pub static DEFAULT_RULES: [&(dyn LintRule + Sync); 6] = [
    &UnusedPredicateRule,
    &MissingDocRule,
    &NamingConventionRule,
    &SingletonVariableRule,
    &OverlyComplexRuleRule,
    &DeadCodeRule,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_has_six_distinct_names() {
        let names: std::collections::HashSet<&str> = DEFAULT_RULES.iter().map(|r| r.name()).collect();
        assert_eq!(names.len(), 6);
    }
}
