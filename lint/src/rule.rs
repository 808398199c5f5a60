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

//! The lint rule interface: each rule is a stateless object satisfying
//! `{name, description, default_severity, check}`. Dispatch is flat over
//! `dyn LintRule` trait objects rather than a hierarchy or a
//! macro-generated enum: six fixed rules don't need codegen to keep an
//! enum in sync the way a linter with hundreds of rules would.

use fxhash::FxHashMap;
use stratalog_analysis::ProgramInfo;
use stratalog_ast::{PredicateSym, SourceUnit, Severity};

use crate::config::LintConfig;
use crate::findings::Finding;

/// Everything a rule needs to inspect one analyzed source unit.
/// `pred_to_stratum` is `None` when stratification failed — rules still
/// run, just without per-stratum information to draw on.
pub struct RuleInput<'a> {
    pub unit: &'a SourceUnit,
    pub info: &'a ProgramInfo,
    pub pred_to_stratum: Option<&'a FxHashMap<PredicateSym, usize>>,
}

pub trait LintRule: Sync {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn default_severity(&self) -> Severity;
    fn check(&self, input: &RuleInput, config: &LintConfig) -> Vec<Finding>;
}
