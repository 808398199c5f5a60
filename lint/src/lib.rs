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

//! Pluggable lint rules over a Stratalog [`stratalog_ast::SourceUnit`]:
//! six fixed, stateless rules dispatched as `dyn LintRule` trait objects,
//! orchestrated by [`linter::Linter`] on top of `stratalog-analysis`'s
//! classification/stratification/temporal-diagnosis output.
//!
//! # Pipeline
//! `Linter::lint_file`/`lint_unit` parse (file path only), run
//! `stratalog_analysis::analyze`, turn an `AnalysisError` into a single
//! error-severity finding (skipping the rule registry for that unit), turn
//! `ProgramInfo::warnings` into `temporal-recursion` findings, then run
//! every enabled rule and filter the combined list by `LintConfig::min_severity`.

pub mod config;
pub mod findings;
pub mod linter;
pub mod output;
pub mod registry;
pub mod rule;
pub mod rules;

pub use config::{LintConfig, TomlConfig};
pub use findings::Finding;
pub use linter::{LintError, Linter};
pub use output::{render, OutputFormat};
pub use registry::DEFAULT_RULES;
pub use rule::{LintRule, RuleInput};
