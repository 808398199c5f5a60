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

//! Error taxonomy for package resolution and analysis.
//!
//! Ambiguous or malformed package/use input never passes through
//! unchanged: every such case surfaces as one of these variants instead
//! of a silent no-op.

use stratalog_ast::PredicateSym;
use thiserror::Error;

/// Failures from package resolution (`resolve::resolve_package`/`resolve_program`).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("package `{0}` imports itself")]
    SelfImport(Box<str>),
    #[error("reference to unknown package `{0}`")]
    UnknownPackage(Box<str>),
    #[error("bound term `{0}` is neither a type constant nor a reference to a declared predicate")]
    BadBound(String),
    #[error("malformed `Use` declaration: {0}")]
    MalformedUseDecl(String),
}

/// Failures from the semantic analyzer (`analyzer::analyze`).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("predicate `{0}` is declared extensional but is also the head of a rule")]
    EdbViolation(PredicateSym),
    #[error("clause head `{0}` is not range-restricted: variable `{1}` has no positive binding")]
    UnsafeRule(PredicateSym, String),
    #[error("predicate `{0}` used with arity {1}, but declared with arity {2}")]
    ArityMismatch(PredicateSym, usize, usize),
    #[error("malformed declaration for `{0}`: {1}")]
    MalformedDecl(PredicateSym, String),
    #[error("program cannot be stratified: cycle through {0:?} carries a negation or aggregation edge")]
    UnstratifiableProgram(Vec<PredicateSym>),
}
