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

//! Package resolution, semantic analysis, stratification, transform
//! rewriting, and bounds plumbing for Stratalog.
//!
//! # Pipeline
//!
//! 1. [`resolve_package`]/[`resolve_program`] merge a package's source
//!    units into one fully qualified [`stratalog_ast::SourceUnit`].
//! 2. [`analyze`] classifies EDB/IDB predicates, checks safety, and
//!    stratifies the dependency graph, producing a [`ProgramInfo`].
//! 3. [`Rewriter`] lowers clauses with an embedded transform into a chain
//!    of elementary clauses — run before analysis if the caller wants
//!    the evaluator-facing elementary form, since `analyze` itself
//!    treats a clause's transform as an opaque tail.
//! 4. [`bounds`] interprets `bound` declarations as capability tests over
//!    concrete fact data, independent of the other three stages.
//!
//! This crate performs no I/O and holds no state across calls beyond the
//! process-wide symbol table in `stratalog_ast::symbols`.

pub mod analyzer;
pub mod bounds;
pub mod error;
pub mod resolve;
pub mod rewriter;
pub mod stratification;

pub use analyzer::{analyze, ProgramInfo};
pub use error::{AnalysisError, ResolveError};
pub use resolve::{resolve_package, resolve_program, Package};
pub use rewriter::Rewriter;
pub use stratification::{build_dep_graph, DepGraphHandle, EdgeKind, Stratification, TemporalWarning};
