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

//! The abstract syntax and term model for Stratalog, an extended Datalog
//! with temporal reasoning.
//!
//! Every type here is an owned value: terms, atoms, and clauses are
//! `Clone` and structurally compared/hashed, with no arena, interning
//! table, or lifetime parameter. See `DESIGN.md` for the tradeoffs behind
//! that choice.

pub mod clause;
pub mod decl;
pub mod literal;
pub mod pretty;
pub mod severity;
pub mod symbols;
pub mod terms;
pub mod vars;

pub use clause::{Clause, LetStmt, Transform};
pub use decl::{BoundDecl, Constraints, Decl, Package, SourceUnit};
pub use literal::{CompareOp, Interval, Literal, TemporalOp};
pub use pretty::PrettyPrint;
pub use severity::Severity;
pub use terms::{
    is_valid_constant_name, is_valid_variable_name, Atom, Const, FunctionSym, PredicateSym, Term,
    Var,
};
