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

//! Declarations, units, and programs.

use crate::terms::{Atom, PredicateSym, Term};
use std::fmt;

/// One `bound [...]` block: an ordered list of bound terms. A bound term
/// is either a constant type name (`/string`, `/number`, ...) or a
/// reference to another unary predicate acting as a type — which of the
/// two it is gets resolved during analysis (see `stratalog-analysis`'s
/// bounds module), not at parse time, since resolution needs the full set
/// of declared predicates.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BoundDecl {
    pub terms: Vec<Term>,
}

/// The optional `inclusion` constraint: zero or more atoms that must hold
/// for the declared predicate's tuples.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Constraints {
    pub atoms: Vec<Atom>,
}

/// A predicate declaration: `Decl p(...) temporal? descr(...)? bound
/// [...]* inclusion(...)?.`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Decl {
    pub atom: Atom,
    pub descr: Vec<Atom>,
    pub bounds: Vec<BoundDecl>,
    pub constraints: Option<Constraints>,
    /// Set when the analyzer manufactured this declaration for a predicate
    /// that had no explicit `Decl`.
    pub synthetic: bool,
}

impl Decl {
    pub fn predicate(&self) -> &PredicateSym {
        &self.atom.predicate
    }

    /// A declaration is temporal when its descriptor set includes the
    /// marker atom `temporal()`.
    pub fn is_temporal(&self) -> bool {
        self.descr.iter().any(|a| a.predicate.name.as_ref() == "temporal" && a.args.is_empty())
    }

    /// The `doc(...)` descriptor atom, if present.
    pub fn doc(&self) -> Option<&Atom> {
        self.descr.iter().find(|a| a.predicate.name.as_ref() == "doc")
    }

    pub fn synthetic_for(atom: Atom) -> Self {
        Decl { atom, descr: Vec::new(), bounds: Vec::new(), constraints: None, synthetic: true }
    }
}

impl fmt::Display for Decl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Decl {}", self.atom)?;
        if self.is_temporal() {
            write!(f, " temporal")?;
        }
        if !self.descr.is_empty() {
            write!(f, " descr(")?;
            for (i, d) in self.descr.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{d}")?;
            }
            write!(f, ")")?;
        }
        for b in &self.bounds {
            write!(f, " bound [")?;
            for (i, t) in b.terms.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{t}")?;
            }
            write!(f, "]")?;
        }
        write!(f, ".")
    }
}

/// A source unit: the decls and clauses the parser produced for one
/// input file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceUnit {
    pub decls: Vec<Decl>,
    pub clauses: Vec<crate::clause::Clause>,
}

/// A named grouping of source units, derived from a `Package` declaration
/// plus whatever units share that package name.
#[derive(Debug, Clone, Default)]
pub struct Package {
    pub name: Box<str>,
    pub units: Vec<SourceUnit>,
}

impl Package {
    pub fn new(name: impl Into<Box<str>>) -> Self {
        Package { name: name.into(), units: Vec::new() }
    }
}
