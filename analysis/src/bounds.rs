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

//! Bounds/type plumbing: interprets a declaration's `bound` blocks and
//! `inclusion` constraint as capability tests over constant terms, rather
//! than a full type-inference pass.
//!
//! Bounds are checked directly against `Decl`/`Atom` pairs — there is no
//! intermediate typed representation to unify against. A bound term is
//! either a type name (`/string`, `/number`, ...) or a reference to a
//! declared unary predicate; which one it is can only be resolved once
//! the full declaration table is known, which is why this lives in
//! `analysis` rather than `ast`.

use fxhash::FxHashMap;
use stratalog_ast::{Atom, BoundDecl, Const, Decl, PredicateSym, Term};

/// What a single bound term in a `bound [...]` block resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundKind {
    /// A recognized built-in type name, e.g. `/string`.
    BuiltinType(Box<str>),
    /// A reference to another declared unary predicate acting as a type.
    PredicateRef(PredicateSym),
    /// Neither: present in the declaration table but not arity 1, or an
    /// unrecognized form.
    Unresolved(Box<str>),
}

/// Classifies one bound term against the full declaration table.
pub fn classify_bound_term(term: &Term, decls: &FxHashMap<PredicateSym, Decl>) -> Option<BoundKind> {
    let Term::Constant(Const::Name(name)) = term else {
        return None;
    };
    let candidate = PredicateSym::new(name.clone(), 1);
    if decls.contains_key(&candidate) {
        return Some(BoundKind::PredicateRef(candidate));
    }
    if is_builtin_type_name(name) {
        Some(BoundKind::BuiltinType(name.clone()))
    } else {
        Some(BoundKind::Unresolved(name.clone()))
    }
}

const BUILTIN_TYPE_NAMES: &[&str] =
    &["/name", "/string", "/number", "/bytes", "/list", "/map", "/struct", "/any"];

fn is_builtin_type_name(name: &str) -> bool {
    BUILTIN_TYPE_NAMES.contains(&name)
}

/// One bound-term/argument position that a fact atom's constant fails to
/// satisfy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundViolation {
    pub predicate: PredicateSym,
    pub position: usize,
    pub expected: BoundKind,
}

/// Checks a fact atom's constant arguments against its declaration's first
/// `bound` block (if any). Variables are never checked here — bounds are a
/// capability test over concrete data, not a unifier over open terms, so a
/// variable argument always passes. Returns one violation per position
/// whose constant doesn't satisfy the declared bound.
pub fn check_fact_bounds(
    atom: &Atom,
    decl: &Decl,
    decls: &FxHashMap<PredicateSym, Decl>,
) -> Vec<BoundViolation> {
    let Some(bound) = decl.bounds.first() else {
        return Vec::new();
    };
    let mut violations = Vec::new();
    for (pos, (arg, bound_term)) in atom.args.iter().zip(&bound.terms).enumerate() {
        let Term::Constant(value) = arg else { continue };
        let Some(kind) = classify_bound_term(bound_term, decls) else { continue };
        if !satisfies(&kind, value, decls) {
            violations.push(BoundViolation { predicate: atom.predicate.clone(), position: pos, expected: kind });
        }
    }
    violations
}

fn satisfies(kind: &BoundKind, value: &Const, decls: &FxHashMap<PredicateSym, Decl>) -> bool {
    match kind {
        BoundKind::BuiltinType(name) => satisfies_builtin_type(name, value),
        // A predicate-ref bound is a capability test ("is this constant a
        // member of that unary predicate's declared domain?"); without an
        // evaluator we cannot check actual membership, so we only verify
        // the referenced predicate itself still resolves to something
        // bound-compatible, and otherwise treat it as permissive.
        BoundKind::PredicateRef(pred) => decls.contains_key(pred),
        BoundKind::Unresolved(_) => true,
    }
}

fn satisfies_builtin_type(type_name: &str, value: &Const) -> bool {
    match type_name {
        "/name" => matches!(value, Const::Name(_)),
        "/string" => matches!(value, Const::String(_)),
        "/number" => matches!(value, Const::Int(_) | Const::Float(_)),
        "/bytes" => matches!(value, Const::Bytes(_)),
        "/list" => matches!(value, Const::List(_)),
        "/map" => matches!(value, Const::Map(_)),
        "/struct" => matches!(value, Const::Struct(_) | Const::DotType(..)),
        "/any" => true,
        _ => true,
    }
}

/// Checks the `bound` arity: a declaration's bound block must list exactly
/// as many terms as the declared atom has arguments.
pub fn bound_arity_matches(decl: &Decl) -> bool {
    decl.bounds.iter().all(|b: &BoundDecl| b.terms.len() == decl.atom.args.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use stratalog_ast::{BoundDecl, Term};

    fn decl_with_bound(name: &str, arity: usize, bound_terms: Vec<Term>) -> Decl {
        let atom = Atom::new(name, (0..arity).map(|i| Term::var(format!("X{i}"))).collect());
        Decl {
            atom,
            descr: Vec::new(),
            bounds: vec![BoundDecl { terms: bound_terms }],
            constraints: None,
            synthetic: false,
        }
    }

    #[test]
    fn classifies_builtin_type() {
        let decls = FxHashMap::default();
        let kind = classify_bound_term(&Term::name("/string"), &decls).unwrap();
        assert_eq!(kind, BoundKind::BuiltinType("/string".into()));
    }

    #[test]
    fn classifies_predicate_reference() {
        let mut decls = FxHashMap::default();
        let name_decl = decl_with_bound("name", 1, vec![Term::name("/string")]);
        decls.insert(PredicateSym::new("name", 1), name_decl);
        let kind = classify_bound_term(&Term::name("name"), &decls).unwrap();
        assert_eq!(kind, BoundKind::PredicateRef(PredicateSym::new("name", 1)));
    }

    #[test]
    fn fact_satisfying_bound_has_no_violations() {
        let decls = FxHashMap::default();
        let decl = decl_with_bound("bar", 1, vec![Term::name("/string")]);
        let atom = Atom::new("bar", vec![Term::Constant(Const::String("hi".into()))]);
        assert!(check_fact_bounds(&atom, &decl, &decls).is_empty());
    }

    #[test]
    fn fact_violating_bound_is_reported() {
        let decls = FxHashMap::default();
        let decl = decl_with_bound("bar", 1, vec![Term::name("/string")]);
        let atom = Atom::new("bar", vec![Term::Constant(Const::Int(1))]);
        let violations = check_fact_bounds(&atom, &decl, &decls);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].position, 0);
    }

    #[test]
    fn variable_argument_always_passes() {
        let decls = FxHashMap::default();
        let decl = decl_with_bound("bar", 1, vec![Term::name("/string")]);
        let atom = Atom::new("bar", vec![Term::var("X")]);
        assert!(check_fact_bounds(&atom, &decl, &decls).is_empty());
    }

    #[test]
    fn arity_mismatch_detected() {
        let decl = decl_with_bound("bar", 2, vec![Term::name("/string")]);
        assert!(!bound_arity_matches(&decl));
    }
}
