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

//! The semantic analyzer: declaration merging, EDB/IDB classification,
//! safety checking, and orchestration of the dependency graph /
//! stratification / temporal diagnosis steps into one [`ProgramInfo`].
//!
//! `crate::stratification`'s dependency-graph builder assumes its caller
//! has already partitioned predicates into extensional facts and
//! intensional rules; this module performs that partitioning before
//! handing the result off.

use crate::error::AnalysisError;
use crate::stratification::{self, TemporalWarning};
use fxhash::{FxHashMap, FxHashSet};
use stratalog_ast::{Atom, Clause, Decl, Literal, PredicateSym, SourceUnit, Var};

/// The analyzer's output: a fully classified, stratified program ready for
/// the lint engine (or a downstream evaluator) to consume.
pub struct ProgramInfo {
    pub edb_predicates: FxHashSet<PredicateSym>,
    pub idb_predicates: FxHashSet<PredicateSym>,
    pub decls: FxHashMap<PredicateSym, Decl>,
    pub rules: FxHashMap<PredicateSym, Vec<Clause>>,
    pub initial_facts: Vec<Clause>,
    pub warnings: Vec<TemporalWarning>,
    pub strata: Vec<FxHashSet<PredicateSym>>,
    pub pred_to_stratum: FxHashMap<PredicateSym, usize>,
}

/// Runs the analyzer over an already package-resolved [`SourceUnit`].
pub fn analyze(unit: &SourceUnit) -> Result<ProgramInfo, AnalysisError> {
    check_bound_arity(unit)?;
    check_arity_mismatch(unit)?;
    let decls = merge_decls(unit);
    let (edb_predicates, idb_predicates, rules, initial_facts) = classify(unit)?;

    for clause in unit.clauses.iter().filter(|c| !c.is_fact()) {
        check_safety(clause)?;
    }

    let temporal_predicates: FxHashSet<PredicateSym> = decls
        .values()
        .filter(|d| d.is_temporal())
        .map(|d| d.atom.predicate.clone())
        .collect();

    let dep = stratification::build_dep_graph(unit.clauses.iter().filter(|c| !c.is_fact()), |p| {
        idb_predicates.contains(p)
    });
    let stratified = dep.stratify(&temporal_predicates)?;

    Ok(ProgramInfo {
        edb_predicates,
        idb_predicates,
        decls,
        rules,
        initial_facts,
        warnings: stratified.warnings,
        strata: stratified.strata,
        pred_to_stratum: stratified.pred_to_stratum,
    })
}

/// A declaration's `bound [...]` block is one bound term per declared
/// argument (e.g. `pointsTo(X,Y) bound [/name,/name]`). A block whose
/// length disagrees with the predicate's arity is a malformed
/// declaration.
fn check_bound_arity(unit: &SourceUnit) -> Result<(), AnalysisError> {
    for decl in &unit.decls {
        for bound in &decl.bounds {
            if bound.terms.len() != decl.atom.predicate.arity {
                return Err(AnalysisError::MalformedDecl(
                    decl.atom.predicate.clone(),
                    format!(
                        "bound block has {} term(s), but `{}` has arity {}",
                        bound.terms.len(),
                        decl.atom.predicate.name,
                        decl.atom.predicate.arity
                    ),
                ));
            }
        }
    }
    Ok(())
}

/// Every clause head or premise atom whose predicate *name* matches an
/// explicitly declared predicate must agree with that declaration's
/// arity. `PredicateSym` treats same-name-different-arity as distinct
/// predicates, so without this check a typo'd argument count would
/// silently classify as an unrelated, separately-synthesized predicate
/// rather than surfacing as the mismatch it almost always is.
fn check_arity_mismatch(unit: &SourceUnit) -> Result<(), AnalysisError> {
    let mut declared_arity: FxHashMap<Box<str>, usize> = FxHashMap::default();
    for decl in &unit.decls {
        declared_arity.insert(decl.atom.predicate.name.clone(), decl.atom.predicate.arity);
    }
    for clause in &unit.clauses {
        check_atom_arity(&clause.head, &declared_arity)?;
        for p in &clause.premises {
            check_literal_arity(p, &declared_arity)?;
        }
    }
    Ok(())
}

fn check_atom_arity(atom: &Atom, declared: &FxHashMap<Box<str>, usize>) -> Result<(), AnalysisError> {
    if let Some(&decl_arity) = declared.get(&atom.predicate.name)
        && decl_arity != atom.predicate.arity
    {
        return Err(AnalysisError::ArityMismatch(atom.predicate.clone(), atom.predicate.arity, decl_arity));
    }
    Ok(())
}

fn check_literal_arity(lit: &Literal, declared: &FxHashMap<Box<str>, usize>) -> Result<(), AnalysisError> {
    match lit {
        Literal::Atom(a) | Literal::NegAtom(a) => check_atom_arity(a, declared),
        Literal::Compare(..) => Ok(()),
        Literal::Temporal { inner, .. } => check_literal_arity(inner, declared),
    }
}

/// Step 1: every clause head that has no explicit `Decl` gets a synthetic
/// one, arity inferred from the atom.
fn merge_decls(unit: &SourceUnit) -> FxHashMap<PredicateSym, Decl> {
    let mut decls: FxHashMap<PredicateSym, Decl> = FxHashMap::default();
    for decl in &unit.decls {
        decls.insert(decl.atom.predicate.clone(), decl.clone());
    }
    for clause in &unit.clauses {
        decls
            .entry(clause.head.predicate.clone())
            .or_insert_with(|| Decl::synthetic_for(clause.head.clone()));
    }
    decls
}

/// Steps 2: partitions clauses into EDB facts and IDB rules, rejecting a
/// predicate that mixes the two for the same head (`EdbViolation` — see
/// `DESIGN.md`'s Open Question decision on what "declared EDB" means for a
/// predicate that also has a rule head).
#[allow(clippy::type_complexity)]
fn classify(
    unit: &SourceUnit,
) -> Result<
    (FxHashSet<PredicateSym>, FxHashSet<PredicateSym>, FxHashMap<PredicateSym, Vec<Clause>>, Vec<Clause>),
    AnalysisError,
> {
    let mut idb_predicates: FxHashSet<PredicateSym> = FxHashSet::default();
    let mut edb_predicates: FxHashSet<PredicateSym> = FxHashSet::default();
    let mut rules: FxHashMap<PredicateSym, Vec<Clause>> = FxHashMap::default();
    let mut initial_facts: Vec<Clause> = Vec::new();

    for clause in &unit.clauses {
        if clause.is_fact() {
            edb_predicates.insert(clause.head.predicate.clone());
            initial_facts.push(clause.clone());
        } else {
            idb_predicates.insert(clause.head.predicate.clone());
            rules.entry(clause.head.predicate.clone()).or_default().push(clause.clone());
        }
    }

    for pred in idb_predicates.intersection(&edb_predicates) {
        return Err(AnalysisError::EdbViolation(pred.clone()));
    }
    edb_predicates.retain(|p| !idb_predicates.contains(p));

    // A predicate declared but never given a single clause (fact or rule)
    // is EDB by default: its tuples can only ever arrive from the outside.
    for decl in &unit.decls {
        let pred = decl.atom.predicate.clone();
        if !idb_predicates.contains(&pred) {
            edb_predicates.insert(pred);
        }
    }

    Ok((edb_predicates, idb_predicates, rules, initial_facts))
}

/// Step 3: range-restriction. Every variable in the head, a negation, a
/// comparison, or a transform input must appear positively in some
/// premise atom.
fn check_safety(clause: &Clause) -> Result<(), AnalysisError> {
    let mut bound: FxHashSet<Var> = FxHashSet::default();
    for p in &clause.premises {
        collect_positive_bindings(p, &mut bound);
    }

    let mut required: FxHashSet<Var> = FxHashSet::default();
    for arg in &clause.head.args {
        arg.for_each_var(&mut |v| {
            required.insert(v.clone());
        });
    }
    if let Some(iv) = &clause.head_time {
        collect_interval_vars(iv, &mut required);
    }
    for p in &clause.premises {
        collect_required_vars(p, &mut required);
    }
    if let Some(t) = &clause.transform {
        for stage in t.stages() {
            if let Some(call) = &stage.do_call {
                call.for_each_var(&mut |v| {
                    required.insert(v.clone());
                });
            }
            for l in &stage.lets {
                l.value.for_each_var(&mut |v| {
                    required.insert(v.clone());
                });
                // The transform's output: a `let`-bound variable is not a
                // premise occurrence, but it is a binding occurrence —
                // the head (or a later stage) may legally depend on it.
                bound.insert(Var::new(l.var.clone()));
            }
        }
    }

    let mut missing: Vec<&Var> = required.iter().filter(|v| !bound.contains(*v)).collect();
    missing.sort();
    if let Some(v) = missing.first() {
        return Err(AnalysisError::UnsafeRule(clause.head.predicate.clone(), v.name().to_string()));
    }
    Ok(())
}

fn collect_positive_bindings(lit: &Literal, bound: &mut FxHashSet<Var>) {
    match lit {
        Literal::Atom(a) => {
            for arg in &a.args {
                arg.for_each_var(&mut |v| {
                    bound.insert(v.clone());
                });
            }
        }
        Literal::NegAtom(_) | Literal::Compare(..) => {}
        Literal::Temporal { inner, .. } => collect_positive_bindings(inner, bound),
    }
}

fn collect_required_vars(lit: &Literal, required: &mut FxHashSet<Var>) {
    match lit {
        Literal::Atom(_) => {}
        Literal::NegAtom(a) => {
            for arg in &a.args {
                arg.for_each_var(&mut |v| {
                    required.insert(v.clone());
                });
            }
        }
        Literal::Compare(_, l, r) => {
            l.for_each_var(&mut |v| {
                required.insert(v.clone());
            });
            r.for_each_var(&mut |v| {
                required.insert(v.clone());
            });
        }
        Literal::Temporal { inner, annotation, .. } => {
            collect_required_vars(inner, required);
            if let Some(iv) = annotation {
                collect_interval_vars(iv, required);
            }
        }
    }
}

fn collect_interval_vars(iv: &stratalog_ast::Interval, out: &mut FxHashSet<Var>) {
    iv.start.for_each_var(&mut |v| {
        out.insert(v.clone());
    });
    if let Some(end) = &iv.end {
        end.for_each_var(&mut |v| {
            out.insert(v.clone());
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(src: &str) -> SourceUnit {
        stratalog_parse::parse_source_unit(src.as_bytes(), "test").unwrap()
    }

    #[test]
    fn classifies_edb_and_idb() {
        let unit = parse("bar(/x).\nfoo(X) :- bar(X).\n");
        let info = analyze(&unit).unwrap();
        assert!(info.edb_predicates.contains(&PredicateSym::new("bar", 1)));
        assert!(info.idb_predicates.contains(&PredicateSym::new("foo", 1)));
    }

    #[test]
    fn synthesizes_missing_decls() {
        let unit = parse("bar(/x).\n");
        let info = analyze(&unit).unwrap();
        let decl = info.decls.get(&PredicateSym::new("bar", 1)).unwrap();
        assert!(decl.synthetic);
    }

    #[test]
    fn rejects_mixed_fact_and_rule_definitions() {
        let unit = parse("bar(/x).\nbar(X) :- baz(X).\nbaz(/y).\n");
        let err = analyze(&unit).unwrap_err();
        assert_eq!(err, AnalysisError::EdbViolation(PredicateSym::new("bar", 1)));
    }

    #[test]
    fn rejects_unsafe_rule() {
        let unit = parse("bar(/x).\nfoo(X) :- bar(X), Typo = 1, !baz(Typo2).\nbaz(/y).\n");
        let err = analyze(&unit).unwrap_err();
        assert!(matches!(err, AnalysisError::UnsafeRule(_, _)));
    }

    #[test]
    fn accepts_safe_negation_and_comparison() {
        let unit = parse("bar(/x).\nbaz(/y).\nfoo(X) :- bar(X), !baz(X), X != /y.\n");
        let info = analyze(&unit).unwrap();
        assert!(info.idb_predicates.contains(&PredicateSym::new("foo", 1)));
    }

    #[test]
    fn rejects_a_declared_arity_mismatch() {
        let unit = parse("Decl bar(X).\nbar(/x).\nfoo(Y) :- bar(Y, Y).\n");
        let err = analyze(&unit).unwrap_err();
        assert_eq!(err, AnalysisError::ArityMismatch(PredicateSym::new("bar", 2), 2, 1));
    }

    #[test]
    fn rejects_a_malformed_bound_block() {
        let unit = parse("Decl bar(X, Y) bound [/string].\nbar(/x, /y).\n");
        let err = analyze(&unit).unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedDecl(_, _)));
    }

    #[test]
    fn accepts_a_head_variable_bound_only_by_a_transform_let() {
        let unit = parse(
            "item(/a).\ncount(N) :- item(X) |> do fn:group_by(), let N = fn:count().\n",
        );
        let info = analyze(&unit).unwrap();
        assert!(info.idb_predicates.contains(&PredicateSym::new("count", 1)));
    }
}
