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

//! Dependency graph construction, stratification, and temporal diagnosis.
//!
//! Strongly connected components are found via Kosaraju's algorithm (two
//! DFS passes). Since the grammar distinguishes four edge kinds, an edge
//! between the same pair of predicates can carry more than one label
//! across different clauses, hence `EdgeLabels` is a set rather than a
//! single `negated: bool` flag.

use crate::error::AnalysisError;
use fxhash::{FxHashMap, FxHashSet};
use stratalog_ast::{Literal, PredicateSym, Severity};
use std::collections::BTreeSet;

/// How a clause head depends on a body predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    Positive,
    Negation,
    Aggregation,
    Temporal,
}

type EdgeLabels = FxHashSet<EdgeKind>;
type DepGraph = FxHashMap<PredicateSym, FxHashMap<PredicateSym, EdgeLabels>>;
type Nodeset = FxHashSet<PredicateSym>;

/// A `temporal-recursion` (or escalated "critical") diagnostic emitted
/// during stratification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemporalWarning {
    pub severity: Severity,
    pub predicate: PredicateSym,
    pub message: String,
}

/// Builds the dependency graph over IDB predicates from a set of rules,
/// keyed by head predicate. `is_idb` decides whether a premise predicate
/// participates in the graph at all (EDB premises contribute no edge).
pub fn build_dep_graph<'a>(
    rules: impl Iterator<Item = &'a stratalog_ast::Clause>,
    is_idb: impl Fn(&PredicateSym) -> bool,
) -> DepGraphHandle {
    let mut dep: DepGraph = FxHashMap::default();
    for clause in rules {
        let head = clause.head.predicate.clone();
        dep.entry(head.clone()).or_default();
        let aggregated = clause.transform.is_some();
        for premise in &clause.premises {
            add_premise_edges(&mut dep, &head, premise, aggregated, &is_idb);
        }
    }
    DepGraphHandle(dep)
}

fn add_premise_edges(
    dep: &mut DepGraph,
    head: &PredicateSym,
    lit: &Literal,
    aggregated: bool,
    is_idb: &impl Fn(&PredicateSym) -> bool,
) {
    match lit {
        Literal::Atom(a) => {
            if is_idb(&a.predicate) {
                let kind = if aggregated { EdgeKind::Aggregation } else { EdgeKind::Positive };
                add_edge(dep, head.clone(), a.predicate.clone(), kind);
            }
        }
        Literal::NegAtom(a) => {
            if is_idb(&a.predicate) {
                add_edge(dep, head.clone(), a.predicate.clone(), EdgeKind::Negation);
            }
        }
        Literal::Compare(..) => {}
        Literal::Temporal { inner, .. } => {
            if let Some(a) = inner.as_positive_atom().or_else(|| inner.as_negated_atom())
                && is_idb(&a.predicate)
            {
                add_edge(dep, head.clone(), a.predicate.clone(), EdgeKind::Temporal);
            }
            add_premise_edges(dep, head, inner, aggregated, is_idb);
        }
    }
}

fn add_edge(dep: &mut DepGraph, src: PredicateSym, dest: PredicateSym, kind: EdgeKind) {
    dep.entry(src).or_default().entry(dest).or_default().insert(kind);
}

/// Wraps the raw dependency graph so stratification and temporal
/// diagnosis can both walk it without exposing the internal map type.
pub struct DepGraphHandle(DepGraph);

/// The result of a successful stratification: an ordered sequence of
/// strata (each a set of mutually recursive predicates), plus the
/// predicate-to-stratum-index map, plus any temporal diagnostics.
pub struct Stratification {
    pub strata: Vec<Nodeset>,
    pub pred_to_stratum: FxHashMap<PredicateSym, usize>,
    pub warnings: Vec<TemporalWarning>,
}

impl DepGraphHandle {
    /// Computes strongly connected components, verifies no SCC contains an
    /// internal `Negation`/`Aggregation` edge, topologically orders the
    /// strata, and runs temporal diagnosis over the result.
    pub fn stratify(
        &self,
        temporal_predicates: &FxHashSet<PredicateSym>,
    ) -> Result<Stratification, AnalysisError> {
        let dep = &self.0;
        let mut strata = sccs(dep);
        log::debug!("stratification produced {} stratum/strata before ordering", strata.len());

        let mut pred_to_stratum: FxHashMap<PredicateSym, usize> = FxHashMap::default();
        for (i, scc) in strata.iter().enumerate() {
            for p in scc {
                pred_to_stratum.insert(p.clone(), i);
            }
        }

        for (i, scc) in strata.iter().enumerate() {
            for src in scc {
                let Some(edges) = dep.get(src) else { continue };
                for (dest, labels) in edges {
                    let dest_in_same_stratum = pred_to_stratum.get(dest).is_some_and(|&s| s == i);
                    if !dest_in_same_stratum {
                        continue;
                    }
                    if labels.contains(&EdgeKind::Negation) || labels.contains(&EdgeKind::Aggregation) {
                        let mut cycle: Vec<PredicateSym> = scc.iter().cloned().collect();
                        cycle.sort();
                        return Err(AnalysisError::UnstratifiableProgram(cycle));
                    }
                }
            }
        }

        let pred_to_stratum = sort_strata(dep, &mut strata, pred_to_stratum);
        let warnings = diagnose_temporal(dep, &strata, &pred_to_stratum, temporal_predicates);
        log::trace!("temporal diagnosis produced {} warning(s)", warnings.len());

        Ok(Stratification { strata, pred_to_stratum, warnings })
    }
}

fn sccs(dep: &DepGraph) -> Vec<Nodeset> {
    let mut order: Vec<PredicateSym> = Vec::new();
    let mut seen: Nodeset = FxHashSet::default();

    fn visit(node: &PredicateSym, dep: &DepGraph, order: &mut Vec<PredicateSym>, seen: &mut Nodeset) {
        if seen.contains(node) {
            return;
        }
        seen.insert(node.clone());
        if let Some(edges) = dep.get(node) {
            for neighbor in edges.keys() {
                visit(neighbor, dep, order, seen);
            }
        }
        order.push(node.clone());
    }

    // Iterate in a deterministic order (sorted by qualified symbol then
    // arity) so SCC discovery order doesn't depend on hash iteration order.
    let mut nodes: Vec<&PredicateSym> = dep.keys().collect();
    nodes.sort();
    for node in nodes {
        visit(node, dep, &mut order, &mut seen);
    }

    let rev = transpose(dep);
    let mut seen: Nodeset = FxHashSet::default();
    let mut sccs: Vec<Nodeset> = Vec::new();

    fn rvisit(node: &PredicateSym, rev: &DepGraph, scc: &mut Nodeset, seen: &mut Nodeset) {
        if seen.contains(node) {
            return;
        }
        seen.insert(node.clone());
        scc.insert(node.clone());
        if let Some(edges) = rev.get(node) {
            for neighbor in edges.keys() {
                rvisit(neighbor, rev, scc, seen);
            }
        }
    }

    while let Some(top) = order.pop() {
        if seen.contains(&top) {
            continue;
        }
        let mut scc = Nodeset::default();
        rvisit(&top, &rev, &mut scc, &mut seen);
        if !scc.is_empty() {
            sccs.push(scc);
        }
    }
    sccs
}

fn transpose(dep: &DepGraph) -> DepGraph {
    let mut rev: DepGraph = FxHashMap::default();
    for (src, edges) in dep {
        rev.entry(src.clone()).or_default();
        for (dest, labels) in edges {
            let entry = rev.entry(dest.clone()).or_default().entry(src.clone()).or_default();
            entry.extend(labels.iter().copied());
        }
    }
    rev
}

/// Topologically reorders `strata` so dependencies always precede
/// dependents, and returns the updated predicate-to-index map.
fn sort_strata(
    dep: &DepGraph,
    strata: &mut Vec<Nodeset>,
    pred_to_stratum: FxHashMap<PredicateSym, usize>,
) -> FxHashMap<PredicateSym, usize> {
    let n = strata.len();
    let mut sorted_indices: Vec<usize> = Vec::new();
    let mut seen: FxHashSet<usize> = FxHashSet::default();

    fn visit(
        index: usize,
        dep: &DepGraph,
        strata: &[Nodeset],
        pred_to_stratum: &FxHashMap<PredicateSym, usize>,
        seen: &mut FxHashSet<usize>,
        sorted_indices: &mut Vec<usize>,
    ) {
        if seen.contains(&index) {
            return;
        }
        seen.insert(index);
        if let Some(scc) = strata.get(index) {
            for p in scc {
                if let Some(edges) = dep.get(p) {
                    for dest in edges.keys() {
                        if let Some(&dest_index) = pred_to_stratum.get(dest) {
                            visit(dest_index, dep, strata, pred_to_stratum, seen, sorted_indices);
                        }
                    }
                }
            }
        }
        sorted_indices.push(index);
    }

    for i in 0..n {
        visit(i, dep, strata, &pred_to_stratum, &mut seen, &mut sorted_indices);
    }

    let mut old_to_new: FxHashMap<usize, usize> = FxHashMap::default();
    for (new_idx, &old_idx) in sorted_indices.iter().enumerate() {
        old_to_new.insert(old_idx, new_idx);
    }

    let mut new_strata: Vec<Nodeset> = vec![Nodeset::default(); n];
    for (old_idx, scc) in strata.drain(..).enumerate() {
        let new_idx = old_to_new[&old_idx];
        new_strata[new_idx] = scc;
    }
    *strata = new_strata;

    pred_to_stratum.into_iter().map(|(p, old_idx)| (p, old_to_new[&old_idx])).collect()
}

/// Temporal diagnosis: warns on a temporal edge inside an SCC whose
/// source predicate is not declared temporal, and escalates to a
/// "critical" (error-severity) warning when a temporal cycle between
/// declared-temporal predicates also carries negation.
fn diagnose_temporal(
    dep: &DepGraph,
    strata: &[Nodeset],
    pred_to_stratum: &FxHashMap<PredicateSym, usize>,
    temporal_predicates: &FxHashSet<PredicateSym>,
) -> Vec<TemporalWarning> {
    let mut warnings = Vec::new();
    for scc in strata {
        let has_negation = scc.iter().any(|p| {
            dep.get(p).is_some_and(|edges| {
                edges.iter().any(|(dest, labels)| {
                    pred_to_stratum.get(dest) == pred_to_stratum.get(p)
                        && labels.contains(&EdgeKind::Negation)
                })
            })
        });
        // Deterministic iteration for stable warning order.
        let ordered: BTreeSet<&PredicateSym> = scc.iter().collect();
        for src in ordered {
            let Some(edges) = dep.get(src) else { continue };
            for (dest, labels) in edges {
                if !labels.contains(&EdgeKind::Temporal) {
                    continue;
                }
                if pred_to_stratum.get(dest) != pred_to_stratum.get(src) {
                    continue;
                }
                let src_temporal = temporal_predicates.contains(src);
                let dest_temporal = temporal_predicates.contains(dest);
                if src_temporal && dest_temporal {
                    if has_negation {
                        warnings.push(TemporalWarning {
                            severity: Severity::Error,
                            predicate: src.clone(),
                            message: format!(
                                "temporal recursion between `{src}` and `{dest}` combines with negation"
                            ),
                        });
                    }
                } else {
                    warnings.push(TemporalWarning {
                        severity: Severity::Warning,
                        predicate: src.clone(),
                        message: format!(
                            "temporal-recursion: `{src}` depends on `{dest}` through a temporal \
                             cycle but is not declared `temporal`"
                        ),
                    });
                }
            }
        }
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use stratalog_ast::SourceUnit;

    fn parse(src: &str) -> SourceUnit {
        stratalog_parse::parse_source_unit(src.as_bytes(), "test").unwrap()
    }

    fn idb_set(unit: &SourceUnit) -> FxHashSet<PredicateSym> {
        unit.clauses.iter().filter(|c| !c.is_fact()).map(|c| c.head.predicate.clone()).collect()
    }

    #[test]
    fn stratifies_simple_negation() {
        let unit = parse("p(1).\nq(X) :- p(X).\nr(X) :- q(X), !s(X).\ns(2).\n");
        let idb = idb_set(&unit);
        let dep = build_dep_graph(unit.clauses.iter().filter(|c| !c.is_fact()), |p| idb.contains(p));
        let strat = dep.stratify(&FxHashSet::default()).expect("should be stratifiable");

        let stratum_of = |name: &str| strat.pred_to_stratum.get(&PredicateSym::new(name, 1)).copied();
        assert!(stratum_of("r").unwrap() > stratum_of("s").unwrap());
        assert!(stratum_of("q").unwrap() >= stratum_of("p").unwrap());
        assert!(stratum_of("r").unwrap() >= stratum_of("q").unwrap());
    }

    #[test]
    fn rejects_negation_cycle() {
        let unit = parse("p(X) :- !p(X).\n");
        let idb = idb_set(&unit);
        let dep = build_dep_graph(unit.clauses.iter().filter(|c| !c.is_fact()), |p| idb.contains(p));
        let err = dep.stratify(&FxHashSet::default()).unwrap_err();
        assert!(matches!(err, AnalysisError::UnstratifiableProgram(_)));
    }

    #[test]
    fn positive_recursion_is_fine() {
        let unit = parse("edge(/a, /b).\npath(X, Y) :- edge(X, Y).\npath(X, Z) :- path(X, Y), edge(Y, Z).\n");
        let idb = idb_set(&unit);
        let dep = build_dep_graph(unit.clauses.iter().filter(|c| !c.is_fact()), |p| idb.contains(p));
        let strat = dep.stratify(&FxHashSet::default()).expect("should be stratifiable");
        assert_eq!(strat.warnings.len(), 0);
    }
}
