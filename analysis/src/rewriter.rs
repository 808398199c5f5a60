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

//! Rule rewriting: lowers a clause whose body ends in one or more
//! `|> transform` pipeline stages into a chain of elementary clauses, so
//! a downstream evaluator never sees embedded aggregation.
//!
//! Multi-stage pipelines (`H :- B |> T1 |> T2`) lower to a chain:
//! `tmp1 :- B.`, `tmp2 :- tmp1 |> T1.`, `H :- tmp2 |> T2.` — one fresh
//! `__tmp` predicate per stage boundary, `N` stages producing `N`
//! clauses in total (see DESIGN.md's Open Question decision on why the
//! chain form was chosen over a single flattened clause).

use stratalog_ast::{symbols, Atom, Clause, Decl, Literal, SourceUnit, Term, Transform, Var};
use std::collections::BTreeSet;

/// Lowers every clause in `unit` that carries a transform, threading one
/// fresh-name counter across the whole unit (so helper names never
/// collide even across clauses with the same head predicate).
pub struct Rewriter {
    counter: usize,
}

impl Rewriter {
    pub fn new() -> Self {
        Rewriter { counter: 0 }
    }

    pub fn rewrite_unit(&mut self, unit: &SourceUnit) -> SourceUnit {
        let mut clauses = Vec::new();
        let mut decls = unit.decls.clone();
        for clause in &unit.clauses {
            let (new_clauses, new_decls) = self.rewrite_clause(clause);
            clauses.extend(new_clauses);
            decls.extend(new_decls);
        }
        SourceUnit { decls, clauses }
    }

    /// Lowers one clause. A clause with no transform passes through
    /// unchanged (and contributes no synthetic declarations).
    pub fn rewrite_clause(&mut self, clause: &Clause) -> (Vec<Clause>, Vec<Decl>) {
        let Some(transform) = &clause.transform else {
            return (vec![clause.clone()], Vec::new());
        };
        let stages: Vec<Transform> = transform.stages().cloned().collect();

        let mut out_clauses = Vec::new();
        let mut out_decls = Vec::new();

        // Stage 0: the unaggregated body, stripped of the transform,
        // feeding into every variable any stage of the chain might need.
        let mut feed_vars = vars_used_anywhere(&stages);
        feed_vars.retain(|v| bound_by_premises(&clause.premises, v));
        let mut current_atom = self.fresh_helper(&clause.head.predicate.name, feed_vars);
        out_clauses.push(Clause {
            head: current_atom.clone(),
            head_time: None,
            premises: clause.premises.clone(),
            transform: None,
        });
        out_decls.push(internal_decl(current_atom.clone()));

        for (i, stage) in stages.iter().enumerate() {
            let is_last = i + 1 == stages.len();
            let single = Transform::single(stage.do_call.clone(), stage.lets.clone());
            if is_last {
                out_clauses.push(Clause {
                    head: clause.head.clone(),
                    head_time: clause.head_time.clone(),
                    premises: vec![Literal::Atom(current_atom)],
                    transform: Some(single),
                });
                break;
            }
            let next_vars = stage_output_vars(stage);
            let next_atom = self.fresh_helper(&clause.head.predicate.name, next_vars);
            out_clauses.push(Clause {
                head: next_atom.clone(),
                head_time: None,
                premises: vec![Literal::Atom(current_atom)],
                transform: Some(single),
            });
            out_decls.push(internal_decl(next_atom.clone()));
            current_atom = next_atom;
        }

        (out_clauses, out_decls)
    }

    /// `<head>1__tmp`, `<head>2__tmp`, ... — fresh across the whole unit.
    fn fresh_helper(&mut self, head_name: &str, vars: Vec<Var>) -> Atom {
        self.counter += 1;
        let name = format!("{head_name}{}{}", self.counter, symbols::SYNTHETIC_SUFFIX);
        Atom::new(name, vars.into_iter().map(Term::Variable).collect())
    }
}

impl Default for Rewriter {
    fn default() -> Self {
        Self::new()
    }
}

fn internal_decl(atom: Atom) -> Decl {
    let mut decl = Decl::synthetic_for(atom.clone());
    decl.descr.push(Atom::new(symbols::INTERNAL_DESCRIPTOR, Vec::new()));
    decl
}

/// Every variable referenced anywhere in the transform chain (the `do`
/// call's args and every `let`'s bound name and value), deduplicated and
/// sorted for a deterministic helper arity order.
fn vars_used_anywhere(stages: &[Transform]) -> Vec<Var> {
    let mut set: BTreeSet<Var> = BTreeSet::new();
    for stage in stages {
        if let Some(call) = &stage.do_call {
            call.for_each_var(&mut |v| {
                set.insert(v.clone());
            });
        }
        for l in &stage.lets {
            l.value.for_each_var(&mut |v| {
                set.insert(v.clone());
            });
        }
    }
    set.into_iter().collect()
}

fn bound_by_premises(premises: &[Literal], var: &Var) -> bool {
    premises.iter().any(|p| literal_binds(p, var))
}

fn literal_binds(lit: &Literal, var: &Var) -> bool {
    match lit {
        Literal::Atom(a) => a.args.iter().any(|arg| term_mentions(arg, var)),
        Literal::NegAtom(_) | Literal::Compare(..) => false,
        Literal::Temporal { inner, .. } => literal_binds(inner, var),
    }
}

fn term_mentions(term: &Term, target: &Var) -> bool {
    let mut found = false;
    term.for_each_var(&mut |v| {
        if v == target {
            found = true;
        }
    });
    found
}

/// The variables a stage's tuple carries forward to the next stage: the
/// `do` call's own variable arguments (typically group-by keys, which pass
/// through unchanged) plus every `let`-bound result name.
fn stage_output_vars(stage: &Transform) -> Vec<Var> {
    let mut set: BTreeSet<Var> = BTreeSet::new();
    if let Some(call) = &stage.do_call {
        call.for_each_var(&mut |v| {
            set.insert(v.clone());
        });
    }
    for l in &stage.lets {
        set.insert(Var::new(l.var.clone()));
    }
    set.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use stratalog_ast::SourceUnit;

    fn parse(src: &str) -> SourceUnit {
        stratalog_parse::parse_source_unit(src.as_bytes(), "test").unwrap()
    }

    #[test]
    fn passthrough_for_clause_without_transform() {
        let unit = parse("bar(/x).\nfoo(X) :- bar(X).\n");
        let mut rw = Rewriter::new();
        let (clauses, decls) = rw.rewrite_clause(&unit.clauses[1]);
        assert_eq!(clauses.len(), 1);
        assert_eq!(clauses[0], unit.clauses[1]);
        assert!(decls.is_empty());
    }

    #[test]
    fn single_stage_transform_splits_into_two_clauses() {
        let unit = parse(
            "odd(/1).\nsucc(/1, /2).\ncount(A) :- odd(X), succ(Y,Z) |> do fn:group_by(), let A = fn:count().\n",
        );
        let clause = unit.clauses.iter().find(|c| c.head.predicate.name.as_ref() == "count").unwrap();
        let mut rw = Rewriter::new();
        let (clauses, decls) = rw.rewrite_clause(clause);

        assert_eq!(clauses.len(), 2);
        assert_eq!(decls.len(), 1);

        let tmp = &clauses[0];
        assert_eq!(tmp.head.predicate.name.as_ref(), "count1__tmp");
        assert!(tmp.transform.is_none());
        assert_eq!(tmp.premises.len(), 2);

        let head_clause = &clauses[1];
        assert_eq!(head_clause.head.predicate.name.as_ref(), "count");
        assert_eq!(head_clause.premises.len(), 1);
        let Literal::Atom(premise) = &head_clause.premises[0] else {
            panic!("expected an atom premise");
        };
        assert_eq!(premise.predicate, tmp.head.predicate);
        assert!(head_clause.transform.is_some());

        assert!(decls[0].synthetic);
        assert!(decls[0].descr.iter().any(|a| a.predicate.name.as_ref() == "internal"));
    }

    #[test]
    fn multi_stage_pipeline_chains_through_helpers() {
        let unit = parse(
            "odd(/1).\ncount(A) :- odd(X) |> do fn:group_by(), let G = fn:collect() |> let A = fn:count().\n",
        );
        let clause = unit.clauses.iter().find(|c| c.head.predicate.name.as_ref() == "count").unwrap();
        assert_eq!(clause.transform.as_ref().unwrap().stage_count(), 2);

        let mut rw = Rewriter::new();
        let (clauses, decls) = rw.rewrite_clause(clause);

        // tmp1 := body.  tmp2 := tmp1 |> stage1.  count := tmp2 |> stage2.
        assert_eq!(clauses.len(), 3);
        assert_eq!(decls.len(), 2);
        assert_eq!(clauses[0].head.predicate.name.as_ref(), "count1__tmp");
        assert_eq!(clauses[1].head.predicate.name.as_ref(), "count2__tmp");
        assert_eq!(clauses[2].head.predicate.name.as_ref(), "count");

        let Literal::Atom(mid_premise) = &clauses[1].premises[0] else {
            panic!("expected an atom premise");
        };
        assert_eq!(mid_premise.predicate, clauses[0].head.predicate);
        let Literal::Atom(last_premise) = &clauses[2].premises[0] else {
            panic!("expected an atom premise");
        };
        assert_eq!(last_premise.predicate, clauses[1].head.predicate);
    }

    #[test]
    fn preserves_head_predicate_set() {
        let unit = parse(
            "odd(/1).\ncount(A) :- odd(X) |> do fn:group_by(), let A = fn:count().\nfoo(X) :- odd(X).\n",
        );
        let mut rw = Rewriter::new();
        let rewritten = rw.rewrite_unit(&unit);

        let original_heads: BTreeSet<&str> =
            unit.clauses.iter().map(|c| c.head.predicate.name.as_ref()).collect();
        let rewritten_heads: BTreeSet<&str> =
            rewritten.clauses.iter().map(|c| c.head.predicate.name.as_ref()).collect();

        for head in &original_heads {
            assert!(rewritten_heads.contains(head), "missing original head `{head}`");
        }
        for head in rewritten_heads.difference(&original_heads) {
            assert!(head.ends_with("__tmp"), "unexpected new head `{head}`");
        }
    }
}
