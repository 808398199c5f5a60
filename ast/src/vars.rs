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

//! Variable collection utilities.
//!
//! `add_vars_from_clause` visits the head atom's args, each premise, the
//! optional head interval, and the transform chain (including its nested
//! `next` chain), adding every [`Var`] encountered. The term-keyed variant
//! instead counts how many distinct *terms* reference each variable, which
//! is what the lint engine's singleton-variable check needs: each premise
//! literal counts as one term, the head counts as one, and each transform
//! statement counts as one.

use crate::clause::{Clause, Transform};
use crate::literal::{Interval, Literal};
use crate::terms::{Term, Var};
use std::collections::{HashMap, HashSet};

/// Adds every variable occurring anywhere in `clause` to `out`.
pub fn add_vars_from_clause(clause: &Clause, out: &mut HashSet<Var>) {
    for arg in &clause.head.args {
        arg.for_each_var(&mut |v| {
            out.insert(v.clone());
        });
    }
    if let Some(iv) = &clause.head_time {
        add_vars_from_interval(iv, out);
    }
    for p in &clause.premises {
        add_vars_from_literal(p, out);
    }
    if let Some(t) = &clause.transform {
        add_vars_from_transform(t, out);
    }
}

fn add_vars_from_interval(iv: &Interval, out: &mut HashSet<Var>) {
    iv.start.for_each_var(&mut |v| {
        out.insert(v.clone());
    });
    if let Some(end) = &iv.end {
        end.for_each_var(&mut |v| {
            out.insert(v.clone());
        });
    }
}

fn add_vars_from_literal(lit: &Literal, out: &mut HashSet<Var>) {
    match lit {
        Literal::Atom(a) | Literal::NegAtom(a) => {
            for arg in &a.args {
                arg.for_each_var(&mut |v| {
                    out.insert(v.clone());
                });
            }
        }
        Literal::Compare(_, l, r) => {
            l.for_each_var(&mut |v| {
                out.insert(v.clone());
            });
            r.for_each_var(&mut |v| {
                out.insert(v.clone());
            });
        }
        Literal::Temporal { inner, annotation, .. } => {
            add_vars_from_literal(inner, out);
            if let Some(iv) = annotation {
                add_vars_from_interval(iv, out);
            }
        }
    }
}

fn add_vars_from_transform(t: &Transform, out: &mut HashSet<Var>) {
    for stage in t.stages() {
        if let Some(call) = &stage.do_call {
            call.for_each_var(&mut |v| {
                out.insert(v.clone());
            });
        }
        for l in &stage.lets {
            out.insert(Var::new(l.var.clone()));
            l.value.for_each_var(&mut |v| {
                out.insert(v.clone());
            });
        }
    }
}

/// Counts, for each variable, how many distinct *terms* reference it: the
/// head counts as one term, each premise literal counts as one, and each
/// transform statement counts as one. A variable with count >= 2 is not a
/// singleton. Wildcards/underscore-prefixed names are exempt from the
/// singleton check by convention of the caller (see `stratalog-lint`).
pub fn term_reference_counts(clause: &Clause) -> HashMap<Var, usize> {
    let mut counts: HashMap<Var, usize> = HashMap::new();
    let mut bump_from_term = |term: &Term, counts: &mut HashMap<Var, usize>| {
        let mut seen_in_term: HashSet<Var> = HashSet::new();
        term.for_each_var(&mut |v| {
            seen_in_term.insert(v.clone());
        });
        for v in seen_in_term {
            *counts.entry(v).or_insert(0) += 1;
        }
    };

    // Head (+ head interval) is one term.
    {
        let mut seen: HashSet<Var> = HashSet::new();
        for arg in &clause.head.args {
            arg.for_each_var(&mut |v| {
                seen.insert(v.clone());
            });
        }
        if let Some(iv) = &clause.head_time {
            iv.start.for_each_var(&mut |v| {
                seen.insert(v.clone());
            });
            if let Some(end) = &iv.end {
                end.for_each_var(&mut |v| {
                    seen.insert(v.clone());
                });
            }
        }
        for v in seen {
            *counts.entry(v).or_insert(0) += 1;
        }
    }

    // Each premise literal is one term.
    for p in &clause.premises {
        let mut seen: HashSet<Var> = HashSet::new();
        add_vars_from_literal(p, &mut seen);
        for v in seen {
            *counts.entry(v).or_insert(0) += 1;
        }
    }

    // Each transform statement (the `do` call, and each `let`) is one term.
    if let Some(t) = &clause.transform {
        for stage in t.stages() {
            if let Some(call) = &stage.do_call {
                bump_from_term(call, &mut counts);
            }
            for l in &stage.lets {
                let mut seen: HashSet<Var> = HashSet::new();
                seen.insert(Var::new(l.var.clone()));
                l.value.for_each_var(&mut |v| {
                    seen.insert(v.clone());
                });
                for v in seen {
                    *counts.entry(v).or_insert(0) += 1;
                }
            }
        }
    }

    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terms::Atom;

    #[test]
    fn collects_all_vars() {
        // foo(X) :- bar(X, Y).
        let clause = Clause {
            head: Atom::new("foo", vec![Term::var("X")]),
            head_time: None,
            premises: vec![Literal::Atom(Atom::new("bar", vec![Term::var("X"), Term::var("Y")]))],
            transform: None,
        };
        let mut vars = HashSet::new();
        add_vars_from_clause(&clause, &mut vars);
        assert_eq!(vars.len(), 2);
        assert!(vars.contains(&Var::new("X")));
        assert!(vars.contains(&Var::new("Y")));
    }

    #[test]
    fn singleton_counts_by_term_not_occurrence() {
        // foo(X) :- bar(X, X).  X appears twice in one atom -> still 2 terms total
        // (head=1, premise=1), not a singleton.
        let clause = Clause {
            head: Atom::new("foo", vec![Term::var("X")]),
            head_time: None,
            premises: vec![Literal::Atom(Atom::new("bar", vec![Term::var("X"), Term::var("X")]))],
            transform: None,
        };
        let counts = term_reference_counts(&clause);
        assert_eq!(counts[&Var::new("X")], 2);
    }

    #[test]
    fn detects_singleton() {
        // bar(X, Typo) :- baz(X).  Typo appears in exactly one term (the head).
        let clause = Clause {
            head: Atom::new("bar", vec![Term::var("X"), Term::var("Typo")]),
            head_time: None,
            premises: vec![Literal::Atom(Atom::new("baz", vec![Term::var("X")]))],
            transform: None,
        };
        let counts = term_reference_counts(&clause);
        assert_eq!(counts[&Var::new("Typo")], 1);
        assert_eq!(counts[&Var::new("X")], 2);
    }
}
