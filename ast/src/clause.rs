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

//! Clauses and transform chains.

use crate::literal::{Interval, Literal};
use crate::terms::{Atom, Term};
use std::fmt;

/// `let X = fn:...()`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LetStmt {
    pub var: Box<str>,
    pub value: Term,
}

/// One `|> do f(), let X = g()` pipeline stage. Additional stages chain
/// through `next`, modeling the grammar's `('|>' transform)*` (see
/// DESIGN.md's Open Question decision: multi-stage pipelines lower to a
/// chain of helper predicates, one per stage).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Transform {
    pub do_call: Option<Term>,
    pub lets: Vec<LetStmt>,
    pub next: Option<Box<Transform>>,
}

impl Transform {
    pub fn single(do_call: Option<Term>, lets: Vec<LetStmt>) -> Self {
        Transform { do_call, lets, next: None }
    }

    /// Iterates this stage and every chained stage in order.
    pub fn stages(&self) -> impl Iterator<Item = &Transform> {
        std::iter::successors(Some(self), |t| t.next.as_deref())
    }

    pub fn stage_count(&self) -> usize {
        self.stages().count()
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, stage) in self.stages().enumerate() {
            if i > 0 {
                write!(f, " |> ")?;
            }
            let mut wrote = false;
            if let Some(call) = &stage.do_call {
                write!(f, "do {call}")?;
                wrote = true;
            }
            for l in &stage.lets {
                if wrote {
                    write!(f, ", ")?;
                }
                write!(f, "let {} = {}", l.var, l.value)?;
                wrote = true;
            }
        }
        Ok(())
    }
}

/// A clause: `head :- premises |> transform.` A clause with no premises
/// and no transform is a fact.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Clause {
    pub head: Atom,
    pub head_time: Option<Interval>,
    pub premises: Vec<Literal>,
    pub transform: Option<Transform>,
}

impl Clause {
    pub fn fact(head: Atom) -> Self {
        Clause { head, head_time: None, premises: Vec::new(), transform: None }
    }

    pub fn is_fact(&self) -> bool {
        self.premises.is_empty() && self.transform.is_none()
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.head)?;
        if let Some(iv) = &self.head_time {
            match &iv.end {
                Some(end) => write!(f, " @[{}, {end}]", iv.start)?,
                None => write!(f, " @[{}]", iv.start)?,
            }
        }
        if !self.premises.is_empty() {
            write!(f, " :- ")?;
            for (i, p) in self.premises.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{p}")?;
            }
        }
        if let Some(t) = &self.transform {
            write!(f, " |> {t}")?;
        }
        write!(f, ".")
    }
}
