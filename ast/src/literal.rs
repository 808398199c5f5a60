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

//! Body literals: atoms, negated atoms, comparisons, and temporal wrappers.

use crate::terms::{Atom, Term};
use std::fmt;

/// A comparison operator between two terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CompareOp::Eq => "=",
            CompareOp::Ne => "!=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
        };
        write!(f, "{s}")
    }
}

/// A temporal interval, `@[start, end]` or `@[start]` (half-open, no end).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Interval {
    pub start: Term,
    pub end: Option<Term>,
}

/// The four temporal relation operators from the grammar: `<-`, `[-`, `<+`,
/// `[+`. These express how a literal's validity interval must relate to
/// the enclosing clause's reference interval (strictly/non-strictly
/// before or after).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemporalOp {
    /// `<-`: strictly before.
    StrictlyBefore,
    /// `[-`: before or meeting.
    BeforeOrMeets,
    /// `<+`: strictly after.
    StrictlyAfter,
    /// `[+`: after or meeting.
    AfterOrMeets,
}

impl fmt::Display for TemporalOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TemporalOp::StrictlyBefore => "<-",
            TemporalOp::BeforeOrMeets => "[-",
            TemporalOp::StrictlyAfter => "<+",
            TemporalOp::AfterOrMeets => "[+",
        };
        write!(f, "{s}")
    }
}

/// A single premise in a clause body.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Literal {
    Atom(Atom),
    NegAtom(Atom),
    Compare(CompareOp, Term, Term),
    /// A literal qualified by a temporal operator and/or an `@[...]`
    /// annotation. Wraps any of the other literal kinds, per the grammar's
    /// `temporalOperator? term temporalAnnotation? (cmp term)? | '!' term`.
    Temporal {
        inner: Box<Literal>,
        op: Option<TemporalOp>,
        annotation: Option<Interval>,
    },
}

impl Literal {
    /// The atom this literal tests positively, if any (unwraps
    /// [`Literal::Temporal`] but not [`Literal::NegAtom`]).
    pub fn as_positive_atom(&self) -> Option<&Atom> {
        match self {
            Literal::Atom(a) => Some(a),
            Literal::Temporal { inner, .. } => inner.as_positive_atom(),
            _ => None,
        }
    }

    /// The negated atom this literal tests, if any.
    pub fn as_negated_atom(&self) -> Option<&Atom> {
        match self {
            Literal::NegAtom(a) => Some(a),
            Literal::Temporal { inner, .. } => inner.as_negated_atom(),
            _ => None,
        }
    }

    pub fn is_temporal(&self) -> bool {
        matches!(self, Literal::Temporal { .. })
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Atom(a) => write!(f, "{a}"),
            Literal::NegAtom(a) => write!(f, "!{a}"),
            Literal::Compare(op, l, r) => write!(f, "{l} {op} {r}"),
            Literal::Temporal { inner, op, annotation } => {
                if let Some(op) = op {
                    write!(f, "{op} ")?;
                }
                write!(f, "{inner}")?;
                if let Some(iv) = annotation {
                    match &iv.end {
                        Some(end) => write!(f, " @[{}, {end}]", iv.start)?,
                        None => write!(f, " @[{}]", iv.start)?,
                    }
                }
                Ok(())
            }
        }
    }
}
