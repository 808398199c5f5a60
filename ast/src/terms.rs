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

//! Terms, constants, and predicate/function symbols.
//!
//! Every type here is an owned value: `Clone`, structurally `PartialEq`/
//! `Eq`/`Hash`, with no lifetime parameter or arena. Programs in this
//! domain run to at most a few thousand clauses, so the simplicity of
//! owned strings outweighs the cost of not interning.

use std::fmt;

/// A variable name. The anonymous variable `_` is not folded by name: the
/// parser is responsible for giving every textual `_` occurrence a unique
/// synthetic name (e.g. `_$3`) so that two different occurrences never
/// compare equal. [`Var::is_anonymous`] still recognizes the family for
/// rules (like singleton detection) that must treat it specially.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Var(pub Box<str>);

impl Var {
    pub fn new(name: impl Into<Box<str>>) -> Self {
        Var(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    /// True for `_` and for any synthesized anonymous variable `_$N`.
    pub fn is_anonymous(&self) -> bool {
        self.0.starts_with('_')
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// `^(_|[A-Z][A-Za-z0-9_]*)$`
pub fn is_valid_variable_name(name: &str) -> bool {
    if name == "_" {
        return true;
    }
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_uppercase() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// `^:?[a-z][A-Za-z0-9_:]*(\.[A-Za-z0-9_:]+)*$`, with an optional leading
/// `/` accepted in addition to `:` for slash-prefixed path literals
/// (`/foo/bar`, `bound [/name]`): source segments are `/`-separated, the
/// stored name is the dot-joined path the regex describes.
pub fn is_valid_constant_name(name: &str) -> bool {
    let rest = name
        .strip_prefix(':')
        .or_else(|| name.strip_prefix('/'))
        .unwrap_or(name);
    let rest: std::borrow::Cow<str> = if name.starts_with('/') {
        rest.replace('/', ".").into()
    } else {
        rest.into()
    };
    let mut segments = rest.split('.');
    let Some(first) = segments.next() else {
        return false;
    };
    let mut chars = first.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() => {}
        _ => return false,
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':') {
        return false;
    }
    for seg in segments {
        if seg.is_empty() || !seg.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':') {
            return false;
        }
    }
    true
}

/// A constant, tagged by kind. Structured constants ([`Const::List`],
/// [`Const::Map`], [`Const::Struct`], [`Const::DotType`]) carry their child
/// terms by value.
#[derive(Debug, Clone, PartialEq)]
pub enum Const {
    /// A slash-prefixed path literal, e.g. `/foo/bar` or `:foo.bar`.
    Name(Box<str>),
    String(Box<str>),
    Bytes(Vec<u8>),
    Int(i64),
    /// Compared and hashed bitwise; the source language has no syntax to
    /// construct a NaN float constant, so this never observably differs
    /// from value equality.
    Float(f64),
    List(Vec<Term>),
    /// Parallel key/value sequences, preserving declared order (see
    /// DESIGN.md's Open Question decision on struct/map field ordering).
    Map(Vec<(Term, Term)>),
    /// An anonymous struct: `{field: value, ...}`.
    Struct(Vec<(Box<str>, Term)>),
    /// A struct prefixed by a dotted type name: `pkg.Type{field: value}`.
    DotType(Box<str>, Vec<(Box<str>, Term)>),
}

impl Eq for Const {}

impl std::hash::Hash for Const {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Const::Name(s) | Const::String(s) => s.hash(state),
            Const::Bytes(b) => b.hash(state),
            Const::Int(i) => i.hash(state),
            Const::Float(f) => f.to_bits().hash(state),
            Const::List(items) => items.hash(state),
            Const::Map(kvs) => kvs.hash(state),
            Const::Struct(fields) => fields.hash(state),
            Const::DotType(name, fields) => {
                name.hash(state);
                fields.hash(state);
            }
        }
    }
}

impl fmt::Display for Const {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Const::Name(n) => write!(f, "{n}"),
            Const::String(s) => write!(f, "{s:?}"),
            Const::Bytes(b) => write!(f, "b{b:?}"),
            Const::Int(i) => write!(f, "{i}"),
            Const::Float(v) => write!(f, "{v}"),
            Const::List(items) => {
                write!(f, "[")?;
                for (i, t) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{t}")?;
                }
                write!(f, "]")
            }
            Const::Map(kvs) => {
                write!(f, "[")?;
                for (i, (k, v)) in kvs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                write!(f, "]")
            }
            Const::Struct(fields) => {
                write!(f, "{{")?;
                for (i, (name, v)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{name}: {v}")?;
                }
                write!(f, "}}")
            }
            Const::DotType(type_name, fields) => {
                write!(f, "{type_name}{{")?;
                for (i, (name, v)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{name}: {v}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

/// A function symbol applied in [`Term::ApplyFn`]. `arity` is `None` for
/// variadic built-ins (`fn:list`, `fn:map`, `fn:struct`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionSym {
    pub name: Box<str>,
    pub arity: Option<usize>,
}

impl FunctionSym {
    pub fn new(name: impl Into<Box<str>>, arity: Option<usize>) -> Self {
        FunctionSym { name: name.into(), arity }
    }
}

impl fmt::Display for FunctionSym {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A term: a variable, a constant, or a function application.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    Variable(Var),
    Constant(Const),
    ApplyFn(FunctionSym, Vec<Term>),
}

impl Term {
    pub fn var(name: impl Into<Box<str>>) -> Term {
        Term::Variable(Var::new(name))
    }

    pub fn name(name: impl Into<Box<str>>) -> Term {
        Term::Constant(Const::Name(name.into()))
    }

    /// Visits every [`Var`] reachable from this term, including inside
    /// nested function applications.
    pub fn for_each_var<'a>(&'a self, f: &mut impl FnMut(&'a Var)) {
        match self {
            Term::Variable(v) => f(v),
            Term::Constant(c) => c.for_each_var(f),
            Term::ApplyFn(_, args) => {
                for a in args {
                    a.for_each_var(f);
                }
            }
        }
    }
}

impl Const {
    fn for_each_var<'a>(&'a self, f: &mut impl FnMut(&'a Var)) {
        match self {
            Const::Name(_) | Const::String(_) | Const::Bytes(_) | Const::Int(_) | Const::Float(_) => {}
            Const::List(items) => {
                for t in items {
                    t.for_each_var(f);
                }
            }
            Const::Map(kvs) => {
                for (k, v) in kvs {
                    k.for_each_var(f);
                    v.for_each_var(f);
                }
            }
            Const::Struct(fields) => {
                for (_, v) in fields {
                    v.for_each_var(f);
                }
            }
            Const::DotType(_, fields) => {
                for (_, v) in fields {
                    v.for_each_var(f);
                }
            }
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Variable(v) => write!(f, "{v}"),
            Term::Constant(c) => write!(f, "{c}"),
            Term::ApplyFn(fun, args) => {
                write!(f, "{fun}(")?;
                for (i, a) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{a}")?;
                }
                write!(f, ")")
            }
        }
    }
}

/// Identity of a predicate: name plus arity. Two predicates with the same
/// name but different arities are distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PredicateSym {
    pub name: Box<str>,
    pub arity: usize,
}

impl PredicateSym {
    pub fn new(name: impl Into<Box<str>>, arity: usize) -> Self {
        PredicateSym { name: name.into(), arity }
    }
}

impl fmt::Display for PredicateSym {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.arity)
    }
}

/// `(predicate_symbol, args)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Atom {
    pub predicate: PredicateSym,
    pub args: Vec<Term>,
}

impl Atom {
    pub fn new(name: impl Into<Box<str>>, args: Vec<Term>) -> Self {
        let arity = args.len();
        Atom { predicate: PredicateSym::new(name, arity), args }
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.predicate.name)?;
        for (i, a) in self.args.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{a}")?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use googletest::prelude::*;

    #[test]
    fn variable_name_validation() {
        assert!(is_valid_variable_name("_"));
        assert!(is_valid_variable_name("X"));
        assert!(is_valid_variable_name("Foo_Bar2"));
        assert!(!is_valid_variable_name("x"));
        assert!(!is_valid_variable_name(""));
    }

    #[test]
    fn constant_name_validation() {
        assert!(is_valid_constant_name("/foo"));
        assert!(is_valid_constant_name("foo.bar"));
        assert!(is_valid_constant_name(":foo"));
        assert!(!is_valid_constant_name("Foo"));
        assert!(!is_valid_constant_name("foo."));
    }

    #[test]
    fn anonymous_variable_never_folds() {
        let a = Var::new("_$1");
        let b = Var::new("_$2");
        assert!(a.is_anonymous() && b.is_anonymous());
        assert_ne!(a, b);
    }

    #[test]
    fn atom_display() {
        let atom = Atom::new("bar", vec![Term::name("/x"), Term::var("Y")]);
        assert_that!(atom, displays_as(eq("bar(/x, Y)")));
    }
}
