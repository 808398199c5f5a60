// Copyright 2024 Google LLC
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

//! Recursive-descent parser for the Stratalog source grammar: a
//! scanner/token/`expect`-driven parser producing the owned
//! `stratalog_ast` types, extended with temporal operators, `@[...]`
//! annotations, and duration/timestamp literals.
//!
//! Two surface-syntax choices fill gaps the grammar sketch leaves open:
//! a name constant directly followed by `{` is a `DotType` (`/pkg.Type{f:
//! v}`), bare `{f: v}` is an anonymous `Struct`; and an empty `[]` is an
//! empty `List`, never a `Map`.

use std::io;

use anyhow::{anyhow, bail, Result};

use stratalog_ast as ast;
use ast::{
    Atom, BoundDecl, Clause, CompareOp, Const, Constraints, Decl, FunctionSym, Interval, LetStmt,
    Literal, SourceUnit, TemporalOp, Term, Transform, Var,
};

mod error;
mod quote;
mod scan;
mod token;

pub use error::{ErrorContext, ParseError, ScanError};
use token::Token;

/// Parses a complete source unit from `reader`. `path` is used only to
/// annotate error messages.
pub fn parse_source_unit<R: io::Read>(reader: R, path: &str) -> Result<SourceUnit> {
    let mut p = Parser::new(reader, path);
    p.next_token()?;
    p.parse_source_unit()
}

struct Parser<R>
where
    R: io::Read,
{
    sc: scan::Scanner<R>,
    token: Token,
    /// Counter for synthesizing a unique name per textual `_` occurrence:
    /// every occurrence is its own fresh variable.
    anon_counter: usize,
}

impl<R> Parser<R>
where
    R: io::Read,
{
    fn new<P: ToString>(reader: R, path: P) -> Self {
        Self { sc: scan::Scanner::new(reader, path), token: Token::Illegal, anon_counter: 0 }
    }

    /// Gives a fresh, never-repeated name to one textual `_` occurrence.
    /// [`stratalog_ast::Var::is_anonymous`] still recognizes the whole
    /// `_$N` family for rules (like singleton detection) that must treat
    /// every anonymous variable specially regardless of its exact name.
    fn fresh_anonymous_var(&mut self) -> Var {
        self.anon_counter += 1;
        Var::new(format!("_${}", self.anon_counter))
    }

    fn next_token(&mut self) -> Result<()> {
        self.token = self.sc.next_token()?;
        Ok(())
    }

    fn expect(&mut self, expected: Token) -> Result<()> {
        if expected != self.token {
            return Err(anyhow!(ParseError::Unexpected(
                self.sc.get_error_context(),
                expected,
                self.token.clone(),
            )));
        }
        self.next_token()
    }

    fn parse_source_unit(&mut self) -> Result<SourceUnit> {
        let mut decls = vec![];
        if self.token == Token::Package {
            decls.push(self.parse_package_decl()?);
        }
        while self.token == Token::Use {
            decls.push(self.parse_use_decl()?);
        }
        let mut clauses = vec![];
        loop {
            match self.token {
                Token::Eof => break,
                Token::Decl => decls.push(self.parse_decl()?),
                _ => clauses.push(self.parse_clause()?),
            }
        }
        Ok(SourceUnit { decls, clauses })
    }

    /// `Package` name (`[` descr-atoms `]`)? `!`
    fn parse_package_decl(&mut self) -> Result<Decl> {
        self.expect(Token::Package)?;
        let name = self.expect_ident()?;
        let mut descr = vec![Atom::new(
            ast::symbols::NAME_DESCRIPTOR,
            vec![Term::Constant(Const::String(name.into_boxed_str()))],
        )];
        if self.token == Token::LBracket {
            descr.extend(self.parse_bracket_atoms()?);
        }
        self.expect(Token::Bang)?;
        Ok(Decl {
            atom: Atom::new(ast::symbols::PACKAGE, vec![]),
            descr,
            bounds: vec![],
            constraints: None,
            synthetic: false,
        })
    }

    /// `Use` name (`[` descr-atoms `]`)? `!`
    fn parse_use_decl(&mut self) -> Result<Decl> {
        self.expect(Token::Use)?;
        let name = self.expect_ident()?;
        let mut descr = vec![Atom::new(
            ast::symbols::NAME_DESCRIPTOR,
            vec![Term::Constant(Const::String(name.into_boxed_str()))],
        )];
        if self.token == Token::LBracket {
            descr.extend(self.parse_bracket_atoms()?);
        }
        self.expect(Token::Bang)?;
        Ok(Decl {
            atom: Atom::new(ast::symbols::USE, vec![]),
            descr,
            bounds: vec![],
            constraints: None,
            synthetic: false,
        })
    }

    fn expect_ident(&mut self) -> Result<String> {
        let name = match &self.token {
            Token::Ident { name } => name.clone(),
            _ => bail!("expected identifier, got {}", self.token),
        };
        self.next_token()?;
        Ok(name)
    }

    /// `Decl` atom `temporal`? (`descr` atoms)? (`bound` `[` term,* `]`)*
    /// (`inclusion` atoms)? `.`
    fn parse_decl(&mut self) -> Result<Decl> {
        self.expect(Token::Decl)?;
        let atom = self.parse_atom()?;
        let mut descr = vec![];
        if self.token == Token::Temporal {
            self.next_token()?;
            descr.push(Atom::new(ast::symbols::TEMPORAL_MARKER, vec![]));
        }
        if self.token == Token::Descr {
            self.next_token()?;
            descr.extend(self.parse_bracket_atoms()?);
        }
        let mut bounds = vec![];
        while self.token == Token::Bound {
            bounds.push(self.parse_bound_decl()?);
        }
        let constraints =
            if self.token == Token::Inclusion { Some(self.parse_inclusion()?) } else { None };
        self.expect(Token::Dot)?;
        Ok(Decl { atom, descr, bounds, constraints, synthetic: false })
    }

    fn parse_bound_decl(&mut self) -> Result<BoundDecl> {
        self.expect(Token::Bound)?;
        self.expect(Token::LBracket)?;
        let mut terms = vec![];
        self.parse_term_list(&mut terms)?;
        self.expect(Token::RBracket)?;
        Ok(BoundDecl { terms })
    }

    fn parse_inclusion(&mut self) -> Result<Constraints> {
        self.expect(Token::Inclusion)?;
        let atoms = self.parse_bracket_atoms()?;
        Ok(Constraints { atoms })
    }

    /// `atom temporalAnnotation? ((':-' | '⟸') body)? '.'`
    fn parse_clause(&mut self) -> Result<Clause> {
        let head = self.parse_atom()?;
        let head_time =
            if self.token == Token::At { Some(self.parse_temporal_annotation()?) } else { None };
        let mut premises = vec![];
        let mut transform = None;
        if matches!(self.token, Token::ColonDash | Token::LongLeftDoubleArrow) {
            self.next_token()?;
            premises.push(self.parse_literal()?);
            while self.token == Token::Comma {
                self.next_token()?;
                premises.push(self.parse_literal()?);
            }
            if self.token == Token::PipeGt {
                transform = Some(self.parse_transform_chain()?);
            }
        }
        self.expect(Token::Dot)?;
        Ok(Clause { head, head_time, premises, transform })
    }

    /// `'@' '[' term (',' term)? ']'`
    fn parse_temporal_annotation(&mut self) -> Result<Interval> {
        self.expect(Token::At)?;
        self.expect(Token::LBracket)?;
        let start = self.parse_term()?;
        let end = if self.token == Token::Comma {
            self.next_token()?;
            Some(self.parse_term()?)
        } else {
            None
        };
        self.expect(Token::RBracket)?;
        Ok(Interval { start, end })
    }

    /// One `|>`-introduced stage, chained onto any subsequent stage via
    /// `Transform::next`.
    fn parse_transform_chain(&mut self) -> Result<Transform> {
        self.expect(Token::PipeGt)?;
        let mut stages = vec![self.parse_transform_stage()?];
        while self.token == Token::PipeGt {
            self.next_token()?;
            stages.push(self.parse_transform_stage()?);
        }
        let mut iter = stages.into_iter().rev();
        let mut acc = iter.next().expect("at least one stage was parsed");
        for mut stage in iter {
            stage.next = Some(Box::new(acc));
            acc = stage;
        }
        Ok(acc)
    }

    /// `'do' term (',' letStmt)* | letStmt (',' letStmt)*`
    fn parse_transform_stage(&mut self) -> Result<Transform> {
        let mut do_call = None;
        let mut lets = vec![];
        if self.token == Token::Do {
            self.next_token()?;
            do_call = Some(self.parse_term()?);
            while self.token == Token::Comma {
                self.next_token()?;
                lets.push(self.parse_let_stmt()?);
            }
        } else {
            lets.push(self.parse_let_stmt()?);
            while self.token == Token::Comma {
                self.next_token()?;
                lets.push(self.parse_let_stmt()?);
            }
        }
        Ok(Transform { do_call, lets, next: None })
    }

    /// `'let' VARIABLE '=' term`
    fn parse_let_stmt(&mut self) -> Result<LetStmt> {
        self.expect(Token::Let)?;
        let name = match &self.token {
            Token::Ident { name } if is_variable(name) => name.clone(),
            _ => bail!("parse_let_stmt: expected variable, got {}", self.token),
        };
        self.next_token()?;
        self.expect(Token::Eq)?;
        let value = self.parse_term()?;
        Ok(LetStmt { var: name.into_boxed_str(), value })
    }

    /// `temporalOperator? term temporalAnnotation? (cmp term)? | '!' term`
    fn parse_literal(&mut self) -> Result<Literal> {
        if self.token == Token::Bang {
            self.next_token()?;
            let atom = self.parse_atom()?;
            return Ok(Literal::NegAtom(atom));
        }

        let op = temporal_op_for(&self.token);
        let op_interval = if op.is_some() {
            self.next_token()?;
            self.expect(Token::LBracket)?;
            let start = self.parse_term()?;
            self.expect(Token::Comma)?;
            let end = self.parse_term()?;
            self.expect(Token::RBracket)?;
            Some(Interval { start, end: Some(end) })
        } else {
            None
        };

        let inner = self.parse_base_literal()?;

        let annotation = if self.token == Token::At {
            Some(self.parse_temporal_annotation()?)
        } else {
            op_interval
        };

        if op.is_some() || annotation.is_some() {
            Ok(Literal::Temporal { inner: Box::new(inner), op, annotation })
        } else {
            Ok(inner)
        }
    }

    fn parse_base_literal(&mut self) -> Result<Literal> {
        if let Token::Ident { name } = &self.token {
            if !is_variable(name) && !is_fn(name) {
                let atom = self.parse_atom()?;
                return Ok(Literal::Atom(atom));
            }
        }
        let left = self.parse_term()?;
        let op = match self.token {
            Token::Eq => CompareOp::Eq,
            Token::BangEq => CompareOp::Ne,
            Token::Lt => CompareOp::Lt,
            Token::Le => CompareOp::Le,
            Token::Gt => CompareOp::Gt,
            Token::Ge => CompareOp::Ge,
            _ => {
                return Err(anyhow!(ParseError::Malformed(
                    self.sc.get_error_context(),
                    format!("expected a comparison operator, got {}", self.token),
                )))
            }
        };
        self.next_token()?;
        let right = self.parse_term()?;
        Ok(Literal::Compare(op, left, right))
    }

    /// `atoms ::= [ atom {`,` atom } ]` wrapped in brackets.
    fn parse_bracket_atoms(&mut self) -> Result<Vec<Atom>> {
        self.expect(Token::LBracket)?;
        let mut atoms = vec![];
        if let Token::Ident { name } = &self.token {
            if !is_variable(name) {
                atoms.push(self.parse_atom()?);
                while self.token == Token::Comma {
                    self.next_token()?;
                    atoms.push(self.parse_atom()?);
                }
            }
        }
        self.expect(Token::RBracket)?;
        Ok(atoms)
    }

    /// `atom ::= name '(' term,* ')'`
    fn parse_atom(&mut self) -> Result<Atom> {
        let name = match &self.token {
            Token::Ident { name } if !is_variable(name) => name.clone(),
            _ => bail!("parse_atom: expected a predicate name, got {}", self.token),
        };
        self.next_token()?;
        self.expect(Token::LParen)?;
        let mut args = vec![];
        if self.token != Token::RParen {
            self.parse_term_list(&mut args)?;
        }
        self.expect(Token::RParen)?;
        Ok(Atom::new(name, args))
    }

    fn parse_term_list(&mut self, out: &mut Vec<Term>) -> Result<()> {
        out.push(self.parse_term()?);
        while self.token == Token::Comma {
            self.next_token()?;
            out.push(self.parse_term()?);
        }
        Ok(())
    }

    /// `term ::= var | fn:name '(' term,* ')' | constant | '[' ... ']' |
    /// '{' ... '}'`
    fn parse_term(&mut self) -> Result<Term> {
        match &self.token {
            Token::LBracket => return self.parse_list_or_map(),
            Token::LBrace => {
                let fields = self.parse_struct_fields()?;
                return Ok(Term::Constant(Const::Struct(fields)));
            }
            Token::Name { name } => {
                let raw = name.clone();
                self.next_token()?;
                if self.token == Token::LBrace {
                    let fields = self.parse_struct_fields()?;
                    let type_name = raw.trim_start_matches('/').replace('/', ".");
                    return Ok(Term::Constant(Const::DotType(
                        type_name.into_boxed_str(),
                        fields,
                    )));
                }
                return Ok(Term::Constant(Const::Name(raw.into_boxed_str())));
            }
            _ => {}
        }

        let mut term = match self.token.clone() {
            Token::Ident { name } if name == "_" => {
                self.next_token()?;
                return Ok(Term::Variable(self.fresh_anonymous_var()));
            }
            Token::Ident { name } if is_variable(&name) => Term::Variable(Var::new(name)),
            Token::Ident { name } if is_fn(&name) => {
                Term::ApplyFn(FunctionSym { name: name.into_boxed_str(), arity: None }, vec![])
            }
            Token::String { decoded } => Term::Constant(Const::String(decoded.into_boxed_str())),
            Token::Bytes { decoded } => Term::Constant(Const::Bytes(decoded)),
            Token::Int { decoded } => Term::Constant(Const::Int(decoded)),
            Token::Float { decoded } => Term::Constant(Const::Float(decoded)),
            Token::Duration { millis } => Term::Constant(Const::Int(millis)),
            Token::Timestamp { decoded } => Term::Constant(Const::String(decoded.into_boxed_str())),
            _ => bail!("parse_term: unexpected token {}", self.token),
        };
        self.next_token()?;
        if let Term::ApplyFn(sym, _) = &term {
            let sym = sym.clone();
            let mut args = vec![];
            self.expect(Token::LParen)?;
            if self.token != Token::RParen {
                self.parse_term_list(&mut args)?;
            }
            self.expect(Token::RParen)?;
            term = Term::ApplyFn(sym, args);
        }
        Ok(term)
    }

    fn parse_list_or_map(&mut self) -> Result<Term> {
        self.expect(Token::LBracket)?;
        if self.token == Token::RBracket {
            self.next_token()?;
            return Ok(Term::Constant(Const::List(vec![])));
        }
        let first = self.parse_term()?;
        let term = if self.token == Token::Colon {
            self.next_token()?;
            let first_val = self.parse_term()?;
            let mut entries = vec![(first, first_val)];
            while self.token == Token::Comma {
                self.next_token()?;
                let k = self.parse_term()?;
                self.expect(Token::Colon)?;
                let v = self.parse_term()?;
                entries.push((k, v));
            }
            Term::Constant(Const::Map(entries))
        } else {
            let mut items = vec![first];
            while self.token == Token::Comma {
                self.next_token()?;
                items.push(self.parse_term()?);
            }
            Term::Constant(Const::List(items))
        };
        self.expect(Token::RBracket)?;
        Ok(term)
    }

    fn parse_struct_fields(&mut self) -> Result<Vec<(Box<str>, Term)>> {
        self.expect(Token::LBrace)?;
        let mut fields = vec![];
        if self.token != Token::RBrace {
            fields.push(self.parse_struct_field()?);
            while self.token == Token::Comma {
                self.next_token()?;
                fields.push(self.parse_struct_field()?);
            }
        }
        self.expect(Token::RBrace)?;
        Ok(fields)
    }

    fn parse_struct_field(&mut self) -> Result<(Box<str>, Term)> {
        let key = match &self.token {
            Token::Ident { name } => name.clone(),
            Token::Name { name } => name.trim_start_matches('/').to_string(),
            _ => bail!("parse_struct_field: expected a field name, got {}", self.token),
        };
        self.next_token()?;
        self.expect(Token::Colon)?;
        let value = self.parse_term()?;
        Ok((key.into_boxed_str(), value))
    }
}

fn temporal_op_for(t: &Token) -> Option<TemporalOp> {
    match t {
        Token::StrictlyBefore => Some(TemporalOp::StrictlyBefore),
        Token::BeforeOrMeets => Some(TemporalOp::BeforeOrMeets),
        Token::StrictlyAfter => Some(TemporalOp::StrictlyAfter),
        Token::AfterOrMeets => Some(TemporalOp::AfterOrMeets),
        _ => None,
    }
}

fn is_variable(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_ascii_uppercase() || name == "_")
}

fn is_fn(name: &str) -> bool {
    name.starts_with("fn:")
}

#[cfg(test)]
mod tests {
    use super::*;
    use googletest::prelude::*;

    fn parse(src: &str) -> Result<SourceUnit> {
        parse_source_unit(src.as_bytes(), "test")
    }

    #[test]
    fn parses_a_fact() -> Result<()> {
        let unit = parse("parent(/alice, /bob).")?;
        assert_eq!(unit.clauses.len(), 1);
        assert!(unit.clauses[0].is_fact());
        assert_that!(unit.clauses[0].head.predicate.name.as_ref(), eq("parent"));
        Ok(())
    }

    #[test]
    fn parses_a_rule_with_negation_and_comparison() -> Result<()> {
        let unit = parse("eligible(X) :- person(X), !banned(X), X != /nobody.")?;
        let clause = &unit.clauses[0];
        assert_eq!(clause.premises.len(), 3);
        assert!(matches!(clause.premises[1], Literal::NegAtom(_)));
        assert!(matches!(clause.premises[2], Literal::Compare(CompareOp::Ne, ..)));
        Ok(())
    }

    #[test]
    fn parses_package_and_use() -> Result<()> {
        let unit = parse("Package foo[bar()]! Use baz[bar()]!")?;
        assert_eq!(unit.decls.len(), 2);
        assert_eq!(unit.decls[0].atom.predicate.name.as_ref(), "Package");
        assert_eq!(unit.decls[1].atom.predicate.name.as_ref(), "Use");
        Ok(())
    }

    #[test]
    fn parses_decl_with_bound_and_temporal_marker() -> Result<()> {
        let unit = parse(
            "Decl event(Name, Time) temporal descr[doc(\"an event\")] bound[/name, /number].",
        )?;
        let decl = &unit.decls[0];
        assert!(decl.is_temporal());
        assert_eq!(decl.bounds.len(), 1);
        assert_eq!(decl.bounds[0].terms.len(), 2);
        Ok(())
    }

    #[test]
    fn parses_transform_chain() -> Result<()> {
        let unit = parse(
            "total(G, S) :- sale(G, Amount) |> do fn:sum(Amount) |> let S = fn:plus(Amount, 1).",
        )?;
        let clause = &unit.clauses[0];
        let transform = clause.transform.as_ref().expect("transform present");
        assert_eq!(transform.stage_count(), 2);
        assert!(transform.do_call.is_some());
        assert!(transform.next.as_ref().unwrap().do_call.is_none());
        Ok(())
    }

    #[test]
    fn parses_temporal_literal_with_operator_and_annotation() -> Result<()> {
        let unit = parse(
            "follows(X, Y) :- <- [1, 10] event(X) @[2, 20], event(Y).",
        )?;
        let clause = &unit.clauses[0];
        match &clause.premises[0] {
            Literal::Temporal { op, annotation, .. } => {
                assert_eq!(*op, Some(TemporalOp::StrictlyBefore));
                assert!(annotation.is_some());
            }
            other => panic!("expected a temporal literal, got {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn parses_struct_and_dot_type_and_list() -> Result<()> {
        let unit = parse("describe(S) :- S = {name: \"x\"}.")?;
        assert!(matches!(
            &unit.clauses[0].premises[0],
            Literal::Compare(CompareOp::Eq, _, Term::Constant(Const::Struct(_)))
        ));

        let unit = parse("describe(S) :- S = /pkg.Point{x: 1, y: 2}.")?;
        match &unit.clauses[0].premises[0] {
            Literal::Compare(CompareOp::Eq, _, Term::Constant(Const::DotType(name, fields))) => {
                assert_eq!(name.as_ref(), "pkg.Point");
                assert_eq!(fields.len(), 2);
            }
            other => panic!("expected a DotType constant, got {:?}", other),
        }
        Ok(())
    }
}
