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

//! Package resolution: merges a package's source units into one fully
//! qualified [`SourceUnit`], prefixing locally defined predicates with
//! the package name and validating cross-package references.
//!
//! Every case that could otherwise pass through silently unchanged or
//! ignored — a self-`Use`, a dotted reference to an unlisted package, a
//! malformed `name` descriptor, a bound term that is neither a type
//! constant nor a predicate reference — is an explicit [`ResolveError`]
//! here.

use crate::error::ResolveError;
use fxhash::{FxHashMap, FxHashSet};
use stratalog_ast::{Atom, Clause, Const, Decl, Literal, SourceUnit, Term};

/// One package: its declared name (`None` for the default/global package)
/// and the source units that belong to it.
pub struct Package {
    pub name: Option<Box<str>>,
    pub units: Vec<SourceUnit>,
}

/// Resolves every package independently and concatenates the results into
/// one program-wide [`SourceUnit`]. Predicate symbols in the output are
/// either built-in, package-qualified locals, or validated cross-package
/// references — see [`resolve_package`].
pub fn resolve_program(packages: Vec<Package>) -> Result<SourceUnit, ResolveError> {
    log::debug!("resolving {} package(s)", packages.len());
    let mut decls = Vec::new();
    let mut clauses = Vec::new();
    for pkg in packages {
        let resolved = resolve_package(pkg)?;
        decls.extend(resolved.decls);
        clauses.extend(resolved.clauses);
    }
    Ok(SourceUnit { decls, clauses })
}

/// Resolves one package: merges its units, strips `Package`/`Use`
/// declarations, and qualifies every locally defined predicate symbol with
/// `pkg.name.`.
pub fn resolve_package(pkg: Package) -> Result<SourceUnit, ResolveError> {
    log::trace!("resolving package {:?} ({} unit(s))", pkg.name, pkg.units.len());
    let info = PackageInfo::collect(pkg.name.clone(), &pkg.units)?;
    let defined_preds = find_defined_preds(&pkg.units);

    let renamer = Renamer { info: &info, defined_preds: &defined_preds };

    let mut decls = Vec::new();
    let mut clauses = Vec::new();
    for unit in &pkg.units {
        for decl in &unit.decls {
            if let Some(rewritten) = renamer.rewrite_decl(decl)? {
                decls.push(rewritten);
            }
        }
        for clause in &unit.clauses {
            clauses.push(renamer.rewrite_clause(clause)?);
        }
    }
    Ok(SourceUnit { decls, clauses })
}

struct PackageInfo {
    pkg_name: Option<Box<str>>,
    used_pkgs: FxHashSet<Box<str>>,
}

impl PackageInfo {
    fn collect(declared_name: Option<Box<str>>, units: &[SourceUnit]) -> Result<Self, ResolveError> {
        let mut pkg_name = declared_name;
        let mut used_pkgs = FxHashSet::default();

        for unit in units {
            for decl in &unit.decls {
                match decl.atom.predicate.name.as_ref() {
                    stratalog_ast::symbols::PACKAGE => {
                        if let Some(name) = find_name_desc(decl) {
                            pkg_name.get_or_insert(name);
                        }
                    }
                    stratalog_ast::symbols::USE => {
                        let name = find_name_desc(decl).ok_or_else(|| {
                            ResolveError::MalformedUseDecl(
                                "Use declaration has no `name(...)` descriptor".to_string(),
                            )
                        })?;
                        if let Some(own) = &pkg_name
                            && *own == name
                        {
                            return Err(ResolveError::SelfImport(name));
                        }
                        used_pkgs.insert(name);
                    }
                    _ => {}
                }
            }
        }
        if let Some(own) = &pkg_name {
            used_pkgs.insert(own.clone());
        }
        Ok(PackageInfo { pkg_name, used_pkgs })
    }
}

/// Looks for a `name(...)` descriptor atom with a single string argument.
fn find_name_desc(decl: &Decl) -> Option<Box<str>> {
    let name_atom = decl
        .descr
        .iter()
        .find(|a| a.predicate.name.as_ref() == stratalog_ast::symbols::NAME_DESCRIPTOR)?;
    match name_atom.args.first()? {
        Term::Constant(Const::String(s)) => Some(s.clone()),
        _ => None,
    }
}

/// Collects every predicate symbol (name, arity) defined locally: clause
/// heads and declared atoms, excluding `Package`/`Use` themselves.
fn find_defined_preds(units: &[SourceUnit]) -> FxHashMap<Box<str>, usize> {
    let mut preds = FxHashMap::default();
    for unit in units {
        for decl in &unit.decls {
            let name = &decl.atom.predicate.name;
            if stratalog_ast::symbols::is_reserved_predicate(name) {
                continue;
            }
            preds.insert(name.clone(), decl.atom.predicate.arity);
        }
        for clause in &unit.clauses {
            preds.insert(clause.head.predicate.name.clone(), clause.head.predicate.arity);
        }
    }
    preds
}

struct Renamer<'a> {
    info: &'a PackageInfo,
    defined_preds: &'a FxHashMap<Box<str>, usize>,
}

impl<'a> Renamer<'a> {
    /// Qualifies a predicate name referenced in head or premise position.
    /// Leaves dotted names that resolve against `used_pkgs` unchanged,
    /// rejects dotted names that don't, prefixes locally defined names,
    /// and otherwise assumes a built-in and leaves it as-is.
    fn rename_pred(&self, name: &str) -> Result<Box<str>, ResolveError> {
        if stratalog_ast::symbols::is_reserved_predicate(name) {
            return Ok(name.into());
        }
        if let Some(dot) = name.find('.') {
            let prefix = &name[..dot];
            return if self.info.used_pkgs.contains(prefix) {
                Ok(name.into())
            } else {
                Err(ResolveError::UnknownPackage(prefix.into()))
            };
        }
        if self.defined_preds.contains_key(name) {
            return match &self.info.pkg_name {
                Some(pkg) => Ok(format!("{pkg}.{name}").into_boxed_str()),
                None => Ok(name.into()),
            };
        }
        Ok(name.into())
    }

    fn rewrite_decl(&self, decl: &Decl) -> Result<Option<Decl>, ResolveError> {
        let name = decl.atom.predicate.name.as_ref();
        if stratalog_ast::symbols::is_reserved_predicate(name) {
            return Ok(None);
        }
        let mut rewritten = decl.clone();
        rewritten.atom = self.rewrite_atom(&decl.atom)?;
        for bound in &mut rewritten.bounds {
            for term in &mut bound.terms {
                *term = self.rewrite_bound_term(term)?;
            }
        }
        if let Some(constraints) = &mut rewritten.constraints {
            for atom in &mut constraints.atoms {
                *atom = self.rewrite_atom(atom)?;
            }
        }
        Ok(Some(rewritten))
    }

    /// Bound terms are either a type constant (`/string`, `/number`, ...)
    /// or a reference to a locally defined unary predicate — see
    /// `stratalog_ast::decl::BoundDecl`'s doc comment. Anything else is
    /// `BadBound`; a dotted reference must resolve through `used_pkgs`.
    fn rewrite_bound_term(&self, term: &Term) -> Result<Term, ResolveError> {
        let Term::Constant(Const::Name(name)) = term else {
            return Err(ResolveError::BadBound(term.to_string()));
        };
        if let Some(dot) = name.find('.') {
            let prefix = &name[..dot];
            return if self.info.used_pkgs.contains(prefix) {
                Ok(term.clone())
            } else {
                Err(ResolveError::UnknownPackage(prefix.into()))
            };
        }
        match self.defined_preds.get(name.as_ref()) {
            Some(1) => match &self.info.pkg_name {
                Some(pkg) => Ok(Term::Constant(Const::Name(format!("{pkg}.{name}").into_boxed_str()))),
                None => Ok(term.clone()),
            },
            // Not a locally defined unary predicate: accepted as a
            // built-in type constant (`/string`, `/number`, `/bool`, ...).
            None => Ok(term.clone()),
            Some(arity) => Err(ResolveError::BadBound(format!(
                "`{name}` names a predicate of arity {arity}, not a unary type"
            ))),
        }
    }

    fn rewrite_clause(&self, clause: &Clause) -> Result<Clause, ResolveError> {
        let mut rewritten = clause.clone();
        rewritten.head = self.rewrite_atom(&clause.head)?;
        for premise in &mut rewritten.premises {
            *premise = self.rewrite_literal(premise)?;
        }
        Ok(rewritten)
    }

    fn rewrite_literal(&self, lit: &Literal) -> Result<Literal, ResolveError> {
        Ok(match lit {
            Literal::Atom(a) => Literal::Atom(self.rewrite_atom(a)?),
            Literal::NegAtom(a) => Literal::NegAtom(self.rewrite_atom(a)?),
            Literal::Compare(op, l, r) => Literal::Compare(*op, l.clone(), r.clone()),
            Literal::Temporal { inner, op, annotation } => Literal::Temporal {
                inner: Box::new(self.rewrite_literal(inner)?),
                op: *op,
                annotation: annotation.clone(),
            },
        })
    }

    fn rewrite_atom(&self, atom: &Atom) -> Result<Atom, ResolveError> {
        let name = self.rename_pred(&atom.predicate.name)?;
        Ok(Atom::new(name, atom.args.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use googletest::prelude::*;
    use stratalog_ast::PredicateSym;

    fn unit_from(src: &str) -> SourceUnit {
        stratalog_parse::parse_source_unit(src.as_bytes(), "test").unwrap()
    }

    #[test]
    fn no_package_leaves_predicates_unqualified() {
        let unit = unit_from("bar(/x).\nfoo(X) :- bar(X).\n");
        let resolved = resolve_package(Package { name: None, units: vec![unit] }).unwrap();
        assert_that!(resolved.clauses[0].head.predicate, eq(PredicateSym::new("bar", 1)));
        assert_that!(resolved.clauses[1].head.predicate, eq(PredicateSym::new("foo", 1)));
    }

    #[test]
    fn local_predicates_are_package_qualified() {
        let unit = unit_from("Package pkg!\nbar(/x).\nfoo(X) :- bar(X).\n");
        let resolved = resolve_package(Package { name: None, units: vec![unit] }).unwrap();
        assert!(resolved.decls.is_empty());
        assert_eq!(resolved.clauses[0].head.predicate.name.as_ref(), "pkg.bar");
        assert_eq!(resolved.clauses[1].head.predicate.name.as_ref(), "pkg.foo");
        let premise = resolved.clauses[1].premises[0].as_positive_atom().unwrap();
        assert_eq!(premise.predicate.name.as_ref(), "pkg.bar");
    }

    #[test]
    fn external_references_left_as_is() {
        let unit = unit_from("Package pkg!\nUse other!\nfoo(X) :- other.bar(X).\n");
        let resolved = resolve_package(Package { name: None, units: vec![unit] }).unwrap();
        let premise = resolved.clauses[0].premises[0].as_positive_atom().unwrap();
        assert_eq!(premise.predicate.name.as_ref(), "other.bar");
    }

    #[test]
    fn self_import_is_rejected() {
        let unit = unit_from("Package pkg!\nUse pkg!\n");
        let err = resolve_package(Package { name: None, units: vec![unit] }).unwrap_err();
        assert_eq!(err, ResolveError::SelfImport("pkg".into()));
    }

    #[test]
    fn unlisted_dotted_reference_is_rejected() {
        let unit = unit_from("Package pkg!\nfoo(X) :- other.bar(X).\n");
        let err = resolve_package(Package { name: None, units: vec![unit] }).unwrap_err();
        assert_eq!(err, ResolveError::UnknownPackage("other".into()));
    }

    #[test]
    fn negation_is_rewritten_too() {
        let unit = unit_from("Package pkg!\nbar(/x).\nfoo(X) :- !bar(X), baz(X).\n");
        let resolved = resolve_package(Package { name: None, units: vec![unit] }).unwrap();
        let negated = resolved.clauses[1].premises[0].as_negated_atom().unwrap();
        assert_eq!(negated.predicate.name.as_ref(), "pkg.bar");
    }

    #[test]
    fn decl_only_package_resolves_with_no_clauses() {
        let unit = unit_from("Package pkg!\nDecl bar(X) bound [/string].\n");
        let resolved = resolve_package(Package { name: None, units: vec![unit] }).unwrap();
        assert_eq!(resolved.decls.len(), 1);
        assert_eq!(resolved.decls[0].atom.predicate.name.as_ref(), "pkg.bar");
        assert!(resolved.clauses.is_empty());
    }

    #[test]
    fn bound_referencing_sibling_predicate_is_qualified() {
        let unit = unit_from(
            "Package pkg!\nDecl name(X).\nDecl bar(X) bound [name].\nname(/a).\nbar(/a).\n",
        );
        let resolved = resolve_package(Package { name: None, units: vec![unit] }).unwrap();
        let bar_decl = resolved.decls.iter().find(|d| d.atom.predicate.name.as_ref() == "pkg.bar").unwrap();
        let Term::Constant(Const::Name(bound_name)) = &bar_decl.bounds[0].terms[0] else {
            panic!("expected a name bound term");
        };
        assert_eq!(bound_name.as_ref(), "pkg.name");
    }

    #[test]
    fn bound_referencing_type_constant_is_untouched() {
        let unit = unit_from("Package pkg!\nDecl bar(X) bound [/string].\nbar(/a).\n");
        let resolved = resolve_package(Package { name: None, units: vec![unit] }).unwrap();
        let bar_decl = &resolved.decls[0];
        let Term::Constant(Const::Name(bound_name)) = &bar_decl.bounds[0].terms[0] else {
            panic!("expected a name bound term");
        };
        assert_eq!(bound_name.as_ref(), "/string");
    }

    #[test]
    fn malformed_bound_term_is_rejected() {
        let unit = unit_from("Decl bar(X) bound [\"not-a-type\"].\n");
        let err = resolve_package(Package { name: None, units: vec![unit] }).unwrap_err();
        assert!(matches!(err, ResolveError::BadBound(_)));
    }

    #[test]
    fn idempotent_on_an_already_qualified_program() {
        let unit = unit_from("Package pkg!\nbar(/x).\nfoo(X) :- bar(X).\n");
        let once = resolve_package(Package { name: None, units: vec![unit] }).unwrap();
        let twice = resolve_package(Package { name: Some("pkg".into()), units: vec![once.clone()] }).unwrap();
        assert_eq!(once.clauses, twice.clauses);
    }
}
