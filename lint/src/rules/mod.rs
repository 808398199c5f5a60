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

//! The six built-in lint rules.

mod dead_code;
mod missing_doc;
mod naming_convention;
mod overly_complex_rule;
mod singleton_variable;
mod unused_predicate;

pub use dead_code::DeadCodeRule;
pub use missing_doc::MissingDocRule;
pub use naming_convention::NamingConventionRule;
pub use overly_complex_rule::OverlyComplexRuleRule;
pub use singleton_variable::SingletonVariableRule;
pub use unused_predicate::UnusedPredicateRule;

use stratalog_ast::{Decl, Literal};

/// Synthetic/internal predicates (rewriter helpers, see
/// `stratalog-analysis::rewriter`, and predicates the analyzer synthesized
/// a declaration for) are exempt from `unused-predicate` and
/// `missing-doc` — they are never user-facing, so neither finding would
/// be actionable.
pub(crate) fn is_internal(decl: &Decl) -> bool {
    decl.synthetic || is_rewriter_helper(decl)
}

/// Rewriter helper predicates only (marked with the `internal()` descr
/// atom — see `stratalog-analysis::rewriter::internal_decl`). Unlike
/// [`is_internal`], this does *not* also exempt every synthetic
/// declaration: `analyzer::merge_decls` synthesizes a declaration for
/// every undeclared clause head, not just rewriter helpers, and
/// `dead-code` must still flag an undeclared IDB predicate nobody
/// queries.
pub(crate) fn is_rewriter_helper(decl: &Decl) -> bool {
    decl.descr.iter().any(|a| a.predicate.name.as_ref() == stratalog_ast::symbols::INTERNAL_DESCRIPTOR)
}

/// The predicate an atom-shaped literal references, unwrapping negation
/// and temporal wrapping.
pub(crate) fn literal_predicate(lit: &Literal) -> Option<&stratalog_ast::PredicateSym> {
    lit.as_positive_atom()
        .or_else(|| lit.as_negated_atom())
        .map(|a| &a.predicate)
}
