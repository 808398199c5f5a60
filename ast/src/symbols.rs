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

//! The process-wide table of reserved, built-in symbols: `Package`/`Use`
//! declaration predicates, comparison predicates, and built-in transform
//! functions.
//!
//! These live in one table, built once via [`std::sync::OnceLock`] for
//! guaranteed one-time initialization, without a `Mutex` since nothing
//! here is ever mutated after construction.

use std::collections::HashSet;
use std::sync::OnceLock;

pub const PACKAGE: &str = "Package";
pub const USE: &str = "Use";
pub const NAME_DESCRIPTOR: &str = "name";
pub const DOC_DESCRIPTOR: &str = "doc";
pub const TEMPORAL_MARKER: &str = "temporal";
pub const REFLECTS_DESCRIPTOR: &str = "reflects";
pub const INTERNAL_DESCRIPTOR: &str = "internal";

/// Suffix the rewriter and analyzer append to synthesized helper
/// predicates.
pub const SYNTHETIC_SUFFIX: &str = "__tmp";

/// Built-in aggregation/transform function names recognized by
/// `fn:group_by(...)`-style transform statements.
pub const BUILTIN_FUNCTIONS: &[&str] = &[
    "fn:group_by",
    "fn:count",
    "fn:sum",
    "fn:max",
    "fn:min",
    "fn:collect",
    "fn:list",
    "fn:map",
    "fn:struct",
    "fn:plus",
    "fn:minus",
];

struct Registry {
    reserved_predicates: HashSet<&'static str>,
    builtin_functions: HashSet<&'static str>,
}

fn registry() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    REGISTRY.get_or_init(|| Registry {
        reserved_predicates: HashSet::from([PACKAGE, USE]),
        builtin_functions: BUILTIN_FUNCTIONS.iter().copied().collect(),
    })
}

/// True for `Package` and `Use`, the two reserved declaration predicates
/// consumed by package resolution.
pub fn is_reserved_predicate(name: &str) -> bool {
    registry().reserved_predicates.contains(name)
}

/// True for a recognized built-in transform/aggregation function.
pub fn is_builtin_function(name: &str) -> bool {
    registry().builtin_functions.contains(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_predicates() {
        assert!(is_reserved_predicate("Package"));
        assert!(is_reserved_predicate("Use"));
        assert!(!is_reserved_predicate("foo"));
    }

    #[test]
    fn builtin_functions() {
        assert!(is_builtin_function("fn:count"));
        assert!(!is_builtin_function("fn:nonexistent"));
    }
}
