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

//! A thin `PrettyPrint` layer, kept separate from `Debug` the way the seed
//! repo's `ast::pretty` module does (there, printing needed a separate
//! arena-aware wrapper since `Debug` could not resolve interned names; here
//! every type already carries its own data, so `pretty()` is a convenience
//! alias for `to_string()` rather than a distinct formatting path, but the
//! trait boundary is kept so callers write `.pretty()` at call sites the
//! same way regardless of which representation backs a given node).

pub trait PrettyPrint: std::fmt::Display {
    fn pretty(&self) -> String {
        self.to_string()
    }
}

impl<T: std::fmt::Display> PrettyPrint for T {}
