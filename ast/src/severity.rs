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

//! Finding/warning severity, shared by the analyzer's temporal/stratification
//! diagnostics and the lint engine's findings: three ordered levels,
//! `info < warning < error`, encoded as their lowercase name.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "{s}")
    }
}

impl FromStr for Severity {
    type Err = std::convert::Infallible;

    /// An unrecognized string parses as `info`: severity is advisory
    /// filtering, not a hard contract, so a typo'd config value should
    /// degrade rather than abort the run.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "warning" => Severity::Warning,
            "error" => Severity::Error,
            _ => Severity::Info,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering() {
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
    }

    #[test]
    fn unrecognized_string_defaults_to_info() {
        assert_eq!("bogus".parse::<Severity>().unwrap(), Severity::Info);
        assert_eq!("ERROR".parse::<Severity>().unwrap(), Severity::Error);
    }
}
