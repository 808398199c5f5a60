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

//! Lint configuration: severity floor, disabled-rule set, and the
//! `overly-complex-rule` premise threshold.
//!
//! A CLI-constructed config can be optionally overlaid with a project
//! TOML file; this stays one flat struct since there are only six fixed
//! rules to configure, with no need for cascading per-directory
//! resolution.

use std::collections::HashSet;
use stratalog_ast::Severity;

#[derive(Debug, Clone)]
pub struct LintConfig {
    pub min_severity: Severity,
    pub disabled_rules: HashSet<String>,
    pub max_premises: usize,
}

impl Default for LintConfig {
    fn default() -> Self {
        LintConfig {
            min_severity: Severity::Info,
            disabled_rules: HashSet::new(),
            max_premises: 8,
        }
    }
}

impl LintConfig {
    pub fn is_disabled(&self, rule_name: &str) -> bool {
        self.disabled_rules.contains(rule_name)
    }

    /// Overlays fields present in a parsed `stratalog.toml` on top of
    /// `self`; fields absent from the file are left untouched. CLI flags
    /// should be applied after this so they take precedence.
    pub fn merge_toml(&mut self, file: &TomlConfig) {
        if let Some(sev) = &file.min_severity {
            self.min_severity = sev.parse().expect("Severity::from_str is infallible");
        }
        if let Some(rules) = &file.disabled_rules {
            self.disabled_rules.extend(rules.iter().cloned());
        }
        if let Some(max) = file.max_premises {
            self.max_premises = max;
        }
    }
}

/// The on-disk shape of an optional `stratalog.toml` project file.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct TomlConfig {
    pub min_severity: Option<String>,
    pub disabled_rules: Option<Vec<String>>,
    pub max_premises: Option<usize>,
}

impl TomlConfig {
    pub fn from_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_sensible_threshold() {
        let cfg = LintConfig::default();
        assert_eq!(cfg.max_premises, 8);
        assert_eq!(cfg.min_severity, Severity::Info);
    }

    #[test]
    fn toml_overlay_only_touches_present_fields() {
        let mut cfg = LintConfig::default();
        cfg.disabled_rules.insert("missing-doc".to_string());
        let file = TomlConfig::from_str("max_premises = 4\n").unwrap();
        cfg.merge_toml(&file);
        assert_eq!(cfg.max_premises, 4);
        assert!(cfg.disabled_rules.contains("missing-doc"));
    }

    #[test]
    fn parses_full_toml_file() {
        let file = TomlConfig::from_str(
            "min_severity = \"warning\"\ndisabled_rules = [\"missing-doc\"]\nmax_premises = 6\n",
        )
        .unwrap();
        let mut cfg = LintConfig::default();
        cfg.merge_toml(&file);
        assert_eq!(cfg.min_severity, Severity::Warning);
        assert_eq!(cfg.max_premises, 6);
        assert!(cfg.is_disabled("missing-doc"));
    }
}
