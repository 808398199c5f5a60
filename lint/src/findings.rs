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

//! The [`Finding`] record: a rule name, severity, optional source file,
//! message, and optional predicate, serializable to JSON with severity
//! encoded as its lowercase name.

use serde::{Deserialize, Serialize};
use stratalog_ast::Severity;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub rule: String,
    #[serde(with = "severity_as_str")]
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub predicate: Option<String>,
}

impl Finding {
    pub fn new(rule: impl Into<String>, severity: Severity, message: impl Into<String>) -> Self {
        Finding { rule: rule.into(), severity, file: None, message: message.into(), predicate: None }
    }

    pub fn with_predicate(mut self, predicate: impl Into<String>) -> Self {
        self.predicate = Some(predicate.into());
        self
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }
}

impl std::fmt::Display for Finding {
    /// `<file>:[<severity>] <rule>: <message>`
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let file = self.file.as_deref().unwrap_or("<unknown>");
        write!(f, "{file}:[{}] {}: {}", self.severity, self.rule, self.message)
    }
}

mod severity_as_str {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::str::FromStr;
    use stratalog_ast::Severity;

    pub fn serialize<S: Serializer>(sev: &Severity, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&sev.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Severity, D::Error> {
        let s = String::deserialize(d)?;
        Ok(Severity::from_str(&s).expect("Severity::from_str is infallible"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_format_matches_spec() {
        let finding = Finding::new("missing-doc", Severity::Info, "predicate `bar` has no doc")
            .with_file("a.mg");
        assert_eq!(finding.to_string(), "a.mg:[info] missing-doc: predicate `bar` has no doc");
    }

    #[test]
    fn json_roundtrip_preserves_fields() {
        let finding = Finding::new("unused-predicate", Severity::Warning, "unused")
            .with_file("a.mg")
            .with_predicate("bar/1");
        let json = serde_json::to_string(&finding).unwrap();
        assert!(json.contains("\"severity\":\"warning\""));
        let back: Finding = serde_json::from_str(&json).unwrap();
        assert_eq!(back, finding);
    }

    #[test]
    fn empty_findings_list_serializes_to_empty_array_not_null() {
        let findings: Vec<Finding> = Vec::new();
        assert_eq!(serde_json::to_string(&findings).unwrap(), "[]");
    }
}
