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

//! Finding-list rendering: one line per finding in text mode, a JSON
//! array in `--format json` mode.

use crate::findings::Finding;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format `{other}` (expected `text` or `json`)")),
        }
    }
}

/// Renders `findings` per `format`. JSON output is always a valid array,
/// `[]` for an empty list, never `null`.
pub fn render(findings: &[Finding], format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => findings.iter().map(|f| f.to_string()).collect::<Vec<_>>().join("\n"),
        OutputFormat::Json => serde_json::to_string_pretty(findings).expect("Finding serialization cannot fail"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stratalog_ast::Severity;

    #[test]
    fn text_output_joins_one_finding_per_line() {
        let findings = vec![
            Finding::new("missing-doc", Severity::Info, "a").with_file("x.slg"),
            Finding::new("unused-predicate", Severity::Warning, "b").with_file("x.slg"),
        ];
        let rendered = render(&findings, OutputFormat::Text);
        assert_eq!(rendered.lines().count(), 2);
    }

    #[test]
    fn json_output_of_empty_list_is_empty_array() {
        assert_eq!(render(&[], OutputFormat::Json), "[]");
    }

    #[test]
    fn parses_format_flag() {
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("xml".parse::<OutputFormat>().is_err());
    }
}
