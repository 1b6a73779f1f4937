//! Fixture loading from YAML files

use std::path::Path;

use edn_core::{CharAs, KeywordAs, ListAs, MapAs, ParseOptions, SetAs};
use serde::Deserialize;

/// A single test case from a fixture file
#[derive(Debug, Clone, Deserialize)]
pub struct TestCase {
    pub id: String,
    pub desc: String,
    /// Document body, without the root parentheses.
    pub edn: String,
    #[serde(default)]
    pub options: FixtureOptions,
    /// Rendered top-level values, in order.
    #[serde(default)]
    pub values: Option<Vec<String>>,
    /// `ErrorCode` variant name.
    #[serde(default)]
    pub error: Option<String>,
}

/// What a case should produce.
#[derive(Debug, Clone, PartialEq)]
pub enum Expected {
    Values(Vec<String>),
    Error(String),
}

impl TestCase {
    pub fn expected(&self) -> Expected {
        match (&self.values, &self.error) {
            (Some(values), None) => Expected::Values(values.clone()),
            (None, Some(code)) => Expected::Error(code.clone()),
            _ => panic!("case {} needs exactly one of `values` or `error`", self.id),
        }
    }
}

/// Materialization settings, spelled as in the fixture files.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FixtureOptions {
    pub map_as: Option<String>,
    pub set_as: Option<String>,
    pub list_as: Option<String>,
    pub keyword_as: Option<String>,
    pub char_as: Option<String>,
}

impl FixtureOptions {
    pub fn to_parse_options(&self) -> ParseOptions {
        let mut options = ParseOptions::new();
        if let Some(name) = &self.map_as {
            options = options.map_as(match name.as_str() {
                "pairs" => MapAs::Pairs,
                "record" => MapAs::Record,
                "sorted" => MapAs::Sorted,
                other => panic!("unknown map_as {other:?}"),
            });
        }
        if let Some(name) = &self.set_as {
            options = options.set_as(match name.as_str() {
                "wrapped" => SetAs::Wrapped,
                "array" => SetAs::Array,
                "sorted" => SetAs::Sorted,
                other => panic!("unknown set_as {other:?}"),
            });
        }
        if let Some(name) = &self.list_as {
            options = options.list_as(match name.as_str() {
                "wrapped" => ListAs::Wrapped,
                "array" => ListAs::Array,
                other => panic!("unknown list_as {other:?}"),
            });
        }
        if let Some(name) = &self.keyword_as {
            options = options.keyword_as(match name.as_str() {
                "wrapped" => KeywordAs::Wrapped,
                "string" => KeywordAs::String,
                other => panic!("unknown keyword_as {other:?}"),
            });
        }
        if let Some(name) = &self.char_as {
            options = options.char_as(match name.as_str() {
                "wrapped" => CharAs::Wrapped,
                "string" => CharAs::String,
                other => panic!("unknown char_as {other:?}"),
            });
        }
        options
    }
}

/// Load all test cases from a YAML fixture file
pub fn load_fixtures(path: &Path) -> Vec<TestCase> {
    let content = std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("Failed to read fixture file {:?}: {}", path, e));
    serde_yaml::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture file {:?}: {}", path, e))
}

/// Load fixtures from the standard fixtures directory
pub fn load_fixtures_by_name(name: &str) -> Vec<TestCase> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(format!("{}.yaml", name));
    load_fixtures(&path)
}
