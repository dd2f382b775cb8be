//! Fixture loading and management.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use strfmt_core::FormatArg;

use crate::HarnessError;

/// One typed argument in a fixture case, e.g. `{"int": -3}` or `{"str": "hi"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixtureArg {
    Int(i64),
    Uint(u64),
    Float(f64),
    Char(char),
    Str(String),
    Ptr(usize),
}

impl FixtureArg {
    /// Parse the CLI form `<kind>:<value>`.
    pub fn parse_cli(raw: &str) -> Result<Self, HarnessError> {
        let invalid = || HarnessError::InvalidArg(raw.to_string());
        let (kind, value) = raw.split_once(':').ok_or_else(invalid)?;
        let arg = match kind {
            "int" => Self::Int(value.parse().map_err(|_| invalid())?),
            "uint" => Self::Uint(parse_unsigned(value).ok_or_else(invalid)?),
            "float" => Self::Float(value.parse().map_err(|_| invalid())?),
            "char" => {
                let mut chars = value.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Self::Char(c),
                    _ => return Err(invalid()),
                }
            }
            "str" => Self::Str(value.to_string()),
            "ptr" => Self::Ptr(
                parse_unsigned(value)
                    .and_then(|v| usize::try_from(v).ok())
                    .ok_or_else(invalid)?,
            ),
            _ => return Err(invalid()),
        };
        Ok(arg)
    }

    /// Borrow this argument as a formatter argument.
    #[must_use]
    pub fn as_format_arg(&self) -> FormatArg<'_> {
        match self {
            Self::Int(v) => FormatArg::SignedInt(*v),
            Self::Uint(v) => FormatArg::UnsignedInt(*v),
            Self::Float(v) => FormatArg::Float(*v),
            Self::Char(c) => FormatArg::from(*c),
            Self::Str(s) => FormatArg::from(s.as_str()),
            Self::Ptr(p) => FormatArg::Pointer(*p),
        }
    }
}

fn parse_unsigned(value: &str) -> Option<u64> {
    match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => value.parse().ok(),
    }
}

/// A single fixture test case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureCase {
    /// Case identifier.
    pub name: String,
    /// printf-style template.
    pub template: String,
    /// Arguments in template order.
    #[serde(default)]
    pub args: Vec<FixtureArg>,
    /// Expected formatted output.
    pub expected_output: String,
    /// C standard section reference.
    pub spec_section: String,
}

impl FixtureCase {
    #[must_use]
    pub fn format_args(&self) -> Vec<FormatArg<'_>> {
        self.args.iter().map(FixtureArg::as_format_arg).collect()
    }
}

/// A collection of fixture cases for one directive family.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureSet {
    /// Schema version.
    pub version: String,
    /// Directive family name.
    pub family: String,
    /// UTC timestamp of capture.
    pub captured_at: String,
    /// Individual test cases.
    pub cases: Vec<FixtureCase>,
}

impl FixtureSet {
    /// Load fixture set from JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize fixture set to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load fixture set from a file path.
    pub fn from_file(path: &Path) -> Result<Self, HarnessError> {
        let content = std::fs::read_to_string(path).map_err(|e| HarnessError::io(path, e))?;
        Self::from_json(&content).map_err(|source| HarnessError::Json {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Resolve `path` to fixture files: the file itself, or every `*.json` in a
/// directory, sorted by name.
pub fn collect_fixture_paths(path: &Path) -> Result<Vec<PathBuf>, HarnessError> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    let mut paths: Vec<PathBuf> = std::fs::read_dir(path)
        .map_err(|e| HarnessError::io(path, e))?
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|p| p.extension().and_then(|s| s.to_str()) == Some("json"))
        .collect();
    paths.sort();
    if paths.is_empty() {
        return Err(HarnessError::NoFixtures(path.to_path_buf()));
    }
    Ok(paths)
}
