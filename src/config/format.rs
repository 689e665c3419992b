//! Config file formats and their parsers.
//!
//! Every parser produces the same untyped [`Config`] mapping. Empty input is
//! an empty mapping in every format.

use std::fmt;
use std::path::Path;

use serde_json::Value;

use crate::config::error::ConfigError;
use crate::config::mapping::Config;

/// A supported configuration file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigFormat {
    /// `.yaml` / `.yml`
    Yaml,
    /// `.json`
    Json,
    /// `.toml`
    Toml,
}

impl ConfigFormat {
    /// Detects the format from the file extension, ignoring case.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "yaml" | "yml" => Some(ConfigFormat::Yaml),
            "json" => Some(ConfigFormat::Json),
            "toml" => Some(ConfigFormat::Toml),
            _ => None,
        }
    }

    /// Parses `content` as this format.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ParseError`] for malformed input,
    /// [`ConfigError::NotAMapping`] when the document is not a mapping, and
    /// [`ConfigError::YamlUnavailable`] for YAML when the `yaml` feature is off.
    pub fn parse(self, content: &str, path: &Path) -> Result<Config, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Config::default());
        }
        let value = match self {
            ConfigFormat::Json => parse_json(content, path)?,
            ConfigFormat::Yaml => parse_yaml(content, path)?,
            ConfigFormat::Toml => parse_toml(content, path)?,
        };
        match value {
            Value::Object(map) => Ok(Config::from(map)),
            Value::Null => Ok(Config::default()),
            _ => Err(ConfigError::NotAMapping {
                path: path.to_path_buf(),
                format: self,
            }),
        }
    }
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigFormat::Yaml => write!(f, "YAML"),
            ConfigFormat::Json => write!(f, "JSON"),
            ConfigFormat::Toml => write!(f, "TOML"),
        }
    }
}

fn parse_json(content: &str, path: &Path) -> Result<Value, ConfigError> {
    serde_json::from_str(content).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        format: ConfigFormat::Json,
        line: e.line(),
        column: e.column(),
        message: e.to_string(),
    })
}

#[cfg(feature = "yaml")]
fn parse_yaml(content: &str, path: &Path) -> Result<Value, ConfigError> {
    let parse_error = |line: usize, column: usize, message: String| ConfigError::ParseError {
        path: path.to_path_buf(),
        format: ConfigFormat::Yaml,
        line,
        column,
        message,
    };

    let yaml: serde_yaml::Value = serde_yaml::from_str(content).map_err(|e| {
        let (line, column) = e
            .location()
            .map(|loc| (loc.line(), loc.column()))
            .unwrap_or((0, 0));
        parse_error(line, column, e.to_string())
    })?;

    // Scalar keys are stringified; sequence or mapping keys are rejected.
    serde_json::to_value(yaml).map_err(|e| parse_error(0, 0, e.to_string()))
}

#[cfg(not(feature = "yaml"))]
fn parse_yaml(_content: &str, path: &Path) -> Result<Value, ConfigError> {
    Err(ConfigError::YamlUnavailable {
        path: path.to_path_buf(),
    })
}

/// Parses TOML with position-aware error reporting.
fn parse_toml(content: &str, path: &Path) -> Result<Value, ConfigError> {
    let table: toml::Table = toml::from_str(content).map_err(|e| {
        let (line, column) = e
            .span()
            .map(|span| {
                let line = content[..span.start].matches('\n').count() + 1;
                let last_newline = content[..span.start]
                    .rfind('\n')
                    .map(|p| p + 1)
                    .unwrap_or(0);
                let column = span.start - last_newline + 1;
                (line, column)
            })
            .unwrap_or((0, 0));
        ConfigError::ParseError {
            path: path.to_path_buf(),
            format: ConfigFormat::Toml,
            line,
            column,
            message: e.message().to_string(),
        }
    })?;

    Ok(Value::Object(
        table
            .into_iter()
            .map(|(key, value)| (key, toml_to_json(value)))
            .collect(),
    ))
}

/// Converts a TOML value; date-times become their RFC 3339 string.
fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::from(i),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(f.to_string())),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(key, value)| (key, toml_to_json(value)))
                .collect(),
        ),
    }
}
