//! bg-spec: declarative composite specs and their loader.
//!
//! Specs are read from JSON or YAML, validated against the schema, and returned as
//! typed `CompositeSpec` values. Nothing is built here; see `bg-compose`.

pub mod parse;
pub mod raw;
pub mod schema;
pub mod serialize;

pub use parse::{SchemaError, parse_value};
pub use raw::RawValue;
pub use schema::*;

use std::path::{Path, PathBuf};

pub type SpecResult<T> = Result<T, SpecError>;

#[derive(thiserror::Error, Debug)]
pub enum SpecError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("Unsupported spec file extension: {path}")]
    UnsupportedFormat { path: PathBuf },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Spec file encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    /// Pick the format from a file extension (`.json`, `.yaml`, `.yml`).
    pub fn from_path(path: &Path) -> SpecResult<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Ok(Format::Json),
            Some("yaml" | "yml") => Ok(Format::Yaml),
            _ => Err(SpecError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// Parse and validate a spec from text in the given format.
pub fn parse_str(text: &str, format: Format) -> SpecResult<CompositeSpec> {
    let raw: RawValue = match format {
        Format::Json => serde_json::from_str(text)?,
        Format::Yaml => serde_yaml::from_str(text)?,
    };
    Ok(parse_value(&raw)?)
}

pub fn parse_json(text: &str) -> SpecResult<CompositeSpec> {
    parse_str(text, Format::Json)
}

pub fn parse_yaml(text: &str) -> SpecResult<CompositeSpec> {
    parse_str(text, Format::Yaml)
}

pub fn to_json_string(spec: &CompositeSpec) -> SpecResult<String> {
    Ok(serde_json::to_string_pretty(spec)?)
}

pub fn to_yaml_string(spec: &CompositeSpec) -> SpecResult<String> {
    Ok(serde_yaml::to_string(spec)?)
}

pub fn load_path(path: &Path) -> SpecResult<CompositeSpec> {
    let format = Format::from_path(path)?;
    let content = std::fs::read_to_string(path).map_err(|source| SpecError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let spec = parse_str(&content, format)?;
    tracing::debug!(path = %path.display(), model = %spec.name, "loaded spec");
    Ok(spec)
}

pub fn save_path(path: &Path, spec: &CompositeSpec) -> SpecResult<()> {
    let content = match Format::from_path(path)? {
        Format::Json => to_json_string(spec)?,
        Format::Yaml => to_yaml_string(spec)?,
    };
    std::fs::write(path, content).map_err(|source| SpecError::Io {
        path: path.to_path_buf(),
        source,
    })
}
