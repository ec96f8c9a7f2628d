//! Project mode: namespace configuration, file discovery and merging.
//!
//! A project file maps namespace names to ordered lists of source paths:
//!
//! ```json
//! { "core": ["src/core.lua", "src/core/**/*.lua"], "ui": ["ui/*.lua"] }
//! ```
//!
//! Paths are relative to the configuration file's directory and may be glob
//! patterns. Missing files are reported and skipped.

use crate::model::{Documentation, Namespace};
use crate::parser;
use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Characters that make a path a glob pattern.
const GLOB_CHARS: &[char] = &['*', '?', '['];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceSources {
    pub name: String,
    pub patterns: Vec<String>,
}

/// Parsed project configuration, in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectConfig {
    /// Directory the source paths are resolved against.
    pub base_dir: PathBuf,
    pub namespaces: Vec<NamespaceSources>,
}

impl ProjectConfig {
    /// Read a configuration file; paths resolve against its directory.
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read project config {}", path.display()))?;
        let base_dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        Self::from_json(&json, base_dir)
            .with_context(|| format!("invalid project config {}", path.display()))
    }

    pub fn from_json(json: &str, base_dir: impl Into<PathBuf>) -> Result<Self> {
        let map: Map<String, Value> =
            serde_json::from_str(json).context("expected a JSON object of namespaces")?;

        let mut namespaces = Vec::with_capacity(map.len());
        for (name, value) in map {
            let patterns: Vec<String> = serde_json::from_value(value)
                .with_context(|| format!("namespace `{name}` must be an array of file paths"))?;
            namespaces.push(NamespaceSources { name, patterns });
        }

        Ok(Self {
            base_dir: base_dir.into(),
            namespaces,
        })
    }
}

/// Parse every namespace of the project, merging each namespace's files in
/// configuration order.
pub fn parse_project(config: &ProjectConfig) -> Result<Documentation> {
    let mut namespaces = Vec::with_capacity(config.namespaces.len());

    for sources in &config.namespaces {
        let mut docs: Vec<Namespace> = Vec::new();
        for pattern in &sources.patterns {
            for path in resolve_pattern(&config.base_dir, pattern)? {
                let content = fs::read_to_string(&path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                let doc = parser::parse(&content)
                    .with_context(|| format!("failed to parse {}", path.display()))?;
                debug!(
                    file = %path.display(),
                    classes = doc.classes.len(),
                    functions = doc.functions.len(),
                    "parsed"
                );
                docs.push(doc);
            }
        }

        info!(namespace = %sources.name, files = docs.len(), "merged namespace");
        namespaces.push(parser::merge_namespace(&sources.name, docs));
    }

    Ok(Documentation { namespaces })
}

/// Expand one configured path into existing regular files.
///
/// Missing files and directories produce a warning and an empty list.
pub fn resolve_pattern(base_dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    if !pattern.contains(GLOB_CHARS) {
        let path = base_dir.join(pattern);
        if !path.exists() {
            warn!("file not found: {}", path.display());
            return Ok(Vec::new());
        }
        if !path.is_file() {
            warn!("not a regular file: {}", path.display());
            return Ok(Vec::new());
        }
        return Ok(vec![path]);
    }

    let root = base_dir.join(glob_root(pattern));
    if !root.is_dir() {
        warn!("directory not found: {}", root.display());
        return Ok(Vec::new());
    }

    let full = format!(
        "{}/{}",
        glob::Pattern::escape(&base_dir.to_string_lossy()),
        pattern
    );
    let mut files = Vec::new();
    for entry in glob::glob(&full).with_context(|| format!("invalid glob pattern: {}", pattern))? {
        match entry {
            Ok(path) if path.is_file() => files.push(path),
            Ok(_) => {}
            Err(e) => warn!("failed to access {}: {}", e.path().display(), e.error()),
        }
    }
    if files.is_empty() {
        warn!("no files matched: {}", pattern);
    }
    Ok(files)
}

/// Directory part of a glob pattern before its first wildcard.
/// "server/**/*.lua" → "server", "*.lua" → ""
fn glob_root(pattern: &str) -> &str {
    let literal = match pattern.find(GLOB_CHARS) {
        Some(pos) => &pattern[..pos],
        None => pattern,
    };
    match literal.rfind(['/', '\\']) {
        Some(pos) => &literal[..pos],
        None => "",
    }
}
