use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

/// Configuration table shipped with the binary, used when no `--config`
/// override is given.
const BUILTIN_CONFIG: &str = include_str!("../data.json");

/// Routing table from destination folder name to the file extensions that
/// belong in it. Static after load, never mutated at runtime.
///
/// A `BTreeMap` keeps the help listing in a stable alphabetical order.
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct ExtensionMap(BTreeMap<String, Vec<String>>);

impl ExtensionMap {
    /// Destination folder for a file extension, compared case-insensitively
    /// and without the leading dot. `None` means the extension is unmapped
    /// and the file is left alone.
    pub fn folder_for(&self, ext: &str) -> Option<&str> {
        let ext = ext.to_lowercase();
        self.0
            .iter()
            .find(|(_, exts)| exts.iter().any(|e| e.eq_ignore_ascii_case(&ext)))
            .map(|(folder, _)| folder.as_str())
    }

    /// Iterate over `(folder, extensions)` entries in listing order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The tool's static data, deserialized from the JSON configuration file.
///
/// Schema: `{"EXTENSIONS": {folder: [ext, ...]}, "HELP": {topic: text},
/// "HEADER": [line, ...]}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct Config {
    /// Extension routing table for `folder` and `trash`.
    pub extensions: ExtensionMap,
    /// Help text per topic key (`help`, `change`, `folder`, ...).
    pub help: HashMap<String, String>,
    /// Banner lines printed once at startup.
    pub header: Vec<String>,
}

impl Config {
    /// Parse the configuration embedded at compile time.
    pub fn builtin() -> Result<Self> {
        serde_json::from_str(BUILTIN_CONFIG).context("builtin data.json is malformed")
    }

    /// Load a configuration file from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("can't read config file {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("can't parse config file {}", path.display()))
    }

    /// Help text for a topic, or an empty string when the configuration
    /// lacks it. Missing topics are a configuration defect, not a user
    /// error, so there is nothing better to print.
    pub fn help_text(&self, topic: &str) -> &str {
        self.help.get(topic).map(String::as_str).unwrap_or("")
    }
}
