//! Object-store configuration.
//!
//! A YAML file names the directory holding the object stores and groups the
//! files into ordered *store sets*, merged later-wins when loaded:
//!
//! ```yaml
//! root: Products/Costpoint_711/Framework/ObjectStore
//! rejected_patterns: ["translate(@id)"]
//! sets:
//!   base: [OS_Login.xml, OS_CP7Main.xml]
//!   pdmpart: [OS_PDMPART.xml]
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::result::{LocStoreError, LocStoreResult};
use crate::store::{LoadReport, LoaderOptions, LocatorStore, DEFAULT_REJECTED_PATTERNS};

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "locstore.yaml";

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_rejected_patterns() -> Vec<String> {
    DEFAULT_REJECTED_PATTERNS
        .iter()
        .map(|p| (*p).to_string())
        .collect()
}

/// Object-store configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Directory that set entries are relative to
    #[serde(default = "default_root")]
    pub root: PathBuf,
    /// Selector substrings that are never loaded
    #[serde(default = "default_rejected_patterns")]
    pub rejected_patterns: Vec<String>,
    /// Named, ordered lists of object-store files
    #[serde(default)]
    pub sets: BTreeMap<String, Vec<PathBuf>>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            rejected_patterns: default_rejected_patterns(),
            sets: BTreeMap::new(),
        }
    }
}

impl StoreConfig {
    /// Create an empty configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse configuration from YAML
    ///
    /// # Errors
    ///
    /// Returns [`LocStoreError::Yaml`] on malformed YAML or unknown fields.
    pub fn from_yaml_str(yaml: &str) -> LocStoreResult<Self> {
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    /// Read configuration from a file.
    ///
    /// A relative `root` is resolved against the file's directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> LocStoreResult<Self> {
        let path = path.as_ref();
        let yaml = fs::read_to_string(path).map_err(|e| {
            LocStoreError::config(format!("cannot read {}: {e}", path.display()))
        })?;
        let mut config = Self::from_yaml_str(&yaml)?;
        if config.root.is_relative() {
            if let Some(dir) = path.parent() {
                config.root = dir.join(&config.root);
            }
        }
        Ok(config)
    }

    /// Set the root directory
    #[must_use]
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// Define a store set
    #[must_use]
    pub fn with_set<I, P>(mut self, name: impl Into<String>, files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let _ = self
            .sets
            .insert(name.into(), files.into_iter().map(Into::into).collect());
        self
    }

    /// Names of the defined sets
    pub fn set_names(&self) -> impl Iterator<Item = &str> {
        self.sets.keys().map(String::as_str)
    }

    /// Files of a set, joined under `root`, in merge order
    ///
    /// # Errors
    ///
    /// Returns [`LocStoreError::UnknownStoreSet`] if the set is not defined.
    pub fn set_paths(&self, name: &str) -> LocStoreResult<Vec<PathBuf>> {
        let files = self
            .sets
            .get(name)
            .ok_or_else(|| LocStoreError::UnknownStoreSet {
                name: name.to_string(),
            })?;
        Ok(files.iter().map(|f| self.root.join(f)).collect())
    }

    /// Loader options from this configuration
    #[must_use]
    pub fn loader_options(&self) -> LoaderOptions {
        LoaderOptions::new().with_rejected_patterns(self.rejected_patterns.iter().cloned())
    }

    /// Load and merge a named set
    ///
    /// # Errors
    ///
    /// Returns [`LocStoreError::UnknownStoreSet`] if the set is not defined.
    /// Problems inside the files are reported on the [`LoadReport`].
    pub fn load_set(&self, name: &str) -> LocStoreResult<LoadReport> {
        let paths = self.set_paths(name)?;
        Ok(LocatorStore::load_many(paths, &self.loader_options()))
    }
}
