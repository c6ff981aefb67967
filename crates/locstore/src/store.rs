//! Loading object stores into key → selector maps.
//!
//! Loading is best-effort and never fails: an unreadable or malformed file
//! gives an empty store, and a bad control is skipped without affecting the
//! rest. Each recovery is logged and recorded as a [`Diagnostic`] on the
//! returned [`LoadReport`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::diagnostic::{Diagnostic, DiagnosticKind, Severity};
use crate::document::ObjectStoreDocument;
use crate::result::{LocStoreError, LocStoreResult};
use crate::selector::Selector;

/// Selector fragments that are never loaded.
///
/// XPath built on `translate(@id)` was recorded against markup that no
/// longer exists and matches unreliably.
pub const DEFAULT_REJECTED_PATTERNS: &[&str] = &["translate(@id)"];

/// Options controlling how controls are filtered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoaderOptions {
    /// A selector containing any of these substrings is dropped
    pub rejected_patterns: Vec<String>,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            rejected_patterns: DEFAULT_REJECTED_PATTERNS
                .iter()
                .map(|p| (*p).to_string())
                .collect(),
        }
    }
}

impl LoaderOptions {
    /// Create default options
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rejected pattern
    #[must_use]
    pub fn with_rejected_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.rejected_patterns.push(pattern.into());
        self
    }

    /// Replace the rejected patterns
    #[must_use]
    pub fn with_rejected_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rejected_patterns = patterns.into_iter().map(Into::into).collect();
        self
    }

    /// First rejected pattern contained in `selector`
    #[must_use]
    pub fn rejected_pattern(&self, selector: &str) -> Option<&str> {
        self.rejected_patterns
            .iter()
            .map(String::as_str)
            .find(|pattern| !pattern.is_empty() && selector.contains(pattern))
    }
}

/// A read-only mapping from control key to resolved selector.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocatorStore {
    locators: BTreeMap<String, String>,
    sources: Vec<PathBuf>,
}

impl LocatorStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load one object-store file with default options
    #[must_use]
    pub fn load(path: impl AsRef<Path>) -> LoadReport {
        Self::load_with(path, &LoaderOptions::default())
    }

    /// Load one object-store file
    #[must_use]
    pub fn load_with(path: impl AsRef<Path>, options: &LoaderOptions) -> LoadReport {
        let path = path.as_ref();
        let mut report = LoadReport::default();
        report.store.sources.push(path.to_path_buf());

        let xml = match fs::read_to_string(path) {
            Ok(xml) => xml,
            Err(e) => {
                report.record(Diagnostic::new(
                    Some(path),
                    None,
                    DiagnosticKind::FileUnreadable {
                        message: e.to_string(),
                    },
                ));
                return report;
            }
        };

        resolve(&xml, Some(path), options, &mut report);
        report
    }

    /// Resolve an object store held in memory
    #[must_use]
    pub fn from_xml_str(xml: &str, options: &LoaderOptions) -> LoadReport {
        let mut report = LoadReport::default();
        resolve(xml, None, options, &mut report);
        report
    }

    /// Load several files and merge them in order (later files win)
    #[must_use]
    pub fn load_many<I, P>(paths: I, options: &LoaderOptions) -> LoadReport
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut merged = LoadReport::default();
        for path in paths {
            let report = Self::load_with(path, options);
            merged.store.merge(report.store);
            merged.diagnostics.extend(report.diagnostics);
        }
        merged
    }

    /// Merge `other` into this store. Keys in `other` overwrite existing keys.
    pub fn merge(&mut self, other: LocatorStore) {
        self.locators.extend(other.locators);
        self.sources.extend(other.sources);
    }

    /// Merge stores in order (later stores win)
    #[must_use]
    pub fn merged(stores: impl IntoIterator<Item = LocatorStore>) -> Self {
        stores.into_iter().fold(Self::new(), |mut acc, store| {
            acc.merge(store);
            acc
        })
    }

    /// Insert or overwrite a locator
    pub fn insert(&mut self, key: impl Into<String>, selector: impl Into<String>) {
        let _ = self.locators.insert(key.into(), selector.into());
    }

    /// Selector for `key`, if loaded
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.locators.get(key).map(String::as_str)
    }

    /// Selector for `key`
    ///
    /// # Errors
    ///
    /// Returns [`LocStoreError::UnknownLocator`] if the key was not loaded.
    pub fn selector(&self, key: &str) -> LocStoreResult<&str> {
        self.get(key).ok_or_else(|| LocStoreError::UnknownLocator {
            key: key.to_string(),
        })
    }

    /// Keys from `keys` that are not loaded, in the given order
    #[must_use]
    pub fn missing(&self, keys: &[&str]) -> Vec<String> {
        keys.iter()
            .filter(|key| !self.contains(key))
            .map(|key| (*key).to_string())
            .collect()
    }

    /// Check that every key in `keys` is loaded
    ///
    /// # Errors
    ///
    /// Returns [`LocStoreError::MissingLocators`] naming every absent key.
    pub fn require(&self, keys: &[&str]) -> LocStoreResult<()> {
        let missing = self.missing(keys);
        if missing.is_empty() {
            Ok(())
        } else {
            Err(LocStoreError::MissingLocators { keys: missing })
        }
    }

    /// Whether `key` is loaded
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.locators.contains_key(key)
    }

    /// Number of locators
    #[must_use]
    pub fn len(&self) -> usize {
        self.locators.len()
    }

    /// Whether the store is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locators.is_empty()
    }

    /// Keys in sorted order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.locators.keys().map(String::as_str)
    }

    /// `(key, selector)` pairs in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.locators
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Files this store was loaded from, in load order
    #[must_use]
    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    /// The underlying map
    #[must_use]
    pub fn into_map(self) -> BTreeMap<String, String> {
        self.locators
    }
}

/// A loaded store together with everything that was skipped or degraded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadReport {
    /// Resolved locators
    pub store: LocatorStore,
    /// Recovered problems, in the order they occurred
    pub diagnostics: Vec<Diagnostic>,
}

impl LoadReport {
    /// Whether a whole file failed to load
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity() == Severity::Error)
    }

    /// Number of controls dropped
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.kind.skips_control())
            .count()
    }

    /// Diagnostics for one key
    pub fn diagnostics_for<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a Diagnostic> {
        self.diagnostics
            .iter()
            .filter(move |d| d.key.as_deref() == Some(key))
    }

    fn record(&mut self, diagnostic: Diagnostic) {
        diagnostic.log();
        self.diagnostics.push(diagnostic);
    }
}

/// Load one object store and return only the locators.
///
/// Never fails; see [`LocatorStore::load`] for the diagnostics.
#[must_use]
pub fn load_all_locators(path: impl AsRef<Path>) -> LocatorStore {
    LocatorStore::load(path).store
}

fn resolve(xml: &str, source: Option<&Path>, options: &LoaderOptions, report: &mut LoadReport) {
    let document = match ObjectStoreDocument::parse(xml) {
        Ok(document) => document,
        Err(e) => {
            report.record(Diagnostic::new(
                source,
                None,
                DiagnosticKind::MalformedXml {
                    message: e.to_string(),
                },
            ));
            return;
        }
    };

    if !document.has_root() {
        report.record(Diagnostic::new(
            source,
            None,
            DiagnosticKind::UnexpectedRoot {
                root: document.root,
            },
        ));
        return;
    }
    if document.is_empty() {
        report.record(Diagnostic::new(source, None, DiagnosticKind::NoControls));
        return;
    }

    let before = report.store.len();
    for control in &document.controls {
        let key = control.key.as_deref();
        let diagnostic = |kind| Diagnostic::new(source, key, kind);

        let Some(key) = key else {
            report.record(diagnostic(DiagnosticKind::MissingKey));
            continue;
        };
        if control.record_blocks > 1 {
            report.record(diagnostic(DiagnosticKind::AmbiguousSearchRecords {
                blocks: control.record_blocks,
            }));
            continue;
        }
        let Some(record) = control.first_record() else {
            report.record(diagnostic(DiagnosticKind::MissingSearchRecord));
            continue;
        };
        if control.records.len() > 1 {
            tracing::debug!(
                "Using first of {} search records for key: {key}",
                control.records.len()
            );
        }
        let Some(search) = record.to_search_record() else {
            report.record(diagnostic(DiagnosticKind::MissingMethod));
            continue;
        };
        let Some(value) = search.value.as_deref() else {
            report.record(diagnostic(DiagnosticKind::MissingValue));
            continue;
        };

        let selector = match Selector::translate(&search.locator_method(), value) {
            Ok(selector) => selector,
            Err(e) => {
                report.record(diagnostic(DiagnosticKind::TranslationFailed {
                    message: e.to_string(),
                }));
                continue;
            }
        };
        if selector.is_fallback() {
            report.record(diagnostic(DiagnosticKind::UnknownMethod {
                method: search.method.clone(),
            }));
        }

        let selector = selector.to_string();
        if let Some(pattern) = options.rejected_pattern(&selector) {
            report.record(diagnostic(DiagnosticKind::RejectedPattern {
                pattern: pattern.to_string(),
            }));
            continue;
        }

        report.store.insert(key, selector);
    }

    let name = source
        .and_then(Path::file_name)
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "<memory>".to_string());
    tracing::info!(
        "Loaded {} locators from {name}",
        report.store.len().saturating_sub(before)
    );
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    fn control(key: &str, method: &str, value: &str) -> String {
        format!(
            "<control key=\"{key}\"><searchrecords><searchrecord method=\"{method}\">{value}</searchrecord></searchrecords></control>"
        )
    }

    fn store_xml(controls: &[String]) -> String {
        format!("<objectstore>{}</objectstore>", controls.concat())
    }

    fn resolve_str(xml: &str) -> LoadReport {
        LocatorStore::from_xml_str(xml, &LoaderOptions::default())
    }

    fn write_store(xml: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(xml.as_bytes()).unwrap();
        file
    }

    mod loader_tests {
        use super::*;

        #[test]
        fn test_single_id_control() {
            let file = write_store(&store_xml(&[control("UserID", "id", "USER_ID")]));
            let store = load_all_locators(file.path());

            assert_eq!(store.len(), 1);
            assert_eq!(store.get("UserID"), Some("#USER_ID"));
        }

        #[test]
        fn test_role_control() {
            let report = resolve_str(&store_xml(&[control(
                "Login",
                "role",
                "button[name=&quot;Login&quot;]",
            )]));
            assert_eq!(report.store.get("Login"), Some("role=button[name=\"Login\"]"));
            assert!(report.diagnostics.is_empty());
        }

        #[test]
        fn test_unknown_method_falls_back_with_warning() {
            let report = resolve_str(&store_xml(&[control("Foo", "bogus", ".foo")]));

            assert_eq!(report.store.get("Foo"), Some(".foo"));
            assert_eq!(report.diagnostics.len(), 1);
            assert_eq!(
                report.diagnostics[0].kind,
                DiagnosticKind::UnknownMethod {
                    method: "bogus".to_string()
                }
            );
            assert_eq!(report.skipped(), 0);
        }

        #[test]
        fn test_zero_controls_is_empty() {
            let report = resolve_str("<objectstore></objectstore>");
            assert!(report.store.is_empty());
            assert_eq!(report.diagnostics[0].kind, DiagnosticKind::NoControls);
            assert!(!report.has_errors());
        }

        #[test]
        fn test_wrong_root_is_empty() {
            let report = resolve_str(&format!("<store>{}</store>", control("A", "id", "a")));
            assert!(report.store.is_empty());
            assert_eq!(
                report.diagnostics[0].kind,
                DiagnosticKind::UnexpectedRoot {
                    root: "store".to_string()
                }
            );
            assert!(!report.has_errors());
        }

        #[test]
        fn test_missing_key_does_not_grow_store() {
            let xml = store_xml(&[
                control("A", "id", "a"),
                "<control><searchrecords><searchrecord method=\"id\">b</searchrecord></searchrecords></control>".to_string(),
            ]);
            let report = resolve_str(&xml);

            assert_eq!(report.store.len(), 1);
            assert_eq!(report.diagnostics[0].kind, DiagnosticKind::MissingKey);
            assert_eq!(report.diagnostics[0].key_or_unknown(), "unknown");
        }

        #[test]
        fn test_each_missing_field_is_skipped() {
            let xml = store_xml(&[
                "<control key=\"NoRecord\"/>".to_string(),
                "<control key=\"NoMethod\"><searchrecords><searchrecord>x</searchrecord></searchrecords></control>".to_string(),
                control("NoValue", "id", ""),
                control("Good", "css", "div"),
            ]);
            let report = resolve_str(&xml);

            assert_eq!(report.store.keys().collect::<Vec<_>>(), vec!["Good"]);
            let kinds: Vec<_> = report.diagnostics.iter().map(|d| d.kind.clone()).collect();
            assert_eq!(
                kinds,
                vec![
                    DiagnosticKind::MissingSearchRecord,
                    DiagnosticKind::MissingMethod,
                    DiagnosticKind::MissingValue,
                ]
            );
            assert_eq!(report.skipped(), 3);
        }

        #[test]
        fn test_translate_id_pattern_is_rejected() {
            let xml = store_xml(&[
                control(
                    "Bad",
                    "xpath",
                    "//input[contains(translate(@id), 'abc')]",
                ),
                control("Good", "xpath", "//input[@id='abc']"),
            ]);
            let report = resolve_str(&xml);

            assert!(!report.store.contains("Bad"));
            assert_eq!(report.store.get("Good"), Some("xpath=//input[@id='abc']"));
            assert_eq!(
                report.diagnostics_for("Bad").next().unwrap().kind,
                DiagnosticKind::RejectedPattern {
                    pattern: "translate(@id)".to_string()
                }
            );
        }

        #[test]
        fn test_custom_rejected_patterns() {
            let options = LoaderOptions::new().with_rejected_pattern(":nth-child");
            let xml = store_xml(&[
                control("A", "css", "li:nth-child(2)"),
                control("B", "css", "li"),
            ]);
            let report = LocatorStore::from_xml_str(&xml, &options);

            assert!(!report.store.contains("A"));
            assert!(report.store.contains("B"));
        }

        #[test]
        fn test_no_rejected_patterns() {
            let options = LoaderOptions::new().with_rejected_patterns(Vec::<String>::new());
            let xml = store_xml(&[control("A", "xpath", "//a[translate(@id)]")]);
            let report = LocatorStore::from_xml_str(&xml, &options);
            assert!(report.store.contains("A"));
        }

        #[test]
        fn test_duplicate_key_later_wins() {
            let xml = store_xml(&[control("A", "id", "first"), control("A", "id", "second")]);
            let report = resolve_str(&xml);
            assert_eq!(report.store.get("A"), Some("#second"));
            assert_eq!(report.store.len(), 1);
        }

        #[test]
        fn test_first_search_record_wins() {
            let xml = "<objectstore><control key=\"A\"><searchrecords>\
                       <searchrecord method=\"id\">first</searchrecord>\
                       <searchrecord method=\"css\">.second</searchrecord>\
                       </searchrecords></control></objectstore>";
            let report = resolve_str(xml);
            assert_eq!(report.store.get("A"), Some("#first"));
        }

        #[test]
        fn test_repeated_searchrecords_block_skips_control() {
            let xml = "<objectstore><control key=\"A\">\
                       <searchrecords><searchrecord method=\"id\">a</searchrecord></searchrecords>\
                       <searchrecords><searchrecord method=\"id\">b</searchrecord></searchrecords>\
                       </control></objectstore>";
            let report = resolve_str(xml);

            assert!(report.store.is_empty());
            assert_eq!(
                report.diagnostics[0].kind,
                DiagnosticKind::AmbiguousSearchRecords { blocks: 2 }
            );
            assert_eq!(report.skipped(), 1);
        }

        #[test]
        fn test_numeric_values_stay_strings() {
            let xml = store_xml(&[control("N", "id", "12345"), control("Z", "id", "0")]);
            let report = resolve_str(&xml);

            assert_eq!(report.store.get("N"), Some("#12345"));
            assert_eq!(report.store.get("Z"), Some("#0"));
            assert!(report.diagnostics.is_empty());
        }

        #[test]
        fn test_nonexistent_file_is_empty() {
            let dir = TempDir::new().unwrap();
            let path = dir.path().join("missing.xml");
            let report = LocatorStore::load(&path);

            assert!(report.store.is_empty());
            assert!(report.has_errors());
            assert!(matches!(
                report.diagnostics[0].kind,
                DiagnosticKind::FileUnreadable { .. }
            ));
            assert_eq!(report.diagnostics[0].source.as_deref(), Some(path.as_path()));
            assert!(load_all_locators(&path).is_empty());
        }

        #[test]
        fn test_malformed_xml_is_empty() {
            let file = write_store("<objectstore><control key=\"A\">");
            let report = LocatorStore::load(file.path());

            assert!(report.store.is_empty());
            assert!(report.has_errors());
            assert!(matches!(
                report.diagnostics[0].kind,
                DiagnosticKind::MalformedXml { .. }
            ));
        }

        #[test]
        fn test_sources_recorded() {
            let file = write_store(&store_xml(&[control("A", "id", "a")]));
            let store = load_all_locators(file.path());
            assert_eq!(store.sources(), &[file.path().to_path_buf()]);
        }
    }

    mod merge_tests {
        use super::*;

        #[test]
        fn test_merge_later_wins() {
            let mut base = LocatorStore::new();
            base.insert("Login", "#old");
            base.insert("UserID", "#USER_ID");

            let mut main = LocatorStore::new();
            main.insert("Login", "#new");
            main.insert("SearchApplications", "#search");

            base.merge(main);
            assert_eq!(base.get("Login"), Some("#new"));
            assert_eq!(base.get("UserID"), Some("#USER_ID"));
            assert_eq!(base.len(), 3);
        }

        #[test]
        fn test_merged_order() {
            let mut a = LocatorStore::new();
            a.insert("K", "a");
            let mut b = LocatorStore::new();
            b.insert("K", "b");

            assert_eq!(LocatorStore::merged([a.clone(), b.clone()]).get("K"), Some("b"));
            assert_eq!(LocatorStore::merged([b, a]).get("K"), Some("a"));
        }

        #[test]
        fn test_load_many_merges_files_in_order() {
            let login = write_store(&store_xml(&[
                control("UserID", "id", "USER_ID"),
                control("Login", "id", "loginBtn"),
            ]));
            let main = write_store(&store_xml(&[control("Login", "text", "Sign in")]));

            let report = LocatorStore::load_many([login.path(), main.path()], &LoaderOptions::default());
            assert_eq!(report.store.get("UserID"), Some("#USER_ID"));
            assert_eq!(report.store.get("Login"), Some("text=Sign in"));
            assert_eq!(report.store.sources().len(), 2);
        }

        #[test]
        fn test_load_many_keeps_diagnostics_from_every_file() {
            let dir = TempDir::new().unwrap();
            let good = write_store(&store_xml(&[control("A", "bogus", "x")]));
            let report = LocatorStore::load_many(
                [dir.path().join("nope.xml"), good.path().to_path_buf()],
                &LoaderOptions::default(),
            );
            assert_eq!(report.diagnostics.len(), 2);
            assert!(report.store.contains("A"));
        }
    }

    mod lookup_tests {
        use super::*;

        fn store() -> LocatorStore {
            let mut store = LocatorStore::new();
            store.insert("PartID", "#PART_ID");
            store.insert("Description", "#PART_DESC");
            store
        }

        #[test]
        fn test_selector_found() {
            assert_eq!(store().selector("PartID").unwrap(), "#PART_ID");
        }

        #[test]
        fn test_selector_missing_is_error() {
            let err = store().selector("Status").unwrap_err();
            assert!(matches!(err, LocStoreError::UnknownLocator { key } if key == "Status"));
        }

        #[test]
        fn test_require_lists_all_missing() {
            let err = store()
                .require(&["PartID", "UM", "Description", "Status"])
                .unwrap_err();
            match err {
                LocStoreError::MissingLocators { keys } => assert_eq!(keys, vec!["UM", "Status"]),
                other => panic!("unexpected error: {other}"),
            }
        }

        #[test]
        fn test_require_ok() {
            assert!(store().require(&["PartID", "Description"]).is_ok());
            assert!(store().require(&[]).is_ok());
        }

        #[test]
        fn test_iter_is_sorted() {
            let store = store();
            let pairs: Vec<_> = store.iter().collect();
            assert_eq!(pairs, vec![("Description", "#PART_DESC"), ("PartID", "#PART_ID")]);
        }

        #[test]
        fn test_serializes_as_map() {
            let json = serde_json::to_value(store()).unwrap();
            assert_eq!(json["locators"]["PartID"], "#PART_ID");
        }

        #[test]
        fn test_into_map() {
            let map = store().into_map();
            assert_eq!(map.len(), 2);
            assert_eq!(map["PartID"], "#PART_ID");
        }
    }

    mod options_tests {
        use super::*;

        #[test]
        fn test_default_rejects_translate_id() {
            let options = LoaderOptions::default();
            assert_eq!(options.rejected_patterns, vec!["translate(@id)"]);
            assert_eq!(
                options.rejected_pattern("xpath=//a[translate(@id)='x']"),
                Some("translate(@id)")
            );
            assert_eq!(options.rejected_pattern("#a"), None);
        }

        #[test]
        fn test_empty_pattern_never_matches() {
            let options = LoaderOptions::new().with_rejected_patterns([""]);
            assert_eq!(options.rejected_pattern("#a"), None);
        }
    }
}
