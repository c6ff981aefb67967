//! Page objects backed by object stores.
//!
//! A page object names the object-store files it reads and the keys it cannot
//! work without. Construction loads and merges the files fresh and fails
//! early, listing every missing key, instead of handing an absent selector to
//! the browser driver later.

use std::path::PathBuf;

use crate::diagnostic::Diagnostic;
use crate::result::LocStoreResult;
use crate::store::{LoaderOptions, LocatorStore};

/// Default page load timeout (30 seconds)
pub const DEFAULT_LOAD_TIMEOUT_MS: u64 = 30000;

/// Trait for page objects whose locators come from object stores.
///
/// # Example
///
/// ```ignore
/// struct PartPage {
///     page: StorePage,
/// }
///
/// impl PageObject for PartPage {
///     fn url_pattern(&self) -> &str {
///         "/cpweb/masterPage.htm"
///     }
///
///     fn required_locators(&self) -> Vec<&str> {
///         vec!["PartID", "Description"]
///     }
/// }
/// ```
pub trait PageObject {
    /// URL pattern that matches this page
    fn url_pattern(&self) -> &str;

    /// Keys that must resolve for the page to be usable
    fn required_locators(&self) -> Vec<&str> {
        Vec::new()
    }

    /// Page load timeout in milliseconds
    fn load_timeout_ms(&self) -> u64 {
        DEFAULT_LOAD_TIMEOUT_MS
    }

    /// Page name for logging
    fn page_name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Builder for [`StorePage`]
#[derive(Debug, Clone)]
pub struct StorePageBuilder {
    name: String,
    url_pattern: String,
    stores: Vec<PathBuf>,
    required: Vec<String>,
    load_timeout_ms: u64,
    options: LoaderOptions,
}

impl Default for StorePageBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl StorePageBuilder {
    /// Create a new builder
    #[must_use]
    pub fn new() -> Self {
        Self {
            name: "StorePage".to_string(),
            url_pattern: String::new(),
            stores: Vec::new(),
            required: Vec::new(),
            load_timeout_ms: DEFAULT_LOAD_TIMEOUT_MS,
            options: LoaderOptions::default(),
        }
    }

    /// Set the page name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the URL pattern
    #[must_use]
    pub fn with_url_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.url_pattern = pattern.into();
        self
    }

    /// Add an object-store file. Later files win on key collision.
    #[must_use]
    pub fn with_store(mut self, path: impl Into<PathBuf>) -> Self {
        self.stores.push(path.into());
        self
    }

    /// Require a key
    #[must_use]
    pub fn with_required(mut self, key: impl Into<String>) -> Self {
        self.required.push(key.into());
        self
    }

    /// Set the load timeout
    #[must_use]
    pub const fn with_load_timeout(mut self, timeout_ms: u64) -> Self {
        self.load_timeout_ms = timeout_ms;
        self
    }

    /// Set loader options
    #[must_use]
    pub fn with_loader_options(mut self, options: LoaderOptions) -> Self {
        self.options = options;
        self
    }

    /// Load the stores and validate the required keys
    ///
    /// # Errors
    ///
    /// Returns [`crate::LocStoreError::MissingLocators`] naming every required
    /// key that did not resolve.
    pub fn build(self) -> LocStoreResult<StorePage> {
        let report = LocatorStore::load_many(&self.stores, &self.options);
        let required: Vec<&str> = self.required.iter().map(String::as_str).collect();
        report.store.require(&required)?;
        tracing::debug!("All required {} locators validated", self.name);

        Ok(StorePage {
            name: self.name,
            url_pattern: self.url_pattern,
            locators: report.store,
            diagnostics: report.diagnostics,
            required: self.required,
            load_timeout_ms: self.load_timeout_ms,
        })
    }
}

/// A page object holding the merged locators of its object stores
#[derive(Debug, Clone)]
pub struct StorePage {
    name: String,
    url_pattern: String,
    locators: LocatorStore,
    diagnostics: Vec<Diagnostic>,
    required: Vec<String>,
    load_timeout_ms: u64,
}

impl StorePage {
    /// Start building a page
    #[must_use]
    pub fn builder() -> StorePageBuilder {
        StorePageBuilder::new()
    }

    /// Selector for a key
    ///
    /// # Errors
    ///
    /// Returns [`crate::LocStoreError::UnknownLocator`] if the key did not resolve.
    pub fn selector(&self, key: &str) -> LocStoreResult<&str> {
        self.locators.selector(key)
    }

    /// Descendant selector `<resolved key> <suffix>`
    ///
    /// Narrows a container control, e.g. a search result list, to one of its
    /// children.
    ///
    /// # Errors
    ///
    /// Returns [`crate::LocStoreError::UnknownLocator`] if the key did not resolve.
    pub fn scoped(&self, key: &str, suffix: &str) -> LocStoreResult<String> {
        let base = self.selector(key)?;
        Ok(format!("{base} {suffix}"))
    }

    /// All locators
    #[must_use]
    pub const fn locators(&self) -> &LocatorStore {
        &self.locators
    }

    /// What was skipped while loading
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

impl PageObject for StorePage {
    fn url_pattern(&self) -> &str {
        &self.url_pattern
    }

    fn required_locators(&self) -> Vec<&str> {
        self.required.iter().map(String::as_str).collect()
    }

    fn load_timeout_ms(&self) -> u64 {
        self.load_timeout_ms
    }

    fn page_name(&self) -> &str {
        &self.name
    }
}
