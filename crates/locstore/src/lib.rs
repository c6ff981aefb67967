//! locstore: object-store locator resolution for page-object UI tests
//!
//! UI element locators live in XML *object stores* recorded by the test
//! tooling rather than in test code. This crate loads those stores and turns
//! each recorded `method` + value pair into a selector string the browser
//! driver understands.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      LOCSTORE Pipeline                           │
//! ├─────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌────────────┐    ┌────────────┐            │
//! │   │ OS_*.xml   │    │ Document   │    │ Selector   │            │
//! │   │ (object    │───►│ (controls, │───►│ builder    │──► store   │
//! │   │  store)    │    │  records)  │    │            │            │
//! │   └────────────┘    └────────────┘    └────────────┘            │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use locstore::{load_all_locators, LocatorStore};
//!
//! let store = LocatorStore::merged([
//!     load_all_locators("ObjectStore/OS_Login.xml"),
//!     load_all_locators("ObjectStore/OS_CP7Main.xml"),
//! ]);
//! let user_field = store.get("UserID");
//! ```

#![warn(missing_docs)]

mod config;
mod diagnostic;
mod document;
#[allow(clippy::missing_errors_doc, clippy::must_use_candidate)]
mod page_object;
mod result;
mod selector;
mod store;

pub use config::{StoreConfig, DEFAULT_CONFIG_FILE};
pub use diagnostic::{Diagnostic, DiagnosticKind, Severity};
pub use document::{ControlNode, ObjectStoreDocument, RecordNode};
pub use page_object::{PageObject, StorePage, StorePageBuilder, DEFAULT_LOAD_TIMEOUT_MS};
pub use result::{LocStoreError, LocStoreResult};
pub use selector::{build_selector, LocatorMethod, SearchRecord, Selector};
pub use store::{
    load_all_locators, LoadReport, LoaderOptions, LocatorStore, DEFAULT_REJECTED_PATTERNS,
};
