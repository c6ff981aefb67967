//! Recorded locator methods and their translation into engine selectors.
//!
//! Object stores record each control as a `method` + value pair. The method
//! names form a closed set; anything outside it is carried through as a raw
//! selector so that a store written for a newer recorder still loads.
//!
//! Rendered selectors use the Playwright selector-engine syntax
//! (`xpath=`, `text=`, `role=`, `:has-text()`), which is what the page
//! objects hand to the browser driver.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use crate::result::{LocStoreError, LocStoreResult};

/// A recorded locator method, matched case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LocatorMethod {
    /// `id`
    Id,
    /// `id_display`, treated like `id`
    IdDisplay,
    /// `class`, one or more whitespace-separated class names
    Class,
    /// `xpath`
    XPath,
    /// `xpath_display`, treated like `xpath`
    XPathDisplay,
    /// `css`
    Css,
    /// `name` attribute
    Name,
    /// `tag` name
    Tag,
    /// `text` content match
    Text,
    /// anchor with matching visible text
    Link,
    /// button with matching visible text
    Button,
    /// ARIA role selector
    Role,
    /// Unrecognized method (lowercased), falls back to the raw value
    Other(String),
}

impl LocatorMethod {
    /// Every recognized method, in the order the recorder documents them
    pub const KNOWN: [Self; 12] = [
        Self::Id,
        Self::IdDisplay,
        Self::Class,
        Self::XPath,
        Self::XPathDisplay,
        Self::Css,
        Self::Name,
        Self::Tag,
        Self::Text,
        Self::Link,
        Self::Button,
        Self::Role,
    ];

    /// Parse a method name. Never fails: unknown names become [`Self::Other`].
    #[must_use]
    pub fn parse(method: &str) -> Self {
        let lower = method.trim().to_ascii_lowercase();
        match lower.as_str() {
            "id" => Self::Id,
            "id_display" => Self::IdDisplay,
            "class" => Self::Class,
            "xpath" => Self::XPath,
            "xpath_display" => Self::XPathDisplay,
            "css" => Self::Css,
            "name" => Self::Name,
            "tag" => Self::Tag,
            "text" => Self::Text,
            "link" => Self::Link,
            "button" => Self::Button,
            "role" => Self::Role,
            _ => Self::Other(lower),
        }
    }

    /// Canonical lowercase name
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Id => "id",
            Self::IdDisplay => "id_display",
            Self::Class => "class",
            Self::XPath => "xpath",
            Self::XPathDisplay => "xpath_display",
            Self::Css => "css",
            Self::Name => "name",
            Self::Tag => "tag",
            Self::Text => "text",
            Self::Link => "link",
            Self::Button => "button",
            Self::Role => "role",
            Self::Other(name) => name,
        }
    }

    /// Whether this is one of the recognized methods
    #[must_use]
    pub const fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl FromStr for LocatorMethod {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for LocatorMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The method + value pair recorded for one control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRecord {
    /// Recorded method name, as written in the store
    pub method: String,
    /// Raw locator value (the element text of the record)
    pub value: Option<String>,
}

impl SearchRecord {
    /// Create a record with a value
    #[must_use]
    pub fn new(method: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            value: Some(value.into()),
        }
    }

    /// Parsed method
    #[must_use]
    pub fn locator_method(&self) -> LocatorMethod {
        LocatorMethod::parse(&self.method)
    }
}

/// A translated selector, one variant per translation rule.
///
/// `Display` renders the engine string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// `#value`
    Id(String),
    /// `.a.b.c`
    Class(Vec<String>),
    /// `xpath=value`
    XPath(String),
    /// CSS passed through verbatim
    Css(String),
    /// `[name="value"]`
    Name(String),
    /// Tag name passed through verbatim
    Tag(String),
    /// `text=value`
    Text(String),
    /// `a:has-text("value")`
    Link(String),
    /// `button:has-text("value")`
    Button(String),
    /// `role=value`
    Role(String),
    /// Unknown method, value used verbatim
    Raw {
        /// The unrecognized method name
        method: String,
        /// Value used as the selector
        value: String,
    },
}

impl Selector {
    /// Translate a method and value.
    ///
    /// # Errors
    ///
    /// Returns [`LocStoreError::InvalidSelectorValue`] if the value is empty,
    /// or if a `class` value holds no class names.
    pub fn translate(method: &LocatorMethod, value: &str) -> LocStoreResult<Self> {
        if value.is_empty() {
            return Err(LocStoreError::invalid_value(value));
        }

        let value = value.to_string();
        let selector = match method {
            LocatorMethod::Id | LocatorMethod::IdDisplay => Self::Id(value),
            LocatorMethod::Class => {
                let classes: Vec<String> = value.split_whitespace().map(str::to_string).collect();
                if classes.is_empty() {
                    return Err(LocStoreError::invalid_value(value));
                }
                Self::Class(classes)
            }
            LocatorMethod::XPath | LocatorMethod::XPathDisplay => Self::XPath(value),
            LocatorMethod::Css => Self::Css(value),
            LocatorMethod::Name => Self::Name(value),
            LocatorMethod::Tag => Self::Tag(value),
            LocatorMethod::Text => Self::Text(value),
            LocatorMethod::Link => Self::Link(value),
            LocatorMethod::Button => Self::Button(value),
            LocatorMethod::Role => Self::Role(value),
            LocatorMethod::Other(name) => Self::Raw {
                method: name.clone(),
                value,
            },
        };
        Ok(selector)
    }

    /// Whether this selector came from the raw-value fallback
    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        matches!(self, Self::Raw { .. })
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(v) => write!(f, "#{v}"),
            Self::Class(classes) => write!(f, ".{}", classes.join(".")),
            Self::XPath(v) => write!(f, "xpath={v}"),
            Self::Css(v) | Self::Tag(v) => f.write_str(v),
            Self::Name(v) => write!(f, "[name=\"{v}\"]"),
            Self::Text(v) => write!(f, "text={v}"),
            Self::Link(v) => write!(f, "a:has-text(\"{v}\")"),
            Self::Button(v) => write!(f, "button:has-text(\"{v}\")"),
            Self::Role(v) => write!(f, "role={v}"),
            Self::Raw { value, .. } => f.write_str(value),
        }
    }
}

/// Build the engine selector string for a search record.
///
/// Unknown methods fall back to the raw value and emit a warning.
///
/// # Errors
///
/// Returns [`LocStoreError::InvalidSelectorValue`] if the record has no value.
pub fn build_selector(record: &SearchRecord) -> LocStoreResult<String> {
    let value = record
        .value
        .as_deref()
        .ok_or_else(|| LocStoreError::invalid_value(""))?;
    let selector = Selector::translate(&record.locator_method(), value)?;
    if let Selector::Raw { method, .. } = &selector {
        tracing::warn!("Unsupported locator method: {method}, using as CSS selector");
    }
    Ok(selector.to_string())
}
