//! Object-store XML documents.
//!
//! ```xml
//! <objectstore>
//!   <control key="UserID">
//!     <searchrecords>
//!       <searchrecord method="id">USER_ID</searchrecord>
//!     </searchrecords>
//!   </control>
//! </objectstore>
//! ```
//!
//! `key` and `method` may be written as attributes or as child elements.
//! Text values are whitespace-trimmed and an empty value counts as absent.

use roxmltree::{Document, Node, ParsingOptions};

use crate::result::LocStoreResult;
use crate::selector::SearchRecord;

/// Root element name
pub const ROOT_ELEMENT: &str = "objectstore";
/// Control element name
pub const CONTROL_ELEMENT: &str = "control";
/// Search record container element name
pub const RECORDS_ELEMENT: &str = "searchrecords";
/// Search record element name
pub const RECORD_ELEMENT: &str = "searchrecord";

/// One `searchrecord` as written, before any validation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecordNode {
    /// `method` attribute or child
    pub method: Option<String>,
    /// Trimmed text content
    pub value: Option<String>,
}

impl RecordNode {
    /// Convert to a [`SearchRecord`] if a method is present
    #[must_use]
    pub fn to_search_record(&self) -> Option<SearchRecord> {
        self.method.as_ref().map(|method| SearchRecord {
            method: method.clone(),
            value: self.value.clone(),
        })
    }
}

/// One `control` element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ControlNode {
    /// Logical name
    pub key: Option<String>,
    /// Records of the first `searchrecords` block, in document order
    pub records: Vec<RecordNode>,
    /// Number of `searchrecords` blocks under the control
    pub record_blocks: usize,
}

impl ControlNode {
    /// The record used for resolution. Later records are ignored.
    #[must_use]
    pub fn first_record(&self) -> Option<&RecordNode> {
        self.records.first()
    }
}

/// A parsed object store.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ObjectStoreDocument {
    /// Local name of the root element
    pub root: String,
    /// Controls in document order
    pub controls: Vec<ControlNode>,
}

impl ObjectStoreDocument {
    /// Parse an object store from XML text.
    ///
    /// A well-formed document with a different root element parses to an
    /// empty document whose [`has_root`](Self::has_root) is false.
    ///
    /// # Errors
    ///
    /// Returns [`crate::LocStoreError::Xml`] if the text is not well-formed XML.
    pub fn parse(xml: &str) -> LocStoreResult<Self> {
        let xml = xml.strip_prefix('\u{feff}').unwrap_or(xml);
        let mut options = ParsingOptions::default();
        options.allow_dtd = true;
        let doc = Document::parse_with_options(xml, options)?;
        let root = doc.root_element();

        let name = root.tag_name().name().to_string();
        if name != ROOT_ELEMENT {
            return Ok(Self {
                root: name,
                controls: Vec::new(),
            });
        }

        let controls = children_named(root, CONTROL_ELEMENT)
            .map(parse_control)
            .collect();

        Ok(Self {
            root: name,
            controls,
        })
    }

    /// Whether the root element is `objectstore`
    #[must_use]
    pub fn has_root(&self) -> bool {
        self.root == ROOT_ELEMENT
    }

    /// Number of controls
    #[must_use]
    pub fn len(&self) -> usize {
        self.controls.len()
    }

    /// Whether the document has no controls
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }
}

fn parse_control(node: Node<'_, '_>) -> ControlNode {
    let blocks: Vec<_> = children_named(node, RECORDS_ELEMENT).collect();
    let records = blocks
        .first()
        .map(|block| {
            children_named(*block, RECORD_ELEMENT)
                .map(|record| RecordNode {
                    method: field(record, "method"),
                    value: own_text(record),
                })
                .collect()
        })
        .unwrap_or_default();

    ControlNode {
        key: field(node, "key"),
        records,
        record_blocks: blocks.len(),
    }
}

fn children_named<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children()
        .filter(move |child| child.is_element() && child.tag_name().name() == name)
}

/// Attribute first, then a child element of the same name.
fn field(node: Node<'_, '_>, name: &'static str) -> Option<String> {
    let raw = match node.attribute(name) {
        Some(value) => value.to_string(),
        None => children_named(node, name).next().and_then(own_text)?,
    };
    non_empty(&raw)
}

/// Concatenated direct text children, trimmed.
fn own_text(node: Node<'_, '_>) -> Option<String> {
    let text: String = node
        .children()
        .filter(Node::is_text)
        .filter_map(|child| child.text())
        .collect();
    non_empty(&text)
}

fn non_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
