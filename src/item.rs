//! Identity and payload model for stored items.

use std::collections::BTreeMap;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Unique identifier of an item: an integer or a text token.
///
/// Grid datasets mix both in one batch (numeric row ids next to uuid-ish
/// strings), so the untagged serde form accepts JSON `1` and `"91064cee"`
/// alike.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeId {
    Int(i64),
    Text(String),
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{}", n),
            Self::Text(s) => write!(f, "{}", s),
        }
    }
}

impl FromStr for NodeId {
    type Err = Infallible;

    /// A token that parses as `i64` is an integer id, anything else is text.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.parse::<i64>().map_or_else(|_| Self::Text(s.to_string()), Self::Int))
    }
}

impl From<i64> for NodeId {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// An item's parent slot: another id, or the root sentinel (JSON `null`).
///
/// `Root` must come first so the untagged deserializer tries `null` before
/// the id forms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParentRef {
    #[default]
    Root,
    Node(NodeId),
}

impl ParentRef {
    pub fn is_root(&self) -> bool {
        matches!(self, Self::Root)
    }

    pub fn as_node(&self) -> Option<&NodeId> {
        match self {
            Self::Root => None,
            Self::Node(id) => Some(id),
        }
    }
}

impl fmt::Display for ParentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root => write!(f, "null"),
            Self::Node(id) => write!(f, "{}", id),
        }
    }
}

impl From<NodeId> for ParentRef {
    fn from(id: NodeId) -> Self {
        Self::Node(id)
    }
}

impl From<Option<NodeId>> for ParentRef {
    fn from(id: Option<NodeId>) -> Self {
        id.map_or(Self::Root, Self::Node)
    }
}

/// Anything the store can index: exposes identity and hierarchy, nothing else.
///
/// The store never looks past `id` and `parent`; all other payload passes
/// through untouched.
pub trait TreeItem: Clone {
    fn id(&self) -> &NodeId;
    fn parent(&self) -> &ParentRef;
}

/// A grid row: id, parent, and an opaque bag of extra columns.
///
/// Extra fields round-trip through serde untouched via the flattened map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub id: NodeId,
    #[serde(default)]
    pub parent: ParentRef,
    #[serde(flatten)]
    pub fields: BTreeMap<String, serde_json::Value>,
}

impl Row {
    pub fn new(id: impl Into<NodeId>, parent: impl Into<ParentRef>) -> Self {
        Self {
            id: id.into(),
            parent: parent.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    /// Display label for rendering, falling back to the id.
    pub fn label(&self) -> String {
        self.fields
            .get("label")
            .and_then(|v| v.as_str())
            .map_or_else(|| self.id.to_string(), ToString::to_string)
    }
}

impl TreeItem for Row {
    fn id(&self) -> &NodeId {
        &self.id
    }

    fn parent(&self) -> &ParentRef {
        &self.parent
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.fields.get("label").and_then(|v| v.as_str()) {
            Some(label) => write!(f, "{} ({})", self.id, label),
            None => write!(f, "{}", self.id),
        }
    }
}
