//! Socket model for the source graph.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::property::PropertyValue;

/// Stable identifier of a socket within one `SourceGraph`.
///
/// Identifiers are dense: the graph assigns them in insertion order, so
/// they can index lookup tables directly.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default,
)]
#[serde(transparent)]
pub struct SourceSocketId(pub usize);

impl fmt::Display for SourceSocketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Direction of a socket.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SocketDirection {
    Input,
    Output,
}

/// A connection point on a source node.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SourceSocket {
    pub id: SourceSocketId,
    /// Internal name used for lookups within the node (e.g. "a", "result").
    pub name: String,
    /// Socket kind identifier, resolved to a `DataType` through the socket
    /// type table. Unknown kinds make the socket structural (non-data).
    pub kind: String,
    pub direction: SocketDirection,
    /// Socket-local configuration, e.g. the literal value an unconnected
    /// input falls back to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<PropertyValue>,
}

impl SourceSocket {
    pub fn input(name: &str, kind: &str) -> Self {
        Self {
            id: SourceSocketId::default(),
            name: name.to_string(),
            kind: kind.to_string(),
            direction: SocketDirection::Input,
            value: None,
        }
    }

    pub fn output(name: &str, kind: &str) -> Self {
        Self {
            id: SourceSocketId::default(),
            name: name.to_string(),
            kind: kind.to_string(),
            direction: SocketDirection::Output,
            value: None,
        }
    }

    pub fn with_value(mut self, value: PropertyValue) -> Self {
        self.value = Some(value);
        self
    }

    pub fn is_input(&self) -> bool {
        self.direction == SocketDirection::Input
    }

    pub fn is_output(&self) -> bool {
        self.direction == SocketDirection::Output
    }
}
