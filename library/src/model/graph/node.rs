//! Generic node of the source graph.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::property::{PropertyMap, PropertyValue};
use super::socket::{SourceSocket, SourceSocketId};

/// A node of the source graph.
///
/// All source nodes share this single structure; the `type_id` field
/// references a node inserter registered with the compiler to determine
/// which function instances the node expands into. Node kinds the
/// compiler does not recognize become placeholders when they carry data
/// sockets (this is how the designated overall input/output nodes of a
/// computation are expressed).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SourceNode {
    pub id: Uuid,
    /// References a node inserter, e.g. "math.add", "list.append".
    pub type_id: String,
    #[serde(default)]
    pub properties: PropertyMap,
    pub inputs: Vec<SourceSocket>,
    pub outputs: Vec<SourceSocket>,
}

impl SourceNode {
    pub fn new(type_id: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            type_id: type_id.to_string(),
            properties: PropertyMap::new(),
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    pub fn with_input(mut self, name: &str, kind: &str) -> Self {
        self.inputs.push(SourceSocket::input(name, kind));
        self
    }

    pub fn with_input_value(mut self, name: &str, kind: &str, value: PropertyValue) -> Self {
        self.inputs
            .push(SourceSocket::input(name, kind).with_value(value));
        self
    }

    pub fn with_output(mut self, name: &str, kind: &str) -> Self {
        self.outputs.push(SourceSocket::output(name, kind));
        self
    }

    pub fn with_property(mut self, key: &str, value: PropertyValue) -> Self {
        self.properties.set(key.to_string(), value);
        self
    }

    pub fn input(&self, name: &str) -> Option<&SourceSocket> {
        self.inputs.iter().find(|socket| socket.name == name)
    }

    pub fn output(&self, name: &str) -> Option<&SourceSocket> {
        self.outputs.iter().find(|socket| socket.name == name)
    }

    /// All sockets of the node, inputs first.
    pub fn sockets(&self) -> impl Iterator<Item = &SourceSocket> {
        self.inputs.iter().chain(self.outputs.iter())
    }

    pub fn socket_by_id(&self, id: SourceSocketId) -> Option<&SourceSocket> {
        self.sockets().find(|socket| socket.id == id)
    }
}
