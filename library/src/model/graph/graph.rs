//! The source graph container.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::connection::SourceLink;
use super::node::SourceNode;
use super::socket::{SourceSocket, SourceSocketId};

/// A complete source graph: nodes plus the links between their sockets.
///
/// Socket identifiers are assigned densely by [`SourceGraph::add_node`];
/// graphs loaded from serialized form are expected to carry the same dense
/// numbering.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct SourceGraph {
    pub nodes: Vec<SourceNode>,
    #[serde(default)]
    pub links: Vec<SourceLink>,
}

impl SourceGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node, assigning dense socket identifiers in insertion order
    /// (inputs first, then outputs). Returns the node's id.
    pub fn add_node(&mut self, mut node: SourceNode) -> Uuid {
        let mut next = self.socket_count();
        for socket in node.inputs.iter_mut().chain(node.outputs.iter_mut()) {
            socket.id = SourceSocketId(next);
            next += 1;
        }
        let id = node.id;
        self.nodes.push(node);
        id
    }

    pub fn add_link(&mut self, from: SourceSocketId, to: SourceSocketId) {
        self.links.push(SourceLink::new(from, to));
    }

    /// One past the highest socket identifier in the graph.
    pub fn socket_count(&self) -> usize {
        self.nodes
            .iter()
            .flat_map(|node| node.sockets())
            .map(|socket| socket.id.0 + 1)
            .max()
            .unwrap_or(0)
    }

    pub fn node(&self, id: Uuid) -> Option<&SourceNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    /// The node owning a socket, together with the socket itself.
    pub fn socket(&self, id: SourceSocketId) -> Option<(&SourceNode, &SourceSocket)> {
        self.nodes.iter().find_map(|node| {
            node.socket_by_id(id).map(|socket| (node, socket))
        })
    }

    /// Identifier of a named output socket on a node.
    pub fn output_id(&self, node: Uuid, name: &str) -> Option<SourceSocketId> {
        self.node(node)
            .and_then(|node| node.output(name))
            .map(|socket| socket.id)
    }

    /// Identifier of a named input socket on a node.
    pub fn input_id(&self, node: Uuid, name: &str) -> Option<SourceSocketId> {
        self.node(node)
            .and_then(|node| node.input(name))
            .map(|socket| socket.id)
    }

    /// All links feeding a given input socket.
    pub fn links_into(&self, to: SourceSocketId) -> impl Iterator<Item = &SourceLink> {
        self.links.iter().filter(move |link| link.to == to)
    }

    pub fn is_input_linked(&self, to: SourceSocketId) -> bool {
        self.links_into(to).next().is_some()
    }
}
