//! String-keyed compiler registries.
//!
//! The catalogs of node kinds, socket kinds and conversions are
//! host-extensible: hosts populate these tables once at startup and hand
//! them to [`compile`](super::compile). Nothing here is global state.

use std::collections::HashMap;

use crate::error::BuildError;
use crate::model::graph::{SourceNode, SourceSocket};
use crate::network::SocketId;
use crate::types::DataType;

use super::pool::ResourcePool;
use super::GraphCompiler;

/// Expands one source node into function or placeholder nodes and maps all
/// of its data sockets.
pub type NodeInserter = Box<
    dyn Fn(&mut GraphCompiler<'_>, &mut ResourcePool, &SourceNode) -> Result<(), BuildError>
        + Send
        + Sync,
>;

/// Produces a zero-input node yielding the default value of an unlinked
/// input socket, returning the node's output socket.
pub type DefaultValueInserter = Box<
    dyn Fn(&mut GraphCompiler<'_>, &mut ResourcePool, &SourceSocket) -> Result<SocketId, BuildError>
        + Send
        + Sync,
>;

/// Produces a one-input/one-output converter node, returning its
/// (input, output) socket pair.
pub type ConversionInserter =
    Box<dyn Fn(&mut GraphCompiler<'_>, &mut ResourcePool) -> (SocketId, SocketId) + Send + Sync>;

/// Maps socket kind identifiers to engine data types. Kinds absent from
/// the table are structural (non-data) sockets.
#[derive(Default, Clone)]
pub struct SocketTypeTable {
    types: HashMap<String, DataType>,
}

impl SocketTypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, kind: &str, data_type: DataType) {
        self.types.insert(kind.to_string(), data_type);
    }

    pub fn resolve(&self, kind: &str) -> Option<DataType> {
        self.types.get(kind).copied()
    }
}

/// Node kind identifier → inserter.
#[derive(Default)]
pub struct NodeInserterRegistry {
    inserters: HashMap<String, NodeInserter>,
}

impl NodeInserterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, type_id: &str, inserter: NodeInserter) {
        self.inserters.insert(type_id.to_string(), inserter);
    }

    pub fn get(&self, type_id: &str) -> Option<&NodeInserter> {
        self.inserters.get(type_id)
    }
}

/// Socket kind identifier → default-value inserter.
#[derive(Default)]
pub struct DefaultValueRegistry {
    inserters: HashMap<String, DefaultValueInserter>,
}

impl DefaultValueRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, kind: &str, inserter: DefaultValueInserter) {
        self.inserters.insert(kind.to_string(), inserter);
    }

    pub fn get(&self, kind: &str) -> Option<&DefaultValueInserter> {
        self.inserters.get(kind)
    }
}

/// (from kind, to kind) → conversion inserter.
#[derive(Default)]
pub struct ConversionRegistry {
    inserters: HashMap<(String, String), ConversionInserter>,
}

impl ConversionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, from_kind: &str, to_kind: &str, inserter: ConversionInserter) {
        self.inserters
            .insert((from_kind.to_string(), to_kind.to_string()), inserter);
    }

    pub fn get(&self, from_kind: &str, to_kind: &str) -> Option<&ConversionInserter> {
        self.inserters
            .get(&(from_kind.to_string(), to_kind.to_string()))
    }
}

/// Bundle of every table the compiler consults.
#[derive(Default)]
pub struct CompilerRegistries {
    pub socket_types: SocketTypeTable,
    pub node_inserters: NodeInserterRegistry,
    pub default_values: DefaultValueRegistry,
    pub conversions: ConversionRegistry,
}

impl CompilerRegistries {
    /// Empty registries; the host registers everything itself.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registries pre-populated with the built-in catalog.
    pub fn with_builtins() -> Self {
        let mut registries = Self::new();
        super::inserters::register_builtins(&mut registries);
        registries
    }
}
