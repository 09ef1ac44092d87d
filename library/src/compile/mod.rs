//! Translation of a source graph into a frozen computation network.
//!
//! Compilation runs three ordered passes over the source graph:
//!
//! 1. node insertion: every source node expands into function nodes via
//!    its registered inserter, or into a placeholder when it has data
//!    sockets but no inserter (this is how boundary nodes survive);
//! 2. link insertion: exact-type links are added directly, mismatched
//!    ones go through a registered conversion node, anything else fails;
//! 3. unlinked-input defaulting: every data input left without an origin
//!    gets a zero-input constant or empty-list node from the default-value
//!    registry.
//!
//! Each pass may fail; a failed build produces no network.

mod inserters;
pub mod pool;
pub mod registry;

use std::sync::Arc;

use log::debug;

use crate::error::BuildError;
use crate::function::Function;
use crate::model::graph::{SourceGraph, SourceNode, SourceSocket, SourceSocketId};
use crate::network::{Network, NetworkBuilder, NodeId, SocketId};
use crate::types::DataType;

pub use pool::ResourcePool;
pub use registry::{
    CompilerRegistries, ConversionRegistry, DefaultValueRegistry, NodeInserterRegistry,
    SocketTypeTable,
};

/// The result of a successful build: the frozen network, the pool keeping
/// its function instances alive, and the source-socket lookup table.
pub struct CompiledNetwork {
    network: Arc<Network>,
    pool: ResourcePool,
    socket_map: Vec<Option<SocketId>>,
}

impl CompiledNetwork {
    pub fn network(&self) -> &Arc<Network> {
        &self.network
    }

    /// Network socket a source socket was mapped to, if it was mapped at
    /// all (structural sockets and sockets of dropped nodes are absent).
    pub fn lookup_socket(&self, socket: SourceSocketId) -> Option<SocketId> {
        self.socket_map.get(socket.0).copied().flatten()
    }

    pub fn pool(&self) -> &ResourcePool {
        &self.pool
    }
}

/// Compile a source graph with the given registries.
pub fn compile(
    graph: &SourceGraph,
    registries: &CompilerRegistries,
) -> Result<CompiledNetwork, BuildError> {
    let mut pool = ResourcePool::new();
    let mut compiler = GraphCompiler::new(graph, &registries.socket_types);
    insert_nodes(&mut compiler, &mut pool, registries)?;
    insert_links(&mut compiler, &mut pool, registries)?;
    insert_unlinked_inputs(&mut compiler, &mut pool, registries)?;
    let compiled = compiler.finish(pool)?;
    debug!(
        "compiled graph: {} nodes, {} sockets, {} pooled functions",
        compiled.network.node_count(),
        compiled.network.socket_count(),
        compiled.pool.len()
    );
    Ok(compiled)
}

/// Builder state shared with the inserters: the network under
/// construction plus the source-socket mapping tables.
pub struct GraphCompiler<'g> {
    graph: &'g SourceGraph,
    builder: NetworkBuilder,
    type_by_socket: Vec<Option<DataType>>,
    socket_map: Vec<Option<SocketId>>,
}

impl<'g> GraphCompiler<'g> {
    fn new(graph: &'g SourceGraph, socket_types: &SocketTypeTable) -> Self {
        let count = graph.socket_count();
        let mut type_by_socket = vec![None; count];
        for node in &graph.nodes {
            for socket in node.sockets() {
                type_by_socket[socket.id.0] = socket_types.resolve(&socket.kind);
            }
        }
        Self {
            graph,
            builder: NetworkBuilder::new(),
            type_by_socket,
            socket_map: vec![None; count],
        }
    }

    pub fn graph(&self) -> &'g SourceGraph {
        self.graph
    }

    /// Resolved data type of a source socket; `None` marks a structural
    /// (non-data) socket.
    pub fn data_type(&self, socket: SourceSocketId) -> Option<DataType> {
        self.type_by_socket.get(socket.0).copied().flatten()
    }

    pub fn is_data_socket(&self, socket: SourceSocketId) -> bool {
        self.data_type(socket).is_some()
    }

    pub fn node_has_data_sockets(&self, node: &SourceNode) -> bool {
        node.sockets().any(|socket| self.is_data_socket(socket.id))
    }

    /// Network socket a source socket is mapped to.
    pub fn lookup_socket(&self, socket: SourceSocketId) -> Option<SocketId> {
        self.socket_map.get(socket.0).copied().flatten()
    }

    /// Add a function node and map the source node's data sockets onto it
    /// one-to-one, in order.
    pub fn add_function_for_node(
        &mut self,
        function: Arc<dyn Function>,
        input_param_indices: &[usize],
        output_param_indices: &[usize],
        node: &SourceNode,
    ) -> NodeId {
        let node_id = self
            .builder
            .add_function(function, input_param_indices, output_param_indices);
        self.map_data_sockets(node, node_id);
        node_id
    }

    /// Add a function node without source-socket mapping (converters and
    /// default-value sources have no source counterpart).
    pub fn add_function(
        &mut self,
        function: Arc<dyn Function>,
        input_param_indices: &[usize],
        output_param_indices: &[usize],
    ) -> NodeId {
        self.builder
            .add_function(function, input_param_indices, output_param_indices)
    }

    /// Add a placeholder with one socket per data socket of the source
    /// node, and map them.
    pub fn add_placeholder_for_node(&mut self, node: &SourceNode) -> NodeId {
        let input_types: Vec<DataType> = node
            .inputs
            .iter()
            .filter_map(|socket| self.data_type(socket.id))
            .collect();
        let output_types: Vec<DataType> = node
            .outputs
            .iter()
            .filter_map(|socket| self.data_type(socket.id))
            .collect();
        let node_id = self.builder.add_placeholder(&input_types, &output_types);
        self.map_data_sockets(node, node_id);
        node_id
    }

    pub fn add_link(&mut self, from: SocketId, to: SocketId) -> Result<(), BuildError> {
        self.builder.add_link(from, to)
    }

    pub fn node_inputs(&self, node: NodeId) -> &[SocketId] {
        self.builder.node_inputs(node)
    }

    pub fn node_outputs(&self, node: NodeId) -> &[SocketId] {
        self.builder.node_outputs(node)
    }

    pub fn socket_type(&self, socket: SocketId) -> DataType {
        self.builder.socket_type(socket)
    }

    fn map_data_sockets(&mut self, node: &SourceNode, node_id: NodeId) {
        let mut index = 0;
        for socket in &node.inputs {
            if self.is_data_socket(socket.id) {
                let network_socket = self.builder.node_inputs(node_id)[index];
                self.map_socket(socket.id, network_socket);
                index += 1;
            }
        }
        debug_assert_eq!(index, self.builder.node_inputs(node_id).len());

        index = 0;
        for socket in &node.outputs {
            if self.is_data_socket(socket.id) {
                let network_socket = self.builder.node_outputs(node_id)[index];
                self.map_socket(socket.id, network_socket);
                index += 1;
            }
        }
        debug_assert_eq!(index, self.builder.node_outputs(node_id).len());
    }

    fn map_socket(&mut self, source: SourceSocketId, network_socket: SocketId) {
        debug_assert!(self.socket_map[source.0].is_none());
        self.socket_map[source.0] = Some(network_socket);
    }

    fn finish(self, pool: ResourcePool) -> Result<CompiledNetwork, BuildError> {
        let network = self.builder.freeze()?;
        Ok(CompiledNetwork {
            network: Arc::new(network),
            pool,
            socket_map: self.socket_map,
        })
    }
}

// ---------------------------------------------------------------------------
// Compilation passes
// ---------------------------------------------------------------------------

fn insert_nodes(
    compiler: &mut GraphCompiler<'_>,
    pool: &mut ResourcePool,
    registries: &CompilerRegistries,
) -> Result<(), BuildError> {
    let graph = compiler.graph();
    for node in &graph.nodes {
        match registries.node_inserters.get(&node.type_id) {
            Some(inserter) => inserter(compiler, pool, node)?,
            None if compiler.node_has_data_sockets(node) => {
                debug!(
                    "no inserter for node kind '{}', adding placeholder",
                    node.type_id
                );
                compiler.add_placeholder_for_node(node);
            }
            None => {
                debug!("dropping node '{}' without data sockets", node.type_id);
            }
        }
    }
    Ok(())
}

fn insert_links(
    compiler: &mut GraphCompiler<'_>,
    pool: &mut ResourcePool,
    registries: &CompilerRegistries,
) -> Result<(), BuildError> {
    let graph = compiler.graph();
    for node in &graph.nodes {
        for socket in &node.inputs {
            let mut links = graph.links_into(socket.id);
            let Some(link) = links.next() else {
                continue;
            };
            if links.next().is_some() {
                return Err(BuildError::FanIn { socket: socket.id });
            }

            // Links into structural sockets carry no data and are ignored.
            if !compiler.is_data_socket(link.to) {
                continue;
            }
            if !compiler.is_data_socket(link.from) {
                return Err(BuildError::NonDataLink {
                    from: link.from,
                    to: link.to,
                });
            }

            let from_socket = compiler
                .lookup_socket(link.from)
                .expect("data sockets are mapped after node insertion");
            let to_socket = compiler
                .lookup_socket(link.to)
                .expect("data sockets are mapped after node insertion");

            if compiler.socket_type(from_socket) == compiler.socket_type(to_socket) {
                compiler.add_link(from_socket, to_socket)?;
                continue;
            }

            let from_kind = graph
                .socket(link.from)
                .map(|(_, socket)| socket.kind.clone())
                .unwrap_or_default();
            let to_kind = socket.kind.clone();
            match registries.conversions.get(&from_kind, &to_kind) {
                Some(inserter) => {
                    let (converter_in, converter_out) = inserter(compiler, pool);
                    compiler.add_link(from_socket, converter_in)?;
                    compiler.add_link(converter_out, to_socket)?;
                }
                None => {
                    return Err(BuildError::NoConversion {
                        from: link.from,
                        to: link.to,
                        from_kind,
                        to_kind,
                    });
                }
            }
        }
    }
    Ok(())
}

fn insert_unlinked_inputs(
    compiler: &mut GraphCompiler<'_>,
    pool: &mut ResourcePool,
    registries: &CompilerRegistries,
) -> Result<(), BuildError> {
    let graph = compiler.graph();
    let unlinked: Vec<&SourceSocket> = graph
        .nodes
        .iter()
        .flat_map(|node| node.inputs.iter())
        .filter(|socket| compiler.is_data_socket(socket.id))
        .filter(|socket| {
            let network_socket = compiler
                .lookup_socket(socket.id)
                .expect("data sockets are mapped after node insertion");
            !compiler.builder.is_input_linked(network_socket)
        })
        .collect();

    for socket in unlinked {
        let Some(inserter) = registries.default_values.get(&socket.kind) else {
            return Err(BuildError::MissingDefaultValue {
                socket: socket.id,
                kind: socket.kind.clone(),
            });
        };
        let from_socket = inserter(compiler, pool, socket)?;
        let to_socket = compiler
            .lookup_socket(socket.id)
            .expect("data sockets are mapped after node insertion");
        compiler.add_link(from_socket, to_socket)?;
    }
    Ok(())
}
