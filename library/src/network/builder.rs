//! Mutable, under-construction network.
//!
//! The builder grows node and socket tables with dense identifiers that
//! carry over unchanged into the frozen [`Network`]. Freezing validates
//! that every input socket is linked and that the graph is acyclic.

use std::collections::VecDeque;
use std::sync::Arc;

use crate::error::BuildError;
use crate::function::Function;
use crate::types::DataType;

use super::{FunctionNode, Network, Node, NodeId, PlaceholderNode, Socket, SocketId, SocketKind};

struct BuilderNode {
    /// `None` marks a placeholder node.
    function: Option<Arc<dyn Function>>,
    input_param_indices: Vec<usize>,
    output_param_indices: Vec<usize>,
    inputs: Vec<SocketId>,
    outputs: Vec<SocketId>,
}

struct BuilderSocket {
    node: NodeId,
    data_type: DataType,
    is_input: bool,
    origin: Option<SocketId>,
    targets: Vec<SocketId>,
}

/// Builds a computation network node by node.
#[derive(Default)]
pub struct NetworkBuilder {
    nodes: Vec<BuilderNode>,
    sockets: Vec<BuilderSocket>,
}

impl NetworkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn add_socket(&mut self, node: NodeId, data_type: DataType, is_input: bool) -> SocketId {
        let id = self.sockets.len();
        self.sockets.push(BuilderSocket {
            node,
            data_type,
            is_input,
            origin: None,
            targets: Vec::new(),
        });
        id
    }

    /// Add a node wrapping `function`. `input_param_indices` and
    /// `output_param_indices` give, per socket in order, the signature
    /// parameter that socket binds to; a mutable-vector parameter appears
    /// in both lists.
    pub fn add_function(
        &mut self,
        function: Arc<dyn Function>,
        input_param_indices: &[usize],
        output_param_indices: &[usize],
    ) -> NodeId {
        let node_id = self.nodes.len();
        let signature = function.signature().clone();

        let mut inputs = Vec::with_capacity(input_param_indices.len());
        for &param_index in input_param_indices {
            let param_type = signature.param_type(param_index);
            debug_assert!(param_type.is_input());
            inputs.push(self.add_socket(node_id, param_type.data_type(), true));
        }

        let mut outputs = Vec::with_capacity(output_param_indices.len());
        for &param_index in output_param_indices {
            let param_type = signature.param_type(param_index);
            debug_assert!(param_type.is_output());
            outputs.push(self.add_socket(node_id, param_type.data_type(), false));
        }

        self.nodes.push(BuilderNode {
            function: Some(function),
            input_param_indices: input_param_indices.to_vec(),
            output_param_indices: output_param_indices.to_vec(),
            inputs,
            outputs,
        });
        node_id
    }

    /// Add a boundary marker node with the given socket types.
    pub fn add_placeholder(
        &mut self,
        input_types: &[DataType],
        output_types: &[DataType],
    ) -> NodeId {
        let node_id = self.nodes.len();
        let inputs = input_types
            .iter()
            .map(|&data_type| self.add_socket(node_id, data_type, true))
            .collect();
        let outputs = output_types
            .iter()
            .map(|&data_type| self.add_socket(node_id, data_type, false))
            .collect();
        self.nodes.push(BuilderNode {
            function: None,
            input_param_indices: Vec::new(),
            output_param_indices: Vec::new(),
            inputs,
            outputs,
        });
        node_id
    }

    /// Link an output socket to an input socket. Endpoint types must match
    /// exactly (conversions are inserted by the compiler, not here) and an
    /// input accepts only one origin.
    pub fn add_link(&mut self, from: SocketId, to: SocketId) -> Result<(), BuildError> {
        assert!(!self.sockets[from].is_input, "link source must be an output");
        assert!(self.sockets[to].is_input, "link destination must be an input");

        if self.sockets[from].data_type != self.sockets[to].data_type {
            return Err(BuildError::LinkTypeMismatch { from, to });
        }
        if self.sockets[to].origin.is_some() {
            return Err(BuildError::DuplicateOrigin { socket: to });
        }
        self.sockets[to].origin = Some(from);
        self.sockets[from].targets.push(to);
        Ok(())
    }

    pub fn node_inputs(&self, node: NodeId) -> &[SocketId] {
        &self.nodes[node].inputs
    }

    pub fn node_outputs(&self, node: NodeId) -> &[SocketId] {
        &self.nodes[node].outputs
    }

    pub fn socket_type(&self, socket: SocketId) -> DataType {
        self.sockets[socket].data_type
    }

    pub fn is_input_linked(&self, socket: SocketId) -> bool {
        self.sockets[socket].origin.is_some()
    }

    /// Validate and produce the immutable network. Socket and node
    /// identifiers carry over unchanged.
    pub fn freeze(self) -> Result<Network, BuildError> {
        for (id, socket) in self.sockets.iter().enumerate() {
            if socket.is_input && socket.origin.is_none() {
                return Err(BuildError::UnlinkedInput { socket: id });
            }
        }
        self.check_acyclic()?;

        let sockets = self
            .sockets
            .iter()
            .enumerate()
            .map(|(id, socket)| Socket {
                id,
                node: socket.node,
                data_type: socket.data_type,
                kind: if socket.is_input {
                    SocketKind::Input {
                        origin: socket.origin.expect("checked above"),
                    }
                } else {
                    SocketKind::Output {
                        targets: socket.targets.clone(),
                    }
                },
            })
            .collect();

        let nodes = self
            .nodes
            .into_iter()
            .enumerate()
            .map(|(id, node)| match node.function {
                Some(function) => Node::Function(FunctionNode {
                    id,
                    function,
                    input_param_indices: node.input_param_indices,
                    output_param_indices: node.output_param_indices,
                    inputs: node.inputs,
                    outputs: node.outputs,
                }),
                None => Node::Placeholder(PlaceholderNode {
                    id,
                    inputs: node.inputs,
                    outputs: node.outputs,
                }),
            })
            .collect();

        Ok(Network::new(nodes, sockets))
    }

    /// Kahn's algorithm over the node graph; fails on a cycle.
    fn check_acyclic(&self) -> Result<(), BuildError> {
        let mut in_degree = vec![0usize; self.nodes.len()];
        for socket in &self.sockets {
            if socket.is_input && socket.origin.is_some() {
                in_degree[socket.node] += 1;
            }
        }

        let mut queue: VecDeque<NodeId> = in_degree
            .iter()
            .enumerate()
            .filter(|&(_, &degree)| degree == 0)
            .map(|(node, _)| node)
            .collect();

        let mut visited = 0;
        while let Some(node) = queue.pop_front() {
            visited += 1;
            for &output in &self.nodes[node].outputs {
                for &target in &self.sockets[output].targets {
                    let downstream = self.sockets[target].node;
                    in_degree[downstream] -= 1;
                    if in_degree[downstream] == 0 {
                        queue.push_back(downstream);
                    }
                }
            }
        }

        if visited != self.nodes.len() {
            return Err(BuildError::CycleDetected);
        }
        Ok(())
    }
}
