//! A bounded sub-network exposed as one batched function.

use std::rc::Rc;
use std::sync::Arc;

use crate::error::BuildError;
use crate::function::{CallContext, Function, Mask, Param, ParamType, Params, ParamsBuilder, Signature};
use crate::network::{FunctionNode, Network, Node, SocketId};
use crate::types::DataType;
use crate::values::{ArrayBuffer, SingleView, VectorArray, VectorView};

use super::storage::{SingleSlot, Storage, VectorSlot};

/// Caller-provided boundary input value.
enum BoundaryIn<'v> {
    Single(SingleView<'v>),
    Vector(VectorView<'v>),
}

/// Caller-provided boundary output destination.
enum BoundaryOut<'p> {
    Single(&'p mut ArrayBuffer),
    Vector(&'p mut VectorArray),
}

/// Owned argument buffer for one signature parameter of a node call.
enum OwnedBuffer {
    None,
    Single(ArrayBuffer),
    Vector(VectorArray),
}

/// Presents a bounded region of a [`Network`] as a single [`Function`].
///
/// Boundary inputs are output sockets of placeholder nodes (values the
/// caller supplies); boundary outputs are input sockets of placeholder
/// nodes (values the caller reads back). The synthesized signature lists
/// the inputs first, in declaration order, then the outputs.
///
/// Each call owns a private storage arena; nothing persists between calls,
/// so one instance may be invoked concurrently against the same immutable
/// network.
///
/// # Panics
///
/// Evaluation has no error channel: a built network always evaluates.
/// `call` panics if the pull reaches a placeholder output that was not
/// declared as a boundary input, or if a caller buffer is shorter than
/// `max(mask) + 1` lanes. Both are caller contract violations.
pub struct NetworkFunction {
    network: Arc<Network>,
    inputs: Vec<SocketId>,
    outputs: Vec<SocketId>,
    signature: Signature,
}

impl NetworkFunction {
    pub fn new(
        network: Arc<Network>,
        inputs: Vec<SocketId>,
        outputs: Vec<SocketId>,
    ) -> Result<Self, BuildError> {
        let mut builder = Signature::builder("network");
        for &socket_id in &inputs {
            let socket = network.socket(socket_id);
            if !socket.is_output() || !network.node(socket.node()).is_placeholder() {
                return Err(BuildError::BoundarySocket { socket: socket_id });
            }
            builder = match socket.data_type() {
                DataType::Single(base) => builder.single_input("input", base),
                DataType::Vector(base) => builder.vector_input("input", base),
            };
        }
        for &socket_id in &outputs {
            let socket = network.socket(socket_id);
            if !socket.is_input() || !network.node(socket.node()).is_placeholder() {
                return Err(BuildError::BoundarySocket { socket: socket_id });
            }
            builder = match socket.data_type() {
                DataType::Single(base) => builder.single_output("output", base),
                DataType::Vector(base) => builder.vector_output("output", base),
            };
        }

        Ok(Self {
            network,
            inputs,
            outputs,
            signature: builder.build(),
        })
    }

    pub fn network(&self) -> &Arc<Network> {
        &self.network
    }

    pub fn boundary_inputs(&self) -> &[SocketId] {
        &self.inputs
    }

    pub fn boundary_outputs(&self) -> &[SocketId] {
        &self.outputs
    }

    /// Install the caller's input values into storage for every input
    /// socket the boundary outputs feed. A consumer whose parameter is
    /// mutable-vector gets a private copy so in-place mutation can never
    /// reach the caller's buffer.
    fn seed_inputs<'v>(&self, inputs: &[BoundaryIn<'v>], storage: &mut Storage<'v>) {
        for (&socket_id, value) in self.inputs.iter().zip(inputs) {
            let socket = self.network.socket(socket_id);
            match value {
                BoundaryIn::Single(view) => {
                    for &target in socket.targets() {
                        storage.set_single(target, SingleSlot::Borrowed(*view));
                    }
                }
                BoundaryIn::Vector(view) => {
                    for &target in socket.targets() {
                        if self.target_is_mutable(target) {
                            storage.set_vector(
                                target,
                                VectorSlot::Owned(VectorArray::from_view(*view)),
                            );
                        } else {
                            storage.set_vector(target, VectorSlot::Borrowed(*view));
                        }
                    }
                }
            }
        }
    }

    /// Whether an input socket binds to a mutable-vector parameter of its
    /// consuming function node.
    fn target_is_mutable(&self, target: SocketId) -> bool {
        let socket = self.network.socket(target);
        match self.network.node(socket.node()) {
            Node::Function(node) => {
                let input_index = node
                    .inputs()
                    .iter()
                    .position(|&s| s == target)
                    .expect("socket is listed by its node");
                let param_index = node.param_for_input(input_index);
                matches!(
                    node.function().signature().param_type(param_index),
                    ParamType::MutableVector(_)
                )
            }
            Node::Placeholder(_) => false,
        }
    }

    /// Lazy pull evaluation: an explicit stack of sockets still needed,
    /// re-inspecting the top without popping until its dependencies are
    /// satisfied. Each function node runs at most once per call.
    fn evaluate(&self, mask: Mask<'_>, storage: &mut Storage<'_>, context: &mut CallContext<'_>) {
        let mut stack: Vec<SocketId> = self.outputs.clone();

        while let Some(&socket_id) = stack.last() {
            let socket = self.network.socket(socket_id);
            if socket.is_input() {
                if storage.is_computed(socket_id, socket.data_type()) {
                    stack.pop();
                } else {
                    let origin = socket
                        .origin()
                        .expect("frozen network inputs have an origin");
                    stack.push(origin);
                }
            } else {
                let Some(node) = self.network.node(socket.node()).as_function() else {
                    panic!(
                        "placeholder output socket {} was pulled during evaluation; \
                         declare it as a boundary input",
                        socket_id
                    );
                };

                let mut missing = 0;
                for &input in node.inputs() {
                    if !storage.is_computed(input, self.network.socket(input).data_type()) {
                        missing += 1;
                        stack.push(input);
                    }
                }
                if missing == 0 {
                    self.invoke_node(mask, node, storage, context);
                    stack.pop();
                }
            }
        }
    }

    /// Run one function node over the masked lanes and forward its
    /// outputs into storage.
    fn invoke_node(
        &self,
        mask: Mask<'_>,
        node: &FunctionNode,
        storage: &mut Storage<'_>,
        context: &mut CallContext<'_>,
    ) {
        let buffer_len = mask.min_buffer_len();
        let signature = node.function().signature();

        // Owned argument buffers, one slot per signature parameter.
        // Mutable lists leave the arena here, before any views are taken.
        let mut owned: Vec<OwnedBuffer> = Vec::with_capacity(signature.len());
        for (param_index, &(_, param_type)) in signature.params().iter().enumerate() {
            owned.push(match param_type {
                ParamType::SingleOutput(base) => {
                    OwnedBuffer::Single(ArrayBuffer::zeroed(base, buffer_len))
                }
                ParamType::VectorOutput(base) => {
                    OwnedBuffer::Vector(VectorArray::new(base, buffer_len))
                }
                ParamType::MutableVector(_) => {
                    let input = node
                        .input_for_param(param_index)
                        .expect("mutable vector params bind an input socket");
                    OwnedBuffer::Vector(storage.take_owned_vector(input))
                }
                ParamType::SingleInput(_) | ParamType::VectorInput(_) => OwnedBuffer::None,
            });
        }

        // Bind arguments in signature order.
        let mut builder = ParamsBuilder::new(signature);
        for ((param_index, &(_, param_type)), owned_buffer) in
            signature.params().iter().enumerate().zip(owned.iter_mut())
        {
            builder = match (param_type, owned_buffer) {
                (ParamType::SingleInput(_), _) => {
                    let input = node
                        .input_for_param(param_index)
                        .expect("single inputs bind an input socket");
                    builder.add_single_input(storage.single_view(input))
                }
                (ParamType::VectorInput(_), _) => {
                    let input = node
                        .input_for_param(param_index)
                        .expect("vector inputs bind an input socket");
                    builder.add_vector_input(storage.vector_view(input))
                }
                (ParamType::SingleOutput(_), OwnedBuffer::Single(buffer)) => {
                    builder.add_single_output(buffer)
                }
                (ParamType::VectorOutput(_), OwnedBuffer::Vector(buffer)) => {
                    builder.add_vector_output(buffer)
                }
                (ParamType::MutableVector(_), OwnedBuffer::Vector(buffer)) => {
                    builder.add_mutable_vector(buffer)
                }
                _ => unreachable!("owned buffer shape matches its parameter type"),
            };
        }
        let mut params = builder.build();

        context.enter(node.function().name());
        node.function().call(mask, &mut params, context);
        context.exit(node.function().name());
        drop(params);

        // Forward produced values to every consumer.
        for ((param_index, &(_, param_type)), owned_buffer) in
            signature.params().iter().enumerate().zip(owned)
        {
            match (param_type, owned_buffer) {
                (ParamType::SingleOutput(_), OwnedBuffer::Single(buffer)) => {
                    let output = node
                        .output_for_param(param_index)
                        .expect("single outputs bind an output socket");
                    let shared = Rc::new(buffer);
                    for &target in self.network.socket(output).targets() {
                        storage.set_single(target, SingleSlot::Shared(Rc::clone(&shared)));
                    }
                }
                (ParamType::VectorOutput(_), OwnedBuffer::Vector(buffer))
                | (ParamType::MutableVector(_), OwnedBuffer::Vector(buffer)) => {
                    let output = node
                        .output_for_param(param_index)
                        .expect("vector outputs bind an output socket");
                    self.forward_vector(output, buffer, storage);
                }
                _ => {}
            }
        }
    }

    /// Share a produced list read-only with every read-only consumer and
    /// hand every mutable-vector consumer its own independent copy.
    fn forward_vector(&self, output: SocketId, values: VectorArray, storage: &mut Storage<'_>) {
        let shared = Rc::new(values);
        for &target in self.network.socket(output).targets() {
            if self.target_is_mutable(target) {
                storage.set_vector(target, VectorSlot::Owned((*shared).clone()));
            } else {
                storage.set_vector(target, VectorSlot::Shared(Rc::clone(&shared)));
            }
        }
    }

    /// Copy the computed boundary values into the caller's destination
    /// buffers, masked lanes only.
    fn drain_outputs(
        &self,
        mask: Mask<'_>,
        outputs: &mut [BoundaryOut<'_>],
        storage: &Storage<'_>,
    ) {
        for (&socket_id, destination) in self.outputs.iter().zip(outputs.iter_mut()) {
            match destination {
                BoundaryOut::Single(buffer) => {
                    let values = storage.single_view(socket_id);
                    for lane in mask.iter() {
                        buffer.set(lane, values.get(lane));
                    }
                }
                BoundaryOut::Vector(buffer) => {
                    let values = storage.vector_view(socket_id);
                    for lane in mask.iter() {
                        buffer.extend_lane(lane, values.lane(lane));
                    }
                }
            }
        }
    }
}

impl Function for NetworkFunction {
    fn signature(&self) -> &Signature {
        &self.signature
    }

    fn call(&self, mask: Mask<'_>, params: &mut Params<'_>, context: &mut CallContext<'_>) {
        if mask.is_empty() {
            return;
        }

        let mut inputs = Vec::with_capacity(self.inputs.len());
        let mut outputs = Vec::with_capacity(self.outputs.len());
        for (index, param) in params.items_mut().enumerate() {
            if index < self.inputs.len() {
                match param {
                    Param::SingleIn(view) => inputs.push(BoundaryIn::Single(*view)),
                    Param::VectorIn(view) => inputs.push(BoundaryIn::Vector(*view)),
                    _ => panic!("boundary input parameter {} is bound to an output buffer", index),
                }
            } else {
                match param {
                    Param::SingleOut(buffer) => outputs.push(BoundaryOut::Single(&mut **buffer)),
                    Param::VectorOut(buffer) => outputs.push(BoundaryOut::Vector(&mut **buffer)),
                    _ => panic!("boundary output parameter {} is bound to an input view", index),
                }
            }
        }

        let mut storage = Storage::new();
        self.seed_inputs(&inputs, &mut storage);
        self.evaluate(mask, &mut storage, context);
        self.drain_outputs(mask, &mut outputs, &storage);
    }
}
