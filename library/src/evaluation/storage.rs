//! Per-call value arena.

use std::collections::HashMap;
use std::rc::Rc;

use crate::network::SocketId;
use crate::types::DataType;
use crate::values::{ArrayBuffer, SingleView, VectorArray, VectorView};

/// Computed single-per-lane value of one input socket.
pub(crate) enum SingleSlot<'a> {
    /// View borrowed from the caller's parameters.
    Borrowed(SingleView<'a>),
    /// Buffer produced by an upstream function, shared read-only between
    /// all consumers.
    Shared(Rc<ArrayBuffer>),
}

/// Computed list-per-lane value of one input socket.
pub(crate) enum VectorSlot<'a> {
    /// View borrowed from the caller's parameters.
    Borrowed(VectorView<'a>),
    /// List produced by an upstream function, shared read-only.
    Shared(Rc<VectorArray>),
    /// Private copy reserved for one mutable-vector parameter; taken out
    /// of the arena when its consumer runs.
    Owned(VectorArray),
}

/// Maps input sockets to their computed values for the duration of one
/// evaluator call.
///
/// The arena owns every buffer it allocated (shared buffers through `Rc`,
/// private mutable copies by value) and drops them all when the call
/// returns. Caller-provided buffers are only ever borrowed.
#[derive(Default)]
pub(crate) struct Storage<'a> {
    singles: HashMap<SocketId, SingleSlot<'a>>,
    vectors: HashMap<SocketId, VectorSlot<'a>>,
}

impl<'a> Storage<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_single(&mut self, socket: SocketId, slot: SingleSlot<'a>) {
        let previous = self.singles.insert(socket, slot);
        debug_assert!(previous.is_none(), "socket {} computed twice", socket);
    }

    pub fn set_vector(&mut self, socket: SocketId, slot: VectorSlot<'a>) {
        let previous = self.vectors.insert(socket, slot);
        debug_assert!(previous.is_none(), "socket {} computed twice", socket);
    }

    pub fn is_computed(&self, socket: SocketId, data_type: DataType) -> bool {
        match data_type {
            DataType::Single(_) => self.singles.contains_key(&socket),
            DataType::Vector(_) => self.vectors.contains_key(&socket),
        }
    }

    pub fn single_view(&self, socket: SocketId) -> SingleView<'_> {
        match self
            .singles
            .get(&socket)
            .expect("single value was computed before use")
        {
            SingleSlot::Borrowed(view) => *view,
            SingleSlot::Shared(buffer) => buffer.view(),
        }
    }

    pub fn vector_view(&self, socket: SocketId) -> VectorView<'_> {
        match self
            .vectors
            .get(&socket)
            .expect("vector value was computed before use")
        {
            VectorSlot::Borrowed(view) => *view,
            VectorSlot::Shared(array) => array.view(),
            VectorSlot::Owned(array) => array.view(),
        }
    }

    /// Take the private copy reserved for a mutable-vector parameter.
    ///
    /// The slot is removed; a mutable input is consumed exactly once, by
    /// the function node that owns it.
    pub fn take_owned_vector(&mut self, socket: SocketId) -> VectorArray {
        match self.vectors.remove(&socket) {
            Some(VectorSlot::Owned(array)) => array,
            Some(_) => panic!("socket {} does not hold a private list copy", socket),
            None => panic!("vector value of socket {} was not computed", socket),
        }
    }
}
