//! Call arguments: the lane mask and the parameter bindings.

use crate::values::{ArrayBuffer, SingleView, VectorArray, VectorView};

use super::signature::{ParamType, Signature};

/// The ordered subset of lane positions one call must produce.
///
/// Indices need not be contiguous; internally allocated buffers are sized
/// to `max(indices) + 1` and lanes outside the mask stay untouched.
#[derive(Clone, Copy, Debug)]
pub struct Mask<'a> {
    indices: &'a [usize],
}

impl<'a> Mask<'a> {
    pub fn new(indices: &'a [usize]) -> Self {
        Self { indices }
    }

    pub fn indices(&self) -> &'a [usize] {
        self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn iter(self) -> impl Iterator<Item = usize> + 'a {
        self.indices.iter().copied()
    }

    /// Smallest buffer length that can hold every masked lane.
    pub fn min_buffer_len(&self) -> usize {
        self.indices.iter().max().map_or(0, |max| max + 1)
    }
}

/// One argument bound to a signature parameter.
pub enum Param<'a> {
    SingleIn(SingleView<'a>),
    VectorIn(VectorView<'a>),
    SingleOut(&'a mut ArrayBuffer),
    VectorOut(&'a mut VectorArray),
    MutableVector(&'a mut VectorArray),
}

/// Ordered arguments for one `Function::call`, matching its signature.
///
/// Built through [`ParamsBuilder`], which checks every binding against the
/// signature's parameter kinds and base types.
pub struct Params<'a> {
    items: Vec<Param<'a>>,
}

impl<'a> Params<'a> {
    /// Read-only single input bound to parameter `index`.
    ///
    /// The returned view borrows the caller's data, not the `Params`
    /// value, so it stays usable while output buffers are borrowed.
    pub fn single_in(&self, index: usize) -> SingleView<'a> {
        match &self.items[index] {
            Param::SingleIn(view) => *view,
            _ => panic!("parameter {} is not a single input", index),
        }
    }

    /// Read-only vector input bound to parameter `index`.
    pub fn vector_in(&self, index: usize) -> VectorView<'a> {
        match &self.items[index] {
            Param::VectorIn(view) => *view,
            _ => panic!("parameter {} is not a vector input", index),
        }
    }

    /// Single-value output buffer bound to parameter `index`.
    pub fn single_out(&mut self, index: usize) -> &mut ArrayBuffer {
        match &mut self.items[index] {
            Param::SingleOut(buffer) => buffer,
            _ => panic!("parameter {} is not a single output", index),
        }
    }

    /// Vector output buffer bound to parameter `index`.
    pub fn vector_out(&mut self, index: usize) -> &mut VectorArray {
        match &mut self.items[index] {
            Param::VectorOut(buffer) => buffer,
            _ => panic!("parameter {} is not a vector output", index),
        }
    }

    /// Mutable vector bound to parameter `index`.
    pub fn mutable_vector(&mut self, index: usize) -> &mut VectorArray {
        match &mut self.items[index] {
            Param::MutableVector(buffer) => buffer,
            _ => panic!("parameter {} is not a mutable vector", index),
        }
    }

    pub(crate) fn items_mut(&mut self) -> std::slice::IterMut<'_, Param<'a>> {
        self.items.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Builds [`Params`] against a signature, one binding per parameter, in
/// order. Mismatched kinds or base types panic immediately: the caller
/// knows the signature, so a mismatch is a programming error, not input.
pub struct ParamsBuilder<'s, 'a> {
    signature: &'s Signature,
    items: Vec<Param<'a>>,
}

impl<'s, 'a> ParamsBuilder<'s, 'a> {
    pub fn new(signature: &'s Signature) -> Self {
        Self {
            signature,
            items: Vec::with_capacity(signature.len()),
        }
    }

    fn check(&self, matches: bool, wanted: &str) {
        let index = self.items.len();
        assert!(
            index < self.signature.len(),
            "signature '{}' has only {} parameters",
            self.signature.name(),
            self.signature.len()
        );
        assert!(
            matches,
            "parameter {} of '{}' is {:?}, not a {}",
            index,
            self.signature.name(),
            self.signature.param_type(index),
            wanted
        );
    }

    pub fn add_single_input(mut self, view: impl Into<SingleView<'a>>) -> Self {
        let view = view.into();
        let expected = self.items.len() < self.signature.len()
            && matches!(
                self.signature.param_type(self.items.len()),
                ParamType::SingleInput(base) if base == view.base_type()
            );
        self.check(expected, "single input of matching base type");
        self.items.push(Param::SingleIn(view));
        self
    }

    pub fn add_vector_input(mut self, view: impl Into<VectorView<'a>>) -> Self {
        let view = view.into();
        let expected = self.items.len() < self.signature.len()
            && matches!(
                self.signature.param_type(self.items.len()),
                ParamType::VectorInput(base) if base == view.base_type()
            );
        self.check(expected, "vector input of matching base type");
        self.items.push(Param::VectorIn(view));
        self
    }

    pub fn add_single_output(mut self, buffer: &'a mut ArrayBuffer) -> Self {
        let expected = self.items.len() < self.signature.len()
            && matches!(
                self.signature.param_type(self.items.len()),
                ParamType::SingleOutput(base) if base == buffer.base_type()
            );
        self.check(expected, "single output of matching base type");
        self.items.push(Param::SingleOut(buffer));
        self
    }

    pub fn add_vector_output(mut self, buffer: &'a mut VectorArray) -> Self {
        let expected = self.items.len() < self.signature.len()
            && matches!(
                self.signature.param_type(self.items.len()),
                ParamType::VectorOutput(base) if base == buffer.base_type()
            );
        self.check(expected, "vector output of matching base type");
        self.items.push(Param::VectorOut(buffer));
        self
    }

    pub fn add_mutable_vector(mut self, buffer: &'a mut VectorArray) -> Self {
        let expected = self.items.len() < self.signature.len()
            && matches!(
                self.signature.param_type(self.items.len()),
                ParamType::MutableVector(base) if base == buffer.base_type()
            );
        self.check(expected, "mutable vector of matching base type");
        self.items.push(Param::MutableVector(buffer));
        self
    }

    /// Finish building. Panics unless every parameter was bound.
    pub fn build(self) -> Params<'a> {
        assert_eq!(
            self.items.len(),
            self.signature.len(),
            "signature '{}' expects {} parameters, {} were bound",
            self.signature.name(),
            self.signature.len(),
            self.items.len()
        );
        Params { items: self.items }
    }
}
