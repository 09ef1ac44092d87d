//! List operations.

use crate::function::{CallContext, Function, Mask, Params, Signature};
use crate::types::BaseType;

/// Appends one element per lane to a list, in place.
///
/// The list parameter is mutable-vector: the evaluator hands this function
/// a private copy whenever the list value has other consumers.
pub struct AppendToList {
    signature: Signature,
}

impl AppendToList {
    pub fn new(base: BaseType) -> Self {
        Self {
            signature: Signature::builder("append_to_list")
                .mutable_vector("list", base)
                .single_input("value", base)
                .build(),
        }
    }
}

impl Function for AppendToList {
    fn signature(&self) -> &Signature {
        &self.signature
    }

    fn call(&self, mask: Mask<'_>, params: &mut Params<'_>, _context: &mut CallContext<'_>) {
        let value = params.single_in(1);
        let list = params.mutable_vector(0);
        for lane in mask.iter() {
            list.push(lane, value.get(lane));
        }
    }
}

/// Per-lane list length.
pub struct ListLength {
    signature: Signature,
}

impl ListLength {
    pub fn new(base: BaseType) -> Self {
        Self {
            signature: Signature::builder("list_length")
                .vector_input("list", base)
                .single_output("length", BaseType::Int)
                .build(),
        }
    }
}

impl Function for ListLength {
    fn signature(&self) -> &Signature {
        &self.signature
    }

    fn call(&self, mask: Mask<'_>, params: &mut Params<'_>, _context: &mut CallContext<'_>) {
        let list = params.vector_in(0);
        let length = params.single_out(1).ints_mut();
        for lane in mask.iter() {
            length[lane] = list.lane(lane).len() as i32;
        }
    }
}
