//! Zero-input value sources.

use crate::function::{CallContext, Function, Mask, Params, Signature};
use crate::types::{BaseType, SingleValue};

/// Emits one constant value on every lane.
///
/// The default-value inserters wire one of these in front of every
/// unconnected single-value input.
pub struct ConstantValue {
    value: SingleValue,
    signature: Signature,
}

impl ConstantValue {
    pub fn new(value: SingleValue) -> Self {
        Self {
            value,
            signature: Signature::builder("constant_value")
                .single_output("value", value.base_type())
                .build(),
        }
    }

    pub fn value(&self) -> SingleValue {
        self.value
    }
}

impl Function for ConstantValue {
    fn signature(&self) -> &Signature {
        &self.signature
    }

    fn call(&self, mask: Mask<'_>, params: &mut Params<'_>, _context: &mut CallContext<'_>) {
        let out = params.single_out(0);
        for lane in mask.iter() {
            out.set(lane, self.value);
        }
    }
}

/// Emits an empty list on every lane.
pub struct EmptyList {
    signature: Signature,
}

impl EmptyList {
    pub fn new(base: BaseType) -> Self {
        Self {
            signature: Signature::builder("empty_list")
                .vector_output("list", base)
                .build(),
        }
    }
}

impl Function for EmptyList {
    fn signature(&self) -> &Signature {
        &self.signature
    }

    fn call(&self, _mask: Mask<'_>, _params: &mut Params<'_>, _context: &mut CallContext<'_>) {
        // Freshly allocated vector outputs start out empty on every lane.
    }
}
