//! Implicit type conversions.

use crate::function::{CallContext, Function, Mask, Params, Signature};
use crate::types::BaseType;

/// Lane-wise integer to float conversion, wired in by the conversion
/// registry when an integer output feeds a float input.
pub struct IntToFloat {
    signature: Signature,
}

impl IntToFloat {
    pub fn new() -> Self {
        Self {
            signature: Signature::builder("int_to_float")
                .single_input("value", BaseType::Int)
                .single_output("value", BaseType::Float)
                .build(),
        }
    }
}

impl Function for IntToFloat {
    fn signature(&self) -> &Signature {
        &self.signature
    }

    fn call(&self, mask: Mask<'_>, params: &mut Params<'_>, _context: &mut CallContext<'_>) {
        let value = params.single_in(0).int();
        let result = params.single_out(1).floats_mut();
        for lane in mask.iter() {
            result[lane] = value.get(lane) as f32;
        }
    }
}
