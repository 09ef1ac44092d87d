//! Scalar and vector arithmetic.

use crate::function::{CallContext, Function, Mask, Params, Signature};
use crate::types::BaseType;

/// Lane-wise `a + b` over floats.
pub struct AddFloats {
    signature: Signature,
}

impl AddFloats {
    pub fn new() -> Self {
        Self {
            signature: Signature::builder("add_floats")
                .single_input("a", BaseType::Float)
                .single_input("b", BaseType::Float)
                .single_output("result", BaseType::Float)
                .build(),
        }
    }
}

impl Function for AddFloats {
    fn signature(&self) -> &Signature {
        &self.signature
    }

    fn call(&self, mask: Mask<'_>, params: &mut Params<'_>, _context: &mut CallContext<'_>) {
        let a = params.single_in(0).float();
        let b = params.single_in(1).float();
        let result = params.single_out(2).floats_mut();
        for lane in mask.iter() {
            result[lane] = a.get(lane) + b.get(lane);
        }
    }
}

/// Lane-wise `a + b` over 3-vectors.
pub struct AddVec3s {
    signature: Signature,
}

impl AddVec3s {
    pub fn new() -> Self {
        Self {
            signature: Signature::builder("add_vec3s")
                .single_input("a", BaseType::Vec3)
                .single_input("b", BaseType::Vec3)
                .single_output("result", BaseType::Vec3)
                .build(),
        }
    }
}

impl Function for AddVec3s {
    fn signature(&self) -> &Signature {
        &self.signature
    }

    fn call(&self, mask: Mask<'_>, params: &mut Params<'_>, _context: &mut CallContext<'_>) {
        let a = params.single_in(0).vec3();
        let b = params.single_in(1).vec3();
        let result = params.single_out(2).vec3s_mut();
        for lane in mask.iter() {
            result[lane] = a.get(lane) + b.get(lane);
        }
    }
}
