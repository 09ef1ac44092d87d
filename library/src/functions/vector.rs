//! Component access for 3-vectors.

use crate::function::{CallContext, Function, Mask, Params, Signature};
use crate::types::{BaseType, Vec3};

/// Builds a 3-vector from three scalar components.
pub struct CombineVector {
    signature: Signature,
}

impl CombineVector {
    pub fn new() -> Self {
        Self {
            signature: Signature::builder("combine_vector")
                .single_input("x", BaseType::Float)
                .single_input("y", BaseType::Float)
                .single_input("z", BaseType::Float)
                .single_output("vector", BaseType::Vec3)
                .build(),
        }
    }
}

impl Function for CombineVector {
    fn signature(&self) -> &Signature {
        &self.signature
    }

    fn call(&self, mask: Mask<'_>, params: &mut Params<'_>, _context: &mut CallContext<'_>) {
        let x = params.single_in(0).float();
        let y = params.single_in(1).float();
        let z = params.single_in(2).float();
        let vector = params.single_out(3).vec3s_mut();
        for lane in mask.iter() {
            vector[lane] = Vec3::new(x.get(lane), y.get(lane), z.get(lane));
        }
    }
}

/// Splits a 3-vector into its scalar components.
pub struct SeparateVector {
    signature: Signature,
}

impl SeparateVector {
    pub fn new() -> Self {
        Self {
            signature: Signature::builder("separate_vector")
                .single_input("vector", BaseType::Vec3)
                .single_output("x", BaseType::Float)
                .single_output("y", BaseType::Float)
                .single_output("z", BaseType::Float)
                .build(),
        }
    }
}

impl Function for SeparateVector {
    fn signature(&self) -> &Signature {
        &self.signature
    }

    fn call(&self, mask: Mask<'_>, params: &mut Params<'_>, _context: &mut CallContext<'_>) {
        let vector = params.single_in(0).vec3();
        {
            let x = params.single_out(1).floats_mut();
            for lane in mask.iter() {
                x[lane] = vector.get(lane).x;
            }
        }
        {
            let y = params.single_out(2).floats_mut();
            for lane in mask.iter() {
                y[lane] = vector.get(lane).y;
            }
        }
        let z = params.single_out(3).floats_mut();
        for lane in mask.iter() {
            z[lane] = vector.get(lane).z;
        }
    }
}
