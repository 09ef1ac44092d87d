//! Function signatures: ordered, typed parameter descriptors.

use crate::types::{BaseType, DataType};

/// Kind of one parameter in a function signature.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParamType {
    /// Read-only single value per lane.
    SingleInput(BaseType),
    /// Read-only list per lane.
    VectorInput(BaseType),
    /// Freshly allocated single-value output buffer.
    SingleOutput(BaseType),
    /// Freshly allocated list output.
    VectorOutput(BaseType),
    /// List the function mutates in place; acts as input and output at
    /// once.
    MutableVector(BaseType),
}

impl ParamType {
    pub fn is_input(self) -> bool {
        matches!(
            self,
            ParamType::SingleInput(_) | ParamType::VectorInput(_) | ParamType::MutableVector(_)
        )
    }

    pub fn is_output(self) -> bool {
        matches!(
            self,
            ParamType::SingleOutput(_) | ParamType::VectorOutput(_) | ParamType::MutableVector(_)
        )
    }

    pub fn base_type(self) -> BaseType {
        match self {
            ParamType::SingleInput(base)
            | ParamType::VectorInput(base)
            | ParamType::SingleOutput(base)
            | ParamType::VectorOutput(base)
            | ParamType::MutableVector(base) => base,
        }
    }

    pub fn data_type(self) -> DataType {
        match self {
            ParamType::SingleInput(base) | ParamType::SingleOutput(base) => DataType::Single(base),
            ParamType::VectorInput(base)
            | ParamType::VectorOutput(base)
            | ParamType::MutableVector(base) => DataType::Vector(base),
        }
    }
}

/// Ordered parameter list of a [`Function`](super::Function).
///
/// A node's sockets need not appear in the same order as the function's
/// parameters; the network keeps socket-index to parameter-index maps for
/// that.
#[derive(Clone, Debug)]
pub struct Signature {
    name: String,
    params: Vec<(String, ParamType)>,
}

impl Signature {
    pub fn builder(name: &str) -> SignatureBuilder {
        SignatureBuilder {
            name: name.to_string(),
            params: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[(String, ParamType)] {
        &self.params
    }

    pub fn param_type(&self, index: usize) -> ParamType {
        self.params[index].1
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

/// Builder for [`Signature`].
pub struct SignatureBuilder {
    name: String,
    params: Vec<(String, ParamType)>,
}

impl SignatureBuilder {
    pub fn single_input(mut self, name: &str, base: BaseType) -> Self {
        self.params
            .push((name.to_string(), ParamType::SingleInput(base)));
        self
    }

    pub fn vector_input(mut self, name: &str, base: BaseType) -> Self {
        self.params
            .push((name.to_string(), ParamType::VectorInput(base)));
        self
    }

    pub fn single_output(mut self, name: &str, base: BaseType) -> Self {
        self.params
            .push((name.to_string(), ParamType::SingleOutput(base)));
        self
    }

    pub fn vector_output(mut self, name: &str, base: BaseType) -> Self {
        self.params
            .push((name.to_string(), ParamType::VectorOutput(base)));
        self
    }

    pub fn mutable_vector(mut self, name: &str, base: BaseType) -> Self {
        self.params
            .push((name.to_string(), ParamType::MutableVector(base)));
        self
    }

    pub fn build(self) -> Signature {
        Signature {
            name: self.name,
            params: self.params,
        }
    }
}
