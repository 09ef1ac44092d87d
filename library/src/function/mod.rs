//! The batched callable unit abstraction.
//!
//! A [`Function`] processes an entire lane set per invocation: every
//! parameter is an array-shaped value covering all requested lanes. The
//! evaluator composes function instances into networks; a compiled
//! sub-network is itself exposed as a `Function` again.

pub mod params;
pub mod signature;

pub use params::{Mask, Param, Params, ParamsBuilder};
pub use signature::{ParamType, Signature, SignatureBuilder};

/// Caller-supplied diagnostics hook, invoked around every function-node
/// invocation during network evaluation.
pub trait EvalTracer {
    fn node_enter(&mut self, function_name: &str);
    fn node_exit(&mut self, function_name: &str);
}

/// Per-call context threaded through every function invocation.
#[derive(Default)]
pub struct CallContext<'a> {
    pub tracer: Option<&'a mut dyn EvalTracer>,
}

impl<'a> CallContext<'a> {
    pub fn new() -> Self {
        Self { tracer: None }
    }

    pub fn with_tracer(tracer: &'a mut dyn EvalTracer) -> Self {
        Self {
            tracer: Some(tracer),
        }
    }

    pub(crate) fn enter(&mut self, function_name: &str) {
        if let Some(tracer) = self.tracer.as_deref_mut() {
            tracer.node_enter(function_name);
        }
    }

    pub(crate) fn exit(&mut self, function_name: &str) {
        if let Some(tracer) = self.tracer.as_deref_mut() {
            tracer.node_exit(function_name);
        }
    }
}

/// A batched, immutable callable unit.
///
/// Implementations are stateless across calls: any per-call scratch state
/// lives in the caller-provided parameter buffers, so one instance may be
/// invoked concurrently from independent calls.
pub trait Function: Send + Sync {
    fn signature(&self) -> &Signature;

    /// Compute the masked lanes. `params` carries one binding per
    /// signature parameter, in order; lanes outside the mask must be left
    /// untouched.
    fn call(&self, mask: Mask<'_>, params: &mut Params<'_>, context: &mut CallContext<'_>);

    fn name(&self) -> &str {
        self.signature().name()
    }
}
