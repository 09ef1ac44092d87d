//! Lazy, demand-driven network evaluation.
//!
//! [`NetworkFunction`] wraps a bounded region of a compiled network and
//! exposes it as a single [`Function`](crate::function::Function).
//! Evaluation is pull-based: starting from the requested outputs, an
//! explicit work stack resolves sockets depth-first, invoking each
//! function node at most once per call and memoizing results in a
//! call-scoped storage arena.

mod network_function;
mod storage;

pub use network_function::NetworkFunction;
