//! Batched node-graph evaluation engine.
//!
//! Compiles a declarative source graph of typed nodes and sockets into an
//! immutable computation network, then evaluates that network lazily over
//! an explicit subset of lanes (one lane per independent element, e.g. one
//! per vertex). See [`compile`] for the build side and
//! [`evaluation::NetworkFunction`] for the call side.

pub mod compile;
pub mod error;
pub mod evaluation;
pub mod function;
pub mod functions;
pub mod model;
pub mod network;
pub mod types;
pub mod values;

pub use error::{BuildError, LibraryError};
