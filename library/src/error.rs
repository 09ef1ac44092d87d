use thiserror::Error;
use uuid::Uuid;

use crate::model::graph::SourceSocketId;

/// Failure while translating a source graph into a computation network.
///
/// Variants carry the identifiers of the offending sockets so callers can
/// point back at the authored graph. `SourceSocketId` fields refer to the
/// source graph; plain `usize` fields refer to sockets of the network
/// under construction.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BuildError {
    #[error("link {from} -> {to}: no conversion registered from '{from_kind}' to '{to_kind}'")]
    NoConversion {
        from: SourceSocketId,
        to: SourceSocketId,
        from_kind: String,
        to_kind: String,
    },
    #[error("link {from} -> {to}: source is not a data socket")]
    NonDataLink {
        from: SourceSocketId,
        to: SourceSocketId,
    },
    #[error("input socket {socket}: more than one incoming link")]
    FanIn { socket: SourceSocketId },
    #[error("unlinked input socket {socket}: no default value registered for kind '{kind}'")]
    MissingDefaultValue {
        socket: SourceSocketId,
        kind: String,
    },
    #[error("node {node}: {message}")]
    NodeConfig { node: Uuid, message: String },
    #[error("link {from} -> {to}: socket types differ")]
    LinkTypeMismatch { from: usize, to: usize },
    #[error("input socket {socket} already has an origin")]
    DuplicateOrigin { socket: usize },
    #[error("input socket {socket} has no incoming link")]
    UnlinkedInput { socket: usize },
    #[error("network contains a cycle")]
    CycleDetected,
    #[error("socket {socket} is not a placeholder boundary socket")]
    BoundarySocket { socket: usize },
}

/// Top-level error for the host-facing surface (CLI, graph loading).
#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Build error: {0}")]
    Build(#[from] BuildError),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}
