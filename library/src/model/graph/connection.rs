//! Link model for the source graph.

use serde::{Deserialize, Serialize};

use super::socket::SourceSocketId;

/// A directed edge from an output socket to an input socket.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct SourceLink {
    pub from: SourceSocketId,
    pub to: SourceSocketId,
}

impl SourceLink {
    pub fn new(from: SourceSocketId, to: SourceSocketId) -> Self {
        Self { from, to }
    }
}
