//! Identity types for the pipeline graph.
//!
//! [`NodeId`] is the public, stringly typed identifier (`node_0`, `node_1`, ...)
//! handed out by the graph. [`SlotIndex`] is the internal handle: a newtype over
//! `u32` used as a direct index into the node arena.

use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;

use serde::{Deserialize, Serialize};

/// Prefix of every generated node id.
pub const NODE_ID_PREFIX: &str = "node_";

/// Public node identifier.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(String);

impl NodeId {
    /// Id for the `n`th node ever created in a graph.
    pub fn from_sequence(n: u64) -> Self {
        Self(format!("{}{}", NODE_ID_PREFIX, n))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Sequence number, when the id has the generated form.
    pub fn sequence(&self) -> Option<u64> {
        self.0.strip_prefix(NODE_ID_PREFIX)?.parse().ok()
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Deref for NodeId {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Index into `PipelineGraph::slots`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotIndex(pub u32);

impl SlotIndex {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for SlotIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SlotIndex({})", self.0)
    }
}
