//! Node-based filter pipeline.
//!
//! A [`PipelineGraph`] owns filter nodes and the directed edges between them.
//! A batch of samples enters at every source node (bound to an external
//! [`InputSource`](crate::source::InputSource), or without inbound edges) and
//! is pushed breadth-first through the reachable nodes.
//!
//! # Architecture
//!
//! ```text
//! [PassThrough] ──► [LowPass] ──► [Butterworth]
//!       ▲
//!  LogFileSource / LiveSource (weakly bound)
//! ```
//!
//! # Design
//!
//! - **Arena storage**: nodes live in slots indexed by [`SlotIndex`]; public
//!   [`NodeId`]s (`node_0`, `node_1`, ...) map to slots through a hash index.
//! - **Ids are never reused**: a monotonic counter, independent of node count.
//! - **Non-throwing edits**: unknown ids give `false` or `None`.
//! - **Weak source binding**: the graph never keeps a source alive.

pub mod codegen;
pub mod graph;
pub mod id;
pub mod node;

pub use codegen::generate_code;
pub use graph::PipelineGraph;
pub use id::{NodeId, SlotIndex, NODE_ID_PREFIX};
pub use node::{NodeKind, PipelineNode};
