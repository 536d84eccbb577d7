//! Pipeline node: one configured filter (or pass-through) placed in the graph.
//!
//! A node carries its parameter map and adjacency lists unconditionally; the
//! filter instance and the external source binding are both optional. A node
//! without a filter passes its buffer through unchanged.

use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Weak};

use serde::{Deserialize, Serialize};

use crate::filter::{FilterError, FilterKind, FilterModel, ParameterMap};
use crate::pipeline::id::NodeId;
use crate::source::InputSource;

/// Design type of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Butterworth,
    LowPass,
    PassThrough,
}

impl NodeKind {
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Butterworth => "Butterworth",
            NodeKind::LowPass => "LowPass",
            NodeKind::PassThrough => "PassThrough",
        }
    }

    pub fn all() -> &'static [NodeKind] {
        &[NodeKind::Butterworth, NodeKind::LowPass, NodeKind::PassThrough]
    }

    /// Filter design backing this kind, if any.
    pub fn filter_kind(&self) -> Option<FilterKind> {
        match self {
            NodeKind::Butterworth => Some(FilterKind::Butterworth),
            NodeKind::LowPass => Some(FilterKind::LowPass),
            NodeKind::PassThrough => None,
        }
    }
}

impl From<FilterKind> for NodeKind {
    fn from(kind: FilterKind) -> Self {
        match kind {
            FilterKind::Butterworth => NodeKind::Butterworth,
            FilterKind::LowPass => NodeKind::LowPass,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NodeKind {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "passthrough" | "pass-through" | "input" => Ok(NodeKind::PassThrough),
            _ => s.parse::<FilterKind>().map(NodeKind::from),
        }
    }
}

/// A node in a [`PipelineGraph`](super::PipelineGraph).
pub struct PipelineNode {
    pub(crate) id: NodeId,
    pub(crate) kind: NodeKind,
    pub(crate) parameters: ParameterMap,
    pub(crate) inputs: Vec<NodeId>,
    pub(crate) outputs: Vec<NodeId>,
    pub(crate) filter: Option<Box<dyn FilterModel>>,
    pub(crate) source: Option<Weak<InputSource>>,
}

impl PipelineNode {
    pub(crate) fn new(id: NodeId, kind: NodeKind, parameters: ParameterMap) -> Self {
        Self {
            id,
            kind,
            parameters,
            inputs: Vec::new(),
            outputs: Vec::new(),
            filter: None,
            source: None,
        }
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Stored parameter map. Not necessarily what the attached filter uses.
    pub fn parameters(&self) -> &ParameterMap {
        &self.parameters
    }

    /// Upstream node ids, in connection order.
    pub fn inputs(&self) -> &[NodeId] {
        &self.inputs
    }

    /// Downstream node ids, in connection order.
    pub fn outputs(&self) -> &[NodeId] {
        &self.outputs
    }

    pub fn filter(&self) -> Option<&dyn FilterModel> {
        self.filter.as_deref()
    }

    pub fn filter_mut(&mut self) -> Option<&mut (dyn FilterModel + 'static)> {
        self.filter.as_deref_mut()
    }

    pub fn has_filter(&self) -> bool {
        self.filter.is_some()
    }

    /// A source binding exists, whether or not the source is still alive.
    pub fn has_input_source(&self) -> bool {
        self.source.is_some()
    }

    /// The bound source, if it is still alive.
    pub fn input_source(&self) -> Option<Arc<InputSource>> {
        self.source.as_ref().and_then(Weak::upgrade)
    }

    /// Source node: bound to an external source, or nothing feeds it.
    pub fn is_source(&self) -> bool {
        self.source.is_some() || self.inputs.is_empty()
    }

    /// Run the buffer through the filter, or pass it through.
    pub fn process(&mut self, buffer: Vec<f64>) -> Vec<f64> {
        match self.filter.as_mut() {
            Some(filter) => filter.process_block(&buffer),
            None => buffer,
        }
    }

    pub(crate) fn unlink(&mut self, id: &NodeId) {
        self.inputs.retain(|i| i != id);
        self.outputs.retain(|o| o != id);
    }
}

impl fmt::Debug for PipelineNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineNode")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("parameters", &self.parameters)
            .field("inputs", &self.inputs)
            .field("outputs", &self.outputs)
            .field("filter", &self.filter.as_ref().map(|f| f.type_name()))
            .field("source", &self.has_input_source())
            .finish()
    }
}
