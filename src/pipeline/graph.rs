//! Pipeline graph: node arena, adjacency and batch evaluation.
//!
//! Nodes live in an arena of slots and storage order is slot order. Removal
//! leaves an empty slot; once empty slots outnumber live nodes the arena is
//! compacted in order and the index rebuilt. Public [`NodeId`]s map to slots
//! through a hash index, so slot handles never leave the graph.
//!
//! Edges are stored on both endpoints (`outputs` of the source, `inputs` of
//! the target). Cycles are not rejected; evaluation bounds them with a
//! per-traversal seen set.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use crate::filter::{DesignParams, FilterError, FilterModel, ParameterMap};
use crate::pipeline::id::{NodeId, SlotIndex};
use crate::pipeline::node::{NodeKind, PipelineNode};
use crate::source::{InputSource, SampleSource};

/// Directed graph of filter nodes.
#[derive(Debug, Default)]
pub struct PipelineGraph {
    slots: Vec<Option<PipelineNode>>,
    index: HashMap<NodeId, SlotIndex>,
    next_sequence: u64,
    defaults: DesignParams,
}

impl PipelineGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Graph whose filter nodes start from `defaults` instead of the built-in
    /// design defaults.
    pub fn with_defaults(defaults: DesignParams) -> Self {
        Self {
            defaults,
            ..Self::default()
        }
    }

    pub fn defaults(&self) -> &DesignParams {
        &self.defaults
    }

    // ── Graph building ──

    /// Add a node without a filter instance. Ids are never reused.
    pub fn add_node(&mut self, kind: NodeKind, parameters: ParameterMap) -> NodeId {
        let id = NodeId::from_sequence(self.next_sequence);
        self.next_sequence += 1;

        let slot = SlotIndex(self.slots.len() as u32);
        self.slots
            .push(Some(PipelineNode::new(id.clone(), kind, parameters)));
        self.index.insert(id.clone(), slot);
        tracing::debug!("Added node {} ({})", id, kind);
        id
    }

    /// Add a node and attach a filter built from `parameters`. Nothing is
    /// added if the parameters are rejected.
    pub fn add_filter_node(
        &mut self,
        kind: NodeKind,
        parameters: ParameterMap,
    ) -> Result<NodeId, FilterError> {
        let filter = match kind.filter_kind() {
            Some(filter_kind) => Some(filter_kind.build_with(&self.defaults, &parameters)?),
            None => None,
        };
        let id = self.add_node(kind, parameters);
        if let Some(filter) = filter {
            self.attach_filter(&id, filter);
        }
        Ok(id)
    }

    /// Remove a node and every edge touching it.
    pub fn remove_node(&mut self, id: &str) -> bool {
        let Some(slot) = self.index.remove(id) else {
            return false;
        };
        let Some(removed) = self.slots[slot.index()].take() else {
            return false;
        };
        for node in self.slots.iter_mut().flatten() {
            node.unlink(&removed.id);
        }
        tracing::debug!("Removed node {}", removed.id);

        if self.slots.len() - self.index.len() > self.index.len() {
            self.compact();
        }
        true
    }

    /// Drop empty slots, keeping storage order, and re-point the index.
    fn compact(&mut self) {
        self.slots.retain(Option::is_some);
        self.index.clear();
        for (i, node) in self.slots.iter().flatten().enumerate() {
            self.index.insert(node.id.clone(), SlotIndex(i as u32));
        }
        tracing::trace!("Compacted node arena to {} slots", self.slots.len());
    }

    /// Add the edge `source → target`. Returns `false` for unknown ids or an
    /// existing edge.
    pub fn connect_nodes(&mut self, source: &str, target: &str) -> bool {
        let (Some(src), Some(dst)) = (self.slot_of(source), self.slot_of(target)) else {
            return false;
        };
        let source_id = NodeId::from(source);
        let target_id = NodeId::from(target);

        let Some(from) = self.slot_mut(src) else {
            return false;
        };
        if from.outputs.contains(&target_id) {
            return false;
        }
        from.outputs.push(target_id.clone());
        if let Some(to) = self.slot_mut(dst) {
            to.inputs.push(source_id.clone());
        }
        tracing::debug!("Connected {} -> {}", source_id, target_id);
        true
    }

    /// Remove the edge `source → target` from both endpoints; no-op if absent.
    pub fn disconnect_nodes(&mut self, source: &str, target: &str) {
        let (Some(src), Some(dst)) = (self.slot_of(source), self.slot_of(target)) else {
            return;
        };
        if let Some(from) = self.slot_mut(src) {
            from.outputs.retain(|o| o.as_str() != target);
        }
        if let Some(to) = self.slot_mut(dst) {
            to.inputs.retain(|i| i.as_str() != source);
        }
    }

    // ── Parameters and filters ──

    /// Copy of a node's parameter map.
    pub fn node_parameters(&self, id: &str) -> Option<ParameterMap> {
        self.node(id).map(|n| n.parameters.clone())
    }

    /// Replace a node's parameter map. The attached filter is not redesigned.
    pub fn set_node_parameters(&mut self, id: &str, parameters: ParameterMap) -> bool {
        match self.node_mut(id) {
            Some(node) => {
                node.parameters = parameters;
                true
            }
            None => false,
        }
    }

    /// Attach (or replace) the filter instance of a node.
    pub fn attach_filter(&mut self, id: &str, filter: Box<dyn FilterModel>) -> bool {
        match self.node_mut(id) {
            Some(node) => {
                node.filter = Some(filter);
                true
            }
            None => false,
        }
    }

    /// Detach and return a node's filter instance.
    pub fn detach_filter(&mut self, id: &str) -> Option<Box<dyn FilterModel>> {
        self.node_mut(id).and_then(|n| n.filter.take())
    }

    pub fn filter(&self, id: &str) -> Option<&dyn FilterModel> {
        self.node(id).and_then(PipelineNode::filter)
    }

    pub fn filter_mut(&mut self, id: &str) -> Option<&mut (dyn FilterModel + 'static)> {
        self.node_mut(id).and_then(PipelineNode::filter_mut)
    }

    // ── External sources ──

    /// Bind a node to an external source. The graph keeps only a weak
    /// reference; the caller owns the source.
    pub fn set_input_source(&mut self, id: &str, source: &Arc<InputSource>) -> bool {
        match self.node_mut(id) {
            Some(node) => {
                node.source = Some(Arc::downgrade(source));
                true
            }
            None => false,
        }
    }

    pub fn clear_input_source(&mut self, id: &str) -> bool {
        match self.node_mut(id) {
            Some(node) => node.source.take().is_some(),
            None => false,
        }
    }

    /// The source bound to a node, if it is still alive.
    pub fn input_source(&self, id: &str) -> Option<Arc<InputSource>> {
        self.node(id).and_then(PipelineNode::input_source)
    }

    // ── Evaluation ──

    /// Drive one batch through the graph.
    ///
    /// Every source node (bound to an external source, or without inbound
    /// edges) is handled in storage order. Its buffer comes from the bound
    /// source when that source is alive and connected, otherwise from
    /// `input`. A breadth-first walk then visits each reachable node once,
    /// replacing the running buffer with the node's output. The result is
    /// merged into the accumulated output, which starts as `input`: a length
    /// mismatch replaces it, equal lengths are summed elementwise.
    ///
    /// Where two paths converge, the shared node runs once with whichever
    /// buffer reaches it first.
    pub fn process_data(&mut self, input: Vec<f64>) -> Vec<f64> {
        if self.is_empty() {
            return input;
        }

        let sources: Vec<SlotIndex> = self
            .occupied()
            .filter(|(_, node)| node.is_source())
            .map(|(slot, _)| slot)
            .collect();
        if sources.is_empty() {
            return input;
        }

        let mut output = input.clone();
        for start in sources {
            let bound = self.slots[start.index()]
                .as_ref()
                .and_then(PipelineNode::input_source);
            let mut buffer = match bound {
                Some(source) if source.is_connected() => source.get_data(),
                _ => input.clone(),
            };

            let mut queue = VecDeque::from([start]);
            let mut seen = HashSet::new();
            while let Some(slot) = queue.pop_front() {
                if !seen.insert(slot) {
                    continue;
                }
                let Some(node) = self.slots[slot.index()].as_mut() else {
                    continue;
                };
                buffer = node.process(buffer);
                queue.extend(
                    node.outputs
                        .iter()
                        .filter_map(|id| self.index.get(id).copied()),
                );
            }

            merge_into(&mut output, buffer);
        }
        output
    }

    /// Reset the sample history of every attached filter.
    pub fn reset_filters(&mut self) {
        for node in self.slots.iter_mut().flatten() {
            if let Some(filter) = node.filter.as_mut() {
                filter.reset();
            }
        }
    }

    // ── Queries ──

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn node(&self, id: &str) -> Option<&PipelineNode> {
        let slot = self.slot_of(id)?;
        self.slots[slot.index()].as_ref()
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut PipelineNode> {
        let slot = self.slot_of(id)?;
        self.slot_mut(slot)
    }

    /// Nodes in storage order.
    pub fn nodes(&self) -> impl Iterator<Item = &PipelineNode> {
        self.slots.iter().flatten()
    }

    /// Node ids in storage order.
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.nodes().map(|n| n.id.clone()).collect()
    }

    /// `(source, target)` pairs, by source storage order then connection order.
    pub fn edges(&self) -> Vec<(NodeId, NodeId)> {
        self.nodes()
            .flat_map(|n| n.outputs.iter().map(move |o| (n.id.clone(), o.clone())))
            .collect()
    }

    fn occupied(&self) -> impl Iterator<Item = (SlotIndex, &PipelineNode)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|n| (SlotIndex(i as u32), n)))
    }

    fn slot_of(&self, id: &str) -> Option<SlotIndex> {
        self.index.get(id).copied()
    }

    fn slot_mut(&mut self, slot: SlotIndex) -> Option<&mut PipelineNode> {
        self.slots.get_mut(slot.index()).and_then(Option::as_mut)
    }
}

fn merge_into(output: &mut Vec<f64>, buffer: Vec<f64>) {
    if output.len() != buffer.len() {
        *output = buffer;
    } else {
        for (acc, value) in output.iter_mut().zip(buffer) {
            *acc += value;
        }
    }
}
