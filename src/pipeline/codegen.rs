//! Textual rebuild recipe for a graph.

use std::fmt::Write;

use crate::pipeline::graph::PipelineGraph;
use crate::pipeline::node::NodeKind;

/// Rust statements that rebuild `graph` through the public API: node
/// declarations with their parameters in storage order, then connections.
pub fn generate_code(graph: &PipelineGraph) -> String {
    let mut out = String::from("// Generated filter pipeline\n\n");

    for node in graph.nodes() {
        let id = node.id();
        let _ = writeln!(out, "// Node: {} ({})", id, node.kind());
        let _ = writeln!(out, "let mut {}_params = ParameterMap::new();", id);
        for (name, value) in node.parameters() {
            let _ = writeln!(
                out,
                "{}_params.insert(\"{}\".to_string(), {:?});",
                id, name, value
            );
        }
        let constructor = if node.has_filter() && node.kind() != NodeKind::PassThrough {
            "add_filter_node"
        } else {
            "add_node"
        };
        let suffix = if constructor == "add_filter_node" { "?" } else { "" };
        let _ = writeln!(
            out,
            "let {id} = graph.{constructor}(NodeKind::{kind:?}, {id}_params){suffix};",
            kind = node.kind()
        );
        out.push('\n');
    }

    out.push_str("// Connections\n");
    for (source, target) in graph.edges() {
        let _ = writeln!(out, "graph.connect_nodes(&{}, &{});", source, target);
    }
    out
}

impl PipelineGraph {
    /// See [`generate_code`].
    pub fn generate_code(&self) -> String {
        generate_code(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::ParameterMap;

    #[test]
    fn test_empty_graph() {
        let code = PipelineGraph::new().generate_code();
        assert_eq!(code, "// Generated filter pipeline\n\n// Connections\n");
    }

    #[test]
    fn test_nodes_and_connections_in_storage_order() {
        let mut graph = PipelineGraph::new();
        let input = graph.add_node(NodeKind::PassThrough, ParameterMap::new());
        let params: ParameterMap = [("cutoffFreq".to_string(), 10.0)].into_iter().collect();
        let lp = graph.add_filter_node(NodeKind::LowPass, params).unwrap();
        graph.connect_nodes(input.as_str(), lp.as_str());

        let code = graph.generate_code();
        let expected = "\
// Generated filter pipeline

// Node: node_0 (PassThrough)
let mut node_0_params = ParameterMap::new();
let node_0 = graph.add_node(NodeKind::PassThrough, node_0_params);

// Node: node_1 (LowPass)
let mut node_1_params = ParameterMap::new();
node_1_params.insert(\"cutoffFreq\".to_string(), 10.0);
let node_1 = graph.add_filter_node(NodeKind::LowPass, node_1_params)?;

// Connections
graph.connect_nodes(&node_0, &node_1);
";
        assert_eq!(code, expected);
    }

    #[test]
    fn test_filterless_typed_node_uses_add_node() {
        let mut graph = PipelineGraph::new();
        graph.add_node(NodeKind::Butterworth, ParameterMap::new());
        assert!(graph
            .generate_code()
            .contains("let node_0 = graph.add_node(NodeKind::Butterworth, node_0_params);"));
    }
}
