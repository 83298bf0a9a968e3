//! Serialization between a [`Graph`] and the persisted project document.
//!
//! The document is the only on-disk representation: a flat list of node
//! records followed by a flat list of edge records keyed by node id. Edges
//! are stored without pin information because direction is canonical: on
//! load, `source_node_id` always resolves to that node's output pin and
//! `dest_node_id` to the destination's input pin, regardless of how the
//! edge was originally drawn.
//!
//! Loading validates the whole document before touching the graph, so a
//! malformed or dangling-reference file leaves the in-memory state exactly
//! as it was.

use crate::error::DocumentError;
use crate::graph::{CanvasNode, Graph, NodeClass, NodeId, PinKind, PinRef};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One node in the persisted document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    /// Node id, unique within the document.
    pub id: NodeId,
    /// User-visible label.
    pub text: String,
    /// The node's code payload.
    pub code: String,
    /// Which node variant to reconstruct on load.
    pub class_name: NodeClass,
    /// World-space x coordinate of the node's top-left corner.
    pub x: f64,
    /// World-space y coordinate of the node's top-left corner.
    pub y: f64,
}

/// One edge in the persisted document, by endpoint node ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRecord {
    /// Id of the node whose output pin the edge leaves from.
    pub source_node_id: NodeId,
    /// Id of the node whose input pin the edge arrives at.
    pub dest_node_id: NodeId,
}

/// A complete persisted project: all nodes, then all edges.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Node records, in the graph's iteration order at save time.
    pub nodes: Vec<NodeRecord>,
    /// Edge records, in the graph's creation order at save time.
    pub edges: Vec<EdgeRecord>,
}

impl Document {
    /// Captures a graph's current state as a document.
    pub fn from_graph(graph: &Graph) -> Self {
        let nodes = graph
            .nodes()
            .iter()
            .map(|n| NodeRecord {
                id: n.id,
                text: n.text.clone(),
                code: n.code.clone(),
                class_name: n.class,
                x: f64::from(n.position.0),
                y: f64::from(n.position.1),
            })
            .collect();
        let edges = graph
            .edges()
            .iter()
            .map(|e| EdgeRecord {
                source_node_id: e.source().node,
                dest_node_id: e.dest().node,
            })
            .collect();
        Self { nodes, edges }
    }

    /// Serializes the document to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parses a document from JSON. Unknown `class_name` strings fail here.
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Checks referential integrity without mutating anything: node ids
    /// must be unique and every edge endpoint must name a node record.
    fn validate(&self) -> Result<(), DocumentError> {
        let mut ids = HashSet::new();
        for record in &self.nodes {
            if !ids.insert(record.id) {
                return Err(DocumentError::DuplicateNodeId(record.id));
            }
        }
        for record in &self.edges {
            for id in [record.source_node_id, record.dest_node_id] {
                if !ids.contains(&id) {
                    return Err(DocumentError::UnknownNodeId(id));
                }
            }
        }
        Ok(())
    }

    /// Rebuilds a graph from this document.
    ///
    /// Validation runs first; only then is the graph cleared and rebuilt,
    /// all nodes before any edge, so pin resolution can never miss. On any
    /// error the graph is left untouched.
    pub fn load_into(&self, graph: &mut Graph) -> Result<(), DocumentError> {
        self.validate()?;

        graph.clear();
        for record in &self.nodes {
            graph.add_node(CanvasNode::restored(
                record.id,
                record.class_name,
                record.text.clone(),
                record.code.clone(),
                (record.x as f32, record.y as f32),
            ));
        }
        for record in &self.edges {
            let source = PinRef::new(record.source_node_id, PinKind::Output);
            let dest = PinRef::new(record.dest_node_id, PinKind::Input);
            graph.add_edge(source, dest);
        }

        log::info!(
            "project loaded: {} nodes, {} edges",
            self.nodes.len(),
            self.edges.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::PinActivation;
    use serde_json::json;

    fn connect(graph: &mut Graph, source: NodeId, dest: NodeId) {
        graph
            .activate_pin(PinRef::new(source, PinKind::Output))
            .unwrap();
        let outcome = graph
            .activate_pin(PinRef::new(dest, PinKind::Input))
            .unwrap();
        assert!(matches!(outcome, PinActivation::Connected(_)));
    }

    fn sample_graph() -> Graph {
        let mut graph = Graph::new();
        let mut a = graph.create_node(NodeClass::Code, (0.0, 0.0));
        a.text = "first".to_string();
        a.code = "print('hello')".to_string();
        let mut b = graph.create_node(NodeClass::Diff, (400.0, 120.0));
        b.text = "second".to_string();
        let c = graph.create_node(NodeClass::Code, (-80.0, 300.0));
        let (a, b, c) = (graph.add_node(a), graph.add_node(b), graph.add_node(c));
        connect(&mut graph, a, b);
        connect(&mut graph, b, c);
        graph
    }

    #[test]
    fn round_trip_preserves_topology_and_layout() {
        let original = sample_graph();
        let json = Document::from_graph(&original).to_json().unwrap();

        let mut restored = Graph::new();
        Document::from_json(&json)
            .unwrap()
            .load_into(&mut restored)
            .unwrap();

        assert_eq!(restored.nodes().len(), original.nodes().len());
        for node in original.nodes() {
            let twin = restored.node(node.id).expect("node id should survive");
            assert_eq!(twin.position, node.position);
            assert_eq!(twin.text, node.text);
            assert_eq!(twin.code, node.code);
            assert_eq!(twin.class, node.class);
        }

        let pairs = |g: &Graph| -> Vec<(NodeId, NodeId)> {
            g.edges()
                .iter()
                .map(|e| (e.source().node, e.dest().node))
                .collect()
        };
        assert_eq!(pairs(&restored), pairs(&original));
    }

    #[test]
    fn saved_document_matches_the_published_schema() {
        let mut graph = Graph::new();
        let a = graph.create_node(NodeClass::Code, (0.0, 0.0));
        let b = graph.create_node(NodeClass::Code, (400.0, 0.0));
        let (a, b) = (graph.add_node(a), graph.add_node(b));
        connect(&mut graph, a, b);

        let value: serde_json::Value =
            serde_json::from_str(&Document::from_graph(&graph).to_json().unwrap()).unwrap();

        assert_eq!(
            value,
            json!({
                "nodes": [
                    { "id": 1, "text": "", "code": "", "class_name": "CodeNode",
                      "x": 0.0, "y": 0.0 },
                    { "id": 2, "text": "", "code": "", "class_name": "CodeNode",
                      "x": 400.0, "y": 0.0 }
                ],
                "edges": [
                    { "source_node_id": 1, "dest_node_id": 2 }
                ]
            })
        );

        // And the document reloads into identical topology
        let mut reloaded = Graph::new();
        Document::from_graph(&graph)
            .load_into(&mut reloaded)
            .unwrap();
        assert_eq!(reloaded.nodes().len(), 2);
        assert_eq!(reloaded.edges().len(), 1);
        assert_eq!(reloaded.edges()[0].source().node, a);
        assert_eq!(reloaded.edges()[0].dest().node, b);
    }

    #[test]
    fn loaded_edges_are_canonical_with_live_geometry() {
        let doc = Document {
            nodes: vec![
                NodeRecord {
                    id: 10,
                    text: String::new(),
                    code: String::new(),
                    class_name: NodeClass::Code,
                    x: 0.0,
                    y: 0.0,
                },
                NodeRecord {
                    id: 20,
                    text: String::new(),
                    code: String::new(),
                    class_name: NodeClass::Code,
                    x: 400.0,
                    y: 0.0,
                },
            ],
            edges: vec![EdgeRecord {
                source_node_id: 10,
                dest_node_id: 20,
            }],
        };

        let mut graph = Graph::new();
        doc.load_into(&mut graph).unwrap();

        let edge = &graph.edges()[0];
        assert_eq!(edge.source().kind, PinKind::Output);
        assert_eq!(edge.dest().kind, PinKind::Input);
        // Geometry is computed at reconstruction, not deferred to a repaint
        assert_ne!(edge.source_point(), edge.dest_point());
        // Both pins know about the edge
        assert_eq!(graph.node(10).unwrap().output_pin().edges().len(), 1);
        assert_eq!(graph.node(20).unwrap().input_pin().edges().len(), 1);
    }

    #[test]
    fn creating_nodes_after_a_load_does_not_reuse_ids() {
        let mut graph = Graph::new();
        sample_document_with_ids(&[7, 99, 12])
            .load_into(&mut graph)
            .unwrap();

        let fresh = graph.create_node(NodeClass::Code, (0.0, 0.0));
        assert_eq!(fresh.id, 100);
    }

    #[test]
    fn dangling_edge_reference_fails_without_clobbering_the_graph() {
        let mut graph = sample_graph();
        let nodes_before = graph.nodes().len();
        let edges_before = graph.edges().len();

        let mut doc = sample_document_with_ids(&[1]);
        doc.edges.push(EdgeRecord {
            source_node_id: 1,
            dest_node_id: 99,
        });

        let err = doc.load_into(&mut graph).unwrap_err();
        assert!(matches!(err, DocumentError::UnknownNodeId(99)));
        assert_eq!(graph.nodes().len(), nodes_before);
        assert_eq!(graph.edges().len(), edges_before);
    }

    #[test]
    fn duplicate_node_ids_fail_the_load() {
        let mut graph = sample_graph();
        let nodes_before = graph.nodes().len();

        let err = sample_document_with_ids(&[5, 5])
            .load_into(&mut graph)
            .unwrap_err();

        assert!(matches!(err, DocumentError::DuplicateNodeId(5)));
        assert_eq!(graph.nodes().len(), nodes_before);
    }

    #[test]
    fn malformed_documents_fail_to_parse() {
        assert!(matches!(
            Document::from_json("{ not json").unwrap_err(),
            DocumentError::Parse(_)
        ));
        // Structurally valid JSON with an unknown node variant
        let json = r#"{"nodes":[{"id":1,"text":"","code":"","class_name":"MysteryNode","x":0.0,"y":0.0}],"edges":[]}"#;
        assert!(matches!(
            Document::from_json(json).unwrap_err(),
            DocumentError::Parse(_)
        ));
    }

    #[test]
    fn loading_replaces_previous_content_entirely() {
        let mut graph = sample_graph();
        sample_document_with_ids(&[42]).load_into(&mut graph).unwrap();

        assert_eq!(graph.nodes().len(), 1);
        assert!(graph.edges().is_empty());
        assert!(graph.node(42).is_some());
    }

    fn sample_document_with_ids(ids: &[NodeId]) -> Document {
        Document {
            nodes: ids
                .iter()
                .map(|id| NodeRecord {
                    id: *id,
                    text: String::new(),
                    code: String::new(),
                    class_name: NodeClass::Code,
                    x: 0.0,
                    y: 0.0,
                })
                .collect(),
            edges: Vec::new(),
        }
    }
}
