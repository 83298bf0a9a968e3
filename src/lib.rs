//! # Node Canvas
//!
//! A visual node-graph code editor. Nodes wrap an embedded code editor and
//! carry one input and one output pin; clicking pin-to-pin wires nodes
//! together with directed edges, and the whole graph round-trips through a
//! JSON project document.
//!
//! ## Features
//! - Click-to-start / click-to-finish edge creation with automatic
//!   direction normalization and duplicate rejection
//! - Edges that stay anchored to nodes as they are dragged around
//! - Drag-and-drop object library for placing new nodes
//! - Canvas panning and zooming
//! - JSON save/load with validation before the open project is replaced

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod constants;
mod document;
mod error;
mod graph;
mod ui;

// Re-export public types
pub use document::{Document, EdgeRecord, NodeRecord};
pub use error::{ConnectError, DocumentError};
pub use graph::{
    CanvasNode, Edge, EdgeId, Graph, NodeClass, NodeId, PendingConnection, Pin, PinActivation,
    PinKind, PinRef,
};
use ui::NodeCanvasApp;

/// Runs the node canvas application with default settings.
///
/// This function initializes the egui application window and starts the
/// main event loop.
///
/// # Returns
///
/// Returns `Ok(())` if the application runs successfully, or an
/// `eframe::Error` if initialization fails.
///
/// # Example
///
/// ```no_run
/// use node_canvas::run_app;
///
/// fn main() -> Result<(), eframe::Error> {
///     run_app()
/// }
/// ```
pub fn run_app() -> Result<(), eframe::Error> {
    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "Node Canvas",
        options,
        Box::new(|cc| Ok(Box::new(NodeCanvasApp::new(cc)))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graph_default_is_empty() {
        let graph = Graph::default();
        assert!(graph.nodes().is_empty());
        assert!(graph.edges().is_empty());
        assert_eq!(graph.pending().start, None);
    }

    #[test]
    fn empty_graph_round_trips_through_a_document() {
        let graph = Graph::new();
        let json = Document::from_graph(&graph).to_json().unwrap();

        let mut restored = Graph::new();
        Document::from_json(&json)
            .unwrap()
            .load_into(&mut restored)
            .unwrap();

        assert!(restored.nodes().is_empty());
        assert!(restored.edges().is_empty());
    }
}
