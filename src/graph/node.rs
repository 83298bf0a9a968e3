//! Nodes and their connection pins.
//!
//! A [`CanvasNode`] is a movable container on the canvas holding a label, a
//! code payload, and exactly two [`Pin`]s: one input on its left border,
//! one output on its right. Pins are created with the node and live exactly
//! as long as it does; edges attach to pins, never to nodes directly.

use crate::constants::{NODE_HEIGHT, NODE_WIDTH, PIN_INSET};
use serde::{Deserialize, Serialize};

/// Unique identifier for canvas nodes within a graph.
pub type NodeId = u64;

/// Unique identifier for edges within a graph.
pub type EdgeId = u64;

/// The closed set of node variants the editor can place.
///
/// The serde renames double as the `class_name` strings in persisted
/// documents, so adding a variant here is all that is needed to make it
/// loadable. Unknown strings fail deserialization, which surfaces as a
/// document parse error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeClass {
    /// A general-purpose node wrapping a code editor.
    #[serde(rename = "CodeNode")]
    Code,
    /// A node intended for side-by-side comparison experiments.
    #[serde(rename = "DiffNode")]
    Diff,
}

impl NodeClass {
    /// Every placeable variant, in the order the object library lists them.
    pub const ALL: [NodeClass; 2] = [NodeClass::Code, NodeClass::Diff];

    /// Human-friendly name shown in the object library and node titles.
    pub fn label(self) -> &'static str {
        match self {
            NodeClass::Code => "Code Node",
            NodeClass::Diff => "Diff Node",
        }
    }
}

/// Whether a pin receives or emits connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PinKind {
    /// Left-border pin; edges terminate here.
    Input,
    /// Right-border pin; edges originate here.
    Output,
}

impl std::fmt::Display for PinKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PinKind::Input => write!(f, "input"),
            PinKind::Output => write!(f, "output"),
        }
    }
}

/// Non-owning address of a pin: the owning node plus which of its two pins.
///
/// Everything that relates pins to edges traffics in `PinRef`s; ownership
/// of the actual [`Pin`] stays with the node, and ownership of the node
/// stays with the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PinRef {
    /// Id of the node the pin belongs to.
    pub node: NodeId,
    /// Which of the node's pins is meant.
    pub kind: PinKind,
}

impl PinRef {
    /// Convenience constructor.
    pub fn new(node: NodeId, kind: PinKind) -> Self {
        Self { node, kind }
    }
}

/// An attachment point on a node where edges terminate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pin {
    kind: PinKind,
    /// Edges incident on this pin. Order is irrelevant.
    edges: Vec<EdgeId>,
}

impl Pin {
    fn new(kind: PinKind) -> Self {
        Self {
            kind,
            edges: Vec::new(),
        }
    }

    /// This pin's kind.
    pub fn kind(&self) -> PinKind {
        self.kind
    }

    /// Ids of all edges incident on this pin.
    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }

    /// Registers an edge with this pin. Attaching the same edge twice is a
    /// no-op.
    pub(crate) fn attach(&mut self, edge: EdgeId) {
        if !self.edges.contains(&edge) {
            self.edges.push(edge);
        }
    }

    /// Removes an edge from this pin's incident list, if present.
    pub(crate) fn detach(&mut self, edge: EdgeId) {
        self.edges.retain(|e| *e != edge);
    }
}

/// A single node on the canvas.
///
/// Position is the top-left corner of the node rectangle in world units.
/// Mutating `position` directly does not re-anchor incident edges; the
/// graph's `move_node` does, and is what interactive dragging goes through.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasNode {
    /// Unique id within the owning graph.
    pub id: NodeId,
    /// Which variant this node is.
    pub class: NodeClass,
    /// User-visible label. May be empty, in which case the UI falls back to
    /// the class label.
    pub text: String,
    /// The code payload shown in the node's embedded editor.
    pub code: String,
    /// Top-left corner of the node rectangle, in world units.
    pub position: (f32, f32),
    input_pin: Pin,
    output_pin: Pin,
}

impl CanvasNode {
    /// Creates a node with explicit contents, typically restored from a
    /// document. Both pins are created here and never replaced.
    pub fn restored(
        id: NodeId,
        class: NodeClass,
        text: String,
        code: String,
        position: (f32, f32),
    ) -> Self {
        Self {
            id,
            class,
            text,
            code,
            position,
            input_pin: Pin::new(PinKind::Input),
            output_pin: Pin::new(PinKind::Output),
        }
    }

    /// Creates an empty node of the given class at a position.
    ///
    /// Fresh ids come from the graph's counter; use
    /// [`crate::graph::Graph::create_node`] rather than calling this with
    /// an arbitrary id.
    pub fn new(id: NodeId, class: NodeClass, position: (f32, f32)) -> Self {
        Self::restored(id, class, String::new(), String::new(), position)
    }

    /// Borrows one of the node's two pins.
    pub fn pin(&self, kind: PinKind) -> &Pin {
        match kind {
            PinKind::Input => &self.input_pin,
            PinKind::Output => &self.output_pin,
        }
    }

    pub(crate) fn pin_mut(&mut self, kind: PinKind) -> &mut Pin {
        match kind {
            PinKind::Input => &mut self.input_pin,
            PinKind::Output => &mut self.output_pin,
        }
    }

    /// The input pin on the node's left border.
    pub fn input_pin(&self) -> &Pin {
        &self.input_pin
    }

    /// The output pin on the node's right border.
    pub fn output_pin(&self) -> &Pin {
        &self.output_pin
    }

    /// World-space anchor point of a pin.
    ///
    /// The input pin sits just outside the left border, the output pin on
    /// the right border, both vertically centered. Edge geometry and pin
    /// hit-testing both use these anchors.
    pub fn pin_anchor(&self, kind: PinKind) -> (f32, f32) {
        let (x, y) = self.position;
        let mid_y = y + NODE_HEIGHT / 2.0;
        match kind {
            PinKind::Input => (x - PIN_INSET, mid_y),
            PinKind::Output => (x + NODE_WIDTH, mid_y),
        }
    }

    /// `PinRef` addressing one of this node's pins.
    pub fn pin_ref(&self, kind: PinKind) -> PinRef {
        PinRef::new(self.id, kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_is_created_with_one_pin_of_each_kind() {
        let node = CanvasNode::new(7, NodeClass::Code, (10.0, 20.0));

        assert_eq!(node.input_pin().kind(), PinKind::Input);
        assert_eq!(node.output_pin().kind(), PinKind::Output);
        assert!(node.input_pin().edges().is_empty());
        assert!(node.output_pin().edges().is_empty());
    }

    #[test]
    fn pin_anchors_sit_on_opposite_borders() {
        let node = CanvasNode::new(1, NodeClass::Code, (100.0, 200.0));

        let (ix, iy) = node.pin_anchor(PinKind::Input);
        let (ox, oy) = node.pin_anchor(PinKind::Output);

        assert_eq!(ix, 100.0 - PIN_INSET);
        assert_eq!(ox, 100.0 + NODE_WIDTH);
        // Both vertically centered
        assert_eq!(iy, 200.0 + NODE_HEIGHT / 2.0);
        assert_eq!(iy, oy);
    }

    #[test]
    fn attach_is_idempotent_per_edge() {
        let mut node = CanvasNode::new(1, NodeClass::Code, (0.0, 0.0));
        node.pin_mut(PinKind::Input).attach(42);
        node.pin_mut(PinKind::Input).attach(42);

        assert_eq!(node.input_pin().edges(), &[42]);

        node.pin_mut(PinKind::Input).detach(42);
        assert!(node.input_pin().edges().is_empty());
    }

    #[test]
    fn class_names_round_trip_through_serde() {
        let json = serde_json::to_string(&NodeClass::Diff).unwrap();
        assert_eq!(json, "\"DiffNode\"");
        let back: NodeClass = serde_json::from_str(&json).unwrap();
        assert_eq!(back, NodeClass::Diff);

        assert!(serde_json::from_str::<NodeClass>("\"MysteryNode\"").is_err());
    }
}
