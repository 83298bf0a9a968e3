//! The in-memory node graph and its editing operations.
//!
//! [`Graph`] owns every node and edge on the canvas. Ownership flows
//! strictly downward (the graph owns nodes, nodes own their pins, and the
//! graph owns edges) while pins and edges refer to each other through ids,
//! so no back-reference can dangle once every mutation is routed through
//! the graph.
//!
//! The graph also carries the one piece of interactive state the editor
//! needs: the [`PendingConnection`] record tracking a click-to-click edge
//! in progress. Clicking a first pin arms it, clicking a second pin
//! completes (or rejects) it, and double-clicking empty canvas cancels it.

mod edge;
mod node;

pub use edge::Edge;
pub use node::{CanvasNode, EdgeId, NodeClass, NodeId, Pin, PinKind, PinRef};

use crate::error::ConnectError;

/// A connection the user has started but not finished.
///
/// `start` holds the first pin clicked; `end` is only ever set for the
/// duration of a completion attempt and is cleared again before control
/// returns to the caller. Explicit state rather than something ambient:
/// whoever needs to inspect or reset it goes through the graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PendingConnection {
    /// The pin the connection was started from, if one is armed.
    pub start: Option<PinRef>,
    /// The candidate finishing pin, set transiently while completing.
    pub end: Option<PinRef>,
}

impl PendingConnection {
    /// Clears both fields; the canonical way every completed or abandoned
    /// attempt ends.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// What a call to [`Graph::activate_pin`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinActivation {
    /// No connection was pending; this pin is now the pending start.
    Started,
    /// The pending start pin was clicked again; still pending, unchanged.
    StillPending,
    /// The pin pair is already linked; nothing was created and the pending
    /// state was reset. A benign outcome, not an error.
    DuplicateIgnored,
    /// The pending connection completed and produced this edge.
    Connected(EdgeId),
}

/// The owning container for all nodes and edges plus the pending-connection
/// state machine.
///
/// Node order is irrelevant for correctness but stable, and serialization
/// iterates it as-is. Fresh node and edge ids come from monotonic per-graph
/// counters; ids restored from a document are kept verbatim and the node
/// counter is bumped past them, so interactive creation after a load can
/// never collide.
#[derive(Debug, Clone, PartialEq)]
pub struct Graph {
    nodes: Vec<CanvasNode>,
    edges: Vec<Edge>,
    pending: PendingConnection,
    next_node_id: NodeId,
    next_edge_id: EdgeId,
}

impl Default for Graph {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            pending: PendingConnection::default(),
            next_node_id: 1,
            next_edge_id: 1,
        }
    }
}

impl Graph {
    /// Creates a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// All nodes, in insertion order.
    pub fn nodes(&self) -> &[CanvasNode] {
        &self.nodes
    }

    /// All edges, in creation order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Looks a node up by id.
    pub fn node(&self, id: NodeId) -> Option<&CanvasNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Mutable node lookup, for editing the label or code payload in place.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut CanvasNode> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    /// Looks an edge up by id.
    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id() == id)
    }

    /// The in-progress connection record, for the UI to draw a preview.
    pub fn pending(&self) -> &PendingConnection {
        &self.pending
    }

    /// Allocates a fresh node of the given class.
    ///
    /// The node is *not* added to the graph; callers decide when it joins
    /// via [`Graph::add_node`]. Interactive creation and bulk load differ
    /// only in that step.
    pub fn create_node(&mut self, class: NodeClass, position: (f32, f32)) -> CanvasNode {
        let id = self.next_node_id;
        self.next_node_id += 1;
        CanvasNode::new(id, class, position)
    }

    /// Adds a node to the graph, bumping the id counter past its id so
    /// later fresh ids stay unique even after restoring document ids.
    pub fn add_node(&mut self, node: CanvasNode) -> NodeId {
        self.next_node_id = self.next_node_id.max(node.id + 1);
        let id = node.id;
        self.nodes.push(node);
        id
    }

    /// Handles a user activating (clicking) a pin.
    ///
    /// First activation arms the pending connection; a second activation on
    /// a different pin tries to complete it. Completion checks, in order:
    /// an already-linked pin pair (benign, ignored), a self-connection, and
    /// incompatible pin kinds. It then normalizes direction so the edge runs
    /// output → input no matter which pin was clicked first.
    ///
    /// Every completion attempt, successful or not, resets the pending
    /// state before returning.
    pub fn activate_pin(&mut self, pin: PinRef) -> Result<PinActivation, ConnectError> {
        let Some(start) = self.pending.start else {
            self.pending.start = Some(pin);
            return Ok(PinActivation::Started);
        };
        if start == pin {
            return Ok(PinActivation::StillPending);
        }

        self.pending.end = Some(pin);
        let end = pin;

        if self.has_edge_between(start, end) {
            log::info!(
                "connection between {} pin of node {} and {} pin of node {} already exists",
                start.kind,
                start.node,
                end.kind,
                end.node
            );
            self.pending.reset();
            return Ok(PinActivation::DuplicateIgnored);
        }

        if start.node == end.node {
            self.pending.reset();
            return Err(ConnectError::SelfConnection);
        }

        // If the user started on an input and finished on an output, they
        // still mean the same connection; swap roles so the edge runs in
        // the canonical direction. Same-kind pairs have no valid direction.
        let (source, dest) = match (start.kind, end.kind) {
            (PinKind::Output, PinKind::Input) => (start, end),
            (PinKind::Input, PinKind::Output) => (end, start),
            (kind, _) => {
                self.pending.reset();
                return Err(ConnectError::SameKind(kind));
            }
        };

        let id = self.add_edge(source, dest);
        self.pending.reset();
        Ok(PinActivation::Connected(id))
    }

    /// Abandons a pending connection, if one is armed but not completing.
    ///
    /// Wired to double-clicking empty canvas; a no-op when nothing is
    /// pending.
    pub fn cancel_connection(&mut self) {
        if self.pending.start.is_some() && self.pending.end.is_none() {
            log::debug!("dropping pending connection");
            self.pending.start = None;
        }
    }

    /// True if any edge already links this unordered pin pair.
    fn has_edge_between(&self, a: PinRef, b: PinRef) -> bool {
        [a, b].iter().any(|pin| {
            self.node(pin.node).is_some_and(|node| {
                node.pin(pin.kind)
                    .edges()
                    .iter()
                    .any(|id| self.edge(*id).is_some_and(|e| e.connects(a, b)))
            })
        })
    }

    /// Constructs an edge between an output pin and an input pin, registers
    /// it with both pins and the graph, and computes its geometry.
    ///
    /// Callers guarantee direction has been normalized; the serializer uses
    /// this directly since documents store edges canonically.
    pub(crate) fn add_edge(&mut self, source: PinRef, dest: PinRef) -> EdgeId {
        debug_assert_eq!(source.kind, PinKind::Output);
        debug_assert_eq!(dest.kind, PinKind::Input);

        let id = self.next_edge_id;
        self.next_edge_id += 1;

        let mut edge = Edge::new(id, source, dest);
        if let (Some(s), Some(d)) = (self.node(source.node), self.node(dest.node)) {
            edge.adjust(s.pin_anchor(source.kind), d.pin_anchor(dest.kind));
        }

        if let Some(n) = self.node_mut(source.node) {
            n.pin_mut(source.kind).attach(id);
        }
        if let Some(n) = self.node_mut(dest.node) {
            n.pin_mut(dest.kind).attach(id);
        }
        self.edges.push(edge);
        log::debug!("edge {id} created: node {} -> node {}", source.node, dest.node);
        id
    }

    /// Deletes a node and every edge incident on either of its pins.
    ///
    /// Each cascade removal also detaches the edge from the pin on the
    /// surviving neighbor node. Deleting an id that is not present is a
    /// no-op, so UI-triggered deletes are idempotent.
    pub fn delete_node_and_edges(&mut self, node_id: NodeId) {
        let Some(node) = self.node(node_id) else {
            return;
        };
        let incident: Vec<EdgeId> = node
            .input_pin()
            .edges()
            .iter()
            .chain(node.output_pin().edges())
            .copied()
            .collect();
        for edge_id in incident {
            self.delete_edge(edge_id);
        }
        self.nodes.retain(|n| n.id != node_id);

        // A pending connection from a deleted node must not survive it.
        if self.pending.start.is_some_and(|p| p.node == node_id) {
            self.pending.reset();
        }
    }

    /// Deletes an edge, detaching it from both endpoint pins. No-op if the
    /// edge is already gone.
    pub fn delete_edge(&mut self, edge_id: EdgeId) {
        let Some(idx) = self.edges.iter().position(|e| e.id() == edge_id) else {
            return;
        };
        let edge = self.edges.remove(idx);
        for pin in [edge.source(), edge.dest()] {
            if let Some(n) = self.node_mut(pin.node) {
                n.pin_mut(pin.kind).detach(edge_id);
            }
        }
    }

    /// Moves a node and synchronously re-anchors every incident edge, so a
    /// repaint in the same event observes consistent coordinates.
    pub fn move_node(&mut self, node_id: NodeId, position: (f32, f32)) {
        match self.node_mut(node_id) {
            Some(node) => node.position = position,
            None => return,
        }
        self.adjust_node_edges(node_id);
    }

    /// Recomputes geometry for every edge incident on either of the node's
    /// pins.
    pub fn adjust_node_edges(&mut self, node_id: NodeId) {
        let Some(node) = self.node(node_id) else {
            return;
        };
        let incident: Vec<EdgeId> = node
            .input_pin()
            .edges()
            .iter()
            .chain(node.output_pin().edges())
            .copied()
            .collect();
        for edge_id in incident {
            self.adjust_edge(edge_id);
        }
    }

    fn adjust_edge(&mut self, edge_id: EdgeId) {
        let Some(idx) = self.edges.iter().position(|e| e.id() == edge_id) else {
            return;
        };
        let (source, dest) = (self.edges[idx].source(), self.edges[idx].dest());
        let (Some(s), Some(d)) = (self.node(source.node), self.node(dest.node)) else {
            return;
        };
        let anchors = (s.pin_anchor(source.kind), d.pin_anchor(dest.kind));
        self.edges[idx].adjust(anchors.0, anchors.1);
    }

    /// Empties both collections and resets all interactive state; used
    /// before a bulk load.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
