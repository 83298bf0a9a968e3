//! Directed edges between pins, with derived endpoint geometry.

use super::node::{EdgeId, PinRef};
use crate::constants::{EDGE_ENDPOINT_INSET, EDGE_MIN_LENGTH};

/// A directed connection from an output pin to an input pin.
///
/// The direction invariant (`source.kind == Output`, `dest.kind == Input`)
/// is established by the graph's normalization rule before construction and
/// never changes afterwards. The two endpoint points are derived geometry,
/// recomputed through [`Edge::adjust`] whenever either endpoint node moves.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    id: EdgeId,
    source: PinRef,
    dest: PinRef,
    source_point: (f32, f32),
    dest_point: (f32, f32),
}

impl Edge {
    /// Creates an edge between two pins with zeroed geometry; callers run
    /// [`Edge::adjust`] immediately after construction.
    pub(crate) fn new(id: EdgeId, source: PinRef, dest: PinRef) -> Self {
        Self {
            id,
            source,
            dest,
            source_point: (0.0, 0.0),
            dest_point: (0.0, 0.0),
        }
    }

    /// Unique id within the owning graph.
    pub fn id(&self) -> EdgeId {
        self.id
    }

    /// The output pin this edge originates from.
    pub fn source(&self) -> PinRef {
        self.source
    }

    /// The input pin this edge terminates at.
    pub fn dest(&self) -> PinRef {
        self.dest
    }

    /// True if this edge runs between the same unordered pair of pins.
    ///
    /// Two edges over the same pin pair count as the same connection no
    /// matter which way around the pins are given.
    pub fn connects(&self, a: PinRef, b: PinRef) -> bool {
        (self.source == a && self.dest == b) || (self.source == b && self.dest == a)
    }

    /// Recomputes the two visible endpoints from the current pin anchors.
    ///
    /// The endpoints are pulled [`EDGE_ENDPOINT_INSET`] world units inward
    /// along the source→dest line so the drawn edge meets node borders
    /// rather than pin centers. Anchors closer than [`EDGE_MIN_LENGTH`]
    /// collapse both endpoints onto the source anchor; the edge is still
    /// valid, just not visibly separated.
    pub fn adjust(&mut self, source_anchor: (f32, f32), dest_anchor: (f32, f32)) {
        let dx = dest_anchor.0 - source_anchor.0;
        let dy = dest_anchor.1 - source_anchor.1;
        let length = (dx * dx + dy * dy).sqrt();

        if length > EDGE_MIN_LENGTH {
            let offset_x = dx * EDGE_ENDPOINT_INSET / length;
            let offset_y = dy * EDGE_ENDPOINT_INSET / length;
            self.source_point = (source_anchor.0 + offset_x, source_anchor.1 + offset_y);
            self.dest_point = (dest_anchor.0 - offset_x, dest_anchor.1 - offset_y);
        } else {
            self.source_point = source_anchor;
            self.dest_point = source_anchor;
        }
    }

    /// Visible start of the edge, in world units.
    pub fn source_point(&self) -> (f32, f32) {
        self.source_point
    }

    /// Visible end of the edge, in world units.
    pub fn dest_point(&self) -> (f32, f32) {
        self.dest_point
    }

    /// Direction angle of the edge in radians, measured with the y axis
    /// flipped so positive angles turn counter-clockwise on screen. The
    /// rendering layer derives both arrowheads from this.
    pub fn angle(&self) -> f32 {
        let dx = self.dest_point.0 - self.source_point.0;
        let dy = self.dest_point.1 - self.source_point.1;
        (-dy).atan2(dx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::PinKind;

    fn test_edge() -> Edge {
        Edge::new(
            1,
            PinRef::new(1, PinKind::Output),
            PinRef::new(2, PinKind::Input),
        )
    }

    #[test]
    fn adjust_insets_both_endpoints_along_the_line() {
        let mut edge = test_edge();
        edge.adjust((0.0, 0.0), (100.0, 0.0));

        assert_eq!(edge.source_point(), (10.0, 0.0));
        assert_eq!(edge.dest_point(), (90.0, 0.0));
    }

    #[test]
    fn adjust_insets_scale_with_direction() {
        let mut edge = test_edge();
        // 3-4-5 triangle scaled to length 50: unit vector (0.6, 0.8)
        edge.adjust((0.0, 0.0), (30.0, 40.0));

        let (sx, sy) = edge.source_point();
        let (dx, dy) = edge.dest_point();
        assert!((sx - 6.0).abs() < 1e-5 && (sy - 8.0).abs() < 1e-5);
        assert!((dx - 24.0).abs() < 1e-5 && (dy - 32.0).abs() < 1e-5);
    }

    #[test]
    fn short_edges_collapse_onto_the_source_anchor() {
        let mut edge = test_edge();
        edge.adjust((5.0, 5.0), (20.0, 5.0)); // length 15 <= 20

        assert_eq!(edge.source_point(), (5.0, 5.0));
        assert_eq!(edge.dest_point(), (5.0, 5.0));

        // Exactly at the threshold still collapses
        edge.adjust((0.0, 0.0), (20.0, 0.0));
        assert_eq!(edge.source_point(), edge.dest_point());
    }

    #[test]
    fn endpoints_stay_strictly_between_the_anchors() {
        let mut edge = test_edge();
        edge.adjust((0.0, 0.0), (0.0, 80.0));

        let (_, sy) = edge.source_point();
        let (_, dy) = edge.dest_point();
        assert!(sy > 0.0 && sy < 80.0);
        assert!(dy > 0.0 && dy < 80.0);
        assert!(sy < dy);
    }

    #[test]
    fn angle_flips_the_y_axis() {
        let mut edge = test_edge();

        edge.adjust((0.0, 0.0), (100.0, 0.0));
        assert!((edge.angle() - 0.0).abs() < 1e-6);

        // Downward on screen (positive y) is a negative angle
        edge.adjust((0.0, 0.0), (0.0, 100.0));
        assert!((edge.angle() + std::f32::consts::FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn connects_ignores_pin_order() {
        let a = PinRef::new(1, PinKind::Output);
        let b = PinRef::new(2, PinKind::Input);
        let edge = Edge::new(9, a, b);

        assert!(edge.connects(a, b));
        assert!(edge.connects(b, a));
        assert!(!edge.connects(a, PinRef::new(3, PinKind::Input)));
    }
}
