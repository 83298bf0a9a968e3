//! Canvas rendering for nodes, pins, edges, and the grid.
//!
//! All drawing reads the graph's derived geometry; nothing here recomputes
//! it. Edge endpoints and the direction angle come straight from the graph
//! model, and the arrowheads at both ends are derived from that angle with
//! a fixed size and spread.

use super::state::NodeCanvasApp;
use crate::constants::{
    ARROW_SIZE, ARROW_SPREAD, GRID_SIZE, NODE_HEIGHT, NODE_TITLE_HEIGHT, NODE_WIDTH, PIN_RADIUS,
};
use crate::graph::{Edge, NodeId, PinKind};
use eframe::egui;
use eframe::epaint::StrokeKind;

impl NodeCanvasApp {
    /// Renders all canvas elements in layers: grid, edges, the pending
    /// connection preview, then nodes with their pins on top.
    pub fn render_canvas_contents(
        &mut self,
        ui: &mut egui::Ui,
        painter: &egui::Painter,
        canvas_rect: egui::Rect,
    ) {
        if self.canvas.show_grid {
            self.draw_grid(painter, canvas_rect);
        }

        for edge in self.graph.edges() {
            let selected = self.interaction.selected_edge == Some(edge.id());
            self.draw_edge(painter, edge, selected);
        }

        self.draw_pending_preview(ui, painter);

        let node_ids: Vec<NodeId> = self.graph.nodes().iter().map(|n| n.id).collect();
        for id in node_ids {
            self.draw_node(ui, painter, id);
        }
    }

    /// Draws vertical and horizontal grid lines spaced one world cell
    /// apart, aligned with the current pan offset.
    fn draw_grid(&self, painter: &egui::Painter, rect: egui::Rect) {
        let spacing = GRID_SIZE * self.canvas.zoom_factor;
        if spacing < 4.0 {
            // Zoomed out far enough that the grid would be noise
            return;
        }
        let color = if self.dark_mode {
            egui::Color32::from_gray(55)
        } else {
            egui::Color32::from_gray(210)
        };
        let stroke = egui::Stroke::new(1.0, color);

        let mut x = rect.left() + (self.canvas.offset.x - rect.left()).rem_euclid(spacing);
        while x < rect.right() {
            painter.line_segment(
                [egui::pos2(x, rect.top()), egui::pos2(x, rect.bottom())],
                stroke,
            );
            x += spacing;
        }
        let mut y = rect.top() + (self.canvas.offset.y - rect.top()).rem_euclid(spacing);
        while y < rect.bottom() {
            painter.line_segment(
                [egui::pos2(rect.left(), y), egui::pos2(rect.right(), y)],
                stroke,
            );
            y += spacing;
        }
    }

    /// Draws one edge: the line between its adjusted endpoints plus a
    /// filled arrowhead at each end.
    fn draw_edge(&self, painter: &egui::Painter, edge: &Edge, selected: bool) {
        let (sx, sy) = edge.source_point();
        let (dx, dy) = edge.dest_point();
        if (sx, sy) == (dx, dy) {
            // Collapsed edge; nothing visible to draw
            return;
        }

        let color = if selected {
            egui::Color32::from_rgb(100, 150, 255)
        } else if self.dark_mode {
            egui::Color32::from_gray(200)
        } else {
            egui::Color32::BLACK
        };
        let stroke_width = if selected { 2.5 } else { 1.5 };

        let source = self.world_to_screen(egui::pos2(sx, sy));
        let dest = self.world_to_screen(egui::pos2(dx, dy));
        painter.line_segment([source, dest], egui::Stroke::new(stroke_width, color));

        let angle = edge.angle();
        self.draw_arrowhead(painter, (sx, sy), angle, ArrowEnd::Source, color);
        self.draw_arrowhead(painter, (dx, dy), angle, ArrowEnd::Dest, color);
    }

    /// Draws a filled triangular arrowhead at one endpoint, its wings
    /// spread around the edge's direction angle.
    fn draw_arrowhead(
        &self,
        painter: &egui::Painter,
        tip: (f32, f32),
        angle: f32,
        end: ArrowEnd,
        color: egui::Color32,
    ) {
        use std::f32::consts::PI;

        let (wing_a, wing_b) = match end {
            ArrowEnd::Source => (angle + ARROW_SPREAD, angle + PI - ARROW_SPREAD),
            ArrowEnd::Dest => (angle - ARROW_SPREAD, angle - PI + ARROW_SPREAD),
        };
        let wing_point = |wing: f32| {
            egui::pos2(
                tip.0 + wing.sin() * ARROW_SIZE,
                tip.1 + wing.cos() * ARROW_SIZE,
            )
        };

        let points = vec![
            self.world_to_screen(egui::pos2(tip.0, tip.1)),
            self.world_to_screen(wing_point(wing_a)),
            self.world_to_screen(wing_point(wing_b)),
        ];
        painter.add(egui::Shape::convex_polygon(
            points,
            color,
            egui::Stroke::NONE,
        ));
    }

    /// Draws a preview line from the armed pin to the cursor while a
    /// connection is pending.
    fn draw_pending_preview(&self, ui: &egui::Ui, painter: &egui::Painter) {
        let Some(start) = self.graph.pending().start else {
            return;
        };
        let Some(node) = self.graph.node(start.node) else {
            return;
        };
        let Some(pointer) = ui.input(|i| i.pointer.hover_pos()) else {
            return;
        };

        let (ax, ay) = node.pin_anchor(start.kind);
        let from = self.world_to_screen(egui::pos2(ax, ay));
        painter.line_segment(
            [from, pointer],
            egui::Stroke::new(1.5, egui::Color32::from_rgb(255, 180, 60)),
        );
    }

    /// Draws one node: body, title strip, embedded code editor, and both
    /// pins.
    fn draw_node(&mut self, ui: &mut egui::Ui, painter: &egui::Painter, node_id: NodeId) {
        let Some(node) = self.graph.node(node_id) else {
            return;
        };
        let zoom = self.canvas.zoom_factor;
        let selected = self.interaction.selected_node == Some(node_id);
        let title = if node.text.is_empty() {
            node.class.label().to_string()
        } else {
            node.text.clone()
        };
        let pending_start = self.graph.pending().start;
        let anchors = [
            (node.pin_ref(PinKind::Input), node.pin_anchor(PinKind::Input)),
            (
                node.pin_ref(PinKind::Output),
                node.pin_anchor(PinKind::Output),
            ),
        ];

        let min = self.world_to_screen(egui::pos2(node.position.0, node.position.1));
        let rect = egui::Rect::from_min_size(min, egui::vec2(NODE_WIDTH * zoom, NODE_HEIGHT * zoom));

        let fill = if self.dark_mode {
            egui::Color32::from_gray(45)
        } else {
            egui::Color32::from_rgb(200, 200, 200)
        };
        let stroke = if selected {
            egui::Stroke::new(2.0, egui::Color32::from_rgb(100, 150, 255))
        } else {
            egui::Stroke::new(1.0, egui::Color32::from_gray(120))
        };
        painter.rect_filled(rect, 4.0, fill);
        painter.rect_stroke(rect, 4.0, stroke, StrokeKind::Inside);

        // Title strip
        let title_height = NODE_TITLE_HEIGHT * zoom;
        let text_color = if self.dark_mode {
            egui::Color32::from_gray(230)
        } else {
            egui::Color32::from_gray(20)
        };
        painter.text(
            egui::pos2(rect.center().x, rect.top() + title_height / 2.0),
            egui::Align2::CENTER_CENTER,
            title,
            egui::FontId::proportional((12.0 * zoom).clamp(8.0, 24.0)),
            text_color,
        );

        // Embedded code editor fills the rest of the node. Skipped when
        // zoomed out too far to be editable anyway.
        if zoom >= 0.5 {
            let editor_rect = egui::Rect::from_min_max(
                egui::pos2(rect.left() + 4.0, rect.top() + title_height),
                egui::pos2(rect.right() - 4.0, rect.bottom() - 4.0),
            );
            if let Some(node) = self.graph.node_mut(node_id) {
                let editor = egui::TextEdit::multiline(&mut node.code)
                    .code_editor()
                    .font(egui::FontId::monospace((11.0 * zoom).clamp(6.0, 22.0)))
                    .frame(false);
                if ui.put(editor_rect, editor).changed() {
                    self.file.has_unsaved_changes = true;
                }
            }
        }

        // Pins, drawn over everything else
        for (pin_ref, (ax, ay)) in anchors {
            let center = self.world_to_screen(egui::pos2(ax, ay));
            let radius = PIN_RADIUS * zoom;
            painter.circle_filled(center, radius, egui::Color32::from_rgb(200, 60, 60));
            if pending_start == Some(pin_ref) {
                painter.circle_stroke(
                    center,
                    radius + 2.0,
                    egui::Stroke::new(2.0, egui::Color32::from_rgb(255, 180, 60)),
                );
            }
        }
    }
}

/// Which end of an edge an arrowhead decorates.
#[derive(Clone, Copy)]
enum ArrowEnd {
    Source,
    Dest,
}
