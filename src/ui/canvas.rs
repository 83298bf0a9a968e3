//! Canvas interaction and navigation functionality.
//!
//! This module handles canvas panning, zooming, node dragging, pin clicks,
//! hit-testing, and coordinate transformations between screen and world
//! space. Everything that mutates the graph goes through the graph's own
//! operations so invariants (edge anchoring, pending-connection resets)
//! hold no matter which gesture triggered the change.

use super::state::{ContextTarget, NodeCanvasApp};
use crate::constants::{CLICK_THRESHOLD, NODE_HEIGHT, NODE_WIDTH, PIN_HIT_RADIUS};
use crate::graph::{EdgeId, NodeClass, NodeId, PinKind, PinRef};
use eframe::egui;

impl NodeCanvasApp {
    /// Converts screen coordinates to world coordinates accounting for
    /// zoom and pan.
    pub fn screen_to_world(&self, screen_pos: egui::Pos2) -> egui::Pos2 {
        (screen_pos - self.canvas.offset) / self.canvas.zoom_factor
    }

    /// Converts world coordinates to screen coordinates accounting for
    /// zoom and pan.
    pub fn world_to_screen(&self, world_pos: egui::Pos2) -> egui::Pos2 {
        world_pos * self.canvas.zoom_factor + self.canvas.offset
    }

    /// Draws the canvas area and drives all pointer interaction on it.
    pub fn draw_canvas(&mut self, ui: &mut egui::Ui) {
        let (response, painter) =
            ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());

        // Center the world origin on the first frame
        if !self.canvas.initialized {
            self.canvas.offset = response.rect.center().to_vec2();
            self.canvas.initialized = true;
        }

        self.handle_canvas_panning(ui, &response);
        self.handle_canvas_zoom(ui, &response);
        self.handle_palette_drop(&response);
        self.handle_pointer(&response);

        self.render_canvas_contents(ui, &painter, response.rect);

        if self.context_menu.show {
            self.draw_context_menu(ui);
        }
    }

    /// Handles middle-click or Cmd/Ctrl+left-click canvas panning.
    fn handle_canvas_panning(&mut self, ui: &mut egui::Ui, response: &egui::Response) {
        let should_pan = ui.input(|i| {
            i.pointer.middle_down() || (i.pointer.primary_down() && i.modifiers.command)
        });

        if should_pan {
            if let Some(current_pos) = response.interact_pointer_pos() {
                if !self.interaction.is_panning {
                    self.interaction.is_panning = true;
                    self.interaction.last_pan_pos = Some(current_pos);
                } else if let Some(last_pos) = self.interaction.last_pan_pos {
                    self.canvas.offset += current_pos - last_pos;
                    self.interaction.last_pan_pos = Some(current_pos);
                }
            }
        } else {
            self.interaction.is_panning = false;
            self.interaction.last_pan_pos = None;
        }
    }

    /// Handles scroll wheel zooming, keeping the world point under the
    /// cursor fixed. Zoom is clamped between 0.25x and 5.0x.
    fn handle_canvas_zoom(&mut self, ui: &mut egui::Ui, response: &egui::Response) {
        let scroll_delta = ui.input(|i| i.smooth_scroll_delta.y);
        if scroll_delta == 0.0 {
            return;
        }
        let mouse_pos = ui
            .input(|i| i.pointer.hover_pos())
            .or_else(|| response.interact_pointer_pos());
        let Some(mouse_pos) = mouse_pos else { return };
        if !response.rect.contains(mouse_pos) {
            return;
        }

        let world_before = self.screen_to_world(mouse_pos);
        let zoom_delta = if scroll_delta > 0.0 { 0.025 } else { -0.025 };
        let old_zoom = self.canvas.zoom_factor;
        self.canvas.zoom_factor = (self.canvas.zoom_factor + zoom_delta).clamp(0.25, 5.0);

        if (self.canvas.zoom_factor - old_zoom).abs() > f32::EPSILON {
            let world_after = self.world_to_screen(world_before);
            self.canvas.offset += mouse_pos - world_after;
        }
    }

    /// Accepts a node class dropped from the object library and creates a
    /// node centered on the drop position.
    fn handle_palette_drop(&mut self, response: &egui::Response) {
        if let Some(class) = response.dnd_release_payload::<NodeClass>() {
            if let Some(pos) = response.hover_pos() {
                let world = self.screen_to_world(pos);
                self.create_node_at(
                    *class,
                    (world.x - NODE_WIDTH / 2.0, world.y - NODE_HEIGHT / 2.0),
                );
            }
        }
    }

    /// Handles clicks, double clicks, drags, and the context menu trigger.
    fn handle_pointer(&mut self, response: &egui::Response) {
        if self.interaction.is_panning {
            return;
        }

        // Primary click: pins take priority, then nodes, then edges.
        if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                let world = self.screen_to_world(pos);
                if let Some(pin) = self.pin_at_position(world) {
                    // Errors are user-visible conditions, already logged.
                    let _ = self.activate_pin(pin);
                } else if let Some(node_id) = self.node_at_position(world) {
                    self.interaction.selected_node = Some(node_id);
                    self.interaction.selected_edge = None;
                } else if let Some(edge_id) = self.edge_at_position(world) {
                    self.interaction.selected_edge = Some(edge_id);
                    self.interaction.selected_node = None;
                } else {
                    self.interaction.selected_node = None;
                    self.interaction.selected_edge = None;
                }
            }
        }

        // Double click on empty canvas drops a half-made connection.
        if response.double_clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                let world = self.screen_to_world(pos);
                if self.pin_at_position(world).is_none() && self.node_at_position(world).is_none() {
                    self.graph.cancel_connection();
                }
            }
        }

        // Node dragging with the primary button.
        if response.drag_started_by(egui::PointerButton::Primary) {
            if let Some(pos) = response.interact_pointer_pos() {
                let world = self.screen_to_world(pos);
                if self.pin_at_position(world).is_none() {
                    if let Some(node_id) = self.node_at_position(world) {
                        self.interaction.dragging_node = Some(node_id);
                        self.interaction.selected_node = Some(node_id);
                        self.interaction.selected_edge = None;
                        if let Some(node) = self.graph.node(node_id) {
                            self.interaction.node_drag_offset =
                                egui::pos2(node.position.0, node.position.1) - world;
                        }
                    }
                }
            }
        }
        if response.dragged_by(egui::PointerButton::Primary) {
            if let (Some(node_id), Some(pos)) = (
                self.interaction.dragging_node,
                response.interact_pointer_pos(),
            ) {
                let world = self.screen_to_world(pos) + self.interaction.node_drag_offset;
                // Routed through the graph so incident edges stay anchored
                self.graph.move_node(node_id, (world.x, world.y));
                self.file.has_unsaved_changes = true;
            }
        }
        if response.drag_stopped() {
            self.interaction.dragging_node = None;
        }

        // Secondary click opens the context menu on whatever is underneath.
        if response.secondary_clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                let world = self.screen_to_world(pos);
                self.context_menu.show = true;
                self.context_menu.just_opened = true;
                self.context_menu.screen_pos = pos;
                self.context_menu.world_pos = (world.x, world.y);
                self.context_menu.target = if let Some(node_id) = self.node_at_position(world) {
                    ContextTarget::Node(node_id)
                } else if let Some(edge_id) = self.edge_at_position(world) {
                    ContextTarget::Edge(edge_id)
                } else {
                    ContextTarget::Canvas
                };
            }
        }

    }

    /// Renders the right-click context menu for the current target.
    fn draw_context_menu(&mut self, ui: &mut egui::Ui) {
        let area_response = egui::Area::new(egui::Id::new("context_menu"))
            .fixed_pos(self.context_menu.screen_pos)
            .show(ui.ctx(), |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.set_min_width(140.0);
                    match self.context_menu.target {
                        ContextTarget::Canvas => {
                            for class in NodeClass::ALL {
                                if ui.button(format!("New {}", class.label())).clicked() {
                                    let (x, y) = self.context_menu.world_pos;
                                    self.create_node_at(class, (x, y));
                                    self.context_menu.show = false;
                                }
                            }
                        }
                        ContextTarget::Node(node_id) => {
                            if ui.button("Delete Node").clicked() {
                                self.graph.delete_node_and_edges(node_id);
                                if self.interaction.selected_node == Some(node_id) {
                                    self.interaction.selected_node = None;
                                }
                                self.file.has_unsaved_changes = true;
                                self.context_menu.show = false;
                            }
                        }
                        ContextTarget::Edge(edge_id) => {
                            if ui.button("Delete Edge").clicked() {
                                self.graph.delete_edge(edge_id);
                                if self.interaction.selected_edge == Some(edge_id) {
                                    self.interaction.selected_edge = None;
                                }
                                self.file.has_unsaved_changes = true;
                                self.context_menu.show = false;
                            }
                        }
                    }
                    if ui.button("Cancel").clicked() {
                        self.context_menu.show = false;
                    }
                });
            });

        if !self.context_menu.just_opened && area_response.response.clicked_elsewhere() {
            self.context_menu.show = false;
        }
        self.context_menu.just_opened = false;
    }

    /// Finds the topmost node whose rectangle contains the world position.
    pub fn node_at_position(&self, pos: egui::Pos2) -> Option<NodeId> {
        let size = egui::vec2(NODE_WIDTH, NODE_HEIGHT);
        self.graph.nodes().iter().rev().find_map(|node| {
            let rect =
                egui::Rect::from_min_size(egui::pos2(node.position.0, node.position.1), size);
            rect.contains(pos).then_some(node.id)
        })
    }

    /// Finds a pin whose anchor lies within the hit radius of the world
    /// position. Pins win over nodes, so the radius stays small.
    pub fn pin_at_position(&self, pos: egui::Pos2) -> Option<PinRef> {
        for node in self.graph.nodes().iter().rev() {
            for kind in [PinKind::Input, PinKind::Output] {
                let (ax, ay) = node.pin_anchor(kind);
                if (pos - egui::pos2(ax, ay)).length() <= PIN_HIT_RADIUS {
                    return Some(node.pin_ref(kind));
                }
            }
        }
        None
    }

    /// Finds the edge closest to the world position within the click
    /// threshold, using the edges' adjusted endpoints.
    pub fn edge_at_position(&self, pos: egui::Pos2) -> Option<EdgeId> {
        self.graph.edges().iter().find_map(|edge| {
            let (sx, sy) = edge.source_point();
            let (dx, dy) = edge.dest_point();
            let distance =
                point_to_segment_distance(pos, egui::pos2(sx, sy), egui::pos2(dx, dy));
            (distance < CLICK_THRESHOLD).then(|| edge.id())
        })
    }
}

/// Distance from a point to a line segment, via projection clamped to the
/// segment. Degenerate segments (collapsed edges) fall back to point
/// distance.
fn point_to_segment_distance(point: egui::Pos2, start: egui::Pos2, end: egui::Pos2) -> f32 {
    let line_vec = end - start;
    let point_vec = point - start;
    let line_len_sq = line_vec.length_sq();

    if line_len_sq < 0.0001 {
        return point_vec.length();
    }

    let t = (point_vec.dot(line_vec) / line_len_sq).clamp(0.0, 1.0);
    let projection = start + line_vec * t;
    (point - projection).length()
}
