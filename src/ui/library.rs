//! The object library panel listing placeable node classes.
//!
//! Each entry is an egui drag source carrying its [`NodeClass`] as the drag
//! payload; the canvas accepts the payload on release and creates a node at
//! the drop position. Clicking an entry also works, dropping the node at
//! the center of the view for keyboard-averse mice.

use super::state::NodeCanvasApp;
use crate::graph::NodeClass;
use eframe::egui;

impl NodeCanvasApp {
    /// Renders the library panel.
    pub fn draw_object_library(&mut self, ui: &mut egui::Ui) {
        ui.heading("Object Library");
        ui.separator();
        ui.label("Drag a node type onto the canvas, or right-click the canvas.");
        ui.add_space(8.0);

        for class in NodeClass::ALL {
            let id = egui::Id::new("library_item").with(class.label());
            let response = ui
                .dnd_drag_source(id, class, |ui| {
                    egui::Frame::group(ui.style()).show(ui, |ui| {
                        ui.set_min_width(ui.available_width());
                        ui.label(class.label());
                    });
                })
                .response;

            if response.clicked() {
                let center = self.screen_to_world(ui.ctx().screen_rect().center());
                self.create_node_at(class, (center.x, center.y));
            }
        }
    }
}
