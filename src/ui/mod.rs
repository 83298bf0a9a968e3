//! User interface components for the node canvas editor.
//!
//! This module contains all UI-related code around the graph core: the main
//! application struct, canvas rendering and interaction, the object
//! library, and file operations.
//!
//! # Module Organization
//!
//! - `state` - Application state structures and the main NodeCanvasApp
//! - `canvas` - Canvas navigation, hit-testing, and pointer interaction
//! - `rendering` - Drawing nodes, pins, edges, and the grid
//! - `library` - The drag-and-drop object library panel
//! - `file_ops` - Async file save/load operations

mod canvas;
mod file_ops;
mod library;
mod rendering;
mod state;

#[cfg(test)]
mod tests;

pub use state::NodeCanvasApp;

use eframe::egui;

impl eframe::App for NodeCanvasApp {
    /// Persist UI preferences and the open project between restarts.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        self.persist(storage);
    }

    /// Main update function called by egui for each frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let visuals = if self.dark_mode {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        };
        ctx.set_visuals(visuals);

        self.handle_pending_operations(ctx);
        self.handle_shortcuts(ctx);
        self.update_window_title(ctx);

        egui::TopBottomPanel::top("top_toolbar").show(ctx, |ui| {
            self.draw_toolbar(ui);
        });

        egui::SidePanel::left("object_library")
            .resizable(true)
            .default_width(180.0)
            .show(ctx, |ui| {
                self.draw_object_library(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_canvas(ui);
        });
    }
}

impl NodeCanvasApp {
    /// Renders the toolbar with file actions and view toggles.
    fn draw_toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("New").clicked() {
                self.new_project();
            }
            if ui.button("Open").clicked() {
                self.load_project();
            }
            if ui.button("Save").clicked() {
                self.save_project();
            }
            if ui.button("Save As").clicked() {
                self.save_project_as();
            }
            ui.separator();
            ui.checkbox(&mut self.canvas.show_grid, "Grid");
            ui.checkbox(&mut self.dark_mode, "Dark Mode");
            ui.separator();
            ui.label(format!("{:.0}%", self.canvas.zoom_factor * 100.0));
        });
    }

    /// Handles global keyboard shortcuts.
    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        let (new_pressed, open_pressed, save_pressed) = ctx.input_mut(|i| {
            (
                i.consume_key(egui::Modifiers::COMMAND, egui::Key::N),
                i.consume_key(egui::Modifiers::COMMAND, egui::Key::O),
                i.consume_key(egui::Modifiers::COMMAND, egui::Key::S),
            )
        });
        if new_pressed {
            self.new_project();
        }
        if open_pressed {
            self.load_project();
        }
        if save_pressed {
            self.save_project();
        }

        // Delete/Escape stay out of the way while a code editor has focus
        if ctx.wants_keyboard_input() {
            return;
        }
        let (delete_pressed, escape_pressed) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::Delete) || i.key_pressed(egui::Key::Backspace),
                i.key_pressed(egui::Key::Escape),
            )
        });
        if delete_pressed {
            self.delete_selected();
        }
        if escape_pressed {
            self.graph.cancel_connection();
        }
    }

    /// Reflects the open file and unsaved state in the window title.
    fn update_window_title(&self, ctx: &egui::Context) {
        let name = self
            .file
            .current_path
            .as_deref()
            .unwrap_or("Untitled");
        let marker = if self.file.has_unsaved_changes { "*" } else { "" };
        ctx.send_viewport_cmd(egui::ViewportCommand::Title(format!(
            "Node Canvas - {name}{marker}"
        )));
    }
}
