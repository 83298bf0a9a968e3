//! File operations for saving and loading projects.
//!
//! Dialogs run on async tasks so the UI thread never blocks; results come
//! back over a channel and are applied at the start of the next frame.
//! Loading goes through the document serializer, which validates the whole
//! file before touching the graph, so a bad file leaves the current project
//! intact.

use super::state::{
    FileOperationResult, NodeCanvasApp, PendingLoadOperation, PendingSaveOperation,
};
use crate::document::Document;
use crate::graph::Graph;
use eframe::egui;

impl NodeCanvasApp {
    /// Processes completed file operations and kicks off pending ones.
    /// Called once per frame.
    pub fn handle_pending_operations(&mut self, ctx: &egui::Context) {
        while let Ok(result) = self.file.file_operation_receiver.try_recv() {
            match result {
                FileOperationResult::SaveCompleted(path) => {
                    log::info!("project saved to {path}");
                    self.file.current_path = Some(path);
                    self.file.has_unsaved_changes = false;
                }
                FileOperationResult::LoadCompleted(path, content) => {
                    let loaded = Document::from_json(&content)
                        .and_then(|doc| doc.load_into(&mut self.graph));
                    match loaded {
                        Ok(()) => {
                            self.file.current_path = Some(path);
                            self.file.has_unsaved_changes = false;
                            self.interaction = Default::default();
                        }
                        Err(err) => {
                            // Validation failed before the graph was
                            // cleared; the open project is still intact.
                            log::error!("failed to load {path}: {err}");
                        }
                    }
                }
                FileOperationResult::OperationFailed(error) => {
                    log::error!("file operation failed: {error}");
                }
            }
        }

        if let Some(save_op) = self.file.pending_save_operation.take() {
            let json = match Document::from_graph(&self.graph).to_json() {
                Ok(json) => json,
                Err(err) => {
                    log::error!("failed to serialize project: {err}");
                    return;
                }
            };
            let sender = self.file.file_operation_sender.clone();
            let ctx = ctx.clone();

            match save_op {
                PendingSaveOperation::SaveAs => {
                    tokio::spawn(async move {
                        if let Some(handle) = rfd::AsyncFileDialog::new()
                            .add_filter("JSON", &["json"])
                            .set_file_name("project.json")
                            .save_file()
                            .await
                        {
                            let path = handle.path();
                            let result = match std::fs::write(path, json) {
                                Ok(()) => FileOperationResult::SaveCompleted(
                                    path.display().to_string(),
                                ),
                                Err(e) => FileOperationResult::OperationFailed(format!(
                                    "Failed to save file: {e}"
                                )),
                            };
                            let _ = sender.send(result);
                        }
                        ctx.request_repaint();
                    });
                }
                PendingSaveOperation::Save => {
                    if let Some(path) = self.file.current_path.clone() {
                        tokio::spawn(async move {
                            let result = match std::fs::write(&path, json) {
                                Ok(()) => FileOperationResult::SaveCompleted(path),
                                Err(e) => FileOperationResult::OperationFailed(format!(
                                    "Failed to save file: {e}"
                                )),
                            };
                            let _ = sender.send(result);
                            ctx.request_repaint();
                        });
                    } else {
                        self.file.pending_save_operation = Some(PendingSaveOperation::SaveAs);
                    }
                }
            }
        }

        if self.file.pending_load_operation.take().is_some() {
            let sender = self.file.file_operation_sender.clone();
            let ctx = ctx.clone();
            tokio::spawn(async move {
                if let Some(handle) = rfd::AsyncFileDialog::new()
                    .add_filter("JSON", &["json"])
                    .pick_file()
                    .await
                {
                    let path = handle.path();
                    let result = match std::fs::read_to_string(path) {
                        Ok(content) => FileOperationResult::LoadCompleted(
                            path.display().to_string(),
                            content,
                        ),
                        Err(e) => {
                            FileOperationResult::OperationFailed(format!("Failed to read file: {e}"))
                        }
                    };
                    let _ = sender.send(result);
                }
                ctx.request_repaint();
            });
        }
    }

    /// Opens a file dialog to save the project under a new name.
    pub fn save_project_as(&mut self) {
        self.file.pending_save_operation = Some(PendingSaveOperation::SaveAs);
    }

    /// Saves to the current file path, or falls back to "Save As" when no
    /// path is set yet.
    pub fn save_project(&mut self) {
        if self.file.current_path.is_some() {
            self.file.pending_save_operation = Some(PendingSaveOperation::Save);
        } else {
            self.save_project_as();
        }
    }

    /// Opens a file dialog to load a project from disk.
    pub fn load_project(&mut self) {
        self.file.pending_load_operation = Some(PendingLoadOperation::Load);
    }

    /// Starts a fresh empty project, resetting all editor state.
    pub fn new_project(&mut self) {
        self.graph = Graph::new();
        self.interaction = Default::default();
        self.file.current_path = None;
        self.file.has_unsaved_changes = false;
        self.canvas.offset = egui::Vec2::ZERO;
        self.canvas.zoom_factor = 1.0;
        self.canvas.initialized = false;
    }
}
