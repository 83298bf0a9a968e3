//! Application state management structures.
//!
//! This module contains the state structures tracking the editor's current
//! UI state (canvas navigation, user interactions, the context menu, file
//! operations) plus the main [`NodeCanvasApp`] struct tying them to the
//! graph model.

use crate::document::Document;
use crate::error::ConnectError;
use crate::graph::{EdgeId, Graph, NodeClass, NodeId, PinActivation, PinRef};
use eframe::egui;
use serde::{Deserialize, Serialize};
use std::sync::mpsc::{channel, Receiver, Sender};

/// State related to canvas navigation and display.
#[derive(Debug, Clone, Copy)]
pub struct CanvasState {
    /// Current canvas pan offset for navigation (in screen space).
    pub offset: egui::Vec2,
    /// Current zoom level (1.0 = normal, 2.0 = 2x zoom, 0.5 = 50% zoom).
    pub zoom_factor: f32,
    /// Whether the grid should be displayed on the canvas.
    pub show_grid: bool,
    /// Whether the initial centering of the origin has happened.
    pub initialized: bool,
}

impl Default for CanvasState {
    fn default() -> Self {
        Self {
            offset: egui::Vec2::ZERO,
            zoom_factor: 1.0,
            show_grid: true,
            initialized: false,
        }
    }
}

/// State related to user interactions with nodes, pins and edges.
#[derive(Debug, Clone, Default)]
pub struct InteractionState {
    /// Currently selected node, if any.
    pub selected_node: Option<NodeId>,
    /// Currently selected edge, if any.
    pub selected_edge: Option<EdgeId>,
    /// Node currently being dragged by the user.
    pub dragging_node: Option<NodeId>,
    /// Offset from mouse to the node's top-left corner during dragging.
    pub node_drag_offset: egui::Vec2,
    /// Whether the user is currently panning the canvas.
    pub is_panning: bool,
    /// Last mouse position during a panning operation.
    pub last_pan_pos: Option<egui::Pos2>,
}

/// What the context menu was opened on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextTarget {
    /// Empty canvas; offers node creation.
    Canvas,
    /// A node; offers deletion.
    Node(NodeId),
    /// An edge; offers deletion.
    Edge(EdgeId),
}

/// State of the right-click context menu.
#[derive(Debug, Clone, Copy)]
pub struct ContextMenuState {
    /// Whether the context menu is currently visible.
    pub show: bool,
    /// Screen position where the menu should appear.
    pub screen_pos: egui::Pos2,
    /// World position the menu was opened over (used for node creation).
    pub world_pos: (f32, f32),
    /// What sits under the click.
    pub target: ContextTarget,
    /// Flag to prevent the menu from closing in the frame it opened.
    pub just_opened: bool,
}

impl Default for ContextMenuState {
    fn default() -> Self {
        Self {
            show: false,
            screen_pos: egui::Pos2::ZERO,
            world_pos: (0.0, 0.0),
            target: ContextTarget::Canvas,
            just_opened: false,
        }
    }
}

/// Represents a pending save operation type.
#[derive(Debug)]
pub enum PendingSaveOperation {
    /// Save with a new file path (show file picker).
    SaveAs,
    /// Save to the existing file path.
    Save,
}

/// Represents a pending load operation type.
#[derive(Debug)]
pub enum PendingLoadOperation {
    /// Load from a file (show file picker).
    Load,
}

/// Messages sent from async file operations back to the main app.
#[derive(Debug)]
pub enum FileOperationResult {
    /// Save completed successfully at the given path.
    SaveCompleted(String),
    /// Load completed with the path and raw file content.
    LoadCompleted(String, String),
    /// Operation failed with an error message.
    OperationFailed(String),
}

/// State related to file operations and persistence.
pub struct FileState {
    /// Current file path for save/load operations.
    pub current_path: Option<String>,
    /// Flag indicating the project has unsaved changes.
    pub has_unsaved_changes: bool,
    /// Save operation queued for the next frame.
    pub pending_save_operation: Option<PendingSaveOperation>,
    /// Load operation queued for the next frame.
    pub pending_load_operation: Option<PendingLoadOperation>,
    /// Channel for receiving file operation results from async tasks.
    pub file_operation_sender: Sender<FileOperationResult>,
    /// Receiving side of the same channel, drained each frame.
    pub file_operation_receiver: Receiver<FileOperationResult>,
}

impl Default for FileState {
    fn default() -> Self {
        let (sender, receiver) = channel();
        Self {
            current_path: None,
            has_unsaved_changes: false,
            pending_save_operation: None,
            pending_load_operation: None,
            file_operation_sender: sender,
            file_operation_receiver: receiver,
        }
    }
}

/// UI preferences persisted between sessions via eframe storage.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct Prefs {
    /// Whether dark mode visuals are enabled.
    pub dark_mode: bool,
    /// Whether the canvas grid is shown.
    pub show_grid: bool,
    /// Last zoom level.
    pub zoom_factor: f32,
}

impl Default for Prefs {
    fn default() -> Self {
        Self {
            dark_mode: true,
            show_grid: true,
            zoom_factor: 1.0,
        }
    }
}

/// The main application structure containing UI state and the graph.
///
/// This struct implements the `eframe::App` trait and handles all user
/// interface rendering and interaction logic around the graph core.
#[derive(Default)]
pub struct NodeCanvasApp {
    /// The node graph being edited.
    pub graph: Graph,
    /// Canvas navigation and display state.
    pub canvas: CanvasState,
    /// User interaction state.
    pub interaction: InteractionState,
    /// Context menu state.
    pub context_menu: ContextMenuState,
    /// File operations state.
    pub file: FileState,
    /// Whether dark mode visuals are enabled.
    pub dark_mode: bool,
}

/// eframe storage keys for session persistence.
const STORAGE_PROJECT_KEY: &str = "project";
const STORAGE_PREFS_KEY: &str = "prefs";

impl NodeCanvasApp {
    /// Creates the app, restoring UI preferences and the last open project
    /// from eframe storage when available.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let mut app = Self {
            dark_mode: true,
            ..Self::default()
        };
        let Some(storage) = cc.storage else {
            return app;
        };

        if let Some(json) = storage.get_string(STORAGE_PREFS_KEY) {
            match serde_json::from_str::<Prefs>(&json) {
                Ok(prefs) => {
                    app.dark_mode = prefs.dark_mode;
                    app.canvas.show_grid = prefs.show_grid;
                    app.canvas.zoom_factor = prefs.zoom_factor.clamp(0.25, 5.0);
                }
                Err(err) => log::warn!("ignoring stored prefs: {err}"),
            }
        }
        if let Some(json) = storage.get_string(STORAGE_PROJECT_KEY) {
            match Document::from_json(&json).and_then(|doc| doc.load_into(&mut app.graph)) {
                Ok(()) => log::info!("restored previous session's project"),
                Err(err) => log::warn!("could not restore previous project: {err}"),
            }
        }
        app
    }

    /// Writes prefs and the current project into eframe storage.
    pub fn persist(&self, storage: &mut dyn eframe::Storage) {
        let prefs = Prefs {
            dark_mode: self.dark_mode,
            show_grid: self.canvas.show_grid,
            zoom_factor: self.canvas.zoom_factor,
        };
        match serde_json::to_string(&prefs) {
            Ok(json) => storage.set_string(STORAGE_PREFS_KEY, json),
            Err(err) => log::error!("failed to serialize prefs: {err}"),
        }
        match Document::from_graph(&self.graph).to_json() {
            Ok(json) => storage.set_string(STORAGE_PROJECT_KEY, json),
            Err(err) => log::error!("failed to serialize project: {err}"),
        }
    }

    /// Creates a node of the given class at a world position, adds it to
    /// the graph, and selects it.
    pub fn create_node_at(&mut self, class: NodeClass, world_pos: (f32, f32)) -> NodeId {
        let node = self.graph.create_node(class, world_pos);
        let id = self.graph.add_node(node);
        self.interaction.selected_node = Some(id);
        self.interaction.selected_edge = None;
        self.file.has_unsaved_changes = true;
        id
    }

    /// Routes a pin click into the graph's connection state machine and
    /// keeps the unsaved flag in sync.
    pub fn activate_pin(&mut self, pin: PinRef) -> Result<PinActivation, ConnectError> {
        let outcome = self.graph.activate_pin(pin);
        match &outcome {
            Ok(PinActivation::Connected(_)) => self.file.has_unsaved_changes = true,
            Ok(_) => {}
            Err(err) => log::warn!("connection rejected: {err}"),
        }
        outcome
    }

    /// Deletes whatever is selected (node or edge). Safe to call twice;
    /// the graph's deletes are idempotent.
    pub fn delete_selected(&mut self) {
        if let Some(node_id) = self.interaction.selected_node.take() {
            self.graph.delete_node_and_edges(node_id);
            self.file.has_unsaved_changes = true;
        }
        if let Some(edge_id) = self.interaction.selected_edge.take() {
            self.graph.delete_edge(edge_id);
            self.file.has_unsaved_changes = true;
        }
    }
}
