use super::*;
use crate::graph::{NodeClass, PinActivation, PinKind, PinRef};
use eframe::egui;

#[test]
fn nodes_created_from_the_ui_get_unique_ids_and_selection() {
    let mut app = NodeCanvasApp::default();

    let a = app.create_node_at(NodeClass::Code, (0.0, 0.0));
    let b = app.create_node_at(NodeClass::Diff, (300.0, 0.0));

    assert_ne!(a, b);
    assert_eq!(app.interaction.selected_node, Some(b));
    assert!(app.file.has_unsaved_changes);
    assert_eq!(app.graph.nodes().len(), 2);
}

#[test]
fn pin_clicks_through_the_app_complete_a_connection() {
    let mut app = NodeCanvasApp::default();
    let a = app.create_node_at(NodeClass::Code, (0.0, 0.0));
    let b = app.create_node_at(NodeClass::Code, (400.0, 0.0));
    app.file.has_unsaved_changes = false;

    let started = app.activate_pin(PinRef::new(a, PinKind::Output)).unwrap();
    assert_eq!(started, PinActivation::Started);
    assert!(!app.file.has_unsaved_changes);

    let completed = app.activate_pin(PinRef::new(b, PinKind::Input)).unwrap();
    assert!(matches!(completed, PinActivation::Connected(_)));
    assert_eq!(app.graph.edges().len(), 1);
    assert!(app.file.has_unsaved_changes);
}

#[test]
fn rejected_connections_do_not_mark_the_project_dirty() {
    let mut app = NodeCanvasApp::default();
    let a = app.create_node_at(NodeClass::Code, (0.0, 0.0));
    let b = app.create_node_at(NodeClass::Code, (400.0, 0.0));
    app.file.has_unsaved_changes = false;

    app.activate_pin(PinRef::new(a, PinKind::Output)).unwrap();
    let err = app.activate_pin(PinRef::new(b, PinKind::Output));

    assert!(err.is_err());
    assert!(app.graph.edges().is_empty());
    assert!(!app.file.has_unsaved_changes);
}

#[test]
fn delete_selected_cascades_and_is_idempotent() {
    let mut app = NodeCanvasApp::default();
    let a = app.create_node_at(NodeClass::Code, (0.0, 0.0));
    let b = app.create_node_at(NodeClass::Code, (400.0, 0.0));
    app.activate_pin(PinRef::new(a, PinKind::Output)).unwrap();
    app.activate_pin(PinRef::new(b, PinKind::Input)).unwrap();

    app.interaction.selected_node = Some(a);
    app.delete_selected();

    assert!(app.graph.node(a).is_none());
    assert!(app.graph.edges().is_empty());
    assert_eq!(app.interaction.selected_node, None);

    // Selection already consumed; a second delete changes nothing
    app.delete_selected();
    assert_eq!(app.graph.nodes().len(), 1);
}

#[test]
fn hit_testing_finds_nodes_pins_and_edges() {
    let mut app = NodeCanvasApp::default();
    let a = app.create_node_at(NodeClass::Code, (0.0, 0.0));
    let b = app.create_node_at(NodeClass::Code, (400.0, 0.0));
    app.activate_pin(PinRef::new(a, PinKind::Output)).unwrap();
    app.activate_pin(PinRef::new(b, PinKind::Input)).unwrap();

    // Inside node A's rectangle
    assert_eq!(app.node_at_position(egui::pos2(50.0, 50.0)), Some(a));
    assert_eq!(app.node_at_position(egui::pos2(-50.0, 50.0)), None);

    // On node A's output pin anchor (220, 70)
    assert_eq!(
        app.pin_at_position(egui::pos2(220.0, 70.0)),
        Some(PinRef::new(a, PinKind::Output))
    );
    // On node B's input pin anchor (390, 70)
    assert_eq!(
        app.pin_at_position(egui::pos2(390.0, 70.0)),
        Some(PinRef::new(b, PinKind::Input))
    );
    assert_eq!(app.pin_at_position(egui::pos2(1000.0, 1000.0)), None);

    // Near the middle of the edge between the two anchors
    let edge_id = app.graph.edges()[0].id();
    assert_eq!(app.edge_at_position(egui::pos2(305.0, 72.0)), Some(edge_id));
    assert_eq!(app.edge_at_position(egui::pos2(305.0, 200.0)), None);
}

#[test]
fn new_project_resets_graph_and_file_state() {
    let mut app = NodeCanvasApp::default();
    app.create_node_at(NodeClass::Code, (0.0, 0.0));
    app.file.current_path = Some("somewhere.json".to_string());

    app.new_project();

    assert!(app.graph.nodes().is_empty());
    assert!(app.graph.edges().is_empty());
    assert_eq!(app.file.current_path, None);
    assert!(!app.file.has_unsaved_changes);
}

/// Drives one headless egui frame over a populated canvas; rendering must
/// not panic and must leave the graph untouched.
#[test]
fn canvas_renders_a_populated_graph_headless() {
    let mut app = NodeCanvasApp::default();
    let a = app.create_node_at(NodeClass::Code, (0.0, 0.0));
    let b = app.create_node_at(NodeClass::Code, (400.0, 0.0));
    app.activate_pin(PinRef::new(a, PinKind::Output)).unwrap();
    app.activate_pin(PinRef::new(b, PinKind::Input)).unwrap();
    // Leave a pending connection armed so the preview path runs too
    app.activate_pin(PinRef::new(b, PinKind::Output)).unwrap();

    let ctx = egui::Context::default();
    let mut raw = egui::RawInput::default();
    raw.screen_rect = Some(egui::Rect::from_min_size(
        egui::Pos2::ZERO,
        egui::vec2(1200.0, 800.0),
    ));
    let _ = ctx.run(raw, |ctx| {
        egui::CentralPanel::default().show(ctx, |ui| {
            app.draw_canvas(ui);
        });
    });

    assert_eq!(app.graph.nodes().len(), 2);
    assert_eq!(app.graph.edges().len(), 1);
}
