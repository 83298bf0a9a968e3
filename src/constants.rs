//! Shared application-wide constants.
//! Centralizes tweakable values used across the graph model and UI rendering.

// Node dimensions
/// Default node width in world units (wide enough for the embedded code editor).
pub const NODE_WIDTH: f32 = 220.0;
/// Default node height in world units.
pub const NODE_HEIGHT: f32 = 140.0;
/// Height of the title strip at the top of a node, in world units.
pub const NODE_TITLE_HEIGHT: f32 = 22.0;

// Pins
/// Horizontal distance from the node's left border to the input pin center.
pub const PIN_INSET: f32 = 10.0;
/// Radius of a pin circle in world units.
pub const PIN_RADIUS: f32 = 7.5;
/// Hit-test radius around a pin center, in world units.
pub const PIN_HIT_RADIUS: f32 = 12.0;

// Edge geometry
/// Pin-to-pin distances at or below this collapse the edge to a single point.
pub const EDGE_MIN_LENGTH: f32 = 20.0;
/// How far each drawn endpoint is pulled inward along the line, so edges
/// touch node borders rather than pin centers.
pub const EDGE_ENDPOINT_INSET: f32 = 10.0;
/// Side length of the arrowheads drawn at both ends of an edge.
pub const ARROW_SIZE: f32 = 20.0;
/// Angular spread of an arrowhead's wings around the edge direction.
pub const ARROW_SPREAD: f32 = std::f32::consts::FRAC_PI_3;

// Grid/drawing
/// Grid cell size in world units.
pub const GRID_SIZE: f32 = 20.0;

// Canvas interactions
/// Click threshold in world units used for edge hit detection.
pub const CLICK_THRESHOLD: f32 = 10.0;
