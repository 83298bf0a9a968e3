//! Error types for graph editing and document loading.
//!
//! Connection failures and document failures are deliberately separate
//! enums: the former are reported to the user and leave the graph intact
//! minus the abandoned pending connection, while the latter abort a load
//! wholesale so a broken file can never produce a half-built graph.

use crate::graph::{NodeId, PinKind};
use thiserror::Error;

/// Why completing a pending connection was refused.
///
/// Both variants reset the pending-connection state; neither creates an
/// edge. A duplicate pin pair is *not* an error; see
/// [`crate::graph::PinActivation::DuplicateIgnored`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConnectError {
    /// Both pins have the same kind; an edge always runs output → input.
    #[error("cannot connect two {0} pins")]
    SameKind(PinKind),
    /// Both pins belong to the same node.
    #[error("cannot connect a node to itself")]
    SelfConnection,
}

/// Why a persisted document could not be loaded.
///
/// Validation runs before the in-memory graph is touched, so any of these
/// leaves the previously loaded graph exactly as it was.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The document is not valid JSON or does not match the schema
    /// (including an unrecognized node `class_name`).
    #[error("invalid project document: {0}")]
    Parse(#[from] serde_json::Error),
    /// Two node records share an id.
    #[error("duplicate node id {0} in document")]
    DuplicateNodeId(NodeId),
    /// An edge record references a node id with no matching node record.
    #[error("edge references unknown node id {0}")]
    UnknownNodeId(NodeId),
}
