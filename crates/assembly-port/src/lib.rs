// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Engine port contract for the assembly scene codec.
//!
//! This crate defines what the codec needs from a rendering/CAD engine.
//! It contains NO serialization logic; that lives in assembly-codec.
//!
//! # Design Principles
//!
//! - **The engine is opaque**: Only top-level node access, transforms,
//!   visibility and subtree loading are part of the contract.
//! - **Explicit handles**: Every codec operation receives the viewer it acts on.
//! - **Session-scoped ids**: A [`NodeId`] is meaningless outside the engine
//!   session that assigned it.

use thiserror::Error;

mod port;
mod types;

pub use port::{CadViewer, SceneModel};
pub use types::{NodeId, NodeMatrix, MATRIX_LEN};

/// Error type reported by engine adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The node does not exist in the current model.
    #[error("node {0} not found")]
    NodeNotFound(NodeId),
    /// The engine refused to load a subtree from `url`.
    #[error("load rejected for {url}: {reason}")]
    LoadRejected {
        /// Location that was requested.
        url: String,
        /// Adapter-provided reason.
        reason: String,
    },
    /// A backend-specific error occurred.
    #[error("backend error: {0}")]
    Backend(String),
}
