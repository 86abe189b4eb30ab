// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Error types for scene serialization and deserialization.

use assembly_port::EngineError;
use thiserror::Error;

/// Operation-level failure. Only these reach the caller.
#[derive(Debug, Error)]
pub enum SceneError {
    /// The engine handle has no active model.
    #[error("viewer model not initialized")]
    ModelNotReady,
    /// The document version is not recognized and strict checking is on.
    #[error("unsupported document version {found:?} (expected {expected:?})")]
    VersionMismatch {
        /// Version tag found in the document.
        found: String,
        /// Version this codec writes.
        expected: &'static str,
    },
    /// The input is not valid JSON for either document layout.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    /// The input parsed as JSON but is not a scene document.
    #[error("invalid document: {0}")]
    InvalidDocument(String),
    /// The save timestamp could not be formatted.
    #[error("timestamp error: {0}")]
    Timestamp(#[from] time::error::Format),
}

/// Per-record problem. Recovered locally: the record is skipped and the
/// operation continues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PartError {
    /// Neither a display name nor a file name is available.
    #[error("part has no name")]
    MissingName,
    /// The transform does not have exactly 16 elements.
    #[error("matrix has {found} elements, expected 16")]
    MatrixLength {
        /// Number of elements present.
        found: usize,
    },
    /// The engine rejected the subtree load.
    #[error("failed to load {url}: {source}")]
    AssetLoadFailure {
        /// Location that was requested.
        url: String,
        /// Engine-side cause.
        source: EngineError,
    },
    /// The engine accepted the load but created no nodes.
    #[error("loading {url} produced no nodes")]
    EmptyLoad {
        /// Location that was requested.
        url: String,
    },
    /// Any other engine call failed for this node.
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),
}
