// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the export pipeline.

use thiserror::Error;

use crate::ExportKind;

/// Result type alias for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;

/// Export failures. A failed export never touches the block store.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("{0} export already in progress")]
    InProgress(ExportKind),

    #[error("Geometry error: {0}")]
    Geometry(#[from] massing_geometry::Error),

    #[error("Block model error: {0}")]
    Core(#[from] massing_core::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid GLB container: {0}")]
    Container(String),

    #[error("Unsupported document: schema {schema:?}, version {version}")]
    UnsupportedSchema { schema: String, version: u32 },

    #[cfg(feature = "runtime")]
    #[error("Export task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
