// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Massing Export
//!
//! Turns a [`StoreSnapshot`](massing_core::StoreSnapshot) into files:
//!
//! - **GLB**: binary glTF 2.0 scene, one node per level, grouped per block
//! - **JSON**: `massing-blocks` document with canonical blocks and metrics
//!
//! ```rust
//! use massing_core::BlockStore;
//! use massing_export::{decode_glb, encode, ExportConfig, ExportKind};
//!
//! let store = BlockStore::new();
//! let artifact = encode(ExportKind::Glb, &store.snapshot(), &ExportConfig::default()).unwrap();
//! assert_eq!(artifact.file_name, "massing-blocks.glb");
//!
//! let glb = decode_glb(&artifact.bytes).unwrap();
//! assert_eq!(glb.document.nodes.iter().filter(|n| n.mesh.is_some()).count(), 8);
//! ```
//!
//! ## Feature Flags
//!
//! - `runtime` (default): [`ExportPipeline`], running encoders on the tokio
//!   blocking pool with one in-flight export per kind

pub mod config;
pub mod document;
pub mod error;
pub mod glb;
pub mod gltf;
pub mod pipeline;

pub use config::ExportConfig;
pub use document::{encode_json, BlocksDocument, DocumentMetrics, DOCUMENT_SCHEMA, DOCUMENT_VERSION};
pub use error::{ExportError, Result};
pub use glb::{decode_glb, encode_glb, GlbContents};
pub use pipeline::{encode, ExportArtifact, ExportKind};

#[cfg(feature = "runtime")]
pub use pipeline::{ExportPipeline, PendingExport};
