// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Structured JSON document of the block collection
//!
//! ```json
//! {
//!   "schema": "massing-blocks",
//!   "version": 1,
//!   "units": "metric",
//!   "blocks": [{ "id": "...", "name": "Block A", "xSize": 24.0, ... }],
//!   "metrics": { "areaUnit": "m²", "totalGfa": 4608.0, ... }
//! }
//! ```
//!
//! Block fields are always canonical meters. Metrics are in the display
//! units of the document and are informational only: they are recomputed
//! on import.

use std::collections::BTreeMap;

use massing_core::{Block, BlockStore, Program, StoreSnapshot, UnitSystem};
use serde::{Deserialize, Serialize};

use crate::config::ExportConfig;
use crate::error::{ExportError, Result};

pub const DOCUMENT_SCHEMA: &str = "massing-blocks";
pub const DOCUMENT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlocksDocument {
    pub schema: String,
    pub version: u32,
    pub units: UnitSystem,
    pub blocks: Vec<Block>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<DocumentMetrics>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetrics {
    pub area_unit: String,
    pub length_unit: String,
    pub total_gfa: f64,
    pub total_levels: u64,
    pub gfa_by_function: BTreeMap<Program, f64>,
}

impl BlocksDocument {
    pub fn from_snapshot(snapshot: &StoreSnapshot) -> Self {
        let display = snapshot.metrics().to_display(snapshot.units);
        Self {
            schema: DOCUMENT_SCHEMA.to_string(),
            version: DOCUMENT_VERSION,
            units: snapshot.units,
            blocks: snapshot.blocks.clone(),
            metrics: Some(DocumentMetrics {
                area_unit: display.area_label.to_string(),
                length_unit: snapshot.units.length_label().to_string(),
                total_gfa: display.total_gfa,
                total_levels: display.total_levels,
                gfa_by_function: display.gfa_by_function,
            }),
        }
    }

    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }

    /// Parse a document, rejecting unknown schemas and versions
    pub fn from_json(json: &str) -> Result<Self> {
        let document: Self = serde_json::from_str(json)?;
        if document.schema != DOCUMENT_SCHEMA || document.version != DOCUMENT_VERSION {
            return Err(ExportError::UnsupportedSchema {
                schema: document.schema,
                version: document.version,
            });
        }
        Ok(document)
    }

    pub fn into_snapshot(self) -> StoreSnapshot {
        StoreSnapshot {
            blocks: self.blocks,
            units: self.units,
        }
    }

    /// Rebuild a validated store with the document's blocks and units
    pub fn into_store(self) -> Result<BlockStore> {
        Ok(BlockStore::from_snapshot(self.into_snapshot())?)
    }
}

/// Serialize the snapshot as a blocks document
pub fn encode_json(snapshot: &StoreSnapshot, config: &ExportConfig) -> Result<Vec<u8>> {
    let mut json = BlocksDocument::from_snapshot(snapshot).to_json(config.pretty_json)?;
    json.push('\n');
    Ok(json.into_bytes())
}
