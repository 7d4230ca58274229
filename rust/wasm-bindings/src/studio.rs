// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JavaScript API for the block studio
//!
//! ```javascript
//! const studio = new BlockStudio();
//! const id = studio.addBlock();
//! studio.updateBlock(id, { levels: 12, defaultFunction: "Residential" });
//! studio.setUnits("imperial");
//! console.log(studio.metrics().totalGfa);
//! const file = studio.exportGlb();
//! download(new Blob([file.bytes], { type: file.mimeType }), file.fileName);
//! ```

use std::collections::BTreeMap;

use massing_core::{
    format_number, BlockId, BlockPatch, BlockStore, MetricsCache, Program, UnitSystem,
};
use massing_export::{encode, BlocksDocument, ExportArtifact, ExportConfig, ExportKind};
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::draft::apply_draft;

/// Plain-object serializer: maps become objects rather than `Map`
fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsError> {
    let serializer = serde_wasm_bindgen::Serializer::new().serialize_maps_as_objects(true);
    Ok(value.serialize(&serializer)?)
}

fn parse_id(id: &str) -> Result<BlockId, JsError> {
    id.parse::<BlockId>()
        .map_err(|e| JsError::new(&format!("Invalid block id {id:?}: {e}")))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MetricsJs {
    units: UnitSystem,
    area_unit: &'static str,
    total_gfa: f64,
    total_gfa_label: String,
    total_levels: u64,
    gfa_by_function: BTreeMap<Program, f64>,
}

/// Encoded export, ready for a download link
#[wasm_bindgen]
pub struct ExportFile {
    file_name: String,
    mime_type: &'static str,
    bytes: Vec<u8>,
}

#[wasm_bindgen]
impl ExportFile {
    #[wasm_bindgen(getter, js_name = fileName)]
    pub fn file_name(&self) -> String {
        self.file_name.clone()
    }

    #[wasm_bindgen(getter, js_name = mimeType)]
    pub fn mime_type(&self) -> String {
        self.mime_type.to_string()
    }

    /// File contents as a fresh `Uint8Array`
    #[wasm_bindgen(getter)]
    pub fn bytes(&self) -> js_sys::Uint8Array {
        js_sys::Uint8Array::from(self.bytes.as_slice())
    }
}

impl From<ExportArtifact> for ExportFile {
    fn from(artifact: ExportArtifact) -> Self {
        Self {
            file_name: artifact.file_name,
            mime_type: artifact.mime_type,
            bytes: artifact.bytes.to_vec(),
        }
    }
}

/// Block model store with metrics and exports
#[wasm_bindgen]
pub struct BlockStudio {
    store: BlockStore,
    metrics: MetricsCache,
    config: ExportConfig,
}

#[wasm_bindgen]
impl BlockStudio {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        crate::init_panic_hook();
        Self {
            store: BlockStore::new(),
            metrics: MetricsCache::new(),
            config: ExportConfig::default(),
        }
    }

    /// Change counter, bumped by every mutation
    #[wasm_bindgen(getter)]
    pub fn revision(&self) -> f64 {
        self.store.revision() as f64
    }

    /// Append a default block; returns its id
    #[wasm_bindgen(js_name = addBlock)]
    pub fn add_block(&mut self) -> String {
        self.store.add_block().to_string()
    }

    /// Apply a partial update (`{ xSize?, levels?, defaultFunction?, ... }`,
    /// canonical meters). Returns false for unknown ids.
    #[wasm_bindgen(js_name = updateBlock)]
    pub fn update_block(&mut self, id: &str, patch: JsValue) -> Result<bool, JsError> {
        let id = parse_id(id)?;
        let patch: BlockPatch = serde_wasm_bindgen::from_value(patch)?;
        Ok(self.store.update_block(id, patch))
    }

    /// Commit raw input text for one field, read in the current units.
    /// Returns `"committed"`, `"revert"`, `"pending"` or `"ignored"`.
    #[wasm_bindgen(js_name = commitDraft)]
    pub fn commit_draft(&mut self, id: &str, field: &str, text: &str) -> Result<String, JsError> {
        let id = parse_id(id)?;
        Ok(apply_draft(&mut self.store, id, field, text).as_str().to_string())
    }

    #[wasm_bindgen(js_name = removeBlock)]
    pub fn remove_block(&mut self, id: &str) -> Result<bool, JsError> {
        Ok(self.store.remove_block(parse_id(id)?))
    }

    /// Switch display units (`"metric"` or `"imperial"`)
    #[wasm_bindgen(js_name = setUnits)]
    pub fn set_units(&mut self, units: &str) -> Result<bool, JsError> {
        let units: UnitSystem = units.parse()?;
        Ok(self.store.set_units(units))
    }

    /// Blocks in order, canonical meters
    pub fn blocks(&self) -> Result<JsValue, JsError> {
        to_js(&self.store.blocks())
    }

    #[wasm_bindgen(getter)]
    pub fn units(&self) -> String {
        self.store.units().as_str().to_string()
    }

    /// Metrics in the current display units
    pub fn metrics(&mut self) -> Result<JsValue, JsError> {
        let units = self.store.units();
        let display = self.metrics.get(&self.store).to_display(units);
        to_js(&MetricsJs {
            units,
            area_unit: display.area_label,
            total_gfa_label: format!("{} {}", format_number(display.total_gfa, 0), display.area_label),
            total_gfa: display.total_gfa,
            total_levels: display.total_levels,
            gfa_by_function: display.gfa_by_function,
        })
    }

    #[wasm_bindgen(js_name = exportGlb)]
    pub fn export_glb(&self) -> Result<ExportFile, JsError> {
        Ok(encode(ExportKind::Glb, &self.store.snapshot(), &self.config)?.into())
    }

    #[wasm_bindgen(js_name = exportJson)]
    pub fn export_json(&self) -> Result<ExportFile, JsError> {
        Ok(encode(ExportKind::Json, &self.store.snapshot(), &self.config)?.into())
    }

    /// Replace the whole model with a previously exported JSON document
    #[wasm_bindgen(js_name = importJson)]
    pub fn import_json(&mut self, json: &str) -> Result<(), JsError> {
        self.store = BlocksDocument::from_json(json)?.into_store()?;
        // revisions restart with the new store
        self.metrics = MetricsCache::new();
        Ok(())
    }
}

impl Default for BlockStudio {
    fn default() -> Self {
        Self::new()
    }
}
