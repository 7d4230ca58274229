// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Block Model Store
//!
//! The store is the single owner of the ordered block collection and the
//! active display unit system. Every mutation leaves the collection in a
//! valid state before returning:
//!
//! - the collection is never empty
//! - names always match positions (`Block A`, `Block B`, ...)
//! - sizes and heights stay finite and strictly positive, levels ≥ 1
//!
//! Consumers observe changes through [`BlockStore::revision`], which moves
//! on every mutation that changes state.

use rustc_hash::FxHashSet;

use crate::block::{block_label, Block, BlockId, BlockPatch};
use crate::error::{Error, Result};
use crate::metrics::{calculate_metrics, MetricsSnapshot};
use crate::units::UnitSystem;

/// Owned copy of the model at one point in time
#[derive(Debug, Clone, PartialEq)]
pub struct StoreSnapshot {
    pub blocks: Vec<Block>,
    pub units: UnitSystem,
}

impl StoreSnapshot {
    /// Metrics for the captured blocks
    pub fn metrics(&self) -> MetricsSnapshot {
        calculate_metrics(&self.blocks)
    }

    /// Total number of levels across all captured blocks
    pub fn level_count(&self) -> usize {
        self.blocks.iter().map(|b| b.levels as usize).sum()
    }
}

/// Authoritative block collection
#[derive(Debug, Clone)]
pub struct BlockStore {
    blocks: Vec<Block>,
    units: UnitSystem,
    revision: u64,
}

impl BlockStore {
    /// Store holding a single default block, metric units
    pub fn new() -> Self {
        Self {
            blocks: vec![Block::with_index(0)],
            units: UnitSystem::default(),
            revision: 0,
        }
    }

    /// Rebuild a store from a snapshot, validating every block.
    ///
    /// Names in the snapshot are ignored and re-derived from order.
    pub fn from_snapshot(snapshot: StoreSnapshot) -> Result<Self> {
        if snapshot.blocks.is_empty() {
            return Err(Error::EmptyCollection);
        }

        let mut seen = FxHashSet::default();
        for block in &snapshot.blocks {
            validate_block(block)?;
            if !seen.insert(block.id) {
                return Err(Error::DuplicateId(block.id));
            }
        }

        let mut store = Self {
            blocks: snapshot.blocks,
            units: snapshot.units,
            revision: 0,
        };
        store.reindex();
        tracing::debug!(count = store.blocks.len(), units = %store.units, "Restored block store");
        Ok(store)
    }

    // ---- reads ----

    /// Blocks in collection order
    #[inline]
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id == id)
    }

    #[inline]
    pub fn units(&self) -> UnitSystem {
        self.units
    }

    /// Change counter; bumps on every mutation that alters state
    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Always false: the collection is never empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Fresh metrics for the current collection
    pub fn metrics(&self) -> MetricsSnapshot {
        calculate_metrics(&self.blocks)
    }

    /// Owned copy of blocks and units for exports
    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            blocks: self.blocks.clone(),
            units: self.units,
        }
    }

    // ---- mutations ----

    /// Append a default block placed after the existing ones
    pub fn add_block(&mut self) -> BlockId {
        let block = Block::with_index(self.blocks.len());
        let id = block.id;
        self.blocks.push(block);
        self.reindex();
        self.touch();
        tracing::debug!(%id, count = self.blocks.len(), revision = self.revision, "Added block");
        id
    }

    /// Apply the fields present in `patch` to block `id`.
    ///
    /// Returns `false` when no block has that id. Invalid values (non-finite,
    /// non-positive sizes) are dropped and `levels` is clamped to ≥ 1.
    pub fn update_block(&mut self, id: BlockId, patch: BlockPatch) -> bool {
        let Some(block) = self.blocks.iter_mut().find(|b| b.id == id) else {
            tracing::debug!(%id, "Ignoring update for unknown block");
            return false;
        };

        apply_patch(block, patch);
        self.reindex();
        self.touch();
        tracing::debug!(%id, revision = self.revision, "Updated block");
        true
    }

    /// Remove block `id`. Removing the last block resets the collection to
    /// a single fresh default block.
    pub fn remove_block(&mut self, id: BlockId) -> bool {
        let before = self.blocks.len();
        self.blocks.retain(|b| b.id != id);
        if self.blocks.len() == before {
            tracing::debug!(%id, "Ignoring removal of unknown block");
            return false;
        }

        if self.blocks.is_empty() {
            self.blocks.push(Block::with_index(0));
            tracing::debug!(%id, "Removed last block, reset to default");
        }
        self.reindex();
        self.touch();
        tracing::debug!(%id, count = self.blocks.len(), revision = self.revision, "Removed block");
        true
    }

    /// Switch the display unit system. No-op when unchanged.
    pub fn set_units(&mut self, units: UnitSystem) -> bool {
        if self.units == units {
            return false;
        }
        self.units = units;
        self.touch();
        tracing::debug!(%units, revision = self.revision, "Changed units");
        true
    }

    /// Re-derive every block name from its position
    fn reindex(&mut self) {
        for (index, block) in self.blocks.iter_mut().enumerate() {
            block.name = block_label(index);
        }
    }

    #[inline]
    fn touch(&mut self) {
        self.revision += 1;
    }
}

impl Default for BlockStore {
    fn default() -> Self {
        Self::new()
    }
}

fn apply_patch(block: &mut Block, patch: BlockPatch) {
    let id = block.id;
    let positive = |field: &'static str, value: f64| {
        let ok = value.is_finite() && value > 0.0;
        if !ok {
            tracing::warn!(%id, field, value, "Dropping non-positive patch value");
        }
        ok
    };
    let finite = |field: &'static str, value: f64| {
        let ok = value.is_finite();
        if !ok {
            tracing::warn!(%id, field, value, "Dropping non-finite patch value");
        }
        ok
    };

    if let Some(v) = patch.x_size.filter(|v| positive("xSize", *v)) {
        block.x_size = v;
    }
    if let Some(v) = patch.y_size.filter(|v| positive("ySize", *v)) {
        block.y_size = v;
    }
    if let Some(v) = patch.level_height.filter(|v| positive("levelHeight", *v)) {
        block.level_height = v;
    }
    if let Some(v) = patch.levels {
        block.levels = v.max(1);
    }
    if let Some(v) = patch.pos_x.filter(|v| finite("posX", *v)) {
        block.pos_x = v;
    }
    if let Some(v) = patch.pos_y.filter(|v| finite("posY", *v)) {
        block.pos_y = v;
    }
    if let Some(v) = patch.pos_z.filter(|v| finite("posZ", *v)) {
        block.pos_z = v;
    }
    if let Some(program) = patch.default_function {
        block.default_function = program;
    }
}

fn validate_block(block: &Block) -> Result<()> {
    let sizes = [
        ("xSize", block.x_size),
        ("ySize", block.y_size),
        ("levelHeight", block.level_height),
    ];
    for (field, value) in sizes {
        if !(value.is_finite() && value > 0.0) {
            return Err(Error::InvalidDimension {
                id: block.id,
                field,
                value,
            });
        }
    }

    let offsets = [
        ("posX", block.pos_x),
        ("posY", block.pos_y),
        ("posZ", block.pos_z),
    ];
    for (field, value) in offsets {
        if !value.is_finite() {
            return Err(Error::InvalidDimension {
                id: block.id,
                field,
                value,
            });
        }
    }

    if block.levels == 0 {
        return Err(Error::InvalidLevels(block.id));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::Program;

    fn names(store: &BlockStore) -> Vec<String> {
        store.blocks().iter().map(|b| b.name.clone()).collect()
    }

    #[test]
    fn test_new_store_has_one_default_block() {
        let store = BlockStore::new();
        assert_eq!(store.len(), 1);
        assert_eq!(store.units(), UnitSystem::Metric);
        assert_eq!(store.blocks()[0].name, "Block A");
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn test_add_block_appends_with_offset_and_name() {
        let mut store = BlockStore::new();
        let id = store.add_block();
        let added = store.block(id).unwrap();
        assert_eq!(added.name, "Block B");
        assert_eq!(added.pos_x, 8.0);
        assert_eq!(store.len(), 2);
        assert_eq!(store.revision(), 1);
    }

    #[test]
    fn test_update_applies_only_present_fields() {
        let mut store = BlockStore::new();
        let id = store.blocks()[0].id;
        let before = store.blocks()[0].clone();

        assert!(store.update_block(
            id,
            BlockPatch {
                x_size: Some(30.0),
                default_function: Some(Program::Retail),
                ..Default::default()
            },
        ));

        let after = store.block(id).unwrap();
        assert_eq!(after.x_size, 30.0);
        assert_eq!(after.default_function, Program::Retail);
        assert_eq!(after.y_size, before.y_size);
        assert_eq!(after.levels, before.levels);
        assert_eq!(after.level_height, before.level_height);
        assert_eq!(after.pos_x, before.pos_x);
        assert_eq!(after.name, "Block A");
    }

    #[test]
    fn test_update_unknown_id_is_noop() {
        let mut store = BlockStore::new();
        let before = store.blocks().to_vec();
        assert!(!store.update_block(BlockId::new(), BlockPatch::default()));
        assert_eq!(store.blocks(), &before[..]);
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn test_update_sanitizes_invalid_values() {
        let mut store = BlockStore::new();
        let id = store.blocks()[0].id;
        store.update_block(
            id,
            BlockPatch {
                x_size: Some(-4.0),
                y_size: Some(f64::NAN),
                level_height: Some(0.0),
                levels: Some(0),
                pos_x: Some(f64::INFINITY),
                pos_z: Some(-6.0),
                ..Default::default()
            },
        );
        let block = store.block(id).unwrap();
        assert_eq!(block.x_size, 24.0);
        assert_eq!(block.y_size, 24.0);
        assert_eq!(block.level_height, 3.6);
        assert_eq!(block.levels, 1);
        assert_eq!(block.pos_x, 0.0);
        assert_eq!(block.pos_z, -6.0);
    }

    #[test]
    fn test_remove_reassigns_names() {
        let mut store = BlockStore::new();
        let b = store.add_block();
        let c = store.add_block();
        assert_eq!(names(&store), ["Block A", "Block B", "Block C"]);

        assert!(store.remove_block(b));
        assert_eq!(names(&store), ["Block A", "Block B"]);
        assert_eq!(store.blocks()[1].id, c);
    }

    #[test]
    fn test_removing_last_block_resets_to_default() {
        let mut store = BlockStore::new();
        let only = store.blocks()[0].id;
        store.update_block(
            only,
            BlockPatch {
                levels: Some(20),
                ..Default::default()
            },
        );

        assert!(store.remove_block(only));
        assert_eq!(store.len(), 1);
        let fresh = &store.blocks()[0];
        assert_ne!(fresh.id, only);
        assert_eq!(fresh.name, "Block A");
        assert_eq!(fresh.levels, 8);
        assert_eq!(fresh.pos_x, 0.0);
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let mut store = BlockStore::new();
        assert!(!store.remove_block(BlockId::new()));
        assert_eq!(store.len(), 1);
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn test_set_units_only_when_changed() {
        let mut store = BlockStore::new();
        assert!(!store.set_units(UnitSystem::Metric));
        assert_eq!(store.revision(), 0);
        assert!(store.set_units(UnitSystem::Imperial));
        assert_eq!(store.revision(), 1);
        assert!(!store.set_units(UnitSystem::Imperial));
        assert_eq!(store.revision(), 1);
    }

    #[test]
    fn test_units_do_not_touch_canonical_values() {
        let mut store = BlockStore::new();
        let before = store.blocks().to_vec();
        store.set_units(UnitSystem::Imperial);
        assert_eq!(store.blocks(), &before[..]);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut store = BlockStore::new();
        let snapshot = store.snapshot();
        store.add_block();
        assert_eq!(snapshot.blocks.len(), 1);
        assert_eq!(snapshot.level_count(), 8);
    }

    #[test]
    fn test_from_snapshot_rederives_names() {
        let mut a = Block::with_index(0);
        let mut b = Block::with_index(1);
        a.name = "Tower".into();
        b.name = "Podium".into();
        let store = BlockStore::from_snapshot(StoreSnapshot {
            blocks: vec![b.clone(), a.clone()],
            units: UnitSystem::Imperial,
        })
        .unwrap();
        assert_eq!(names(&store), ["Block A", "Block B"]);
        assert_eq!(store.blocks()[0].id, b.id);
        assert_eq!(store.units(), UnitSystem::Imperial);
    }

    #[test]
    fn test_from_snapshot_rejects_invalid() {
        let empty = StoreSnapshot {
            blocks: vec![],
            units: UnitSystem::Metric,
        };
        assert!(matches!(
            BlockStore::from_snapshot(empty),
            Err(Error::EmptyCollection)
        ));

        let mut bad = Block::with_index(0);
        bad.level_height = -1.0;
        let result = BlockStore::from_snapshot(StoreSnapshot {
            blocks: vec![bad],
            units: UnitSystem::Metric,
        });
        assert!(matches!(
            result,
            Err(Error::InvalidDimension { field: "levelHeight", .. })
        ));

        let mut flat = Block::with_index(0);
        flat.levels = 0;
        assert!(matches!(
            BlockStore::from_snapshot(StoreSnapshot {
                blocks: vec![flat],
                units: UnitSystem::Metric,
            }),
            Err(Error::InvalidLevels(_))
        ));

        let dup = Block::with_index(0);
        assert!(matches!(
            BlockStore::from_snapshot(StoreSnapshot {
                blocks: vec![dup.clone(), dup],
                units: UnitSystem::Metric,
            }),
            Err(Error::DuplicateId(_))
        ));
    }
}
