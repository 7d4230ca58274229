// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Gross floor area and level metrics
//!
//! Metrics are a pure function of the block collection. Nothing here is
//! stored on the model: consumers either call [`calculate_metrics`]
//! directly or keep a [`MetricsCache`] keyed on the store revision.

use std::collections::BTreeMap;

use crate::block::Block;
use crate::program::Program;
use crate::store::BlockStore;
use crate::units::{to_display_area, UnitSystem};

/// Aggregate metrics in canonical units (m²)
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct MetricsSnapshot {
    pub total_gfa: f64,
    pub total_levels: u64,
    /// One entry per program, zero when unused
    pub gfa_by_function: BTreeMap<Program, f64>,
}

impl MetricsSnapshot {
    fn empty() -> Self {
        Self {
            total_gfa: 0.0,
            total_levels: 0,
            gfa_by_function: Program::ALL.into_iter().map(|p| (p, 0.0)).collect(),
        }
    }

    /// GFA for one program (m²)
    pub fn gfa_for(&self, program: Program) -> f64 {
        self.gfa_by_function.get(&program).copied().unwrap_or(0.0)
    }

    /// Convert areas into the given display unit system
    pub fn to_display(&self, units: UnitSystem) -> DisplayMetrics {
        DisplayMetrics {
            units,
            area_label: units.area_label(),
            total_gfa: to_display_area(self.total_gfa, units),
            total_levels: self.total_levels,
            gfa_by_function: self
                .gfa_by_function
                .iter()
                .map(|(program, area)| (*program, to_display_area(*area, units)))
                .collect(),
        }
    }
}

/// Metrics expressed in a display unit system
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayMetrics {
    pub units: UnitSystem,
    pub area_label: &'static str,
    pub total_gfa: f64,
    pub total_levels: u64,
    pub gfa_by_function: BTreeMap<Program, f64>,
}

/// Compute metrics for a block collection
pub fn calculate_metrics(blocks: &[Block]) -> MetricsSnapshot {
    blocks.iter().fold(MetricsSnapshot::empty(), |mut acc, block| {
        let gfa = block.gross_floor_area();
        acc.total_gfa += gfa;
        acc.total_levels += u64::from(block.levels);
        *acc.gfa_by_function
            .entry(block.default_function)
            .or_insert(0.0) += gfa;
        acc
    })
}

/// Memoized metrics, recomputed only when the store revision moves
#[derive(Debug, Default)]
pub struct MetricsCache {
    cached: Option<(u64, MetricsSnapshot)>,
}

impl MetricsCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current metrics for `store`
    pub fn get(&mut self, store: &BlockStore) -> &MetricsSnapshot {
        let revision = store.revision();
        if self.is_stale(store) {
            self.cached = None;
        }
        let (_, snapshot) = self.cached.get_or_insert_with(|| {
            tracing::trace!(revision, "Recomputing metrics");
            (revision, calculate_metrics(store.blocks()))
        });
        snapshot
    }

    /// Whether the next [`MetricsCache::get`] would recompute
    pub fn is_stale(&self, store: &BlockStore) -> bool {
        !matches!(&self.cached, Some((rev, _)) if *rev == store.revision())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockPatch;
    use approx::assert_relative_eq;

    fn block(x: f64, y: f64, levels: u32, program: Program) -> Block {
        Block {
            x_size: x,
            y_size: y,
            levels,
            default_function: program,
            ..Block::with_index(0)
        }
    }

    #[test]
    fn test_single_default_block() {
        let metrics = calculate_metrics(&[Block::with_index(0)]);
        assert_eq!(metrics.total_gfa, 4608.0);
        assert_eq!(metrics.total_levels, 8);
        assert_eq!(metrics.gfa_for(Program::Office), 4608.0);
    }

    #[test]
    fn test_every_program_is_queryable() {
        let metrics = calculate_metrics(&[Block::with_index(0)]);
        assert_eq!(metrics.gfa_by_function.len(), Program::COUNT);
        assert_eq!(metrics.gfa_for(Program::Parking), 0.0);
    }

    #[test]
    fn test_by_function_sums_to_total() {
        let blocks = vec![
            block(10.0, 20.0, 3, Program::Office),
            block(12.5, 8.0, 7, Program::Residential),
            block(30.0, 30.0, 1, Program::Retail),
            block(4.0, 4.0, 2, Program::Residential),
        ];
        let metrics = calculate_metrics(&blocks);

        let expected: f64 = blocks
            .iter()
            .map(|b| b.x_size * b.y_size * b.levels as f64)
            .sum();
        assert_eq!(metrics.total_gfa, expected);
        assert_eq!(metrics.total_levels, 13);
        assert_eq!(metrics.gfa_for(Program::Residential), 700.0 + 32.0);

        let by_function: f64 = metrics.gfa_by_function.values().sum();
        assert_relative_eq!(by_function, metrics.total_gfa);
    }

    #[test]
    fn test_display_metrics_imperial() {
        let metrics = calculate_metrics(&[Block::with_index(0), Block::with_index(1)]);
        let display = metrics.to_display(UnitSystem::Imperial);
        assert_eq!(display.area_label, "ft²");
        assert_relative_eq!(display.total_gfa, 9216.0 * 3.28084 * 3.28084, epsilon = 1e-6);
        assert_eq!(display.total_levels, 16);
        assert_eq!(crate::units::format_number(display.total_gfa, 0), "99,200");
    }

    #[test]
    fn test_cache_tracks_revision() {
        let mut store = BlockStore::new();
        let mut cache = MetricsCache::new();

        assert!(cache.is_stale(&store));
        assert_eq!(cache.get(&store).total_gfa, 4608.0);
        assert!(!cache.is_stale(&store));

        let id = store.blocks()[0].id;
        store.update_block(
            id,
            BlockPatch {
                levels: Some(2),
                ..Default::default()
            },
        );
        assert!(cache.is_stale(&store));
        assert_eq!(cache.get(&store).total_gfa, 1152.0);
    }
}
