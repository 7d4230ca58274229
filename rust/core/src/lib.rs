// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Massing Core
//!
//! Parametric block model for early-stage building massing.
//!
//! ## Overview
//!
//! This crate owns the data side of the massing tool:
//!
//! - **Block Model Store**: ordered, never-empty collection of rectangular
//!   blocks with positional names (`Block A`, `Block B`, ...)
//! - **Unit Conversion**: canonical meters to metric / imperial display units
//! - **Metrics**: gross floor area and level totals, grouped by program
//! - **Input commits**: classification of raw text typed into number fields
//!
//! ## Quick Start
//!
//! ```rust
//! use massing_core::{BlockPatch, BlockStore, Program, UnitSystem};
//!
//! let mut store = BlockStore::new();
//! let tower = store.add_block();
//! store.update_block(tower, BlockPatch {
//!     levels: Some(20),
//!     default_function: Some(Program::Residential),
//!     ..Default::default()
//! });
//!
//! let metrics = store.metrics();
//! assert_eq!(metrics.total_gfa, 24.0 * 24.0 * 8.0 + 24.0 * 24.0 * 20.0);
//!
//! store.set_units(UnitSystem::Imperial);
//! let display = metrics.to_display(store.units());
//! assert_eq!(display.area_label, "ft²");
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization support for blocks, patches and metrics

pub mod block;
pub mod error;
pub mod input;
pub mod metrics;
pub mod program;
pub mod store;
pub mod units;

pub use block::{block_label, Block, BlockId, BlockPatch};
pub use error::{Error, Result};
pub use input::{commit_count, commit_length, DraftCommit};
pub use metrics::{calculate_metrics, DisplayMetrics, MetricsCache, MetricsSnapshot};
pub use program::Program;
pub use store::{BlockStore, StoreSnapshot};
pub use units::{
    format_number, from_display_area, from_display_length, to_display_area, to_display_length,
    UnitSystem, FEET_PER_METER,
};
