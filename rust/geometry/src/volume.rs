// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Level volumes - expanding a block into its stacked floors
//!
//! A block with `n` levels becomes `n` boxes of identical footprint. Level
//! `i` is centered at `level_height * i + level_height / 2` above the block
//! base, so consecutive levels touch with no gap and no setback.
//!
//! The model keeps `pos_z` as an opaque third offset. The vertical axis is
//! only chosen when a volume is placed into a concrete coordinate system
//! through [`UpAxis`].

use massing_core::{Block, BlockId, Program};
use nalgebra::{Point3, Vector3};

/// Coordinate convention used when placing volumes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpAxis {
    /// Y-up (glTF, three.js): model `(x, y, z)` → `(x, z, y)`
    #[default]
    Y,
    /// Z-up: model order unchanged
    Z,
}

impl UpAxis {
    /// Map a model-space triple `(x, y, vertical)` into this convention
    #[inline]
    pub fn map(self, x: f64, y: f64, vertical: f64) -> Vector3<f64> {
        match self {
            UpAxis::Y => Vector3::new(x, vertical, y),
            UpAxis::Z => Vector3::new(x, y, vertical),
        }
    }
}

/// One floor of a block
#[derive(Debug, Clone, PartialEq)]
pub struct LevelVolume {
    pub block_id: BlockId,
    pub program: Program,
    /// Zero-based level index within the block
    pub level: u32,
    /// Block base offset `(pos_x, pos_y, pos_z)`
    pub base: Point3<f64>,
    /// Vertical center relative to the block base
    pub elevation: f64,
    pub x_size: f64,
    pub y_size: f64,
    pub height: f64,
}

impl LevelVolume {
    /// Center relative to the block base, in the given convention
    #[inline]
    pub fn local_center(&self, up: UpAxis) -> Vector3<f64> {
        up.map(0.0, 0.0, self.elevation)
    }

    /// Block base offset in the given convention
    #[inline]
    pub fn base_offset(&self, up: UpAxis) -> Vector3<f64> {
        up.map(self.base.x, self.base.y, self.base.z)
    }
}

/// Expand a block into one volume per level, bottom to top
pub fn level_volumes(block: &Block) -> Vec<LevelVolume> {
    let base = Point3::new(block.pos_x, block.pos_y, block.pos_z);
    let h = block.level_height;

    (0..block.levels)
        .map(|level| LevelVolume {
            block_id: block.id,
            program: block.default_function,
            level,
            base,
            elevation: h * level as f64 + h / 2.0,
            x_size: block.x_size,
            y_size: block.y_size,
            height: h,
        })
        .collect()
}
