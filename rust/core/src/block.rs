// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Block records, partial patches and positional naming

use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

use crate::program::Program;

/// Default footprint width and depth (m)
pub const DEFAULT_FOOTPRINT: f64 = 24.0;
/// Default number of levels
pub const DEFAULT_LEVELS: u32 = 8;
/// Default level height (m)
pub const DEFAULT_LEVEL_HEIGHT: f64 = 3.6;
/// X offset between consecutively added blocks (m)
pub const BLOCK_SPACING: f64 = 8.0;

const ALPHABET: &[u8; 26] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Opaque, immutable block identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct BlockId(Uuid);

impl BlockId {
    /// Generate a fresh random identifier
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for BlockId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for BlockId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for BlockId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Spreadsheet-column style label for a zero-based index:
/// 0 → `Block A`, 25 → `Block Z`, 26 → `Block AA`.
pub fn block_label(index: usize) -> String {
    let mut letters = Vec::new();
    let mut current = index as i64;

    while current >= 0 {
        letters.push(ALPHABET[(current % 26) as usize]);
        current = current / 26 - 1;
    }
    letters.reverse();

    // ALPHABET is ASCII
    let label: String = letters.into_iter().map(char::from).collect();
    format!("Block {label}")
}

/// A rectangular massing volume repeated vertically into levels.
///
/// All lengths are canonical meters. `name` is owned by the store and
/// always reflects the block's position in the collection.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Block {
    pub id: BlockId,
    pub name: String,
    pub x_size: f64,
    pub y_size: f64,
    pub levels: u32,
    pub level_height: f64,
    pub pos_x: f64,
    pub pos_y: f64,
    /// Third placement offset; its visual axis is chosen by the presentation layer
    pub pos_z: f64,
    pub default_function: Program,
}

impl Block {
    /// Fresh block with default dimensions for the given collection index
    pub fn with_index(index: usize) -> Self {
        Self {
            id: BlockId::new(),
            name: block_label(index),
            x_size: DEFAULT_FOOTPRINT,
            y_size: DEFAULT_FOOTPRINT,
            levels: DEFAULT_LEVELS,
            level_height: DEFAULT_LEVEL_HEIGHT,
            pos_x: index as f64 * BLOCK_SPACING,
            pos_y: 0.0,
            pos_z: 0.0,
            default_function: Program::default(),
        }
    }

    /// Footprint area (m²)
    #[inline]
    pub fn footprint_area(&self) -> f64 {
        self.x_size * self.y_size
    }

    /// Gross floor area across all levels (m²)
    #[inline]
    pub fn gross_floor_area(&self) -> f64 {
        self.footprint_area() * self.levels as f64
    }

    /// Total height of the stacked levels (m)
    #[inline]
    pub fn total_height(&self) -> f64 {
        self.level_height * self.levels as f64
    }
}

/// Partial update for a block. `None` fields are left untouched.
///
/// Identity and name are not patchable: the id is immutable and the name
/// is derived from position.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct BlockPatch {
    pub x_size: Option<f64>,
    pub y_size: Option<f64>,
    pub levels: Option<u32>,
    pub level_height: Option<f64>,
    pub pos_x: Option<f64>,
    pub pos_y: Option<f64>,
    pub pos_z: Option<f64>,
    pub default_function: Option<Program>,
}

impl BlockPatch {
    pub fn is_empty(&self) -> bool {
        *self == BlockPatch::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_label_single_letters() {
        assert_eq!(block_label(0), "Block A");
        assert_eq!(block_label(1), "Block B");
        assert_eq!(block_label(25), "Block Z");
    }

    #[test]
    fn test_block_label_rolls_over_like_spreadsheet_columns() {
        assert_eq!(block_label(26), "Block AA");
        assert_eq!(block_label(27), "Block AB");
        assert_eq!(block_label(51), "Block AZ");
        assert_eq!(block_label(52), "Block BA");
        assert_eq!(block_label(701), "Block ZZ");
        assert_eq!(block_label(702), "Block AAA");
    }

    #[test]
    fn test_default_block() {
        let block = Block::with_index(0);
        assert_eq!(block.name, "Block A");
        assert_eq!(block.x_size, 24.0);
        assert_eq!(block.y_size, 24.0);
        assert_eq!(block.levels, 8);
        assert_eq!(block.level_height, 3.6);
        assert_eq!(block.pos_x, 0.0);
        assert_eq!(block.default_function, Program::Office);
        assert_eq!(block.gross_floor_area(), 4608.0);
    }

    #[test]
    fn test_default_block_offset_grows_with_index() {
        assert_eq!(Block::with_index(1).pos_x, 8.0);
        assert_eq!(Block::with_index(3).pos_x, 24.0);
    }

    #[test]
    fn test_block_ids_are_unique() {
        assert_ne!(Block::with_index(0).id, Block::with_index(0).id);
    }

    #[test]
    fn test_block_id_parse_round_trip() {
        let id = BlockId::new();
        let parsed: BlockId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_empty_patch() {
        assert!(BlockPatch::default().is_empty());
        let patch = BlockPatch {
            levels: Some(3),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }
}
