// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Committing raw input-field text to a block field

use std::str::FromStr;

use massing_core::{commit_count, commit_length, BlockId, BlockPatch, BlockStore, DraftCommit, Program};

/// What the input widget should do after a commit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftStatus {
    /// Store updated; show the stored value
    Committed,
    /// Discard the draft and show the stored value
    Revert,
    /// Keep the draft text as typed
    Pending,
    /// Unknown block id or field name
    Ignored,
}

impl DraftStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            DraftStatus::Committed => "committed",
            DraftStatus::Revert => "revert",
            DraftStatus::Pending => "pending",
            DraftStatus::Ignored => "ignored",
        }
    }
}

/// Numeric block fields an input widget can edit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    XSize,
    YSize,
    LevelHeight,
    PosX,
    PosY,
    PosZ,
    Levels,
    DefaultFunction,
}

impl Field {
    fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "xSize" => Field::XSize,
            "ySize" => Field::YSize,
            "levelHeight" => Field::LevelHeight,
            "posX" => Field::PosX,
            "posY" => Field::PosY,
            "posZ" => Field::PosZ,
            "levels" => Field::Levels,
            "defaultFunction" => Field::DefaultFunction,
            _ => return None,
        })
    }

    /// Sizes must stay strictly positive; offsets only finite
    fn accepts(self, value: f64) -> bool {
        match self {
            Field::XSize | Field::YSize | Field::LevelHeight => value.is_finite() && value > 0.0,
            _ => value.is_finite(),
        }
    }

    fn length_patch(self, value: f64) -> BlockPatch {
        let mut patch = BlockPatch::default();
        match self {
            Field::XSize => patch.x_size = Some(value),
            Field::YSize => patch.y_size = Some(value),
            Field::LevelHeight => patch.level_height = Some(value),
            Field::PosX => patch.pos_x = Some(value),
            Field::PosY => patch.pos_y = Some(value),
            Field::PosZ => patch.pos_z = Some(value),
            Field::Levels | Field::DefaultFunction => {}
        }
        patch
    }
}

/// Commit `text` typed into the `field` input of block `id`.
///
/// Lengths are read in the store's current display units. Field names use
/// the camelCase names of the block document. A value the store would
/// reject (zero or negative size) reverts the widget instead of committing.
pub fn apply_draft(store: &mut BlockStore, id: BlockId, field: &str, text: &str) -> DraftStatus {
    let Some(field) = Field::parse(field) else {
        return DraftStatus::Ignored;
    };
    if store.block(id).is_none() {
        return DraftStatus::Ignored;
    }

    let patch = match field {
        Field::Levels => match commit_count(text) {
            DraftCommit::Value(levels) => BlockPatch {
                levels: Some(levels),
                ..Default::default()
            },
            DraftCommit::Revert => return DraftStatus::Revert,
            DraftCommit::Pending => return DraftStatus::Pending,
        },
        Field::DefaultFunction => match Program::from_str(text) {
            Ok(program) => BlockPatch {
                default_function: Some(program),
                ..Default::default()
            },
            Err(_) => return DraftStatus::Revert,
        },
        _ => match commit_length(text, store.units()) {
            DraftCommit::Value(value) if field.accepts(value) => field.length_patch(value),
            DraftCommit::Value(_) | DraftCommit::Revert => return DraftStatus::Revert,
            DraftCommit::Pending => return DraftStatus::Pending,
        },
    };

    store.update_block(id, patch);
    DraftStatus::Committed
}
