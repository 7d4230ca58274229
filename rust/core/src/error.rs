// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for block model validation.

use crate::block::BlockId;

/// Result type alias for block model operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised when external data is turned into a block collection.
///
/// Store mutations never fail; these only surface when a collection is
/// rebuilt from a snapshot or parsed text.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A block collection must hold at least one block.
    #[error("block collection is empty")]
    EmptyCollection,

    /// A size, height or offset is non-finite, or a size/height is not positive.
    #[error("invalid {field} on block {id}: {value}")]
    InvalidDimension {
        id: BlockId,
        field: &'static str,
        value: f64,
    },

    /// Level count must be at least one.
    #[error("block {0} must have at least one level")]
    InvalidLevels(BlockId),

    /// Two blocks share the same identifier.
    #[error("duplicate block id: {0}")]
    DuplicateId(BlockId),

    /// Unit system name was not recognised.
    #[error("unknown unit system: {0}")]
    UnknownUnits(String),

    /// Program name was not recognised.
    #[error("unknown program: {0}")]
    UnknownProgram(String),
}
