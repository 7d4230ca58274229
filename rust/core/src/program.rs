// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Program (building function) catalog and display colors

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Designated use of a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Program {
    #[default]
    Office,
    Residential,
    Retail,
    Hospitality,
    Amenity,
    Parking,
}

impl Program {
    /// Every program in display order
    pub const ALL: [Program; 6] = [
        Program::Office,
        Program::Residential,
        Program::Retail,
        Program::Hospitality,
        Program::Amenity,
        Program::Parking,
    ];

    pub const COUNT: usize = Self::ALL.len();

    /// Position in [`Program::ALL`]
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Program::Office => "Office",
            Program::Residential => "Residential",
            Program::Retail => "Retail",
            Program::Hospitality => "Hospitality",
            Program::Amenity => "Amenity",
            Program::Parking => "Parking",
        }
    }

    /// Display color as `#rrggbb`
    pub fn color_hex(self) -> &'static str {
        match self {
            Program::Office => "#6366f1",
            Program::Residential => "#f59e0b",
            Program::Retail => "#ec4899",
            Program::Hospitality => "#14b8a6",
            Program::Amenity => "#22c55e",
            Program::Parking => "#94a3b8",
        }
    }

    /// Display color as sRGB bytes
    pub fn color_rgb(self) -> [u8; 3] {
        let hex = &self.color_hex()[1..];
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).unwrap_or(0);
        [channel(0), channel(2), channel(4)]
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Program {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Program::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownProgram(s.to_string()))
    }
}
