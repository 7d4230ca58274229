// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Draft commit rules for numeric input fields
//!
//! Input widgets hold raw text while the user types. When the field is
//! committed (blur / Enter) the text is classified here; only
//! [`DraftCommit::Value`] should reach [`crate::BlockStore::update_block`].

use crate::units::{from_display_length, UnitSystem};

/// Outcome of committing a draft
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DraftCommit<T> {
    /// Empty or a bare minus sign: drop the draft, show the stored value again
    Revert,
    /// Unparsable text: keep the draft as typed, do not touch the store
    Pending,
    /// Canonical value ready for the store
    Value(T),
}

impl<T> DraftCommit<T> {
    pub fn value(self) -> Option<T> {
        match self {
            DraftCommit::Value(v) => Some(v),
            _ => None,
        }
    }
}

/// Parse a leading float the way a lenient number field does (`"12.5m"` → 12.5)
fn parse_leading_float(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;
    let mut seen_exp = false;

    let bytes = text.as_bytes();
    while end < bytes.len() {
        let c = bytes[end];
        match c {
            b'0'..=b'9' => seen_digit = true,
            b'+' | b'-' if end == 0 => {}
            b'+' | b'-' if seen_exp && matches!(bytes[end - 1], b'e' | b'E') => {}
            b'.' if !seen_dot && !seen_exp => seen_dot = true,
            b'e' | b'E' if seen_digit && !seen_exp => seen_exp = true,
            _ => break,
        }
        end += 1;
    }

    // Back off a dangling exponent ("3e", "3e-")
    let mut candidate = &text[..end];
    while !candidate.is_empty() {
        if let Ok(v) = candidate.parse::<f64>() {
            return Some(v);
        }
        candidate = &candidate[..candidate.len() - 1];
    }
    None
}

fn classify(text: &str) -> DraftCommit<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed == "-" {
        return DraftCommit::Revert;
    }
    match parse_leading_float(trimmed) {
        Some(v) if v.is_finite() => DraftCommit::Value(v),
        _ => DraftCommit::Pending,
    }
}

/// Commit a length typed in `units`, returning canonical meters
pub fn commit_length(text: &str, units: UnitSystem) -> DraftCommit<f64> {
    match classify(text) {
        DraftCommit::Value(v) => DraftCommit::Value(from_display_length(v, units)),
        DraftCommit::Revert => DraftCommit::Revert,
        DraftCommit::Pending => DraftCommit::Pending,
    }
}

/// Commit a level count: rounded, clamped to at least one
pub fn commit_count(text: &str) -> DraftCommit<u32> {
    match classify(text) {
        DraftCommit::Value(v) => {
            let rounded = v.round().clamp(1.0, u32::MAX as f64);
            DraftCommit::Value(rounded as u32)
        }
        DraftCommit::Revert => DraftCommit::Revert,
        DraftCommit::Pending => DraftCommit::Pending,
    }
}
