// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Display unit systems and conversion from canonical meters
//!
//! The block model always stores meters. Everything in this module maps
//! those canonical values into the unit system the user is looking at,
//! and back again when a value is committed from an input field.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Feet per meter
pub const FEET_PER_METER: f64 = 3.28084;

/// Presentation unit system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    pub const ALL: [UnitSystem; 2] = [UnitSystem::Metric, UnitSystem::Imperial];

    /// Short label for lengths
    pub fn length_label(self) -> &'static str {
        match self {
            UnitSystem::Metric => "m",
            UnitSystem::Imperial => "ft",
        }
    }

    /// Short label for areas
    pub fn area_label(self) -> &'static str {
        match self {
            UnitSystem::Metric => "m²",
            UnitSystem::Imperial => "ft²",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            UnitSystem::Metric => "metric",
            UnitSystem::Imperial => "imperial",
        }
    }

    /// Linear factor from meters to this unit system
    #[inline]
    fn length_factor(self) -> f64 {
        match self {
            UnitSystem::Metric => 1.0,
            UnitSystem::Imperial => FEET_PER_METER,
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnitSystem {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "metric" => Ok(UnitSystem::Metric),
            "imperial" => Ok(UnitSystem::Imperial),
            _ => Err(Error::UnknownUnits(s.to_string())),
        }
    }
}

/// Convert a canonical length (meters) to display units
#[inline]
pub fn to_display_length(value: f64, unit: UnitSystem) -> f64 {
    value * unit.length_factor()
}

/// Convert a display length back to canonical meters
#[inline]
pub fn from_display_length(value: f64, unit: UnitSystem) -> f64 {
    value / unit.length_factor()
}

/// Convert a canonical area (square meters) to display units.
/// Areas scale with the square of the linear factor.
#[inline]
pub fn to_display_area(value: f64, unit: UnitSystem) -> f64 {
    let factor = unit.length_factor();
    value * factor * factor
}

/// Convert a display area back to canonical square meters
#[inline]
pub fn from_display_area(value: f64, unit: UnitSystem) -> f64 {
    let factor = unit.length_factor();
    value / (factor * factor)
}

/// Format a number with `,` thousands grouping and at most
/// `max_fraction_digits` fractional digits (trailing zeros trimmed).
///
/// ```
/// use massing_core::units::format_number;
///
/// assert_eq!(format_number(99190.43, 1), "99,190.4");
/// assert_eq!(format_number(4608.0, 1), "4,608");
/// assert_eq!(format_number(-1234.5, 0), "-1,235");
/// ```
pub fn format_number(value: f64, max_fraction_digits: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let scale = 10f64.powi(max_fraction_digits as i32);
    // f64::round is half away from zero
    let rounded = (value.abs() * scale).round() / scale;
    let negative = value < 0.0 && rounded != 0.0;

    let fixed = format!("{:.*}", max_fraction_digits, rounded);
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((int_part, frac)) => (int_part, frac.trim_end_matches('0')),
        None => (fixed.as_str(), ""),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3 + 2);
    if negative {
        grouped.push('-');
    }
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if !frac_part.is_empty() {
        grouped.push('.');
        grouped.push_str(frac_part);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_metric_is_identity() {
        assert_eq!(to_display_length(12.5, UnitSystem::Metric), 12.5);
        assert_eq!(from_display_length(12.5, UnitSystem::Metric), 12.5);
        assert_eq!(to_display_area(576.0, UnitSystem::Metric), 576.0);
    }

    #[test]
    fn test_imperial_length() {
        assert_relative_eq!(to_display_length(1.0, UnitSystem::Imperial), 3.28084);
        assert_relative_eq!(from_display_length(3.28084, UnitSystem::Imperial), 1.0);
    }

    #[test]
    fn test_imperial_area_scales_quadratically() {
        let sq_ft = to_display_area(1.0, UnitSystem::Imperial);
        assert_relative_eq!(sq_ft, 3.28084 * 3.28084, epsilon = 1e-12);
        // A linear factor here would be the classic mistake
        assert!((sq_ft - FEET_PER_METER).abs() > 1.0);
    }

    #[test]
    fn test_round_trip() {
        for unit in UnitSystem::ALL {
            for x in [0.0, 0.001, 1.0, 3.6, 24.0, 1234.5678, -42.0] {
                let back = from_display_length(to_display_length(x, unit), unit);
                assert!((back - x).abs() < 1e-6, "{unit}: {x} -> {back}");
                let back = from_display_area(to_display_area(x, unit), unit);
                assert!((back - x).abs() < 1e-6, "{unit}: {x} -> {back}");
            }
        }
    }

    #[test]
    fn test_labels() {
        assert_eq!(UnitSystem::Metric.length_label(), "m");
        assert_eq!(UnitSystem::Imperial.length_label(), "ft");
        assert_eq!(UnitSystem::Metric.area_label(), "m²");
        assert_eq!(UnitSystem::Imperial.area_label(), "ft²");
    }

    #[test]
    fn test_parse_unit_system() {
        assert_eq!("metric".parse::<UnitSystem>().unwrap(), UnitSystem::Metric);
        assert_eq!(" Imperial ".parse::<UnitSystem>().unwrap(), UnitSystem::Imperial);
        assert!("furlongs".parse::<UnitSystem>().is_err());
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0.0, 1), "0");
        assert_eq!(format_number(999.0, 0), "999");
        assert_eq!(format_number(1000.0, 0), "1,000");
        assert_eq!(format_number(9216.0, 1), "9,216");
        assert_eq!(format_number(1234567.891, 2), "1,234,567.89");
        assert_eq!(format_number(0.25, 1), "0.3");
        assert_eq!(format_number(-0.01, 1), "0");
    }
}
