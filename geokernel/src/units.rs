//! Angle helpers and conversion between length and area units.
//!
//! Lengths are converted through radians of arc on the spherical earth: a length in any [`Unit`] is first turned
//! into an angle with [`length_to_radians`] and then back into a length with [`radians_to_length`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::EARTH_RADIUS;
use crate::error::GeoKernelError;

/// Converts degrees to radians.
pub fn degrees_to_radians(degrees: f64) -> f64 {
    degrees.to_radians()
}

/// Converts radians to degrees.
pub fn radians_to_degrees(radians: f64) -> f64 {
    radians.to_degrees()
}

/// Normalizes a bearing into the `[0, 360)` range, e.g. `-90` becomes `270`.
pub fn normalize_bearing(bearing: f64) -> f64 {
    let normalized = bearing.rem_euclid(360.0);
    // rem_euclid rounds tiny negative values up to exactly 360
    if normalized >= 360.0 {
        0.0
    } else {
        normalized
    }
}

/// Converts a bearing in `(-180, 180]` to an azimuth in `[0, 360)`. Same as [`normalize_bearing`].
pub fn bearing_to_azimuth(bearing: f64) -> f64 {
    normalize_bearing(bearing)
}

/// Wraps a longitude into the `(-180, 180]` range.
pub fn normalize_longitude(longitude: f64) -> f64 {
    if !longitude.is_finite() {
        return longitude;
    }

    let wrapped = (longitude + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped <= -180.0 {
        wrapped + 360.0
    } else {
        wrapped
    }
}

/// Unit of length.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    /// Meters.
    Meters,
    /// Centimeters.
    Centimeters,
    /// Millimeters.
    Millimeters,
    /// Kilometers.
    Kilometers,
    /// Statute miles.
    Miles,
    /// Nautical miles.
    NauticalMiles,
    /// International feet.
    Feet,
    /// Inches.
    Inches,
    /// Yards.
    Yards,
    /// Radians of arc on the earth sphere.
    Radians,
    /// Degrees of arc on the earth sphere.
    Degrees,
}

impl Unit {
    /// All supported units.
    pub const ALL: [Unit; 11] = [
        Unit::Meters,
        Unit::Centimeters,
        Unit::Millimeters,
        Unit::Kilometers,
        Unit::Miles,
        Unit::NauticalMiles,
        Unit::Feet,
        Unit::Inches,
        Unit::Yards,
        Unit::Radians,
        Unit::Degrees,
    ];

    /// Number of units in one radian of arc.
    pub fn factor(&self) -> f64 {
        match self {
            Unit::Meters => EARTH_RADIUS,
            Unit::Centimeters => EARTH_RADIUS * 100.0,
            Unit::Millimeters => EARTH_RADIUS * 1000.0,
            Unit::Kilometers => EARTH_RADIUS / 1000.0,
            Unit::Miles => EARTH_RADIUS / 1609.344,
            Unit::NauticalMiles => EARTH_RADIUS / 1852.0,
            Unit::Feet => EARTH_RADIUS * 3.28084,
            Unit::Inches => EARTH_RADIUS * 39.370,
            Unit::Yards => EARTH_RADIUS * 1.0936,
            Unit::Radians => 1.0,
            Unit::Degrees => 180.0 / std::f64::consts::PI,
        }
    }

    /// Canonical name of the unit, as accepted by [`FromStr`].
    pub fn name(&self) -> &'static str {
        match self {
            Unit::Meters => "meters",
            Unit::Centimeters => "centimeters",
            Unit::Millimeters => "millimeters",
            Unit::Kilometers => "kilometers",
            Unit::Miles => "miles",
            Unit::NauticalMiles => "nauticalmiles",
            Unit::Feet => "feet",
            Unit::Inches => "inches",
            Unit::Yards => "yards",
            Unit::Radians => "radians",
            Unit::Degrees => "degrees",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Unit {
    type Err = GeoKernelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unit = match s.trim().to_ascii_lowercase().as_str() {
            "m" | "meter" | "meters" | "metre" | "metres" => Unit::Meters,
            "cm" | "centimeter" | "centimeters" | "centimetre" | "centimetres" => Unit::Centimeters,
            "mm" | "millimeter" | "millimeters" | "millimetre" | "millimetres" => Unit::Millimeters,
            "km" | "kilometer" | "kilometers" | "kilometre" | "kilometres" => Unit::Kilometers,
            "mi" | "mile" | "miles" => Unit::Miles,
            "nm" | "nauticalmile" | "nauticalmiles" | "nautical_miles" => Unit::NauticalMiles,
            "ft" | "foot" | "feet" => Unit::Feet,
            "in" | "inch" | "inches" => Unit::Inches,
            "yd" | "yard" | "yards" => Unit::Yards,
            "rad" | "radian" | "radians" => Unit::Radians,
            "deg" | "degree" | "degrees" => Unit::Degrees,
            _ => return Err(GeoKernelError::UnknownUnit(s.to_string())),
        };

        Ok(unit)
    }
}

/// Converts a length into radians of arc.
pub fn length_to_radians(length: f64, unit: Unit) -> f64 {
    length / unit.factor()
}

/// Converts radians of arc into a length.
pub fn radians_to_length(radians: f64, unit: Unit) -> f64 {
    radians * unit.factor()
}

/// Converts a length into degrees of arc.
pub fn length_to_degrees(length: f64, unit: Unit) -> f64 {
    length_to_radians(length, unit).to_degrees()
}

/// Converts degrees of arc into a length.
pub fn degrees_to_length(degrees: f64, unit: Unit) -> f64 {
    radians_to_length(degrees.to_radians(), unit)
}

/// Converts a length between units. Returns `None` for negative or non-finite lengths.
pub fn convert_length(length: f64, from: Unit, to: Unit) -> Option<f64> {
    if !length.is_finite() || length < 0.0 {
        return None;
    }

    Some(radians_to_length(length_to_radians(length, from), to))
}

/// Unit of area.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AreaUnit {
    /// Square meters.
    SquareMeters,
    /// Square centimeters.
    SquareCentimeters,
    /// Square millimeters.
    SquareMillimeters,
    /// Square kilometers.
    SquareKilometers,
    /// Square miles.
    SquareMiles,
    /// Square feet.
    SquareFeet,
    /// Square inches.
    SquareInches,
    /// Square yards.
    SquareYards,
    /// Acres.
    Acres,
    /// Hectares.
    Hectares,
}

impl AreaUnit {
    /// Number of units in one square meter.
    pub fn factor(&self) -> f64 {
        match self {
            AreaUnit::SquareMeters => 1.0,
            AreaUnit::SquareCentimeters => 10_000.0,
            AreaUnit::SquareMillimeters => 1_000_000.0,
            AreaUnit::SquareKilometers => 0.000_001,
            AreaUnit::SquareMiles => 3.86e-7,
            AreaUnit::SquareFeet => 10.763_910_417,
            AreaUnit::SquareInches => 1_550.003_100_006,
            AreaUnit::SquareYards => 1.195_990_046,
            AreaUnit::Acres => 0.000_247_105,
            AreaUnit::Hectares => 0.0001,
        }
    }
}

/// Converts an area between units. Returns `None` for negative or non-finite areas.
pub fn convert_area(area: f64, from: AreaUnit, to: AreaUnit) -> Option<f64> {
    if !area.is_finite() || area < 0.0 {
        return None;
    }

    Some(area / from.factor() * to.factor())
}
