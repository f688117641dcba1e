//! Constants shared by the kernels.

/// Mean radius of the spherical earth model, in meters.
pub const EARTH_RADIUS: f64 = 6_371_008.8;

/// Semimajor axis of WGS84, used as the sphere radius of the Web Mercator projection.
pub const WGS84_SEMIMAJOR: f64 = 6_378_137.0;

/// Half of the Web Mercator world width, in meters (`PI * WGS84_SEMIMAJOR`).
pub const ORIGIN_SHIFT: f64 = 20_037_508.342_789_244;

/// Latitude limit of the Web Mercator projection. Latitudes beyond it are clamped before projecting.
pub const MAX_MERCATOR_LATITUDE: f64 = 85.051_128_779_806_59;

/// Tolerance for planar equality and collinearity tests, in raw coordinate units.
pub const EQUALITY_DELTA: f64 = 1e-9;

/// Below this mercator stretch the rhumb formulas fall back to `cos(lat)`.
pub const RHUMB_STRETCH_EPSILON: f64 = 1e-11;

/// Segments shorter than this (meters) are treated as points.
pub const MIN_SEGMENT_LENGTH: f64 = 1.0;
