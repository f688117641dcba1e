//! Error type used by the crate.

use thiserror::Error;

/// Error enum.
///
/// Numeric kernels never return this type: undefined results are reported with the `f64::INFINITY` sentinel and
/// degenerate input with `None`. The error is only produced when parsing identifiers supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeoKernelError {
    /// Unit name is not in the conversion table.
    #[error("unknown unit: {0}")]
    UnknownUnit(String),
    /// SRID does not correspond to any supported projection.
    #[error("unsupported SRID: {0}")]
    UnknownSrid(i32),
}
