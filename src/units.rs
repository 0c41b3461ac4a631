//! Newtype wrapper for measured lengths.
//!
//! Everything the surface hit test produces is already in meters, so there
//! is only one unit; the wrapper exists to pin down how a length is shown.

/// Text shown before anything has been measured, and after a reset.
pub const ZERO_READOUT: &str = "0.00";

/// A length in meters.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Meters(pub f32);

impl std::fmt::Display for Meters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2} meters", self.0)
    }
}
