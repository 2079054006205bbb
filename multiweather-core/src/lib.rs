//! Core library for the `multiweather` tools.
//!
//! This crate defines:
//! - A uniform request/response model over six weather-station vendor APIs
//!   (Campbell, Davis, Onset, Rainwise, Spectrum, Zentra)
//! - Per-vendor parameter validation and HTTP clients
//! - Shared timezone and record-transform utilities
//! - Configuration & credentials handling
//!
//! It is used by `multiweather-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod model;
pub mod timezone;
pub mod transform;
pub mod vendor;

pub use config::{Config, StationConfig};
pub use error::ParamError;
pub use model::{ReadingRequest, ReadingsEnvelope, SensorMap, StationReading, StationReadings};
pub use timezone::{StationWindow, TzCode};
pub use vendor::{VendorClient, VendorId, get_reading};

/// Version string stamped into every response envelope.
pub const BINDING_VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binding_version_matches_package() {
        assert_eq!(BINDING_VERSION, env!("CARGO_PKG_VERSION"));
    }
}
