//! Vendor selection and the common client abstraction.
//!
//! Each vendor module pairs a parameter object (validation + wire-format
//! normalization) with a client (request building, HTTP, response transform).
//! The façade [`get_reading`] selects the pair by name and drives the
//! two-phase build-params → fetch-and-transform flow.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::error::ParamError;
use crate::model::{ReadingRequest, StationReadings};

pub mod campbell;
pub mod davis;
pub mod onset;
pub mod rainwise;
pub mod spectrum;
pub mod zentra;

use campbell::{CampbellClient, CampbellParams};
use davis::{DavisClient, DavisParams};
use onset::{OnsetClient, OnsetParams};
use rainwise::{RainwiseClient, RainwiseParams};
use spectrum::{SpectrumClient, SpectrumParams};
use zentra::{ZentraClient, ZentraParams};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VendorId {
    Campbell,
    Davis,
    Onset,
    Rainwise,
    Spectrum,
    Zentra,
}

impl VendorId {
    pub fn as_str(&self) -> &'static str {
        match self {
            VendorId::Campbell => "campbell",
            VendorId::Davis => "davis",
            VendorId::Onset => "onset",
            VendorId::Rainwise => "rainwise",
            VendorId::Spectrum => "spectrum",
            VendorId::Zentra => "zentra",
        }
    }

    pub const fn all() -> &'static [VendorId] {
        &[
            VendorId::Campbell,
            VendorId::Davis,
            VendorId::Onset,
            VendorId::Rainwise,
            VendorId::Spectrum,
            VendorId::Zentra,
        ]
    }

    /// Expected reporting cadence, in minutes, for the timestamp grid.
    pub fn cadence_minutes(&self) -> u32 {
        match self {
            VendorId::Zentra | VendorId::Davis | VendorId::Spectrum => 5,
            VendorId::Campbell | VendorId::Onset | VendorId::Rainwise => 15,
        }
    }
}

impl std::fmt::Display for VendorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for VendorId {
    type Error = ParamError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "campbell" => Ok(VendorId::Campbell),
            "davis" => Ok(VendorId::Davis),
            "onset" => Ok(VendorId::Onset),
            "rainwise" => Ok(VendorId::Rainwise),
            "spectrum" => Ok(VendorId::Spectrum),
            "zentra" => Ok(VendorId::Zentra),
            _ => Err(ParamError::UnknownVendor),
        }
    }
}

/// Fetch a window of readings and transform them into canonical records.
///
/// Implementations fold non-success HTTP statuses into the envelope; `Err` is
/// reserved for transport and decode failures.
#[async_trait]
pub trait VendorClient: Send + Sync + Debug {
    async fn fetch(&self) -> anyhow::Result<StationReadings>;
}

/// Build the vendor's validated parameter object and wrap it in a client.
pub fn client_for(
    id: VendorId,
    request: &ReadingRequest,
) -> Result<Box<dyn VendorClient>, ParamError> {
    let boxed: Box<dyn VendorClient> = match id {
        VendorId::Campbell => Box::new(CampbellClient::new(CampbellParams::from_request(request)?)),
        VendorId::Davis => Box::new(DavisClient::new(DavisParams::from_request(request)?)),
        VendorId::Onset => Box::new(OnsetClient::new(OnsetParams::from_request(request)?)),
        VendorId::Rainwise => Box::new(RainwiseClient::new(RainwiseParams::from_request(request)?)),
        VendorId::Spectrum => Box::new(SpectrumClient::new(SpectrumParams::from_request(request)?)),
        VendorId::Zentra => Box::new(ZentraClient::new(ZentraParams::from_request(request)?)),
    };
    Ok(boxed)
}

/// Façade entry point: select the vendor by name (case-insensitive) and run
/// the full build → fetch → transform flow.
pub async fn get_reading(vendor: &str, request: &ReadingRequest) -> anyhow::Result<StationReadings> {
    let id = VendorId::try_from(vendor)?;
    get_reading_for(id, request).await
}

/// Same as [`get_reading`] with an already-resolved vendor id.
pub async fn get_reading_for(
    id: VendorId,
    request: &ReadingRequest,
) -> anyhow::Result<StationReadings> {
    let client = client_for(id, request)?;
    client.fetch().await
}
